// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Drive the configure, build, relocate and launch pipeline.
// Author: Lukas Bower
#![forbid(unsafe_code)]

use std::fs;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use crate::command::{CommandRunner, Invocation, RunStatus};
use crate::config::LauncherConfig;
use crate::error::LaunchError;
use crate::mode::{BuildFlavor, LaunchPrefix, Mode};
use crate::target::Target;

/// Parallelism handed to the build system when none is requested.
pub const DEFAULT_THREADS: NonZeroU32 = match NonZeroU32::new(8) {
    Some(threads) => threads,
    None => unreachable!(),
};

const DEBUG_CONFIGURE_FLAG: &str = "-DCMAKE_BUILD_TYPE=Debug";
const STATUS_TAG: &str = "[mercury-run]";

/// A validated launch: what to build, how, and where it ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    /// Component to build and run.
    pub target: Target,
    /// Execution flavour.
    pub mode: Mode,
    /// Parallelism forwarded to the build system.
    pub threads: NonZeroU32,
    /// Project root; every step runs with it as working directory.
    pub root: PathBuf,
    /// Tools and output directory.
    pub config: LauncherConfig,
}

impl LaunchPlan {
    /// Validate raw mode and target names into a plan.
    ///
    /// The mode is checked before the target, and both before anything runs.
    pub fn resolve(
        target: &str,
        mode: &str,
        threads: NonZeroU32,
        root: impl Into<PathBuf>,
        config: LauncherConfig,
    ) -> Result<Self, LaunchError> {
        let mode: Mode = mode.parse()?;
        let target: Target = target.parse()?;
        Ok(Self {
            target,
            mode,
            threads,
            root: root.into(),
            config,
        })
    }

    /// Build-system configuration call for this mode.
    #[must_use]
    pub fn configure_invocation(&self) -> Invocation {
        let inv = Invocation::new(self.config.tools.configure.as_str(), &self.root);
        match self.mode.flavor() {
            BuildFlavor::Debug => inv.arg(DEBUG_CONFIGURE_FLAG).arg("."),
            BuildFlavor::Release => inv.arg("."),
        }
    }

    /// Compile call for the target's goal.
    #[must_use]
    pub fn build_invocation(&self) -> Invocation {
        Invocation::new(self.config.tools.build.as_str(), &self.root)
            .arg(format!("-j{}", self.threads))
            .arg(self.target.build_goal())
    }

    /// Where the build leaves the binary.
    #[must_use]
    pub fn artifact_path(&self) -> PathBuf {
        self.root.join(self.target.binary_name())
    }

    /// Output directory under the project root.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.config.output_dir)
    }

    /// Where the binary is moved to.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.output_dir().join(self.target.binary_name())
    }

    /// Launch call, relative to the project root.
    #[must_use]
    pub fn launch_invocation(&self) -> Invocation {
        let binary = Path::new(".")
            .join(&self.config.output_dir)
            .join(self.target.binary_name());
        match self.mode.prefix() {
            LaunchPrefix::Direct => Invocation::new(binary.into_os_string(), &self.root),
            LaunchPrefix::Debugger => {
                let (program, leading) = self
                    .config
                    .tools
                    .debugger
                    .split_first()
                    .map_or(("gdb", &[][..]), |(program, rest)| (program.as_str(), rest));
                Invocation::new(program, &self.root)
                    .args(leading.iter().map(String::as_str))
                    .arg(binary.into_os_string())
            }
        }
    }

    /// Human-readable rendering of every step, used for `--dry-run`.
    #[must_use]
    pub fn describe(&self) -> Vec<String> {
        vec![
            format!("{} {}", self.configure_invocation(), flavor_label(self.mode)),
            format!("mkdir -p {}", self.output_dir().display()),
            self.build_invocation().to_string(),
            format!(
                "mv {} {}",
                self.artifact_path().display(),
                self.output_path().display()
            ),
            self.launch_invocation().to_string(),
        ]
    }
}

fn flavor_label(mode: Mode) -> &'static str {
    match mode.flavor() {
        BuildFlavor::Debug => "(debug)",
        BuildFlavor::Release => "(release)",
    }
}

/// Sequential pipeline over a [`CommandRunner`].
#[derive(Debug)]
pub struct Launcher<R> {
    runner: R,
}

impl<R: CommandRunner> Launcher<R> {
    /// Wrap a runner.
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// Borrow the runner, mainly for inspection in tests.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Consume the launcher and return its runner.
    pub fn into_runner(self) -> R {
        self.runner
    }

    /// Configure, build, relocate and launch.
    ///
    /// Returns the launched program's status; failures before the launch are
    /// errors and stop the pipeline at the failing step.
    pub fn execute(&mut self, plan: &LaunchPlan) -> Result<RunStatus, LaunchError> {
        self.configure(plan)?;
        ensure_output_dir(plan)?;
        self.build(plan)?;
        relocate(plan)?;
        self.launch(plan)
    }

    fn configure(&mut self, plan: &LaunchPlan) -> Result<(), LaunchError> {
        let inv = plan.configure_invocation();
        println!("{STATUS_TAG} configuring {}: {inv}", flavor_label(plan.mode));
        log::info!("configure mode={} flavor={:?}", plan.mode, plan.mode.flavor());
        let status = self.runner.run(&inv)?;
        if !status.success() {
            return Err(LaunchError::ConfigureFailed {
                command: inv.to_string(),
                status: status.to_string(),
            });
        }
        Ok(())
    }

    fn build(&mut self, plan: &LaunchPlan) -> Result<(), LaunchError> {
        let inv = plan.build_invocation();
        println!("{STATUS_TAG} building {}: {inv}", plan.target.build_goal());
        log::info!(
            "build target={} goal={} threads={}",
            plan.target,
            plan.target.build_goal(),
            plan.threads
        );
        let status = self.runner.run(&inv)?;
        if !status.success() {
            return Err(LaunchError::BuildFailed {
                goal: plan.target.build_goal().to_owned(),
                command: inv.to_string(),
                status: status.to_string(),
            });
        }
        Ok(())
    }

    fn launch(&mut self, plan: &LaunchPlan) -> Result<RunStatus, LaunchError> {
        let inv = plan.launch_invocation();
        println!("{STATUS_TAG} launching: {inv}");
        log::info!("launch mode={} prefix={:?}", plan.mode, plan.mode.prefix());
        let status = self.runner.run(&inv)?;
        if !status.success() {
            log::warn!("{} exited with {status}", inv.program_name());
        }
        Ok(status)
    }
}

fn ensure_output_dir(plan: &LaunchPlan) -> Result<(), LaunchError> {
    let dir = plan.output_dir();
    fs::create_dir_all(&dir)
        .map_err(|err| LaunchError::io(format!("create output dir {}", dir.display()), err))
}

fn relocate(plan: &LaunchPlan) -> Result<(), LaunchError> {
    let from = plan.artifact_path();
    let to = plan.output_path();
    if !from.is_file() {
        return Err(LaunchError::MissingArtifact(from));
    }
    log::debug!("move {} -> {}", from.display(), to.display());
    match fs::rename(&from, &to) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            // rename cannot cross filesystems; fall back to copy + unlink.
            log::debug!("rename failed ({rename_err}); copying instead");
            fs::copy(&from, &to).map_err(|_| {
                LaunchError::io(
                    format!("move {} to {}", from.display(), to.display()),
                    rename_err,
                )
            })?;
            fs::remove_file(&from)
                .map_err(|err| LaunchError::io(format!("remove {}", from.display()), err))
        }
    }
}
