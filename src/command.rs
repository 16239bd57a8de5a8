// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Describe and execute external tool invocations for the launcher.
// Author: Lukas Bower
#![forbid(unsafe_code)]

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use crate::error::LaunchError;

/// One external program call with an explicit argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to execute, resolved through `PATH` when not a path.
    pub program: OsString,
    /// Arguments passed verbatim, no shell involved.
    pub args: Vec<OsString>,
    /// Working directory for the child.
    pub cwd: PathBuf,
}

impl Invocation {
    /// Start an invocation of `program` running in `cwd`.
    pub fn new(program: impl Into<OsString>, cwd: &Path) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.to_path_buf(),
        }
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Program name as a lossy string, for diagnostics.
    #[must_use]
    pub fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {arg:?}")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Outcome of a finished child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStatus {
    code: Option<i32>,
}

impl RunStatus {
    /// Status of a child that exited with `code`.
    #[must_use]
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    /// Status of a child killed before it could exit.
    #[must_use]
    pub fn terminated() -> Self {
        Self { code: None }
    }

    /// True when the child exited with status zero.
    #[must_use]
    pub fn success(self) -> bool {
        self.code == Some(0)
    }

    /// Exit code, if the child exited normally.
    #[must_use]
    pub fn code(self) -> Option<i32> {
        self.code
    }
}

impl From<ExitStatus> for RunStatus {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {code}"),
            None => f.write_str("a signal"),
        }
    }
}

/// Runs invocations to completion.
pub trait CommandRunner {
    /// Execute `invocation`, blocking until it exits.
    fn run(&mut self, invocation: &Invocation) -> Result<RunStatus, LaunchError>;
}

/// Runner backed by real child processes sharing the launcher's stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<RunStatus, LaunchError> {
        log::debug!("exec {invocation} (cwd {})", invocation.cwd.display());
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| LaunchError::Spawn {
                program: invocation.program_name(),
                source,
            })?;
        let status = RunStatus::from(status);
        log::debug!("{} finished with {status}", invocation.program_name());
        Ok(status)
    }
}
