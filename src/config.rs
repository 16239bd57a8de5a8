// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Load and validate mercury-run launcher configuration.
// Author: Lukas Bower
#![forbid(unsafe_code)]

use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

/// Environment variable naming an alternate configuration file.
pub const CONFIG_ENV: &str = "MERCURY_RUN_CONFIG";
/// Configuration file looked up in the project root when nothing else is given.
pub const CONFIG_FILE_NAME: &str = "mercury-run.toml";

const DEFAULT_CONFIGURE: &str = "cmake";
const DEFAULT_BUILD: &str = "make";
const DEFAULT_DEBUGGER: &str = "gdb";
const DEFAULT_OUTPUT_DIR: &str = "bin";

/// Tools and paths used by the launcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherConfig {
    /// External programs invoked by the pipeline.
    pub tools: ToolsConfig,
    /// Output directory the built binary is moved into, relative to the root.
    pub output_dir: PathBuf,
}

/// External programs invoked by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolsConfig {
    /// Build-system configuration program (`cmake`).
    pub configure: String,
    /// Compilation driver (`make`).
    pub build: String,
    /// Debugger command and leading arguments placed before the binary path.
    pub debugger: Vec<String>,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            tools: ToolsConfig {
                configure: DEFAULT_CONFIGURE.to_owned(),
                build: DEFAULT_BUILD.to_owned(),
                debugger: vec![DEFAULT_DEBUGGER.to_owned()],
            },
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigToml {
    #[serde(default)]
    tools: ToolsTomlSection,
    #[serde(default)]
    output: OutputTomlSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ToolsTomlSection {
    configure: Option<String>,
    build: Option<String>,
    debugger: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct OutputTomlSection {
    dir: Option<String>,
}

/// Pick the configuration file to load, if any.
///
/// An explicit path wins, then [`CONFIG_ENV`], then [`CONFIG_FILE_NAME`] in the
/// project root. `None` means the built-in defaults apply.
#[must_use]
pub fn resolve_config_path(cli_path: Option<PathBuf>, root: &Path) -> Option<PathBuf> {
    if let Some(path) = cli_path {
        return Some(path);
    }
    if let Ok(value) = env::var(CONFIG_ENV) {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    let candidate = root.join(CONFIG_FILE_NAME);
    if candidate.is_file() {
        return Some(candidate);
    }
    None
}

/// Load a configuration file, filling unset keys from the defaults.
pub fn load_config(path: &Path) -> Result<LauncherConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read launcher config {}", path.display()))?;
    parse_config(&text).with_context(|| format!("invalid launcher config {}", path.display()))
}

/// Parse configuration TOML, filling unset keys from the defaults.
pub fn parse_config(text: &str) -> Result<LauncherConfig> {
    let parsed: ConfigToml = toml::from_str(text).context("invalid launcher config TOML")?;
    let defaults = LauncherConfig::default();
    let config = LauncherConfig {
        tools: ToolsConfig {
            configure: parsed.tools.configure.unwrap_or(defaults.tools.configure),
            build: parsed.tools.build.unwrap_or(defaults.tools.build),
            debugger: parsed.tools.debugger.unwrap_or(defaults.tools.debugger),
        },
        output_dir: parsed
            .output
            .dir
            .map(PathBuf::from)
            .unwrap_or(defaults.output_dir),
    };
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &LauncherConfig) -> Result<()> {
    if config.tools.configure.trim().is_empty() {
        return Err(anyhow!("tools.configure must not be empty"));
    }
    if config.tools.build.trim().is_empty() {
        return Err(anyhow!("tools.build must not be empty"));
    }
    match config.tools.debugger.first() {
        None => return Err(anyhow!("tools.debugger must name a program")),
        Some(program) if program.trim().is_empty() => {
            return Err(anyhow!("tools.debugger must name a program"))
        }
        Some(_) => {}
    }
    if config.tools.debugger.iter().any(|arg| arg.is_empty()) {
        return Err(anyhow!("tools.debugger entries must not be empty"));
    }
    validate_output_dir(&config.output_dir)
}

fn validate_output_dir(dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() {
        return Err(anyhow!("output.dir must not be empty"));
    }
    for component in dir.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => {
                return Err(anyhow!(
                    "output.dir '{}' must not contain '..'",
                    dir.display()
                ))
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(anyhow!(
                    "output.dir '{}' must be relative to the project root",
                    dir.display()
                ))
            }
        }
    }
    if !dir.components().any(|c| matches!(c, Component::Normal(_))) {
        return Err(anyhow!(
            "output.dir '{}' must name a subdirectory",
            dir.display()
        ));
    }
    Ok(())
}
