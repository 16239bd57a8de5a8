// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Describe execution modes and their build/launch flavours.
// Author: Lukas Bower
#![forbid(unsafe_code)]

use std::fmt;
use std::str::FromStr;

use crate::error::LaunchError;

/// Build configuration selected by a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildFlavor {
    /// Default (release) configuration.
    Release,
    /// Debug symbols, optimisation disabled.
    Debug,
}

/// How the relocated binary is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchPrefix {
    /// Execute the binary path directly.
    Direct,
    /// Wrap the binary path with the configured debugger command.
    Debugger,
}

/// Execution flavour chosen with `--mode`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Release build, direct execution.
    #[default]
    Normal,
    /// Debug build, launched under the debugger.
    Gdb,
    /// Debug build, launched directly so an external debugger can attach.
    Mdb,
}

impl Mode {
    /// Every mode, in command-line listing order.
    pub const ALL: [Mode; 3] = [Mode::Normal, Mode::Gdb, Mode::Mdb];

    /// Identifier accepted on the command line.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::Gdb => "gdb",
            Mode::Mdb => "mdb",
        }
    }

    /// Build configuration for this mode.
    #[must_use]
    pub fn flavor(self) -> BuildFlavor {
        match self {
            Mode::Normal => BuildFlavor::Release,
            Mode::Gdb | Mode::Mdb => BuildFlavor::Debug,
        }
    }

    /// Launch wrapping for this mode.
    #[must_use]
    pub fn prefix(self) -> LaunchPrefix {
        match self {
            Mode::Gdb => LaunchPrefix::Debugger,
            Mode::Normal | Mode::Mdb => LaunchPrefix::Direct,
        }
    }
}

impl FromStr for Mode {
    type Err = LaunchError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        // The empty string is the historical spelling of the default mode.
        if value.is_empty() {
            return Ok(Mode::Normal);
        }
        Mode::ALL
            .into_iter()
            .find(|mode| mode.name() == value)
            .ok_or_else(|| LaunchError::UnknownMode(value.to_owned()))
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
