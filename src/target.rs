// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Map launcher targets onto build goals and binary names.
// Author: Lukas Bower
#![forbid(unsafe_code)]

use std::fmt;
use std::str::FromStr;

use crate::error::LaunchError;

/// Components the launcher knows how to build and run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// UI designer tool (`ud`).
    UiDesigner,
    /// File browser tool (`fb`).
    FileBrowser,
    /// Main Mercury application (`main`).
    Main,
}

impl Target {
    /// Every target, in command-line listing order.
    pub const ALL: [Target; 3] = [Target::UiDesigner, Target::FileBrowser, Target::Main];

    /// Identifier accepted on the command line.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Target::UiDesigner => "ud",
            Target::FileBrowser => "fb",
            Target::Main => "main",
        }
    }

    /// Goal handed to the build system.
    #[must_use]
    pub fn build_goal(self) -> &'static str {
        match self {
            Target::UiDesigner => "ui_designer",
            Target::FileBrowser => "file_browser",
            Target::Main => "mercury",
        }
    }

    /// File name of the binary the build leaves in the project root.
    #[must_use]
    pub fn binary_name(self) -> &'static str {
        match self {
            Target::UiDesigner => "ui_designer",
            Target::FileBrowser => "file_browser",
            Target::Main => "mercury",
        }
    }
}

impl FromStr for Target {
    type Err = LaunchError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Target::ALL
            .into_iter()
            .find(|target| target.name() == value)
            .ok_or_else(|| LaunchError::UnknownTarget(value.to_owned()))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
