// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Define the error surface of the mercury-run launcher.
// Author: Lukas Bower
#![forbid(unsafe_code)]

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced while planning or executing a launch.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The requested execution mode is not one of the known modes.
    #[error("invalid build mode '{0}' (expected one of: normal, gdb, mdb)")]
    UnknownMode(String),
    /// The requested target has no build goal.
    #[error("unknown target '{0}' (expected one of: ud, fb, main)")]
    UnknownTarget(String),
    /// The build-system configuration step reported failure.
    #[error("configuration failed: `{command}` exited with {status}")]
    ConfigureFailed {
        /// Rendered configure command.
        command: String,
        /// Exit status description.
        status: String,
    },
    /// The compile step for a goal reported failure.
    #[error("build of '{goal}' failed: `{command}` exited with {status}")]
    BuildFailed {
        /// Build goal handed to the build system.
        goal: String,
        /// Rendered build command.
        command: String,
        /// Exit status description.
        status: String,
    },
    /// The build succeeded but left no binary to relocate.
    #[error("expected build artifact {} was not produced", .0.display())]
    MissingArtifact(PathBuf),
    /// An external program could not be started.
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// Filesystem failure while preparing or relocating outputs.
    #[error("{context}: {source}")]
    Io {
        /// What the launcher was doing.
        context: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

impl LaunchError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// True for errors caused by bad user input rather than a failing tool.
    #[must_use]
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::UnknownMode(_) | Self::UnknownTarget(_))
    }
}
