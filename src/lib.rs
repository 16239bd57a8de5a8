// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Expose the mercury-run launcher pipeline as a library.
// Author: Lukas Bower
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Build-and-run launcher for the Mercury CMake project.
//!
//! A launch configures the build system, compiles one goal, moves the
//! produced binary into the output directory and runs it, directly or under
//! a debugger.

/// Structured external invocations and the runner seam.
pub mod command;
/// Launcher configuration loading.
pub mod config;
/// Launcher error type.
pub mod error;
/// The configure/build/relocate/launch pipeline.
pub mod launcher;
/// Execution modes.
pub mod mode;
/// Buildable targets.
pub mod target;

pub use command::{CommandRunner, Invocation, RunStatus, SystemRunner};
pub use config::{load_config, resolve_config_path, LauncherConfig};
pub use error::LaunchError;
pub use launcher::{LaunchPlan, Launcher, DEFAULT_THREADS};
pub use mode::Mode;
pub use target::Target;
