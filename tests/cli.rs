// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Exercise the mercury-run binary's argument handling and exit codes.
// Author: Lukas Bower

use std::fs;
use std::path::Path;

use anyhow::Result;
use mercury_run::config::{CONFIG_ENV, CONFIG_FILE_NAME};
use serial_test::serial;
use tempfile::TempDir;

fn launcher_in(root: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo_bin_cmd!("mercury-run");
    cmd.current_dir(root)
        .env_remove(CONFIG_ENV)
        .env("RUST_LOG", "warn");
    cmd
}

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
#[serial]
fn dry_run_main_defaults() -> Result<()> {
    let dir = TempDir::new()?;
    let assert = launcher_in(dir.path()).args(["main", "--dry-run"]).assert().success();
    let stdout = stdout_of(assert.get_output());
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 5, "unexpected plan: {stdout:?}");
    assert_eq!(lines[0], "[dry-run] cmake . (release)");
    assert_eq!(lines[2], "[dry-run] make -j8 mercury");
    assert_eq!(lines[4], "[dry-run] ./bin/mercury");
    assert!(!dir.path().join("bin").exists(), "dry run created output dir");
    Ok(())
}

#[test]
#[serial]
fn dry_run_ui_designer_gdb_four_threads() -> Result<()> {
    let dir = TempDir::new()?;
    let assert = launcher_in(dir.path())
        .args(["ud", "-m", "gdb", "-j", "4", "--dry-run"])
        .assert()
        .success();
    let stdout = stdout_of(assert.get_output());
    assert!(stdout.contains("[dry-run] cmake -DCMAKE_BUILD_TYPE=Debug . (debug)"));
    assert!(stdout.contains("[dry-run] make -j4 ui_designer"));
    assert!(stdout.contains("[dry-run] gdb ./bin/ui_designer"));
    Ok(())
}

#[test]
#[serial]
fn unknown_target_fails_loudly() -> Result<()> {
    let dir = TempDir::new()?;
    let assert = launcher_in(dir.path()).arg("zz").assert().code(1);
    let output = assert.get_output();
    assert!(stderr_of(output).contains("unknown target 'zz'"));
    assert!(stdout_of(output).is_empty());
    assert!(!dir.path().join("bin").exists());
    Ok(())
}

#[test]
#[serial]
fn invalid_mode_fails_without_side_effects() -> Result<()> {
    let dir = TempDir::new()?;
    let assert = launcher_in(dir.path())
        .args(["main", "--mode", "lldb"])
        .assert()
        .code(1);
    let output = assert.get_output();
    assert!(stderr_of(output).contains("invalid build mode 'lldb'"));
    assert!(stdout_of(output).is_empty());
    assert!(!dir.path().join("bin").exists());
    Ok(())
}

#[test]
#[serial]
fn zero_threads_is_a_usage_error() -> Result<()> {
    let dir = TempDir::new()?;
    launcher_in(dir.path())
        .args(["main", "-j", "0", "--dry-run"])
        .assert()
        .failure();
    launcher_in(dir.path())
        .args(["main", "-j", "many", "--dry-run"])
        .assert()
        .failure();
    Ok(())
}

#[test]
#[serial]
fn root_config_file_overrides_tools() -> Result<()> {
    let dir = TempDir::new()?;
    fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "[tools]\nbuild = \"gmake\"\n\n[output]\ndir = \"out\"\n",
    )?;
    let assert = launcher_in(dir.path())
        .args(["fb", "--dry-run"])
        .assert()
        .success();
    let stdout = stdout_of(assert.get_output());
    assert!(stdout.contains("[dry-run] gmake -j8 file_browser"));
    assert!(stdout.contains("[dry-run] ./out/file_browser"));
    Ok(())
}

#[test]
#[serial]
fn env_config_path_is_honoured() -> Result<()> {
    let dir = TempDir::new()?;
    let config = dir.path().join("alt.toml");
    fs::write(&config, "[tools]\ndebugger = [\"lldb\", \"--\"]\n")?;
    let assert = launcher_in(dir.path())
        .env(CONFIG_ENV, &config)
        .args(["main", "-m", "gdb", "--dry-run"])
        .assert()
        .success();
    assert!(stdout_of(assert.get_output()).contains("[dry-run] lldb -- ./bin/mercury"));
    Ok(())
}

#[test]
#[serial]
fn malformed_config_is_rejected() -> Result<()> {
    let dir = TempDir::new()?;
    fs::write(dir.path().join(CONFIG_FILE_NAME), "[output]\ndir = \"../escape\"\n")?;
    let assert = launcher_in(dir.path())
        .args(["main", "--dry-run"])
        .assert()
        .code(1);
    assert!(stderr_of(assert.get_output()).contains("output.dir"));
    Ok(())
}

#[cfg(unix)]
mod with_fake_tools {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    use anyhow::Result;
    use mercury_run::config::CONFIG_FILE_NAME;
    use serial_test::serial;
    use tempfile::TempDir;

    use super::{launcher_in, stderr_of, stdout_of};

    fn script(dir: &Path, name: &str, body: &str) -> Result<PathBuf> {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}"))?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
        Ok(path)
    }

    /// Project root whose "build" emits a binary exiting with `exit_code`.
    fn project(build_exit: i32, binary_exit: i32) -> Result<(TempDir, TempDir)> {
        let tools = TempDir::new()?;
        let root = TempDir::new()?;
        let configure = script(tools.path(), "fake-cmake", "echo \"$@\" > configured\n")?;
        let build = script(
            tools.path(),
            "fake-make",
            &format!(
                "[ {build_exit} -eq 0 ] || exit {build_exit}\n\
                 printf '#!/bin/sh\\nexit {binary_exit}\\n' > \"$2\"\n\
                 chmod +x \"$2\"\n"
            ),
        )?;
        fs::write(
            root.path().join(CONFIG_FILE_NAME),
            format!(
                "[tools]\nconfigure = {:?}\nbuild = {:?}\n",
                configure.display().to_string(),
                build.display().to_string()
            ),
        )?;
        Ok((tools, root))
    }

    #[test]
    #[serial]
    fn launched_exit_code_is_propagated() -> Result<()> {
        let (_tools, root) = project(0, 3)?;
        let assert = launcher_in(root.path()).arg("main").assert().code(3);
        let stdout = stdout_of(assert.get_output());
        assert!(stdout.contains("launching: ./bin/mercury"), "{stdout:?}");
        assert!(root.path().join("bin/mercury").is_file());
        assert!(!root.path().join("mercury").exists());
        assert_eq!(fs::read_to_string(root.path().join("configured"))?.trim(), ".");
        Ok(())
    }

    #[test]
    #[serial]
    fn debug_mode_configures_debug_build() -> Result<()> {
        let (_tools, root) = project(0, 0)?;
        launcher_in(root.path())
            .args(["fb", "-m", "mdb"])
            .assert()
            .success();
        assert_eq!(
            fs::read_to_string(root.path().join("configured"))?.trim(),
            "-DCMAKE_BUILD_TYPE=Debug ."
        );
        assert!(root.path().join("bin/file_browser").is_file());
        Ok(())
    }

    #[test]
    #[serial]
    fn failed_build_exits_non_zero_without_launch() -> Result<()> {
        let (_tools, root) = project(2, 0)?;
        let assert = launcher_in(root.path()).arg("main").assert().code(1);
        let output = assert.get_output();
        assert!(stderr_of(output).contains("build of 'mercury' failed"));
        assert!(!stdout_of(output).contains("launching"));
        assert!(!root.path().join("bin/mercury").exists());
        Ok(())
    }
}
