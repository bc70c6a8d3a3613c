//! Launching built artifacts: native executables and web builds.

use std::path::Path;
use std::process::Command;

use anyhow::{Result, bail};
use devkit_serve::{ServeOptions, serve_blocking};
use tracing::{info, warn};

use super::browser::open_url;
use super::process::run_inherited;

/// Abstraction over running what a build produced.
pub trait Launcher {
    /// Run `executable` with `dir` as working directory until it exits.
    fn run_native(&self, dir: &Path, executable: &Path) -> Result<()>;

    /// Serve a web build until interrupted, optionally opening a browser.
    fn serve_web(&self, options: &ServeOptions, open_browser: bool) -> Result<()>;
}

/// Launcher that spawns processes and serves over HTTP for real.
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn run_native(&self, dir: &Path, executable: &Path) -> Result<()> {
        if !executable.is_file() {
            bail!("built executable {} not found", executable.display());
        }
        let line = executable.display().to_string();
        info!(executable = %line, dir = %dir.display(), "running executable");
        let mut cmd = Command::new(executable);
        cmd.current_dir(dir);
        run_inherited(cmd, &line, None)
    }

    fn serve_web(&self, options: &ServeOptions, open_browser: bool) -> Result<()> {
        let url = options.url();
        println!("serve: {} at {url} (ctrl-c to stop)", options.root.display());
        serve_blocking(options, || {
            if open_browser {
                if let Err(err) = open_url(&url) {
                    warn!(err = %err, "could not open browser");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit_codes;

    #[test]
    fn missing_executable_is_reported() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = SystemLauncher
            .run_native(temp.path(), &temp.path().join("example"))
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
        assert_eq!(exit_codes::for_error(&err), exit_codes::FAILED);
    }

    #[cfg(unix)]
    #[test]
    fn native_exit_code_is_passed_through() {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().expect("tempdir");
        let executable = temp.path().join("example");
        fs::write(&executable, "#!/bin/sh\ntest -f assets/ok || exit 3\nexit 9\n")
            .expect("write script");
        fs::set_permissions(&executable, fs::Permissions::from_mode(0o755)).expect("chmod");
        fs::create_dir_all(temp.path().join("assets")).expect("mkdir");
        fs::write(temp.path().join("assets/ok"), "").expect("write asset");

        let err = SystemLauncher
            .run_native(temp.path(), &executable)
            .unwrap_err();
        assert_eq!(exit_codes::for_error(&err), 9);
    }

    #[cfg(unix)]
    #[test]
    fn successful_executable_is_ok() {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().expect("tempdir");
        let executable = temp.path().join("dev");
        fs::write(&executable, "#!/bin/sh\nexit 0\n").expect("write script");
        fs::set_permissions(&executable, fs::Permissions::from_mode(0o755)).expect("chmod");

        SystemLauncher
            .run_native(temp.path(), &executable)
            .expect("run");
    }
}
