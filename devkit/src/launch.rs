//! Running a freshly built artifact (`devkit dev`, `devkit example`).

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::core::launch::{INDEX_PAGE, Launch, resolve_launch};
use crate::io::fs::rename_replacing;
use crate::io::launcher::Launcher;
use crate::project::Project;

/// Launch artifact `stem` from build directory `dir`.
///
/// Web builds get their `<stem>.html` renamed to `index.html` and are served;
/// native builds are executed in `dir`.
pub fn launch_artifact<L: Launcher>(
    project: &Project,
    dir: &Path,
    stem: &str,
    launcher: &L,
) -> Result<()> {
    match resolve_launch(dir, stem, Path::exists) {
        Launch::Web { dir, page } => {
            let index = dir.join(INDEX_PAGE);
            rename_replacing(&page, &index).context("prepare web build")?;
            info!(dir = %dir.display(), "serving web build");
            launcher.serve_web(
                &project.serve_options(&dir),
                project.config.server.open_browser,
            )
        }
        Launch::Native { dir, executable } => {
            info!(executable = %executable.display(), "running native build");
            launcher
                .run_native(&dir, &executable)
                .with_context(|| format!("run {}", executable.display()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Launched, RecordingLauncher, TestProject};
    use std::fs;

    #[test]
    fn web_build_is_renamed_and_served() {
        let test = TestProject::new().expect("project");
        let dir = test.path("dev/build");
        test.write("dev/build/dev.html", "<canvas>").expect("write");
        test.write("dev/build/index.html", "stale").expect("write");
        let launcher = RecordingLauncher::default();

        launch_artifact(&test.project(), &dir, "dev", &launcher).expect("launch");

        assert!(!dir.join("dev.html").exists());
        assert_eq!(
            fs::read_to_string(dir.join("index.html")).expect("read"),
            "<canvas>"
        );
        assert_eq!(
            launcher.launched(),
            vec![Launched::Web {
                root: dir.clone(),
                url: "http://localhost:8000/".to_string(),
                open_browser: true,
            }]
        );
    }

    #[test]
    fn native_build_runs_executable() {
        let test = TestProject::new().expect("project");
        let dir = test.path("examples/text/__build/build");
        test.write("examples/text/__build/build/example", "").expect("write");
        let launcher = RecordingLauncher::default();

        launch_artifact(&test.project(), &dir, "example", &launcher).expect("launch");

        assert_eq!(
            launcher.launched(),
            vec![Launched::Native {
                dir: dir.clone(),
                executable: dir.join("example"),
            }]
        );
    }
}
