//! `devkit dev`: reinstall the library, rebuild the dev environment and
//! launch it.

use anyhow::{Context, Result, bail};
use tracing::{debug, instrument};

use crate::core::meson::{Invocation, compile_args};
use crate::install::install;
use crate::io::fs::{copy_dir_merge, copy_library_files};
use crate::io::launcher::Launcher;
use crate::io::meson::BuildTool;
use crate::io::paths::DEV_ARTIFACT_STEM;
use crate::launch::launch_artifact;
use crate::project::Project;

#[instrument(skip_all)]
pub fn dev<T: BuildTool, L: Launcher>(project: &Project, tool: &T, launcher: &L) -> Result<()> {
    let paths = &project.paths;

    install(project, tool)?;

    if !paths.dev_build_dir.is_dir() {
        bail!(
            "dev build directory {} is not configured (run `devkit setup` first)",
            paths.dev_build_dir.display()
        );
    }
    println!("dev: compiling dev environment");
    tool.run(&Invocation::new(&paths.dev_build_dir, compile_args(None)))
        .context("build dev environment")?;

    if paths.dev_assets_dir.is_dir() {
        println!("dev: copying assets");
        let copied = copy_dir_merge(
            &paths.dev_assets_dir,
            &paths.dev_build_dir.join("assets"),
            &[],
        )?;
        debug!(copied, "assets copied");
    }

    let libs = copy_library_files(&paths.install_lib_dir, &paths.dev_build_dir)?;
    debug!(count = libs.len(), "library files copied");

    launch_artifact(project, &paths.dev_build_dir, DEV_ARTIFACT_STEM, launcher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        Launched, RecordingLauncher, ScriptedBuildTool, TestProject, install_into, write_output,
    };

    #[test]
    fn rebuilds_copies_and_launches_native() {
        let test = TestProject::new().expect("project");
        test.mkdir("build").expect("mkdir");
        test.mkdir("dev/build").expect("mkdir");
        test.write("dev/assets/fonts/mono.ttf", "font").expect("write");
        let tool = ScriptedBuildTool::new()
            .on("install", install_into(test.path("lib")))
            .on("compile", write_output("dev", ""));
        let launcher = RecordingLauncher::default();

        dev(&test.project(), &tool, &launcher).expect("dev");

        assert!(test.path("dev/build/assets/fonts/mono.ttf").is_file());
        assert!(test.path("dev/build/libremi.so").is_file());
        assert!(!test.path("dev/build/pkgconfig").exists());
        assert_eq!(
            tool.commands().last(),
            Some(&(test.path("dev/build"), "compile".to_string()))
        );
        assert_eq!(
            launcher.launched(),
            vec![Launched::Native {
                dir: test.path("dev/build"),
                executable: test.path("dev/build/dev"),
            }]
        );
    }

    #[test]
    fn web_build_is_served() {
        let test = TestProject::new().expect("project");
        test.mkdir("build").expect("mkdir");
        test.mkdir("dev/build").expect("mkdir");
        let tool = ScriptedBuildTool::new()
            .on("install", install_into(test.path("lib")))
            .on("compile", write_output("dev.html", "<canvas>"));
        let launcher = RecordingLauncher::default();

        dev(&test.project(), &tool, &launcher).expect("dev");

        assert!(test.path("dev/build/index.html").is_file());
        assert!(matches!(
            launcher.launched().as_slice(),
            [Launched::Web { .. }]
        ));
    }

    #[test]
    fn unconfigured_dev_build_is_reported() {
        let test = TestProject::new().expect("project");
        test.mkdir("build").expect("mkdir");
        let tool = ScriptedBuildTool::new().on("install", install_into(test.path("lib")));
        let launcher = RecordingLauncher::default();

        let err = dev(&test.project(), &tool, &launcher).unwrap_err();
        assert!(err.to_string().contains("devkit setup"));
        assert!(launcher.launched().is_empty());
    }
}
