//! `devkit example` and `devkit examples`: build one example against the
//! installed library and run it, or list what is available.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::{debug, info, instrument, warn};

use crate::core::example::{ARTIFACT_STEM, BUILD_DIR_NAME, MESON_BUILD_DIR, render_meson_build};
use crate::core::meson::{Invocation, SetupPlan, compile_args, setup_args};
use crate::core::types::{Mode, Target};
use crate::io::examples::{Example, discover_examples, find_example, read_example};
use crate::io::fs::{copy_dir_merge, copy_library_files, remove_if_exists};
use crate::io::launcher::Launcher;
use crate::io::meson::BuildTool;
use crate::launch::launch_artifact;
use crate::project::Project;

const MESON_BUILD_FILE: &str = "meson.build";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExampleOptions {
    /// Start from an empty `__build` directory.
    pub clean: bool,
    pub target: Target,
    pub mode: Mode,
}

impl Default for ExampleOptions {
    fn default() -> Self {
        Self {
            clean: true,
            target: Target::default(),
            mode: Mode::default(),
        }
    }
}

/// Build example `name` and launch it.
#[instrument(skip_all, fields(example = name))]
pub fn run_example<T: BuildTool, L: Launcher>(
    project: &Project,
    name: &str,
    options: &ExampleOptions,
    tool: &T,
    launcher: &L,
) -> Result<()> {
    let example = find_example(&project.paths.examples_dir, name)?;
    println!("{}: {}", example.info.name, example.info.description);
    let output_dir = build_example(project, &example, options, tool)?;
    launch_artifact(project, &output_dir, ARTIFACT_STEM, launcher)
}

/// Prepare `__build`, configure and compile it. Returns the meson build dir
/// holding the artifact.
pub fn build_example<T: BuildTool>(
    project: &Project,
    example: &Example,
    options: &ExampleOptions,
    tool: &T,
) -> Result<PathBuf> {
    let paths = &project.paths;
    let info = &example.info;
    let work_dir = example.dir.join(BUILD_DIR_NAME);
    let output_dir = work_dir.join(MESON_BUILD_DIR);

    if options.clean && remove_if_exists(&work_dir)? {
        debug!(dir = %work_dir.display(), "removed previous example build");
    }

    if !work_dir.exists() {
        println!("{}: preparing {}", example.id, work_dir.display());
        fs::create_dir_all(&work_dir)
            .with_context(|| format!("create directory {}", work_dir.display()))?;
        copy_dir_merge(&example.dir, &work_dir, &info.copy_excludes())
            .with_context(|| format!("copy example {}", example.id))?;
        copy_dir_merge(&paths.examples_template_dir, &work_dir, &[])
            .context("copy example build template")?;
    }

    let meson_build = work_dir.join(MESON_BUILD_FILE);
    if !meson_build.is_file() {
        bail!("{} does not exist", meson_build.display());
    }
    let template = fs::read_to_string(&meson_build)
        .with_context(|| format!("read {}", meson_build.display()))?;
    fs::write(&meson_build, render_meson_build(&template, info))
        .with_context(|| format!("write {}", meson_build.display()))?;

    if !output_dir.exists() {
        let cross_file = paths.cross_file(options.target)?;
        let plan = SetupPlan {
            build_dir: MESON_BUILD_DIR,
            target: options.target,
            mode: options.mode,
            cross_file: cross_file.as_deref(),
        };
        println!("{}: configuring for {} ({})", example.id, options.target, options.mode);
        tool.run(&Invocation::new(&work_dir, setup_args(&plan)))
            .with_context(|| format!("configure example {}", example.id))?;
    }

    println!("{}: compiling", example.id);
    tool.run(&Invocation::new(&work_dir, compile_args(Some(MESON_BUILD_DIR))).captured())
        .with_context(|| format!("build example {}", example.id))?;

    if info.has_assets() {
        let assets = example.dir.join(&info.assets_dir);
        if !assets.is_dir() {
            bail!(
                "assets directory {} of example {} does not exist",
                assets.display(),
                example.id
            );
        }
        copy_dir_merge(&assets, &output_dir.join(&info.assets_dir), &[])
            .with_context(|| format!("copy assets of example {}", example.id))?;
    }

    let libs = copy_library_files(&paths.install_lib_dir, &output_dir)?;
    if libs.is_empty() {
        bail!(
            "no library files in {} (run `devkit install` first)",
            paths.install_lib_dir.display()
        );
    }
    info!(libraries = libs.len(), "example built");
    Ok(output_dir)
}

/// One row of `devkit examples`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExampleListing {
    Valid(Example),
    Invalid { id: String, error: String },
}

impl ExampleListing {
    pub fn id(&self) -> &str {
        match self {
            Self::Valid(example) => &example.id,
            Self::Invalid { id, .. } => id,
        }
    }
}

/// All examples sorted by directory name; broken descriptors are kept in
/// the listing instead of failing it.
pub fn list_examples(project: &Project) -> Result<Vec<ExampleListing>> {
    let examples_dir = &project.paths.examples_dir;
    let mut listings = Vec::new();
    for id in discover_examples(examples_dir)? {
        match read_example(&examples_dir.join(&id)) {
            Ok(example) => listings.push(ExampleListing::Valid(example)),
            Err(err) => {
                warn!(example = %id, err = %format!("{err:#}"), "unreadable example");
                listings.push(ExampleListing::Invalid {
                    id,
                    error: format!("{err:#}"),
                });
            }
        }
    }
    Ok(listings)
}
