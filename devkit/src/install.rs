//! `devkit install`: compile and install the library, then mirror it into
//! the system toolchain prefix when one is configured.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{debug, info, instrument};

use crate::core::install::pkgconfig_file_name;
use crate::core::meson::{Invocation, compile_args, install_args};
use crate::io::fs::{copy_dir_merge, copy_library_files, remove_if_exists, replace_file};
use crate::io::meson::BuildTool;
use crate::project::Project;

/// Outcome of an install.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    /// Toolchain prefix the library was mirrored into, if any.
    pub toolchain: Option<PathBuf>,
}

/// Reinstall the library into the install dir from scratch.
#[instrument(skip_all)]
pub fn install<T: BuildTool>(project: &Project, tool: &T) -> Result<InstallReport> {
    let paths = &project.paths;
    let library = project.library();

    if remove_if_exists(&paths.install_dir)? {
        debug!(path = %paths.install_dir.display(), "removed previous install");
    }
    if !paths.build_dir.is_dir() {
        bail!(
            "build directory {} is not configured (run `devkit setup` first)",
            paths.build_dir.display()
        );
    }

    println!("install: building and installing {library}");
    tool.run(&Invocation::new(&paths.build_dir, compile_args(None)))
        .with_context(|| format!("build {library}"))?;
    tool.run(&Invocation::new(&paths.build_dir, install_args()))
        .with_context(|| format!("install {library}"))?;

    let mut report = InstallReport::default();
    if let Some(prefix) = toolchain_prefix(project) {
        println!("install: copying {library} into {}", prefix.display());
        mirror_into_toolchain(project, &prefix)
            .with_context(|| format!("install {library} into {}", prefix.display()))?;
        report.toolchain = Some(prefix);
    }
    Ok(report)
}

/// The configured toolchain prefix, when it exists on this machine.
pub(crate) fn toolchain_prefix(project: &Project) -> Option<PathBuf> {
    let prefix = project.config.toolchain_prefix.as_ref()?;
    if prefix.is_dir() {
        Some(prefix.clone())
    } else {
        debug!(prefix = %prefix.display(), "toolchain prefix not present");
        None
    }
}

fn mirror_into_toolchain(project: &Project, prefix: &Path) -> Result<()> {
    let paths = &project.paths;

    if paths.install_include_dir.is_dir() {
        copy_dir_merge(&paths.install_include_dir, &prefix.join("include"), &[])?;
    }

    let libs = copy_library_files(&paths.install_lib_dir, &prefix.join("lib"))?;
    info!(count = libs.len(), "copied library files");

    let pc_name = pkgconfig_file_name(project.library());
    let pc_file = paths.install_pkgconfig_dir.join(&pc_name);
    if pc_file.is_file() {
        replace_file(&pc_file, &prefix.join("lib").join("pkgconfig").join(&pc_name))?;
    }
    Ok(())
}
