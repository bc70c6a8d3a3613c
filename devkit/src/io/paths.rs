//! Canonical project paths and project root discovery.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use super::config::{CONFIG_FILE_NAME, LayoutConfig};
use crate::core::example::BUILD_DIR_NAME;
use crate::core::install::PKGCONFIG_DIR;
use crate::core::types::Target;

/// Build directory name inside the dev environment project.
pub const DEV_BUILD_DIR: &str = "build";
/// Artifact stem produced by the dev environment.
pub const DEV_ARTIFACT_STEM: &str = "dev";

/// All canonical paths for a project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    pub root: PathBuf,
    pub build_dir: PathBuf,
    pub install_dir: PathBuf,
    pub install_include_dir: PathBuf,
    pub install_lib_dir: PathBuf,
    pub install_pkgconfig_dir: PathBuf,
    pub dev_dir: PathBuf,
    pub dev_build_dir: PathBuf,
    pub dev_assets_dir: PathBuf,
    pub examples_dir: PathBuf,
    pub examples_template_dir: PathBuf,
    pub cross_dir: PathBuf,
    pub meson_options_path: PathBuf,
}

impl ProjectPaths {
    pub fn new(root: impl Into<PathBuf>, layout: &LayoutConfig) -> Self {
        let root = root.into();
        let install_dir = root.join(&layout.install_dir);
        let install_lib_dir = install_dir.join("lib");
        let dev_dir = root.join(&layout.dev_dir);
        let examples_dir = root.join(&layout.examples_dir);
        Self {
            build_dir: root.join(&layout.build_dir),
            install_include_dir: install_dir.join("include"),
            install_pkgconfig_dir: install_lib_dir.join(PKGCONFIG_DIR),
            install_lib_dir,
            install_dir,
            dev_build_dir: dev_dir.join(DEV_BUILD_DIR),
            dev_assets_dir: dev_dir.join("assets"),
            dev_dir,
            examples_template_dir: examples_dir.join(BUILD_DIR_NAME),
            examples_dir,
            cross_dir: root.join(&layout.cross_dir),
            meson_options_path: root.join("meson.options"),
            root,
        }
    }

    /// Cross file for `target`, which must exist when the target needs one.
    pub fn cross_file(&self, target: Target) -> Result<Option<PathBuf>> {
        let Some(name) = target.cross_file_name() else {
            return Ok(None);
        };
        let path = self.cross_dir.join(name);
        if !path.is_file() {
            bail!("missing cross file for {target}: {}", path.display());
        }
        Ok(Some(path))
    }
}

/// Find the project root for `start`.
///
/// The nearest ancestor containing `devkit.toml` wins; without one, `start`
/// itself is the root.
pub fn discover_root(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| dir.join(CONFIG_FILE_NAME).is_file())
        .unwrap_or(start)
        .to_path_buf()
}
