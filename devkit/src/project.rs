//! A project root paired with its loaded configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use devkit_serve::ServeOptions;
use tracing::debug;

use crate::io::config::{CONFIG_FILE_NAME, DevkitConfig, load_config};
use crate::io::paths::ProjectPaths;

/// Everything a command needs to know about the project it operates on.
#[derive(Debug, Clone)]
pub struct Project {
    pub paths: ProjectPaths,
    pub config: DevkitConfig,
}

impl Project {
    /// Load `devkit.toml` (defaults if absent) for `root`.
    pub fn open(root: &Path) -> Result<Self> {
        let root = root
            .canonicalize()
            .with_context(|| format!("resolve project root {}", root.display()))?;
        let config = load_config(&root.join(CONFIG_FILE_NAME))?;
        debug!(root = %root.display(), library = %config.library, "project opened");
        Ok(Self::with_config(root, config))
    }

    pub fn with_config(root: impl Into<PathBuf>, config: DevkitConfig) -> Self {
        let paths = ProjectPaths::new(root, &config.layout);
        Self { paths, config }
    }

    pub fn library(&self) -> &str {
        &self.config.library
    }

    /// Server options for serving `dir` with the configured bind/port.
    pub fn serve_options(&self, dir: &Path) -> ServeOptions {
        ServeOptions {
            root: dir.to_path_buf(),
            bind: self.config.server.bind.clone(),
            port: self.config.server.port,
            cross_origin_isolation: self.config.server.cross_origin_isolation,
        }
    }
}
