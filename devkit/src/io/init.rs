//! `devkit init`: scaffold a `devkit.toml` in a project root.

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};

use super::config::{CONFIG_FILE_NAME, DevkitConfig, write_config};

/// Options for [`init_project`].
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// If true, overwrite an existing `devkit.toml`.
    pub force: bool,
}

/// Write the default configuration to `<root>/devkit.toml`.
///
/// Fails if the file already exists unless `options.force` is set.
pub fn init_project(root: &Path, options: &InitOptions) -> Result<PathBuf> {
    let path = root.join(CONFIG_FILE_NAME);
    if path.exists() && !options.force {
        return Err(anyhow!(
            "devkit init: {} already exists (use --force to overwrite)",
            path.display()
        ));
    }
    write_config(&path, &DevkitConfig::default())?;
    Ok(path)
}
