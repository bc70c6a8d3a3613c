//! `devkit uninstall`: remove the library from the toolchain prefix and
//! delete the install directory.

use anyhow::{Context, Result};
use tracing::{debug, instrument};

use crate::core::install::{is_library_entry, pkgconfig_file_name};
use crate::install::toolchain_prefix;
use crate::io::fs::{entry_names, remove_if_exists};
use crate::project::Project;

/// Outcome of an uninstall.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UninstallReport {
    /// Entries removed from the toolchain prefix.
    pub toolchain_removed: usize,
    /// Whether the install directory existed and was removed.
    pub install_dir_removed: bool,
}

/// Undo [`crate::install::install`]. Missing pieces are not errors.
#[instrument(skip_all)]
pub fn uninstall(project: &Project) -> Result<UninstallReport> {
    let paths = &project.paths;
    let library = project.library();
    let mut report = UninstallReport::default();

    if let Some(prefix) = toolchain_prefix(project) {
        println!("uninstall: removing {library} from {}", prefix.display());
        let include = prefix.join("include");
        for name in entry_names(&paths.install_include_dir)? {
            if remove_if_exists(&include.join(&name))? {
                report.toolchain_removed += 1;
            }
        }
        let lib = prefix.join("lib");
        for name in entry_names(&paths.install_lib_dir)? {
            if !is_library_entry(&name) {
                continue;
            }
            if remove_if_exists(&lib.join(&name))? {
                report.toolchain_removed += 1;
            }
        }
        let pc_file = lib.join("pkgconfig").join(pkgconfig_file_name(library));
        if remove_if_exists(&pc_file)
            .with_context(|| format!("remove {}", pc_file.display()))?
        {
            report.toolchain_removed += 1;
        }
    }

    println!("uninstall: removing {}", paths.install_dir.display());
    report.install_dir_removed = remove_if_exists(&paths.install_dir)?;
    debug!(?report, "uninstalled");
    Ok(report)
}
