//! `devkit fetch`: download and unpack third-party archives listed in the
//! configuration.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{debug, info, instrument};

use crate::core::archive::ArchiveKind;
use crate::io::config::Dependency;
use crate::io::fetch::{Downloader, extract_archive, verify_sha256};
use crate::io::fs::remove_if_exists;
use crate::project::Project;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// Marker already present.
    Skipped,
    /// Downloaded and unpacked; archive size in bytes.
    Installed { bytes: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub name: String,
    pub status: FetchStatus,
}

/// Fetch `names` (every configured dependency when empty).
///
/// Unknown names are rejected before anything is downloaded.
#[instrument(skip_all, fields(force = force))]
pub fn fetch<D: Downloader>(
    project: &Project,
    downloader: &D,
    names: &[String],
    force: bool,
) -> Result<Vec<FetchOutcome>> {
    let selected = select_dependencies(project, names)?;
    let mut outcomes = Vec::with_capacity(selected.len());
    for dep in selected {
        let status = fetch_one(project, downloader, dep, force)
            .with_context(|| format!("fetch {}", dep.name))?;
        outcomes.push(FetchOutcome {
            name: dep.name.clone(),
            status,
        });
    }
    Ok(outcomes)
}

fn select_dependencies<'a>(project: &'a Project, names: &[String]) -> Result<Vec<&'a Dependency>> {
    let config = &project.config;
    if names.is_empty() {
        return Ok(config.dependencies.iter().collect());
    }
    let mut selected = Vec::with_capacity(names.len());
    for name in names {
        let Some(dep) = config.dependency(name) else {
            let known: Vec<&str> = config
                .dependencies
                .iter()
                .map(|dep| dep.name.as_str())
                .collect();
            bail!(
                "unknown dependency '{name}' (choose from: {})",
                if known.is_empty() { "none".to_string() } else { known.join(", ") }
            );
        };
        if !selected.iter().any(|seen: &&Dependency| seen.name == dep.name) {
            selected.push(dep);
        }
    }
    Ok(selected)
}

fn fetch_one<D: Downloader>(
    project: &Project,
    downloader: &D,
    dep: &Dependency,
    force: bool,
) -> Result<FetchStatus> {
    let root = &project.paths.root;
    let marker = root.join(&dep.marker);
    if marker.exists() && !force {
        println!("fetch: {} already installed", dep.name);
        return Ok(FetchStatus::Skipped);
    }

    let kind = ArchiveKind::from_name(&dep.url)?;
    let dest = root.join(&dep.dest);
    fs::create_dir_all(&dest).with_context(|| format!("create directory {}", dest.display()))?;
    let archive = dest.join(format!("{}.{}", dep.name, kind.extension()));

    // The archive never outlives this call, whatever step fails.
    let installed = install_archive(downloader, dep, &archive, kind, &dest, &marker);
    remove_if_exists(&archive)?;
    let bytes = installed?;

    if !marker.exists() {
        bail!(
            "{} was extracted but {} is still missing",
            dep.name,
            marker.display()
        );
    }
    info!(name = %dep.name, bytes, "dependency installed");
    Ok(FetchStatus::Installed { bytes })
}

/// Download and verify before touching an existing install, then replace it.
fn install_archive<D: Downloader>(
    downloader: &D,
    dep: &Dependency,
    archive: &Path,
    kind: ArchiveKind,
    dest: &Path,
    marker: &Path,
) -> Result<u64> {
    println!("fetch: downloading {}", dep.name);
    let bytes = downloader.download(&dep.url, archive)?;
    if let Some(expected) = &dep.sha256 {
        verify_sha256(archive, expected)?;
        debug!(name = %dep.name, "checksum verified");
    }
    if remove_if_exists(marker)? {
        debug!(marker = %marker.display(), "removed previous install");
    }
    println!("fetch: extracting {}", dep.name);
    extract_archive(archive, kind, dest)?;
    Ok(bytes)
}
