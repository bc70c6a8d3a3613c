//! Filesystem helpers: guarded removal, merge copies, library copies.
//!
//! Every removal checks for existence first, so commands can be re-run on a
//! partially cleaned tree.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;
use walkdir::WalkDir;

use crate::core::install::is_library_entry;

/// Remove a file, symlink, or directory tree if it exists.
///
/// Returns whether something was removed.
pub fn remove_if_exists(path: &Path) -> Result<bool> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err).with_context(|| format!("stat {}", path.display())),
    };
    if meta.is_dir() {
        fs::remove_dir_all(path).with_context(|| format!("remove {}", path.display()))?;
    } else {
        fs::remove_file(path).with_context(|| format!("remove {}", path.display()))?;
    }
    debug!(path = %path.display(), "removed");
    Ok(true)
}

/// Copy the tree under `src` into `dst`, overwriting files that exist.
///
/// Top-level entries of `src` whose names appear in `excludes` are skipped
/// along with everything below them. Returns the number of files copied.
pub fn copy_dir_merge(src: &Path, dst: &Path, excludes: &[String]) -> Result<usize> {
    if !src.is_dir() {
        anyhow::bail!("copy source {} is not a directory", src.display());
    }
    fs::create_dir_all(dst).with_context(|| format!("create directory {}", dst.display()))?;

    let walker = WalkDir::new(src)
        .follow_links(true)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() != 1
                || !excludes
                    .iter()
                    .any(|name| entry.file_name() == name.as_str())
        });

    let mut copied = 0usize;
    for entry in walker {
        let entry = entry.with_context(|| format!("walk {}", src.display()))?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .with_context(|| format!("relative path of {}", entry.path().display()))?;
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("create directory {}", target.display()))?;
        } else {
            replace_file(entry.path(), &target)?;
            copied += 1;
        }
    }
    debug!(src = %src.display(), dst = %dst.display(), copied, "merged directory");
    Ok(copied)
}

/// Copy `src` to `dst`, removing whatever was at `dst` first.
pub fn replace_file(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    remove_if_exists(dst)?;
    fs::copy(src, dst)
        .with_context(|| format!("copy {} to {}", src.display(), dst.display()))?;
    Ok(())
}

/// Rename `from` to `to`, removing an existing `to` first.
pub fn rename_replacing(from: &Path, to: &Path) -> Result<()> {
    remove_if_exists(to)?;
    fs::rename(from, to)
        .with_context(|| format!("rename {} to {}", from.display(), to.display()))
}

/// Sorted entry names of `dir`; empty when `dir` does not exist.
pub fn entry_names(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
        let entry = entry.with_context(|| format!("read entry in {}", dir.display()))?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

/// Copy installed library artifacts (everything in `lib_dir` except
/// `pkgconfig`) into `dst`, replacing existing entries.
///
/// Returns the destination paths in name order.
pub fn copy_library_files(lib_dir: &Path, dst: &Path) -> Result<Vec<PathBuf>> {
    let mut copied = Vec::new();
    for name in entry_names(lib_dir)? {
        if !is_library_entry(&name) {
            continue;
        }
        let src = lib_dir.join(&name);
        let target = dst.join(&name);
        if src.is_dir() {
            remove_if_exists(&target)?;
            copy_dir_merge(&src, &target, &[])?;
        } else {
            replace_file(&src, &target)?;
        }
        copied.push(target);
    }
    Ok(copied)
}
