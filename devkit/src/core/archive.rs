//! Archive formats understood by `devkit fetch`.

use anyhow::{Result, bail};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    TarGz,
    Zip,
}

impl ArchiveKind {
    /// Infer the kind from a file name or URL path.
    pub fn from_name(name: &str) -> Result<Self> {
        let lower = name.to_ascii_lowercase();
        let path = lower.split(['?', '#']).next().unwrap_or("");
        if path.ends_with(".tar.gz") || path.ends_with(".tgz") {
            Ok(ArchiveKind::TarGz)
        } else if path.ends_with(".zip") {
            Ok(ArchiveKind::Zip)
        } else {
            bail!("unknown archive type: {name}")
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ArchiveKind::TarGz => "tar.gz",
            ArchiveKind::Zip => "zip",
        }
    }
}
