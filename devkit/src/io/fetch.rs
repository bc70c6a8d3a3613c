//! Downloading and unpacking third-party archives.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use flate2::read::GzDecoder;
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

use crate::core::archive::ArchiveKind;

/// Abstraction over fetching a URL to a local file.
pub trait Downloader {
    /// Download `url` into `dest`, returning the number of bytes written.
    fn download(&self, url: &str, dest: &Path) -> Result<u64>;
}

/// Downloader backed by a blocking HTTP client.
pub struct HttpDownloader {
    client: reqwest::blocking::Client,
}

impl HttpDownloader {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("devkit/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(30))
            .timeout(None)
            .build()
            .context("build http client")?;
        Ok(Self { client })
    }
}

impl Downloader for HttpDownloader {
    #[instrument(skip_all, fields(url = url))]
    fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        info!("downloading");
        let mut response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("request {url}"))?
            .error_for_status()
            .with_context(|| format!("download {url}"))?;
        let mut file =
            File::create(dest).with_context(|| format!("create {}", dest.display()))?;
        let bytes = response
            .copy_to(&mut file)
            .with_context(|| format!("write {}", dest.display()))?;
        debug!(bytes, "download finished");
        Ok(bytes)
    }
}

/// Lowercase hex SHA-256 of a file.
pub fn sha256_file(path: &Path) -> Result<String> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    io::copy(&mut reader, &mut hasher).with_context(|| format!("hash {}", path.display()))?;
    Ok(hex::encode(hasher.finalize()))
}

pub fn verify_sha256(path: &Path, expected: &str) -> Result<()> {
    let actual = sha256_file(path)?;
    if !actual.eq_ignore_ascii_case(expected) {
        bail!(
            "checksum mismatch for {}: expected {expected}, got {actual}",
            path.display()
        );
    }
    Ok(())
}

/// Unpack `archive` into `dest`.
#[instrument(skip_all, fields(archive = %archive.display(), dest = %dest.display()))]
pub fn extract_archive(archive: &Path, kind: ArchiveKind, dest: &Path) -> Result<()> {
    fs::create_dir_all(dest).with_context(|| format!("create directory {}", dest.display()))?;
    let file = File::open(archive).with_context(|| format!("open {}", archive.display()))?;
    match kind {
        ArchiveKind::TarGz => {
            let mut tarball = tar::Archive::new(GzDecoder::new(BufReader::new(file)));
            tarball
                .unpack(dest)
                .with_context(|| format!("extract {}", archive.display()))?;
        }
        ArchiveKind::Zip => {
            let mut zip = zip::ZipArchive::new(BufReader::new(file))
                .with_context(|| format!("open zip {}", archive.display()))?;
            zip.extract(dest)
                .with_context(|| format!("extract {}", archive.display()))?;
        }
    }
    debug!("extracted");
    Ok(())
}
