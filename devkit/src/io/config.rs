//! Devkit configuration stored in `devkit.toml` at the project root.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::archive::ArchiveKind;
use crate::core::options::MesonOption;

pub const CONFIG_FILE_NAME: &str = "devkit.toml";

/// Devkit configuration (TOML).
///
/// Meant to be edited by humans. Every field is optional; missing fields
/// take the defaults of the remi engine repository.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DevkitConfig {
    /// Library name; also names the pkg-config file (`<library>.pc`).
    pub library: String,

    /// Meson executable.
    pub meson: String,

    /// System toolchain prefix the library is mirrored into on install
    /// (`<prefix>/include`, `<prefix>/lib`, `<prefix>/lib/pkgconfig`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toolchain_prefix: Option<PathBuf>,

    pub layout: LayoutConfig,
    pub server: ServerConfig,
    pub process: ProcessConfig,

    /// Third-party archives installed by `devkit fetch`.
    pub dependencies: Vec<Dependency>,

    /// Options written to `meson.options` by `devkit gen-options`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub meson_options: Vec<MesonOption>,
}

/// Directory names relative to the project root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LayoutConfig {
    pub build_dir: String,
    pub install_dir: String,
    pub dev_dir: String,
    pub examples_dir: String,
    pub cross_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// Open the default browser when a web build is served.
    pub open_browser: bool,
    /// Send COOP/COEP headers (pthread-enabled wasm builds need them).
    pub cross_origin_isolation: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProcessConfig {
    /// Kill meson after this many seconds; 0 disables the timeout.
    pub timeout_secs: u64,
    /// Truncate captured meson output beyond this many bytes.
    pub output_limit_bytes: usize,
}

/// A downloadable third-party archive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dependency {
    pub name: String,
    pub url: String,
    /// Extraction directory, relative to the project root.
    pub dest: PathBuf,
    /// Path (relative to the root) whose presence means "already installed".
    pub marker: PathBuf,
    /// Expected SHA-256 of the archive, lowercase hex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

impl Default for DevkitConfig {
    fn default() -> Self {
        Self {
            library: "remi".to_string(),
            meson: "meson".to_string(),
            toolchain_prefix: default_toolchain_prefix(),
            layout: LayoutConfig::default(),
            server: ServerConfig::default(),
            process: ProcessConfig::default(),
            dependencies: default_dependencies(),
            meson_options: Vec::new(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            build_dir: "build".to_string(),
            install_dir: "lib".to_string(),
            dev_dir: "dev".to_string(),
            examples_dir: "examples".to_string(),
            cross_dir: "cross".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8000,
            open_browser: true,
            cross_origin_isolation: false,
        }
    }
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 0,
            output_limit_bytes: 100_000,
        }
    }
}

fn default_toolchain_prefix() -> Option<PathBuf> {
    if cfg!(windows) {
        Some(PathBuf::from("C:/msys64/mingw64"))
    } else {
        None
    }
}

fn default_dependencies() -> Vec<Dependency> {
    vec![
        Dependency {
            name: "boost-headers".to_string(),
            url: "https://github.com/emscripten-ports/boost/releases/download/boost-1.83.0/boost-headers-1.83.0.zip".to_string(),
            dest: PathBuf::from("externals/include"),
            marker: PathBuf::from("externals/include/boost"),
            sha256: None,
        },
        Dependency {
            name: "box2d".to_string(),
            url: "https://github.com/erincatto/box2d/archive/v2.4.1/box2d-2.4.1.tar.gz"
                .to_string(),
            dest: PathBuf::from("externals/libs"),
            marker: PathBuf::from("externals/libs/box2d-2.4.1"),
            sha256: None,
        },
    ]
}

impl DevkitConfig {
    pub fn validate(&self) -> Result<()> {
        if self.library.trim().is_empty() {
            return Err(anyhow!("library must be non-empty"));
        }
        if self.meson.trim().is_empty() {
            return Err(anyhow!("meson must be non-empty"));
        }
        self.layout.validate()?;
        if self.server.port == 0 {
            return Err(anyhow!("server.port must be > 0"));
        }
        devkit_serve::parse_bind(&self.server.bind).context("server.bind")?;
        if self.process.output_limit_bytes == 0 {
            return Err(anyhow!("process.output_limit_bytes must be > 0"));
        }

        let mut names = BTreeSet::new();
        for dep in &self.dependencies {
            dep.validate()?;
            if !names.insert(dep.name.as_str()) {
                return Err(anyhow!("duplicate dependency name '{}'", dep.name));
            }
        }
        for option in &self.meson_options {
            option.validate()?;
        }
        Ok(())
    }

    pub fn dependency(&self, name: &str) -> Option<&Dependency> {
        self.dependencies.iter().find(|dep| dep.name == name)
    }
}

impl LayoutConfig {
    fn validate(&self) -> Result<()> {
        let entries = [
            ("layout.build_dir", &self.build_dir),
            ("layout.install_dir", &self.install_dir),
            ("layout.dev_dir", &self.dev_dir),
            ("layout.examples_dir", &self.examples_dir),
            ("layout.cross_dir", &self.cross_dir),
        ];
        for (key, value) in entries {
            if value.trim().is_empty() {
                return Err(anyhow!("{key} must be non-empty"));
            }
        }
        Ok(())
    }
}

impl Dependency {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(anyhow!("dependency name must be non-empty"));
        }
        ArchiveKind::from_name(&self.url)
            .with_context(|| format!("dependency '{}' url", self.name))?;
        if let Some(sha) = &self.sha256 {
            let valid = sha.len() == 64 && sha.chars().all(|ch| ch.is_ascii_hexdigit());
            if !valid {
                return Err(anyhow!(
                    "dependency '{}': sha256 must be 64 hex characters",
                    self.name
                ));
            }
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `DevkitConfig::default()`.
pub fn load_config(path: &Path) -> Result<DevkitConfig> {
    if !path.exists() {
        let cfg = DevkitConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: DevkitConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &DevkitConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::OptionType;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, DevkitConfig::default());
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE_NAME);
        let mut cfg = DevkitConfig::default();
        cfg.toolchain_prefix = Some(PathBuf::from("/opt/toolchain"));
        cfg.meson_options.push(MesonOption {
            name: "lib".to_string(),
            kind: OptionType::String,
            value: "lib".to_string(),
            description: "library installation path".to_string(),
        });
        write_config(&path, &cfg).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "library = \"blaze++\"\n[server]\nport = 9000\n").expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.library, "blaze++");
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.bind, "127.0.0.1");
        assert_eq!(cfg.layout, LayoutConfig::default());
        assert_eq!(cfg.dependencies.len(), 2);
    }

    #[test]
    fn rejects_duplicate_dependencies() {
        let mut cfg = DevkitConfig::default();
        let dup = cfg.dependencies[0].clone();
        cfg.dependencies.push(dup);
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate dependency"));
    }

    #[test]
    fn rejects_unknown_archive_and_bad_checksum() {
        let mut cfg = DevkitConfig::default();
        cfg.dependencies[0].url = "https://example.invalid/patch".to_string();
        assert!(cfg.validate().is_err());

        let mut cfg = DevkitConfig::default();
        cfg.dependencies[1].sha256 = Some("abc".to_string());
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("sha256"));
    }

    #[test]
    fn rejects_zero_port() {
        let mut cfg = DevkitConfig::default();
        cfg.server.port = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn accepts_ipv6_bind() {
        let mut cfg = DevkitConfig::default();
        cfg.server.bind = "::".to_string();
        cfg.validate().expect("ipv6 bind is valid");
    }

    #[test]
    fn rejects_bind_that_cannot_be_served() {
        for bind in ["", "localhost", ":::8000"] {
            let mut cfg = DevkitConfig::default();
            cfg.server.bind = bind.to_string();
            let err = cfg.validate().unwrap_err();
            assert!(
                format!("{err:#}").contains("server.bind"),
                "bind {bind:?}: {err:#}"
            );
        }
    }
}
