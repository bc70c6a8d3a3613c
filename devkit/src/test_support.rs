//! Test-only helpers: temp project scaffolds and scripted adapters.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use devkit_serve::ServeOptions;
use flate2::Compression;
use flate2::write::GzEncoder;
use tempfile::TempDir;

use crate::core::example::{ExampleInfo, INFO_FILE_NAME};
use crate::core::meson::Invocation;
use crate::core::types::Target;
use crate::io::config::DevkitConfig;
use crate::io::fetch::Downloader;
use crate::io::launcher::Launcher;
use crate::io::meson::BuildTool;
use crate::io::process::ToolFailure;
use crate::project::Project;

/// `meson.build` of the example template, with both placeholders.
pub const EXAMPLE_TEMPLATE: &str =
    "project('example', 'cpp')\nexecutable('example', __SRC_FILES__)\nassets = __ASSETS_DIR__\n";

/// A project root in a temp directory.
pub struct TestProject {
    _temp: TempDir,
    root: PathBuf,
}

impl TestProject {
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir().context("tempdir")?;
        let root = temp.path().canonicalize().context("canonicalize tempdir")?;
        Ok(Self { _temp: temp, root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    pub fn write(&self, rel: &str, contents: &str) -> Result<PathBuf> {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    pub fn mkdir(&self, rel: &str) -> Result<PathBuf> {
        let path = self.path(rel);
        fs::create_dir_all(&path).with_context(|| format!("mkdir {}", path.display()))?;
        Ok(path)
    }

    pub fn read(&self, rel: &str) -> Result<String> {
        let path = self.path(rel);
        fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))
    }

    /// Defaults without a toolchain prefix, so nothing leaves the temp dir.
    pub fn config(&self) -> DevkitConfig {
        DevkitConfig {
            toolchain_prefix: None,
            ..DevkitConfig::default()
        }
    }

    pub fn project(&self) -> Project {
        Project::with_config(&self.root, self.config())
    }

    pub fn project_with(&self, config: DevkitConfig) -> Project {
        Project::with_config(&self.root, config)
    }

    /// Create `examples/<name>` with `info.json` and the given source files.
    pub fn add_example(
        &self,
        name: &str,
        info: &ExampleInfo,
        files: &[(&str, &str)],
    ) -> Result<PathBuf> {
        let dir = self.mkdir(&format!("examples/{name}"))?;
        let json = serde_json::to_string_pretty(info)?;
        fs::write(dir.join(INFO_FILE_NAME), json)?;
        for (rel, contents) in files {
            self.write(&format!("examples/{name}/{rel}"), contents)?;
        }
        Ok(dir)
    }

    /// Create the shared `examples/__build` template.
    pub fn add_example_template(&self) -> Result<()> {
        self.write("examples/__build/meson.build", EXAMPLE_TEMPLATE)?;
        self.write("examples/__helpers/Fps.h", "#pragma once\n")?;
        Ok(())
    }

    /// Lay out an installed library under `lib/` as `meson install` would.
    pub fn add_installed_library(&self, files: &[&str]) -> Result<()> {
        self.write("lib/include/remi/Engine.h", "#pragma once\n")?;
        self.write("lib/lib/pkgconfig/remi.pc", "Name: remi\n")?;
        for file in files {
            self.write(&format!("lib/lib/{file}"), file)?;
        }
        Ok(())
    }

    pub fn add_cross_file(&self, target: Target) -> Result<PathBuf> {
        let name = target
            .cross_file_name()
            .with_context(|| format!("{target} has no cross file"))?;
        self.write(&format!("cross/{name}"), "[binaries]\ncpp = 'em++'\n")
    }
}

/// Example descriptor with one source file.
pub fn example_info(name: &str, assets_dir: &str) -> ExampleInfo {
    ExampleInfo {
        name: name.to_string(),
        description: format!("{name} description"),
        src_files: vec!["main.cpp".to_string()],
        assets_dir: assets_dir.to_string(),
    }
}

type Effect = Box<dyn Fn(&Invocation) -> Result<()>>;

/// Build tool that records invocations and runs scripted side effects
/// instead of spawning meson.
#[derive(Default)]
pub struct ScriptedBuildTool {
    calls: RefCell<Vec<Invocation>>,
    effects: Vec<(String, Effect)>,
}

impl ScriptedBuildTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `effect` whenever the meson subcommand is `subcommand`.
    pub fn on(
        mut self,
        subcommand: &str,
        effect: impl Fn(&Invocation) -> Result<()> + 'static,
    ) -> Self {
        self.effects.push((subcommand.to_string(), Box::new(effect)));
        self
    }

    /// Fail `subcommand` with exit `code`.
    pub fn failing(self, subcommand: &str, code: i32) -> Self {
        self.on(subcommand, move |invocation| {
            Err(ToolFailure {
                command: format!("meson {}", invocation.args.join(" ")),
                code: Some(code),
                timed_out: false,
                output: "scripted failure".to_string(),
            }
            .into())
        })
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// Invocations rendered as `<workdir>: <args>` for compact asserts.
    pub fn commands(&self) -> Vec<(PathBuf, String)> {
        self.calls
            .borrow()
            .iter()
            .map(|call| (call.workdir.clone(), call.args.join(" ")))
            .collect()
    }
}

impl BuildTool for ScriptedBuildTool {
    fn run(&self, invocation: &Invocation) -> Result<()> {
        self.calls.borrow_mut().push(invocation.clone());
        for (subcommand, effect) in &self.effects {
            if subcommand == invocation.subcommand() {
                effect(invocation)?;
            }
        }
        Ok(())
    }
}

/// Effect for `setup`: create the build dir named by the last argument.
pub fn create_build_dir(invocation: &Invocation) -> Result<()> {
    let name = invocation.args.last().context("setup without build dir")?;
    fs::create_dir_all(invocation.workdir.join(name))?;
    Ok(())
}

/// Effect writing `rel` (relative to the invocation workdir).
pub fn write_output(rel: &str, contents: &str) -> impl Fn(&Invocation) -> Result<()> + 'static {
    let rel = rel.to_string();
    let contents = contents.to_string();
    move |invocation| {
        let path = invocation.workdir.join(&rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &contents)?;
        Ok(())
    }
}

/// Effect for `install`: populate `install_dir` like `meson install`.
pub fn install_into(install_dir: PathBuf) -> impl Fn(&Invocation) -> Result<()> + 'static {
    move |_| {
        let lib = install_dir.join("lib");
        fs::create_dir_all(lib.join("pkgconfig"))?;
        fs::create_dir_all(install_dir.join("include/remi"))?;
        fs::write(install_dir.join("include/remi/Engine.h"), "#pragma once\n")?;
        fs::write(lib.join("libremi.so"), "elf")?;
        fs::write(lib.join("pkgconfig/remi.pc"), "Name: remi\n")?;
        Ok(())
    }
}

/// What a [`RecordingLauncher`] was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launched {
    Native {
        dir: PathBuf,
        executable: PathBuf,
    },
    Web {
        root: PathBuf,
        url: String,
        open_browser: bool,
    },
}

/// Launcher that records requests without running or serving anything.
#[derive(Default)]
pub struct RecordingLauncher {
    launched: RefCell<Vec<Launched>>,
}

impl RecordingLauncher {
    pub fn launched(&self) -> Vec<Launched> {
        self.launched.borrow().clone()
    }
}

impl Launcher for RecordingLauncher {
    fn run_native(&self, dir: &Path, executable: &Path) -> Result<()> {
        self.launched.borrow_mut().push(Launched::Native {
            dir: dir.to_path_buf(),
            executable: executable.to_path_buf(),
        });
        Ok(())
    }

    fn serve_web(&self, options: &ServeOptions, open_browser: bool) -> Result<()> {
        self.launched.borrow_mut().push(Launched::Web {
            root: options.root.clone(),
            url: options.url(),
            open_browser,
        });
        Ok(())
    }
}

/// Downloader serving canned bytes per URL.
#[derive(Default)]
pub struct FakeDownloader {
    files: HashMap<String, Vec<u8>>,
    interrupted: HashMap<String, Vec<u8>>,
    requests: RefCell<Vec<String>>,
}

impl FakeDownloader {
    pub fn with(mut self, url: &str, bytes: Vec<u8>) -> Self {
        self.files.insert(url.to_string(), bytes);
        self
    }

    /// Write `partial` for `url`, then fail as a dropped connection would.
    pub fn interrupted(mut self, url: &str, partial: Vec<u8>) -> Self {
        self.interrupted.insert(url.to_string(), partial);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl Downloader for FakeDownloader {
    fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        self.requests.borrow_mut().push(url.to_string());
        if let Some(partial) = self.interrupted.get(url) {
            fs::write(dest, partial)?;
            bail!("connection reset while downloading {url}");
        }
        let Some(bytes) = self.files.get(url) else {
            bail!("404 for {url}");
        };
        fs::write(dest, bytes)?;
        Ok(bytes.len() as u64)
    }
}

/// In-memory `.tar.gz` with the given `(path, contents)` entries.
pub fn tar_gz_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (path, contents) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        builder
            .append_data(&mut header, path, contents.as_bytes())
            .expect("append tar entry");
    }
    builder
        .into_inner()
        .expect("finish tar")
        .finish()
        .expect("finish gzip")
}

/// In-memory `.zip` with the given `(path, contents)` entries.
pub fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (path, contents) in entries {
        writer.start_file(*path, options).expect("start zip entry");
        writer
            .write_all(contents.as_bytes())
            .expect("write zip entry");
    }
    writer.finish().expect("finish zip").into_inner()
}
