//! Example discovery and `info.json` loading.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::Draft;
use serde_json::Value;
use tracing::debug;

use crate::core::example::{ExampleInfo, INFO_FILE_NAME, is_example_name};

const EXAMPLE_INFO_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../schemas/example_info/v1.schema.json"
));

/// An example directory together with its parsed descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    /// Directory name, used on the command line.
    pub id: String,
    pub dir: PathBuf,
    pub info: ExampleInfo,
}

/// Names of example directories under `examples_dir`, sorted.
///
/// `__`-prefixed directories (helpers, the build template) are skipped.
pub fn discover_examples(examples_dir: &Path) -> Result<Vec<String>> {
    if !examples_dir.is_dir() {
        bail!("examples directory {} does not exist", examples_dir.display());
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(examples_dir)
        .with_context(|| format!("read {}", examples_dir.display()))?
    {
        let entry = entry.context("read entry")?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_example_name(&name) && entry.path().is_dir() {
            names.push(name);
        }
    }
    names.sort();
    debug!(count = names.len(), "discovered examples");
    Ok(names)
}

/// Look up example `name`, rejecting names that are not example dirs.
pub fn find_example(examples_dir: &Path, name: &str) -> Result<Example> {
    let names = discover_examples(examples_dir)?;
    if !names.iter().any(|candidate| candidate == name) {
        let choices = if names.is_empty() {
            "none".to_string()
        } else {
            names.join(", ")
        };
        bail!("unknown example '{name}' (choose from: {choices})");
    }
    read_example(&examples_dir.join(name))
}

/// Load and validate `info.json` from an example directory.
pub fn read_example(dir: &Path) -> Result<Example> {
    if !dir.exists() {
        bail!("example {} does not exist", dir.display());
    }
    if !dir.is_dir() {
        bail!("example {} is not a directory", dir.display());
    }
    let info_path = dir.join(INFO_FILE_NAME);
    if !info_path.is_file() {
        bail!(
            "example {} does not contain an {INFO_FILE_NAME} file",
            dir.display()
        );
    }
    let raw = fs::read_to_string(&info_path)
        .with_context(|| format!("read {}", info_path.display()))?;
    let info = parse_info(&raw).with_context(|| format!("load {}", info_path.display()))?;
    let id = dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("example path {} has no name", dir.display()))?;
    Ok(Example {
        id,
        dir: dir.to_path_buf(),
        info,
    })
}

/// Parse `info.json` contents: schema conformance, then typed decode.
pub fn parse_info(raw: &str) -> Result<ExampleInfo> {
    let instance: Value = serde_json::from_str(raw).context("parse info json")?;
    let schema: Value =
        serde_json::from_str(EXAMPLE_INFO_SCHEMA).context("parse example info schema")?;
    let compiled = jsonschema::options()
        .with_draft(Draft::Draft202012)
        .build(&schema)
        .context("compile example info schema")?;
    let messages: Vec<String> = compiled
        .iter_errors(&instance)
        .map(|err| err.to_string())
        .collect();
    if !messages.is_empty() {
        bail!("schema validation failed:\n- {}", messages.join("\n- "));
    }
    let info: ExampleInfo = serde_json::from_value(instance).context("decode example info")?;
    Ok(info)
}
