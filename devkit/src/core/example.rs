//! Example descriptors and `meson.build` template substitution.

use serde::{Deserialize, Serialize};

/// Name of the per-example build directory and of the shared template dir.
pub const BUILD_DIR_NAME: &str = "__build";
/// Descriptor file inside each example directory.
pub const INFO_FILE_NAME: &str = "info.json";
/// Meson build dir created inside an example's `__build`.
pub const MESON_BUILD_DIR: &str = "build";
/// Artifact stem produced by the example template.
pub const ARTIFACT_STEM: &str = "example";

const ASSETS_PLACEHOLDER: &str = "__ASSETS_DIR__";
const SOURCES_PLACEHOLDER: &str = "__SRC_FILES__";

/// Parsed `info.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleInfo {
    pub name: String,
    pub description: String,
    pub src_files: Vec<String>,
    /// Directory (relative to the example) copied next to the binary; empty
    /// when the example has no assets.
    #[serde(default)]
    pub assets_dir: String,
}

impl ExampleInfo {
    pub fn has_assets(&self) -> bool {
        !self.assets_dir.trim().is_empty()
    }

    /// Entries of the example dir that must not be copied into `__build`.
    pub fn copy_excludes(&self) -> Vec<String> {
        let mut excludes = vec![INFO_FILE_NAME.to_string(), BUILD_DIR_NAME.to_string()];
        if self.has_assets() {
            excludes.push(self.assets_dir.clone());
        }
        excludes
    }
}

/// Directories starting with `__` hold shared helpers and templates.
pub fn is_example_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with("__")
}

/// Fill the template placeholders of a `meson.build`.
///
/// `__ASSETS_DIR__` becomes a quoted string and `__SRC_FILES__` a meson array.
/// Rendering an already rendered file leaves it unchanged.
pub fn render_meson_build(template: &str, info: &ExampleInfo) -> String {
    template
        .replace(ASSETS_PLACEHOLDER, &meson_string(&info.assets_dir))
        .replace(SOURCES_PLACEHOLDER, &meson_array(&info.src_files))
}

pub fn meson_string(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

pub fn meson_array(values: &[String]) -> String {
    let items: Vec<String> = values.iter().map(|value| meson_string(value)).collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(assets_dir: &str) -> ExampleInfo {
        ExampleInfo {
            name: "Hello World".to_string(),
            description: "draws a triangle".to_string(),
            src_files: vec!["main.cpp".to_string(), "RotateSystem.cpp".to_string()],
            assets_dir: assets_dir.to_string(),
        }
    }

    #[test]
    fn renders_sources_and_assets() {
        let template = "executable('example', __SRC_FILES__)\nassets = __ASSETS_DIR__\n";
        let rendered = render_meson_build(template, &info("assets"));
        assert_eq!(
            rendered,
            "executable('example', ['main.cpp', 'RotateSystem.cpp'])\nassets = 'assets'\n"
        );
    }

    #[test]
    fn rendering_is_idempotent() {
        let template = "executable('example', __SRC_FILES__)\n";
        let once = render_meson_build(template, &info(""));
        assert_eq!(render_meson_build(&once, &info("")), once);
    }

    #[test]
    fn quotes_are_escaped() {
        assert_eq!(meson_string("it's"), "'it\\'s'");
        assert_eq!(meson_array(&[]), "[]");
    }

    #[test]
    fn helper_dirs_are_not_examples() {
        assert!(is_example_name("hello_world"));
        assert!(!is_example_name("__helpers"));
        assert!(!is_example_name("__build"));
    }

    #[test]
    fn excludes_assets_only_when_present() {
        assert_eq!(info("").copy_excludes(), vec!["info.json", "__build"]);
        assert_eq!(
            info("res").copy_excludes(),
            vec!["info.json", "__build", "res"]
        );
    }

    #[test]
    fn assets_dir_defaults_to_empty() {
        let parsed: ExampleInfo = serde_json::from_str(
            r#"{"name":"text","description":"renders text","src_files":["main.cpp"]}"#,
        )
        .expect("parse");
        assert!(!parsed.has_assets());
    }
}
