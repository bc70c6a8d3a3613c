//! `devkit gen-options`: write `meson.options` from the configuration.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::instrument;

use crate::core::options::render_options;
use crate::project::Project;

/// Render configured meson options into `<root>/meson.options`.
#[instrument(skip_all)]
pub fn generate_options(project: &Project) -> Result<PathBuf> {
    let path = project.paths.meson_options_path.clone();
    let contents = render_options(&project.config.meson_options)?;
    fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
    println!(
        "gen-options: wrote {} option(s) to {}",
        project.config.meson_options.len(),
        path.display()
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::{MesonOption, OptionType};
    use crate::test_support::TestProject;

    #[test]
    fn writes_configured_options() {
        let test = TestProject::new().expect("project");
        let mut config = test.config();
        config.meson_options = vec![MesonOption {
            name: "lib".to_string(),
            kind: OptionType::String,
            value: "lib".to_string(),
            description: "library installation path".to_string(),
        }];

        let path = generate_options(&test.project_with(config)).expect("generate");

        assert_eq!(path, test.path("meson.options"));
        assert_eq!(
            test.read("meson.options").expect("read"),
            "option('lib', type : 'string', value : 'lib', description : 'library installation path')\n"
        );
    }

    #[test]
    fn no_options_write_empty_file() {
        let test = TestProject::new().expect("project");
        test.write("meson.options", "option('old', type : 'boolean', value : true)\n")
            .expect("write");

        generate_options(&test.project()).expect("generate");
        assert_eq!(test.read("meson.options").expect("read"), "");
    }

    #[test]
    fn invalid_option_name_writes_nothing() {
        let test = TestProject::new().expect("project");
        let mut config = test.config();
        config.meson_options = vec![MesonOption {
            name: "Bad-Name".to_string(),
            kind: OptionType::Boolean,
            value: "true".to_string(),
            description: String::new(),
        }];

        assert!(generate_options(&test.project_with(config)).is_err());
        assert!(!test.path("meson.options").exists());
    }
}
