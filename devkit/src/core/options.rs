//! Rendering of the generated `meson.options` file.

use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use minijinja::{Environment, context};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::example::meson_string;

static OPTION_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z][a-z0-9_]*$").expect("option name regex is valid")
});

const OPTIONS_TEMPLATE: &str = "{% for option in options -%}
option({{ option.name }}, type : {{ option.kind }}, value : {{ option.value }}, description : {{ option.description }})
{% endfor %}";

/// Meson option types devkit knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    String,
    Boolean,
    Integer,
    Feature,
}

impl OptionType {
    fn as_str(self) -> &'static str {
        match self {
            OptionType::String => "string",
            OptionType::Boolean => "boolean",
            OptionType::Integer => "integer",
            OptionType::Feature => "feature",
        }
    }
}

/// One `option(...)` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MesonOption {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: OptionType,
    pub value: String,
    #[serde(default)]
    pub description: String,
}

impl MesonOption {
    pub fn validate(&self) -> Result<()> {
        if !OPTION_NAME.is_match(&self.name) {
            bail!("meson option name '{}' must match [a-z][a-z0-9_]*", self.name);
        }
        match self.kind {
            OptionType::String => {}
            OptionType::Boolean => {
                if !matches!(self.value.as_str(), "true" | "false") {
                    bail!("meson option '{}': boolean value must be true or false", self.name);
                }
            }
            OptionType::Integer => {
                self.value.parse::<i64>().with_context(|| {
                    format!("meson option '{}': integer value '{}'", self.name, self.value)
                })?;
            }
            OptionType::Feature => {
                if !matches!(self.value.as_str(), "enabled" | "disabled" | "auto") {
                    bail!(
                        "meson option '{}': feature value must be enabled, disabled or auto",
                        self.name
                    );
                }
            }
        }
        Ok(())
    }

    /// Value as meson source: strings and features are quoted.
    fn rendered_value(&self) -> String {
        match self.kind {
            OptionType::String | OptionType::Feature => meson_string(&self.value),
            OptionType::Boolean | OptionType::Integer => self.value.clone(),
        }
    }
}

#[derive(Serialize)]
struct RenderedOption {
    name: String,
    kind: String,
    value: String,
    description: String,
}

/// Render `meson.options` contents; empty input renders an empty file.
pub fn render_options(options: &[MesonOption]) -> Result<String> {
    for option in options {
        option.validate()?;
    }
    let rendered: Vec<RenderedOption> = options
        .iter()
        .map(|option| RenderedOption {
            name: meson_string(&option.name),
            kind: meson_string(option.kind.as_str()),
            value: option.rendered_value(),
            description: meson_string(&option.description),
        })
        .collect();

    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.add_template("meson.options", OPTIONS_TEMPLATE)
        .context("load meson.options template")?;
    let template = env
        .get_template("meson.options")
        .context("get meson.options template")?;
    let out = template
        .render(context! { options => rendered })
        .context("render meson.options")?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(name: &str, kind: OptionType, value: &str) -> MesonOption {
        MesonOption {
            name: name.to_string(),
            kind,
            value: value.to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn empty_options_render_empty_file() {
        assert_eq!(render_options(&[]).expect("render"), "");
    }

    #[test]
    fn renders_one_line_per_option() {
        let mut lib = option("lib", OptionType::String, "/proj/lib");
        lib.description = "library installation path".to_string();
        let out = render_options(&[lib, option("tests", OptionType::Boolean, "false")])
            .expect("render");
        assert_eq!(
            out,
            "option('lib', type : 'string', value : '/proj/lib', description : 'library installation path')\n\
             option('tests', type : 'boolean', value : false, description : '')\n"
        );
    }

    #[test]
    fn rejects_bad_names_and_values() {
        assert!(option("Lib", OptionType::String, "x").validate().is_err());
        assert!(option("jobs", OptionType::Integer, "many").validate().is_err());
        assert!(option("debug", OptionType::Boolean, "yes").validate().is_err());
        assert!(option("audio", OptionType::Feature, "on").validate().is_err());
        assert!(option("audio", OptionType::Feature, "auto").validate().is_ok());
    }
}
