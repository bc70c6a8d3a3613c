//! Build target and mode shared by every command that configures meson.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Platform the library is compiled for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// The host machine.
    #[default]
    Native,
    /// WebAssembly through the emscripten cross file.
    Wasm,
}

impl Target {
    pub fn as_str(self) -> &'static str {
        match self {
            Target::Native => "native",
            Target::Wasm => "wasm",
        }
    }

    /// File name of the meson cross file under the cross dir, if the target
    /// needs one.
    pub fn cross_file_name(self) -> Option<String> {
        match self {
            Target::Native => None,
            Target::Wasm => Some(format!("{}.txt", self.as_str())),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Meson build type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Debug,
    Release,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Debug => "debug",
            Mode::Release => "release",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_wasm_needs_a_cross_file() {
        assert_eq!(Target::Native.cross_file_name(), None);
        assert_eq!(Target::Wasm.cross_file_name().as_deref(), Some("wasm.txt"));
    }

    #[test]
    fn value_enum_accepts_lowercase_names() {
        assert_eq!(Target::from_str("wasm", false), Ok(Target::Wasm));
        assert_eq!(Mode::from_str("release", false), Ok(Mode::Release));
        assert!(Mode::from_str("fast", false).is_err());
    }
}
