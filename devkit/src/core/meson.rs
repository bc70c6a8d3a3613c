//! Planning of meson invocations.
//!
//! Commands never format meson command lines themselves; they ask this
//! module for an [`Invocation`] and hand it to a `BuildTool`. Keeping the
//! plan pure lets tests assert exactly what would have been run.

use std::path::{Path, PathBuf};

use super::types::{Mode, Target};

/// How the child's stdout/stderr are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Child writes straight to the terminal.
    Inherit,
    /// Output is captured and attached to the error on failure.
    Capture,
}

/// One planned meson call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub workdir: PathBuf,
    pub args: Vec<String>,
    pub output: OutputMode,
}

impl Invocation {
    pub fn new(workdir: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            workdir: workdir.into(),
            args,
            output: OutputMode::Inherit,
        }
    }

    pub fn captured(mut self) -> Self {
        self.output = OutputMode::Capture;
        self
    }

    /// First argument (the meson subcommand), used in logs and errors.
    pub fn subcommand(&self) -> &str {
        self.args.first().map(String::as_str).unwrap_or("")
    }
}

/// Parameters for `meson setup`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupPlan<'a> {
    /// Build directory name, relative to the invocation workdir.
    pub build_dir: &'a str,
    pub target: Target,
    pub mode: Mode,
    /// Cross file for non-native targets.
    pub cross_file: Option<&'a Path>,
}

/// `meson setup [--cross-file <file>] --buildtype=<mode> <build_dir>`
///
/// Callers always configure a fresh build dir, so `--wipe` is never needed.
pub fn setup_args(plan: &SetupPlan<'_>) -> Vec<String> {
    let mut args = vec!["setup".to_string()];
    if let Some(cross_file) = plan.cross_file {
        args.push("--cross-file".to_string());
        args.push(cross_file.display().to_string());
    }
    args.push(format!("--buildtype={}", plan.mode));
    args.push(plan.build_dir.to_string());
    args
}

/// `meson compile`, optionally with `-C <dir>`.
pub fn compile_args(build_dir: Option<&str>) -> Vec<String> {
    let mut args = vec!["compile".to_string()];
    if let Some(dir) = build_dir {
        args.push("-C".to_string());
        args.push(dir.to_string());
    }
    args
}

/// `meson install`, run from inside the build directory.
pub fn install_args() -> Vec<String> {
    vec!["install".to_string()]
}

/// Render a command line for display (`meson setup --buildtype=debug build`).
pub fn display_command(program: &str, args: &[String]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        if arg.contains(' ') {
            line.push('"');
            line.push_str(arg);
            line.push('"');
        } else {
            line.push_str(arg);
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_setup_has_no_cross_file() {
        let plan = SetupPlan {
            build_dir: "build",
            target: Target::Native,
            mode: Mode::Debug,
            cross_file: None,
        };
        assert_eq!(setup_args(&plan), vec!["setup", "--buildtype=debug", "build"]);
    }

    #[test]
    fn wasm_setup_passes_cross_file() {
        let cross = Path::new("/proj/cross/wasm.txt");
        let plan = SetupPlan {
            build_dir: "build",
            target: Target::Wasm,
            mode: Mode::Release,
            cross_file: Some(cross),
        };
        assert_eq!(
            setup_args(&plan),
            vec![
                "setup",
                "--cross-file",
                "/proj/cross/wasm.txt",
                "--buildtype=release",
                "build"
            ]
        );
    }

    #[test]
    fn compile_with_and_without_dir() {
        assert_eq!(compile_args(None), vec!["compile"]);
        assert_eq!(compile_args(Some("build")), vec!["compile", "-C", "build"]);
    }

    #[test]
    fn display_quotes_arguments_with_spaces() {
        let args = vec!["compile".to_string(), "-C".to_string(), "my build".to_string()];
        assert_eq!(display_command("meson", &args), "meson compile -C \"my build\"");
    }

    #[test]
    fn captured_invocation_keeps_args() {
        let invocation = Invocation::new("/w", compile_args(Some("build"))).captured();
        assert_eq!(invocation.output, OutputMode::Capture);
        assert_eq!(invocation.subcommand(), "compile");
    }
}
