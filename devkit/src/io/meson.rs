//! Meson adapter.
//!
//! [`BuildTool`] is the seam between command orchestration and the external
//! build system. [`MesonTool`] spawns the real `meson`; tests substitute a
//! scripted tool that records invocations instead of running them.

use std::process::Command;
use std::time::Duration;

use anyhow::{Result, bail};
use tracing::{info, instrument};

use super::config::DevkitConfig;
use super::process::{run_captured, run_inherited};
use crate::core::meson::{Invocation, OutputMode, display_command};

/// Abstraction over build system execution.
pub trait BuildTool {
    /// Run one planned invocation; a non-zero exit is an error carrying a
    /// `ToolFailure`.
    fn run(&self, invocation: &Invocation) -> Result<()>;
}

/// Build tool that spawns `meson`.
#[derive(Debug, Clone)]
pub struct MesonTool {
    program: String,
    timeout: Option<Duration>,
    output_limit_bytes: usize,
}

impl MesonTool {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
            output_limit_bytes: 100_000,
        }
    }

    pub fn from_config(config: &DevkitConfig) -> Self {
        let timeout = match config.process.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        Self {
            program: config.meson.clone(),
            timeout,
            output_limit_bytes: config.process.output_limit_bytes,
        }
    }
}

impl BuildTool for MesonTool {
    #[instrument(skip_all, fields(subcommand = invocation.subcommand(), workdir = %invocation.workdir.display()))]
    fn run(&self, invocation: &Invocation) -> Result<()> {
        if !invocation.workdir.is_dir() {
            bail!(
                "meson working directory {} does not exist",
                invocation.workdir.display()
            );
        }
        let line = display_command(&self.program, &invocation.args);
        info!(command = %line, "running meson");

        let mut cmd = Command::new(&self.program);
        cmd.args(&invocation.args).current_dir(&invocation.workdir);

        match invocation.output {
            OutputMode::Inherit => run_inherited(cmd, &line, self.timeout),
            OutputMode::Capture => {
                run_captured(cmd, self.timeout, self.output_limit_bytes)?.check(&line)
            }
        }
    }
}
