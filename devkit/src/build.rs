//! `devkit build`: compile the configured library build directory.

use anyhow::{Context, Result, bail};
use tracing::instrument;

use crate::core::meson::{Invocation, compile_args};
use crate::io::meson::BuildTool;
use crate::project::Project;

/// Run `meson compile` in the library build dir.
#[instrument(skip_all)]
pub fn build<T: BuildTool>(project: &Project, tool: &T) -> Result<()> {
    let build_dir = &project.paths.build_dir;
    if !build_dir.is_dir() {
        bail!(
            "build directory {} is not configured (run `devkit setup` first)",
            build_dir.display()
        );
    }
    println!("build: compiling {}", project.library());
    tool.run(&Invocation::new(build_dir, compile_args(None)))
        .with_context(|| format!("build {}", project.library()))
}
