//! `devkit setup`: configure the library and the dev environment from
//! scratch for a target and build mode.

use anyhow::{Context, Result, bail};
use tracing::{info, instrument};

use crate::clean::clean;
use crate::core::meson::{Invocation, SetupPlan, setup_args};
use crate::core::types::{Mode, Target};
use crate::install::install;
use crate::io::meson::BuildTool;
use crate::io::paths::DEV_BUILD_DIR;
use crate::project::Project;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetupOptions {
    pub target: Target,
    pub mode: Mode,
}

#[instrument(skip_all, fields(target = %options.target, mode = %options.mode))]
pub fn setup<T: BuildTool>(project: &Project, tool: &T, options: &SetupOptions) -> Result<()> {
    let paths = &project.paths;
    let library = project.library();

    clean(paths).context("clean before setup")?;
    let cross_file = paths.cross_file(options.target)?;

    println!(
        "setup: configuring {library} for {} ({})",
        options.target, options.mode
    );
    let plan = SetupPlan {
        build_dir: &project.config.layout.build_dir,
        target: options.target,
        mode: options.mode,
        cross_file: cross_file.as_deref(),
    };
    tool.run(&Invocation::new(&paths.root, setup_args(&plan)))
        .with_context(|| format!("configure {library}"))?;

    install(project, tool)?;

    if !paths.dev_dir.is_dir() {
        bail!("dev environment {} does not exist", paths.dev_dir.display());
    }
    println!("setup: configuring dev environment");
    let plan = SetupPlan {
        build_dir: DEV_BUILD_DIR,
        ..plan
    };
    tool.run(&Invocation::new(&paths.dev_dir, setup_args(&plan)))
        .context("configure dev environment")?;
    info!("setup complete");
    Ok(())
}
