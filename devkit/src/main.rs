//! `devkit` command line.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use devkit::build::build;
use devkit::clean::clean;
use devkit::core::types::{Mode, Target};
use devkit::dev::dev;
use devkit::example::{ExampleListing, ExampleOptions, list_examples, run_example};
use devkit::exit_codes;
use devkit::fetch::fetch;
use devkit::install::install;
use devkit::io::fetch::HttpDownloader;
use devkit::io::init::{InitOptions, init_project};
use devkit::io::launcher::SystemLauncher;
use devkit::io::meson::MesonTool;
use devkit::io::paths::discover_root;
use devkit::logging;
use devkit::options::generate_options;
use devkit::project::Project;
use devkit::setup::{SetupOptions, setup};
use devkit::uninstall::uninstall;

#[derive(Parser)]
#[command(
    name = "devkit",
    version,
    about = "Build, install and run the remi engine, its dev environment and examples"
)]
struct Cli {
    /// Project root (default: nearest ancestor with devkit.toml, else the
    /// current directory).
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default devkit.toml.
    Init {
        /// Overwrite an existing devkit.toml.
        #[arg(short, long)]
        force: bool,
    },
    #[command(flatten)]
    Project(ProjectCommand),
}

/// Commands that operate on an existing project root.
#[derive(Subcommand)]
enum ProjectCommand {
    /// Compile the library build directory.
    Build,
    /// Remove build, dev build and install directories.
    Clean,
    /// Compile and install the library, mirroring it into the toolchain.
    Install,
    /// Remove the installed library and its toolchain copies.
    Uninstall,
    /// Configure library and dev environment from scratch.
    Setup {
        #[arg(long, value_enum, default_value_t = Target::Native)]
        target: Target,
        #[arg(long, value_enum, default_value_t = Mode::Debug)]
        mode: Mode,
    },
    /// Reinstall, rebuild the dev environment and launch it.
    Dev,
    /// Build an example against the installed library and launch it.
    Example {
        name: String,
        /// Start from an empty build directory.
        #[arg(long, action = ArgAction::Set, default_value_t = true)]
        clean: bool,
        #[arg(long, value_enum, default_value_t = Target::Native)]
        target: Target,
        #[arg(long, value_enum, default_value_t = Mode::Debug)]
        mode: Mode,
    },
    /// List examples with their descriptions.
    Examples,
    /// Download third-party archives (all configured ones by default).
    Fetch {
        names: Vec<String>,
        /// Download even if already installed.
        #[arg(short, long)]
        force: bool,
    },
    /// Write meson.options from the configured options.
    GenOptions,
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(exit_codes::for_error(&err));
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let root = match cli.root {
        Some(root) => root,
        None => discover_root(&env::current_dir().context("resolve current directory")?),
    };

    match cli.command {
        Command::Init { force } => cmd_init(&root, force),
        Command::Project(command) => run_in_project(&root, command),
    }
}

fn run_in_project(root: &Path, command: ProjectCommand) -> Result<()> {
    let project = Project::open(root)?;
    let tool = MesonTool::from_config(&project.config);
    match command {
        ProjectCommand::Build => build(&project, &tool),
        ProjectCommand::Clean => clean(&project.paths).map(|_| ()),
        ProjectCommand::Install => install(&project, &tool).map(|_| ()),
        ProjectCommand::Uninstall => uninstall(&project).map(|_| ()),
        ProjectCommand::Setup { target, mode } => {
            setup(&project, &tool, &SetupOptions { target, mode })
        }
        ProjectCommand::Dev => dev(&project, &tool, &SystemLauncher),
        ProjectCommand::Example {
            name,
            clean,
            target,
            mode,
        } => {
            let options = ExampleOptions {
                clean,
                target,
                mode,
            };
            run_example(&project, &name, &options, &tool, &SystemLauncher)
        }
        ProjectCommand::Examples => cmd_examples(&project),
        ProjectCommand::Fetch { names, force } => {
            let downloader = HttpDownloader::new()?;
            fetch(&project, &downloader, &names, force).map(|_| ())
        }
        ProjectCommand::GenOptions => generate_options(&project).map(|_| ()),
    }
}

fn cmd_init(root: &Path, force: bool) -> Result<()> {
    let path = init_project(root, &InitOptions { force })?;
    println!("init: wrote {}", path.display());
    Ok(())
}

fn cmd_examples(project: &Project) -> Result<()> {
    for listing in list_examples(project)? {
        match listing {
            ExampleListing::Valid(example) => {
                println!("{}: {}", example.id, example.info.description);
            }
            ExampleListing::Invalid { id, error } => {
                println!("{id}: (unreadable info.json: {error})");
            }
        }
    }
    Ok(())
}
