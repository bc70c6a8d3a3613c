//! Build, install and run tooling for the remi engine.
//!
//! `devkit` drives meson to configure, compile and install the library,
//! mirrors it into a system toolchain, builds the dev environment and the
//! examples against it, and launches the results natively or over HTTP.
//!
//! - **[`core`]**: Pure planning logic (meson arguments, template
//!   substitution, launch resolution). No I/O.
//! - **[`io`]**: Side effects (config, filesystem, subprocesses, downloads,
//!   launching). The trait seams here are replaced by scripted fakes in
//!   tests.
//!
//! Each remaining module implements one CLI command on top of the two.

pub mod build;
pub mod clean;
pub mod core;
pub mod dev;
pub mod example;
pub mod exit_codes;
pub mod fetch;
pub mod install;
pub mod io;
pub mod launch;
pub mod logging;
pub mod options;
pub mod project;
pub mod setup;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod uninstall;
