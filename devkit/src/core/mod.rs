//! Deterministic, pure logic shared by devkit commands.
//!
//! Core modules must be free of I/O side effects. They turn configuration
//! and command arguments into plans (meson arguments, rendered files, launch
//! decisions) that the `io` layer carries out.

pub mod archive;
pub mod example;
pub mod install;
pub mod launch;
pub mod meson;
pub mod options;
pub mod types;
