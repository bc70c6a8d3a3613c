//! I/O helpers for devkit commands.

pub mod browser;
pub mod config;
pub mod examples;
pub mod fetch;
pub mod fs;
pub mod init;
pub mod launcher;
pub mod meson;
pub mod paths;
pub mod process;
