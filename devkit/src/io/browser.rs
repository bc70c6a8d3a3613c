//! Opening URLs in the user's default browser.

use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use tracing::debug;

/// Platform command that opens `url` with the default handler.
pub fn opener_command(url: &str) -> Command {
    let mut cmd = if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]);
        cmd
    } else if cfg!(target_os = "macos") {
        Command::new("open")
    } else {
        Command::new("xdg-open")
    };
    cmd.arg(url);
    cmd
}

/// Ask the desktop to open `url`. Does not wait for the browser.
pub fn open_url(url: &str) -> Result<()> {
    debug!(url, "opening browser");
    opener_command(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("open browser at {url}"))?;
    Ok(())
}
