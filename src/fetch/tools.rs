// External tool invocation (git, unzip, tar, bash, python, java, perl).
//
// Every helper fails with the program name and exit status so a broken
// step is easy to spot in the error chain.

use std::process::Output;

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::debug;

/// Human-readable form of a command line for logs and errors.
pub fn describe(cmd: &Command) -> String {
    let std_cmd = cmd.as_std();
    let mut parts = vec![std_cmd.get_program().to_string_lossy().into_owned()];
    parts.extend(std_cmd.get_args().map(|a| a.to_string_lossy().into_owned()));
    parts.join(" ")
}

/// Run a command with inherited stdio and fail on a non-zero exit.
pub async fn run(cmd: &mut Command) -> Result<()> {
    let line = describe(cmd);
    debug!(command = %line, "Running");

    let status = cmd
        .status()
        .await
        .with_context(|| format!("Failed to start `{line}`"))?;

    if !status.success() {
        anyhow::bail!("`{line}` exited with {status}");
    }
    Ok(())
}

/// Run a command, capturing its output, and fail on a non-zero exit.
pub async fn capture(cmd: &mut Command) -> Result<Output> {
    let line = describe(cmd);
    debug!(command = %line, "Running (captured)");

    let output = cmd
        .output()
        .await
        .with_context(|| format!("Failed to start `{line}`"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("`{line}` exited with {}: {}", output.status, stderr.trim());
    }
    Ok(output)
}
