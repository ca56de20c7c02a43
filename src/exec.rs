//! Helpers for running external command-line tools.

use std::sync::LazyLock;

use regex::Regex;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use crate::{ocr::OcrError, prelude::*};

/// Matches stderr lines that poppler tools print without failing the process.
pub static DEFAULT_ERROR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)error").expect("failed to compile regex"));

/// Run a child process to completion, killing it if the caller cancels.
pub async fn run_command(
    token: &CancellationToken,
    command_name: &str,
    mut cmd: Command,
) -> Result<std::process::Output> {
    cmd.kill_on_drop(true);
    tokio::select! {
        output = cmd.output() => {
            output.with_context(|| format!("failed to run {}", command_name))
        }
        _ = token.cancelled() => Err(OcrError::Cancelled.into()),
    }
}

/// Report any command failures, and include any error output.
///
/// Standard output and standard error are logged at the appropriate levels.
/// When `error_regex` is supplied, a successful exit status is still treated
/// as a failure if stderr matches it, because several of the tools we drive
/// exit 0 after printing errors.
pub fn check_for_command_failure(
    command_name: &str,
    output: &std::process::Output,
    error_regex: Option<&Regex>,
) -> Result<()> {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stdout.is_empty() {
        debug!(
            command_name = command_name,
            output = %stdout,
            "Standard output from command"
        );
    }
    if !stderr.is_empty() {
        debug!(
            command_name = command_name,
            output = %stderr,
            "Standard error from command",
        );
    }

    if output.status.success() {
        if let Some(regex) = error_regex
            && regex.is_match(&stderr)
        {
            return Err(anyhow!(
                "{} printed error output:\n{}",
                command_name,
                stderr,
            ));
        }
        Ok(())
    } else if let Some(exit_code) = output.status.code() {
        Err(anyhow!(
            "{} failed with exit code {} and error output:\n{}",
            command_name,
            exit_code,
            stderr,
        ))
    } else {
        Err(anyhow!(
            "{} failed with error output:\n{}",
            command_name,
            stderr,
        ))
    }
}
