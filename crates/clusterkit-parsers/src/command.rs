//! Command execution utilities for directory and report queries.

use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

/// Error type for command execution.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Failed to execute {command}: {error}")]
    Execution { command: String, error: String },
    #[error("Command {command} timed out after {seconds}s")]
    Timeout { command: String, seconds: u64 },
}

/// Execute a command and return stdout, treating non-zero exit as OK.
///
/// `finger` exits non-zero for unknown users but still prints usable output.
pub async fn run_command_allow_failure(
    cmd: &mut Command,
    name: &str,
) -> Result<String, CommandError> {
    let output = cmd.output().await.map_err(|e| CommandError::Execution {
        command: name.to_string(),
        error: e.to_string(),
    })?;

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Like `run_command_allow_failure`, but gives up after `limit`.
///
/// The child is killed when the deadline passes.
pub async fn run_command_with_timeout(
    cmd: &mut Command,
    name: &str,
    limit: Duration,
) -> Result<String, CommandError> {
    cmd.kill_on_drop(true);
    match tokio::time::timeout(limit, run_command_allow_failure(cmd, name)).await {
        Ok(result) => result,
        Err(_) => Err(CommandError::Timeout {
            command: name.to_string(),
            seconds: limit.as_secs(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_command_allow_failure_success() {
        let mut cmd = Command::new("echo");
        cmd.arg("hello");
        let result = run_command_allow_failure(&mut cmd, "echo").await.unwrap();
        assert_eq!(result.trim(), "hello");
    }

    #[tokio::test]
    async fn test_run_command_allow_failure_not_found() {
        let mut cmd = Command::new("nonexistent_command_12345");
        let result = run_command_allow_failure(&mut cmd, "nonexistent").await;
        assert!(matches!(result, Err(CommandError::Execution { .. })));
    }

    #[tokio::test]
    async fn test_run_command_allow_failure_keeps_stdout() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo partial; exit 1"]);
        let result = run_command_allow_failure(&mut cmd, "sh").await.unwrap();
        assert_eq!(result.trim(), "partial");
    }

    #[tokio::test]
    async fn test_run_command_with_timeout_expires() {
        let mut cmd = Command::new("sleep");
        cmd.arg("5");
        let result = run_command_with_timeout(&mut cmd, "sleep", Duration::from_millis(50)).await;
        assert!(matches!(result, Err(CommandError::Timeout { .. })));
    }
}
