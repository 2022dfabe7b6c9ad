//! External command execution.

use std::process::Stdio;

use tokio::process::Command;

use crate::action::{ActionOutcome, ActionRunner};

/// Runs actions as child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandRunner;

impl CommandRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ActionRunner for CommandRunner {
    async fn run(&self, command: &str) -> ActionOutcome {
        let mut parts = command.split_whitespace();
        let Some(program) = parts.next() else {
            return ActionOutcome::Skipped;
        };

        tracing::info!(command = %command, "Running action");

        let output = Command::new(program)
            .args(parts)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await;

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(command = %command, error = %e, "Action failed to start");
                return ActionOutcome::Failed;
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stdout.trim().is_empty() {
            tracing::info!(command = %command, stdout = %stdout.trim_end(), "Action output");
        }
        if !stderr.trim().is_empty() {
            tracing::info!(command = %command, stderr = %stderr.trim_end(), "Action output");
        }

        if output.status.success() {
            ActionOutcome::Succeeded
        } else {
            tracing::warn!(command = %command, status = %output.status, "Action exited with failure");
            ActionOutcome::Failed
        }
    }
}
