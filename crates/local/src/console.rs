use crate::{Error, Result};

use simplelock_core::model::CommandArgs;
use simplelock_core::{SimpleLock, command};
use simplelock_locks::LockManager;
use simplelock_users::UserDirectory;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::debug;

/// Channel id reported for commands typed at the console.
pub const CONSOLE_CHANNEL: &str = "console";

/// Runs command lines against a plugin as a fixed user.
pub struct Console<LM, UD>
where
    LM: LockManager,
    UD: UserDirectory,
{
    plugin: SimpleLock<LM, UD>,
    user_id: String,
}

impl<LM, UD> Console<LM, UD>
where
    LM: LockManager,
    UD: UserDirectory,
{
    /// Creates a console acting as `user_id`.
    pub fn new(plugin: SimpleLock<LM, UD>, user_id: impl Into<String>) -> Self {
        Self {
            plugin,
            user_id: user_id.into(),
        }
    }

    /// Handles one input line. Returns `None` for blank lines.
    pub async fn handle_line(&self, line: &str) -> Option<String> {
        let line = line.trim();

        if line.is_empty() {
            return None;
        }

        if line == "help" {
            return Some(help());
        }

        let args = CommandArgs {
            command: line.to_string(),
            user_id: self.user_id.clone(),
            channel_id: CONSOLE_CHANNEL.to_string(),
        };

        debug!(command = %line, user_id = %self.user_id, "console command");

        let output = match self.plugin.execute_command(args).await {
            Ok(response) => {
                serde_json::to_string(&response).unwrap_or_else(|e| format!("error: {e}"))
            }
            Err(e) => format!("error: {e}"),
        };

        Some(output)
    }

    /// Handles lines until the sender side is closed, writing one output
    /// line per command to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub async fn run<W>(&self, mut lines: mpsc::Receiver<String>, mut out: W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while let Some(line) = lines.recv().await {
            if let Some(output) = self.handle_line(&line).await {
                out.write_all(output.as_bytes())
                    .await
                    .map_err(|e| Error::Io("failed to write console output", e))?;
                out.write_all(b"\n")
                    .await
                    .map_err(|e| Error::Io("failed to write console output", e))?;
                out.flush()
                    .await
                    .map_err(|e| Error::Io("failed to flush console output", e))?;
            }
        }

        Ok(())
    }
}

/// Usage text built from the command descriptor.
fn help() -> String {
    let descriptor = command();

    format!(
        "/{} {}\n    {}: {}",
        descriptor.trigger,
        descriptor.auto_complete_hint,
        descriptor.display_name,
        descriptor.description
    )
}

/// Reads stdin lines on a dedicated thread.
///
/// The returned receiver closes on end of input. Tokio's stdin would keep
/// the runtime from shutting down while a read is pending.
#[must_use]
pub fn stdin_lines() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);

    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    rx
}
