//! Desktop notifications at phase boundaries
//!
//! Dispatch is fire-and-forget: the engine calls [`Notifier::notify`] and
//! only logs a returned error.

use tokio::process::Command;
use tracing::{debug, info, warn};

/// Title used for every notification the timer sends
pub const NOTIFICATION_TITLE: &str = "Pomorin";

/// External service that displays a message
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, body: &str) -> Result<(), String>;
}

/// Writes notifications to the log only
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<(), String> {
        info!("[{}] {}", title, body);
        Ok(())
    }
}

/// Shows a native notification via `osascript` on macOS or `notify-send` elsewhere
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandNotifier;

impl Notifier for CommandNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<(), String> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| format!("No runtime available to dispatch notification: {}", e))?;

        let mut command = notification_command(title, body);
        runtime.spawn(async move {
            match command.output().await {
                Ok(output) if output.status.success() => debug!("Notification delivered"),
                Ok(output) => {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    warn!("Notification command failed: {}", stderr.trim());
                }
                Err(e) => warn!("Failed to execute notification command: {}", e),
            }
        });

        Ok(())
    }
}

#[cfg(target_os = "macos")]
fn notification_command(title: &str, body: &str) -> Command {
    let script = format!(
        "display notification {} with title {}",
        applescript_string(body),
        applescript_string(title)
    );
    let mut command = Command::new("osascript");
    command.args(["-e", &script]);
    command
}

#[cfg(not(target_os = "macos"))]
fn notification_command(title: &str, body: &str) -> Command {
    let mut command = Command::new("notify-send");
    command.args(["--app-name", NOTIFICATION_TITLE, title, body]);
    command
}

/// Quote `text` as an AppleScript string literal
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn applescript_string(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}
