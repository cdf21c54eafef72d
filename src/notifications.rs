//! Desktop notification delivery.
//! macOS goes through osascript and Linux through notify-send. Other platforms stay silent.

use crate::reminders::Notifier;
#[cfg(any(target_os = "macos", target_os = "linux"))]
use std::process::Command;
use tracing::{debug, warn};

/// Notifier that pops up a native desktop notification
#[derive(Debug, Clone, Copy)]
pub struct DesktopNotifier {
    enabled: bool,
}

impl DesktopNotifier {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, body: &str) {
        if !self.enabled {
            debug!(title, "desktop notifications disabled, dropping");
            return;
        }
        if let Err(e) = send(title, body) {
            // Delivery is best effort and never touches item state
            warn!(title, error = %e, "failed to show notification");
        }
    }
}

#[cfg(target_os = "macos")]
fn send(title: &str, body: &str) -> std::io::Result<()> {
    let script = format!(
        r#"display notification "{}" with title "Pantry - {}""#,
        body.replace('"', "\\\""),
        title.replace('"', "\\\"")
    );

    Command::new("osascript").arg("-e").arg(&script).output()?;
    Ok(())
}

#[cfg(target_os = "linux")]
fn send(title: &str, body: &str) -> std::io::Result<()> {
    Command::new("notify-send")
        .arg("--app-name=pantry")
        .arg(title)
        .arg(body)
        .output()?;
    Ok(())
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
fn send(title: &str, body: &str) -> std::io::Result<()> {
    // No-op on other platforms
    let _ = (title, body);
    Ok(())
}
