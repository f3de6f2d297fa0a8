//! User-facing notifications.
//!
//! Components that need to tell the user something depend on the narrow
//! [`Notifier`] capability. The application shell decides where messages
//! go: straight to the terminal, or onto a channel it drains itself.

use std::sync::Arc;

use colored::Colorize;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

/// Capability to surface a message to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NotificationKind, message: &str);

    fn success(&self, message: &str) {
        self.notify(NotificationKind::Success, message);
    }

    fn info(&self, message: &str) {
        self.notify(NotificationKind::Info, message);
    }

    fn warning(&self, message: &str) {
        self.notify(NotificationKind::Warning, message);
    }

    fn error(&self, message: &str) {
        self.notify(NotificationKind::Error, message);
    }
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn notify(&self, kind: NotificationKind, message: &str) {
        (**self).notify(kind, message);
    }
}

/// Writes notifications to stderr with a colored prefix.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier {
    quiet: bool,
}

impl ConsoleNotifier {
    #[must_use]
    pub const fn new() -> Self {
        Self { quiet: false }
    }

    /// Suppress success and info messages; warnings and errors still print.
    #[must_use]
    pub const fn quiet() -> Self {
        Self { quiet: true }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        tracing::debug!(%kind, message, "notification");

        let line = match kind {
            NotificationKind::Success if !self.quiet => format!("{} {message}", "✓".green()),
            NotificationKind::Info if !self.quiet => format!("{} {message}", "ℹ".blue()),
            NotificationKind::Warning => format!("{} {message}", "⚠".yellow()),
            NotificationKind::Error => format!("{} {message}", "✗".red()),
            NotificationKind::Success | NotificationKind::Info => return,
        };
        eprintln!("{line}");
    }
}

/// Forwards notifications over a channel owned by the application shell.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiver its messages arrive on.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        // A closed receiver means the shell is gone; nobody is left to tell.
        let _ = self.tx.send(Notification {
            kind,
            message: message.to_string(),
        });
    }
}

/// Drain every notification currently queued on `rx`.
pub fn drain(rx: &mut mpsc::UnboundedReceiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(n) = rx.try_recv() {
        out.push(n);
    }
    out
}
