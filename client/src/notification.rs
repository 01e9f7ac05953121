//! Transient user-facing notifications.

use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub description: String,
    /// How long the notification stays visible.
    pub duration: Duration,
}

impl Notification {
    fn new(kind: NotificationKind, message: &str, description: String, seconds: u64) -> Self {
        Self {
            kind,
            message: message.to_string(),
            description,
            duration: Duration::from_secs(seconds),
        }
    }

    pub fn fetch_succeeded() -> Self {
        Self::new(
            NotificationKind::Success,
            "Success",
            "Counter value fetched successfully".to_string(),
            2,
        )
    }

    pub fn fetch_failed(error: &ClientError) -> Self {
        Self::new(
            NotificationKind::Error,
            "Error Fetching Counter",
            describe(error, "Counter not initialized or network error"),
            4,
        )
    }

    pub fn initialized() -> Self {
        Self::new(
            NotificationKind::Success,
            "Counter Initialized",
            "Counter has been successfully initialized!".to_string(),
            3,
        )
    }

    pub fn initialize_failed(error: &ClientError) -> Self {
        Self::new(
            NotificationKind::Error,
            "Initialization Failed",
            describe(error, "Failed to initialize counter. Please try again."),
            5,
        )
    }

    pub fn incremented() -> Self {
        Self::new(
            NotificationKind::Success,
            "Counter Incremented",
            "Counter value has been successfully incremented!".to_string(),
            3,
        )
    }

    pub fn increment_failed(error: &ClientError) -> Self {
        Self::new(
            NotificationKind::Error,
            "Increment Failed",
            describe(error, "Failed to increment counter. Please try again."),
            5,
        )
    }

    pub fn decrement_unavailable() -> Self {
        Self::new(
            NotificationKind::Info,
            "Decrement Not Available",
            "Decrement function needs to be implemented in the Solana program.".to_string(),
            3,
        )
    }
}

fn describe(error: &ClientError, fallback: &str) -> String {
    let message = error.to_string();
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.kind {
            NotificationKind::Success => "ok",
            NotificationKind::Info => "info",
            NotificationKind::Error => "error",
        };
        write!(f, "[{tag}] {}: {}", self.message, self.description)
    }
}

/// Sending half handed to views.
#[derive(Clone)]
pub struct Notifier {
    sender: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    pub fn notify(&self, notification: Notification) {
        if self.sender.send(notification).is_err() {
            debug!("Notification dropped, no receiver");
        }
    }
}

pub fn channel() -> (Notifier, mpsc::UnboundedReceiver<Notification>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (Notifier { sender }, receiver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::pubkey::Pubkey;

    #[test]
    fn test_error_description_uses_error_message() {
        let address = Pubkey::new_unique();
        let notification = Notification::fetch_failed(&ClientError::AccountNotFound(address));
        assert_eq!(notification.kind, NotificationKind::Error);
        assert_eq!(notification.message, "Error Fetching Counter");
        assert!(notification.description.contains(&address.to_string()));
        assert_eq!(notification.duration, Duration::from_secs(4));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Notification::decrement_unavailable().to_string(),
            "[info] Decrement Not Available: Decrement function needs to be implemented in the Solana program."
        );
    }

    #[tokio::test]
    async fn test_channel_delivers_in_order() {
        let (notifier, mut receiver) = channel();
        notifier.notify(Notification::initialized());
        notifier.notify(Notification::fetch_succeeded());

        assert_eq!(receiver.recv().await.unwrap().message, "Counter Initialized");
        assert_eq!(receiver.recv().await.unwrap().message, "Success");
    }
}
