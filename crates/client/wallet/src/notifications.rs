//! User-facing notification side-channel.

use serde::{Deserialize, Serialize};
use strum::Display;
use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationVariant {
    Success,
    Error,
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub name: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl Notification {
    pub fn success(description: impl Into<String>) -> Self {
        Self {
            name: "Success".to_string(),
            description: description.into(),
            variant: NotificationVariant::Success,
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            name: "Error".to_string(),
            description: description.into(),
            variant: NotificationVariant::Error,
        }
    }
}

/// Broadcast hub for [`Notification`]s.
#[derive(Debug, Clone)]
pub struct Notifications {
    tx: broadcast::Sender<Notification>,
}

impl Notifications {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn send(&self, notification: Notification) {
        tracing::debug!(
            variant = %notification.variant,
            "Notification: {}",
            notification.description
        );

        if self.tx.send(notification).is_err() {
            // No subscribers - this is normal, not an error
            tracing::trace!("No notification subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(16)
    }
}
