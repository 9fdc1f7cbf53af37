//! Host notification surface
//!
//! The reminder worker raises notifications through [`Notifier`]. The binary
//! uses [`LogNotifier`]; a platform integration would post real notifications.

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashSet;
use log::{debug, info};
use thiserror::Error;

pub const CHANNEL_ID: &str = "plantastic_notifications_channel";
pub const CHANNEL_NAME: &str = "Plantastic Reminders";
pub const CHANNEL_DESCRIPTION: &str = "Channel for Plantastic plant care reminders";

/// Category that reminder notifications are posted under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationChannel {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl NotificationChannel {
    pub fn reminders() -> Self {
        NotificationChannel {
            id: CHANNEL_ID.to_string(),
            name: CHANNEL_NAME.to_string(),
            description: CHANNEL_DESCRIPTION.to_string(),
        }
    }
}

/// A notification ready to be shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayNotification {
    pub display_id: i32,
    pub channel_id: String,
    pub title: String,
    pub body: String,
}

#[derive(Error, Debug)]
pub enum NotifyError {
    /// The user has not granted permission to post notifications
    #[error("notification permission denied")]
    PermissionDenied,
    #[error("failed to post notification: {0}")]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Create the channel if it does not exist yet
    async fn ensure_channel(&self, channel: &NotificationChannel) -> Result<()>;

    async fn notify(&self, notification: &DisplayNotification) -> Result<(), NotifyError>;
}

/// Writes notifications to the log
#[derive(Default)]
pub struct LogNotifier {
    channels: DashSet<String>,
}

impl LogNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn ensure_channel(&self, channel: &NotificationChannel) -> Result<()> {
        if self.channels.insert(channel.id.clone()) {
            debug!("Created notification channel {} ({})", channel.id, channel.name);
        }
        Ok(())
    }

    async fn notify(&self, notification: &DisplayNotification) -> Result<(), NotifyError> {
        info!(
            "🔔 [{}#{}] {}: {}",
            notification.channel_id, notification.display_id, notification.title, notification.body
        );
        Ok(())
    }
}
