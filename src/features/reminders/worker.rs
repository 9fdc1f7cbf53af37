//! Reminder worker
//!
//! The payload the background scheduler runs for each reminder. It reads the
//! title, description and reminder id from its input and raises one
//! notification. Running it twice for the same reminder shows the same
//! notification again under the same display id.

use crate::features::reminders::notifier::{
    DisplayNotification, NotificationChannel, Notifier, NotifyError,
};
use crate::features::reminders::scheduler::WorkInput;
use log::{debug, error, warn};
use std::sync::Arc;

pub const KEY_NOTIFICATION_TITLE: &str = "notification_title";
pub const KEY_NOTIFICATION_DESCRIPTION: &str = "notification_description";
pub const KEY_NOTIFICATION_ID: &str = "notification_id";

/// Display id used when the input carries no reminder id
const FALLBACK_DISPLAY_ID: i32 = 1;

/// Result reported back to the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkOutcome {
    Success,
    /// The scheduler may run the work again later
    Failure,
}

/// 32-bit string hash compatible with `java.lang.String#hashCode`, so display
/// ids are stable across processes and platforms.
pub fn display_id_for(reminder_id: &str) -> i32 {
    reminder_id
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

pub struct ReminderWorker {
    notifier: Arc<dyn Notifier>,
    channel: NotificationChannel,
}

impl ReminderWorker {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        ReminderWorker {
            notifier,
            channel: NotificationChannel::reminders(),
        }
    }

    pub async fn run(&self, input: &WorkInput) -> WorkOutcome {
        let title = input.get(KEY_NOTIFICATION_TITLE).unwrap_or_default();
        let description = input.get(KEY_NOTIFICATION_DESCRIPTION).unwrap_or_default();

        if title.is_empty() || description.is_empty() {
            warn!("Reminder input is missing a title or description, failing work");
            return WorkOutcome::Failure;
        }

        let display_id = input
            .get(KEY_NOTIFICATION_ID)
            .map(display_id_for)
            .unwrap_or(FALLBACK_DISPLAY_ID);

        if let Err(e) = self.notifier.ensure_channel(&self.channel).await {
            error!("Failed to create notification channel {}: {e}", self.channel.id);
            return WorkOutcome::Failure;
        }

        let notification = DisplayNotification {
            display_id,
            channel_id: self.channel.id.clone(),
            title: title.to_string(),
            body: description.to_string(),
        };

        match self.notifier.notify(&notification).await {
            Ok(()) => {
                debug!("Raised reminder notification {display_id}");
                WorkOutcome::Success
            }
            Err(NotifyError::PermissionDenied) => {
                debug!("Notification permission denied, dropping reminder {display_id}");
                WorkOutcome::Success
            }
            Err(e) => {
                error!("{e}");
                WorkOutcome::Failure
            }
        }
    }
}
