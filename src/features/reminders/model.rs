//! Reminder definitions and form validation

use crate::core::validation::{check_frequency, parse_frequency, require_text, ValidationError};
use serde::{Deserialize, Serialize};

/// A periodic plant-care reminder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Whole days between reminders, at least 1
    pub frequency: u32,
}

impl Notification {
    /// Validate the fields and assign a fresh identifier
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        frequency: i64,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        let description = description.into();
        require_text(&title, ValidationError::BlankTitle)?;
        require_text(&description, ValidationError::BlankDescription)?;
        let frequency = check_frequency(frequency)?;

        Ok(Notification {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            description,
            frequency,
        })
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// Raw add-reminder form input
#[derive(Debug, Clone, Default)]
pub struct ReminderDraft {
    pub title: String,
    pub description: String,
    pub frequency: String,
}

impl ReminderDraft {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        frequency: impl Into<String>,
    ) -> Self {
        ReminderDraft {
            title: title.into(),
            description: description.into(),
            frequency: frequency.into(),
        }
    }

    pub fn validate(&self) -> Result<Notification, ValidationError> {
        require_text(&self.title, ValidationError::BlankTitle)?;
        require_text(&self.description, ValidationError::BlankDescription)?;
        let frequency = parse_frequency(&self.frequency)?;
        Notification::new(self.title.clone(), self.description.clone(), i64::from(frequency))
    }
}
