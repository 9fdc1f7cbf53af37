//! # Reminders Feature
//!
//! Periodic plant-care reminders: definitions persisted as JSON, recurring
//! work registered with a background scheduler, and the worker that raises
//! the notification when the work fires.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 2.0.0: Scheduler behind a trait; in-process adapter persists registrations
//! - 1.1.0: Notification permission denial treated as a silent drop
//! - 1.0.0: Initial release

pub mod model;
pub mod notifier;
pub mod repository;
pub mod scheduler;
pub mod worker;

pub use model::{Notification, ReminderDraft};
pub use notifier::{LogNotifier, NotificationChannel, Notifier, NotifyError};
pub use repository::NotificationRepository;
pub use scheduler::{BackgroundScheduler, LocalScheduler, PeriodicWork, WorkInput};
pub use worker::{display_id_for, ReminderWorker, WorkOutcome};
