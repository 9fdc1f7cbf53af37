//! Feature modules
//!
//! Each feature owns its models and the repository that persists them
//! through [`crate::database::KeyValueStore`].

pub mod catalog;
pub mod garden;
pub mod plants;
pub mod reminders;
pub mod settings;

pub use catalog::{PlantCatalog, PlantData};
pub use garden::{Garden, MembershipStore};
pub use plants::{Plant, PlantMood, PlantRepository};
pub use reminders::{
    BackgroundScheduler, LocalScheduler, LogNotifier, Notification, NotificationRepository,
    Notifier, ReminderDraft, ReminderWorker,
};
pub use settings::{Profile, SettingsStore, ThemeSetting};
