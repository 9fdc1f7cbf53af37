// Core layer - configuration and input validation
pub mod core;

// Infrastructure - local key-value store
pub mod database;

// Features layer - plants, catalog, garden, reminders, settings
pub mod features;

// Application layer
pub mod app;
pub mod cli;
pub mod commands;

pub use app::AppContext;
pub use crate::core::{Config, ValidationError};
pub use database::{Database, KeyValueStore, MemoryStore};

pub use features::{
    // Catalog
    PlantCatalog, PlantData,
    // Garden
    Garden, MembershipStore,
    // Plants
    Plant, PlantMood, PlantRepository,
    // Reminders
    BackgroundScheduler, LocalScheduler, LogNotifier, Notification, NotificationRepository,
    Notifier, ReminderDraft, ReminderWorker,
    // Settings
    Profile, SettingsStore, ThemeSetting,
};
