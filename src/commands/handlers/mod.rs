//! Per-command handler implementations
//!
//! - **Version**: 3.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 3.0.0: Plant, garden, reminder, settings and run handlers for the CLI
//! - 1.0.0: Initial extraction from the monolithic dispatcher

pub mod garden;
pub mod plants;
pub mod reminders;
pub mod run;
pub mod settings;

use std::sync::Arc;

use super::handler::CommandHandler;

/// Create all registered command handlers
pub fn create_all_handlers() -> Vec<Arc<dyn CommandHandler>> {
    vec![
        Arc::new(plants::PlantsHandler),
        Arc::new(garden::GardenHandler),
        Arc::new(reminders::RemindersHandler),
        Arc::new(settings::SettingsHandler),
        Arc::new(run::RunHandler),
    ]
}
