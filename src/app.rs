//! Application context
//!
//! Builds every repository over one key-value store and hands them to the
//! command handlers.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use crate::core::Config;
use crate::database::{Database, KeyValueStore};
use crate::features::catalog::PlantCatalog;
use crate::features::garden::{Garden, MembershipStore};
use crate::features::plants::PlantRepository;
use crate::features::reminders::{
    LocalScheduler, LogNotifier, NotificationRepository, Notifier, ReminderWorker,
};
use crate::features::settings::SettingsStore;
use anyhow::Result;
use log::info;
use std::sync::Arc;
use std::time::Duration;

/// Shared services for all command handlers
pub struct AppContext {
    pub catalog: Arc<PlantCatalog>,
    pub plants: Arc<PlantRepository>,
    pub membership: Arc<MembershipStore>,
    pub garden: Garden,
    pub reminders: NotificationRepository,
    pub scheduler: Arc<LocalScheduler>,
    pub worker: Arc<ReminderWorker>,
    pub settings: SettingsStore,
    pub start_time: std::time::Instant,
}

impl AppContext {
    /// Open the SQLite store named in `config` and load everything from it
    pub async fn open(config: &Config) -> Result<Self> {
        let database = Database::new(&config.database_path).await?;

        let catalog = match &config.catalog_path {
            Some(path) => PlantCatalog::load(path),
            None => PlantCatalog::bundled(),
        };
        info!("Plant catalog has {} entries", catalog.len());

        let day_length = Duration::from_secs(config.reminder_day_secs);
        Ok(Self::assemble(Arc::new(database), catalog, day_length, Arc::new(LogNotifier::new())).await)
    }

    /// Wire the repositories over an existing store
    pub async fn assemble(
        store: Arc<dyn KeyValueStore>,
        catalog: PlantCatalog,
        day_length: Duration,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let catalog = Arc::new(catalog);
        let plants = Arc::new(PlantRepository::load(store.clone()).await);
        let membership = Arc::new(MembershipStore::load(store.clone()).await);
        let garden = Garden::new(catalog.clone(), membership.clone(), plants.clone());

        let scheduler = Arc::new(LocalScheduler::load(store.clone(), day_length).await);
        let reminders = NotificationRepository::load(store.clone(), scheduler.clone()).await;
        let settings = SettingsStore::load(store).await;

        AppContext {
            catalog,
            plants,
            membership,
            garden,
            reminders,
            scheduler,
            worker: Arc::new(ReminderWorker::new(notifier)),
            settings,
            start_time: std::time::Instant::now(),
        }
    }

    /// Start firing scheduled reminders
    pub async fn start_scheduler(&self) -> Result<()> {
        self.scheduler.start(self.worker.clone()).await
    }
}
