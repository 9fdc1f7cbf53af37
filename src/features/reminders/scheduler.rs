//! # Background Scheduler
//!
//! Periodic work is delegated to a [`BackgroundScheduler`]. Registrations are
//! unique by name and tagged for cancellation; registering a name that is
//! already present keeps the existing schedule.
//!
//! [`LocalScheduler`] is the in-process adapter used by the binary. It keeps
//! registrations in the key-value store so they come back after a restart,
//! and runs each one on a tokio interval. Timing is approximate and a fire
//! may repeat; nothing here assumes wall-clock exactness.

use crate::database::{keys, KeyValueStore};
use crate::features::reminders::worker::{ReminderWorker, WorkOutcome};
use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// How often a running scheduler re-reads registrations made by other processes
pub const RECONCILE_INTERVAL: Duration = Duration::from_secs(30);

/// Opaque string parameters handed to the work when it runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkInput(BTreeMap<String, String>);

impl WorkInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

/// A recurring unit of work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodicWork {
    /// Unique work name
    pub name: String,
    pub tag: String,
    pub period_days: u32,
    pub input: WorkInput,
}

#[async_trait]
pub trait BackgroundScheduler: Send + Sync {
    /// Register recurring work. If work with the same name already exists it
    /// is kept unchanged and `false` is returned.
    async fn schedule_periodic(&self, work: PeriodicWork) -> Result<bool>;

    /// Cancel all work carrying `tag`. Cancelling unknown tags is not an error.
    async fn cancel_by_tag(&self, tag: &str) -> Result<()>;
}

pub struct LocalScheduler {
    store: Arc<dyn KeyValueStore>,
    day_length: Duration,
    /// Serialises this process's read-modify-write cycles on the stored registrations
    write_lock: Mutex<()>,
    tasks: DashMap<String, JoinHandle<()>>,
    worker: OnceLock<Arc<ReminderWorker>>,
}

impl LocalScheduler {
    /// Attach to the persisted registrations. Nothing runs until [`LocalScheduler::start`].
    ///
    /// The store is the only record of what is registered, so several
    /// processes may share it; each operation re-reads it.
    pub async fn load(store: Arc<dyn KeyValueStore>, day_length: Duration) -> Self {
        match read_registrations(store.as_ref()).await {
            Ok(registrations) if !registrations.is_empty() => {
                info!("Found {} periodic work registrations", registrations.len())
            }
            Ok(_) => {}
            Err(e) => warn!("Failed to read periodic work registrations: {e}"),
        }

        LocalScheduler {
            store,
            day_length,
            write_lock: Mutex::new(()),
            tasks: DashMap::new(),
            worker: OnceLock::new(),
        }
    }

    /// Begin running every registration with `worker`
    pub async fn start(&self, worker: Arc<ReminderWorker>) -> Result<()> {
        if self.worker.set(worker).is_err() {
            warn!("Scheduler already started");
            return Ok(());
        }

        self.reconcile().await?;
        info!("Scheduler started with {} periodic works", self.running());
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.worker.get().is_some()
    }

    /// Registrations as currently stored
    pub async fn registrations(&self) -> Result<Vec<PeriodicWork>> {
        Ok(read_registrations(self.store.as_ref()).await?.into_values().collect())
    }

    /// Number of works with a live timer task
    pub fn running(&self) -> usize {
        self.tasks.len()
    }

    /// Bring timer tasks in line with the stored registrations: start tasks
    /// for work registered elsewhere and stop tasks for work cancelled
    /// elsewhere. Does nothing before [`LocalScheduler::start`].
    pub async fn reconcile(&self) -> Result<()> {
        if !self.is_started() {
            return Ok(());
        }

        let registrations = read_registrations(self.store.as_ref()).await?;

        let stale: Vec<String> = self
            .tasks
            .iter()
            .map(|entry| entry.key().clone())
            .filter(|name| !registrations.contains_key(name))
            .collect();
        for name in stale {
            if let Some((_, handle)) = self.tasks.remove(&name) {
                handle.abort();
                info!("Stopped periodic work {name}, no longer registered");
            }
        }

        for work in registrations.into_values() {
            if !self.tasks.contains_key(&work.name) {
                self.spawn(work);
            }
        }
        Ok(())
    }

    /// Stop all timer tasks. Registrations stay persisted.
    pub fn shutdown(&self) {
        for entry in self.tasks.iter() {
            entry.value().abort();
        }
        self.tasks.clear();
    }

    fn period_for(&self, work: &PeriodicWork) -> Duration {
        self.day_length.saturating_mul(work.period_days.max(1))
    }

    fn spawn(&self, work: PeriodicWork) {
        let Some(worker) = self.worker.get().cloned() else {
            return;
        };

        let period = self.period_for(&work);
        let Some(first_fire) = Instant::now().checked_add(period) else {
            warn!("Period of {} is out of range, not starting its timer", work.name);
            return;
        };
        debug!("Timer for {} every {:?}", work.name, period);

        let name = work.name.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(first_fire, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                match worker.run(&work.input).await {
                    WorkOutcome::Success => debug!("Periodic work {} succeeded", work.name),
                    WorkOutcome::Failure => {
                        warn!("Periodic work {} failed, retrying next period", work.name)
                    }
                }
            }
        });

        if let Some(previous) = self.tasks.insert(name, handle) {
            previous.abort();
        }
    }

    async fn persist(&self, registrations: &BTreeMap<String, PeriodicWork>) -> Result<()> {
        let works: Vec<&PeriodicWork> = registrations.values().collect();
        let raw = serde_json::to_string(&works)?;
        self.store.put(keys::PERIODIC_WORK, &raw).await
    }
}

/// Read the stored registrations. A corrupt record reads as empty; a failed
/// read is an error so it is never mistaken for "nothing registered".
async fn read_registrations(store: &dyn KeyValueStore) -> Result<BTreeMap<String, PeriodicWork>> {
    let Some(raw) = store.get(keys::PERIODIC_WORK).await? else {
        return Ok(BTreeMap::new());
    };

    match serde_json::from_str::<Vec<PeriodicWork>>(&raw) {
        Ok(works) => Ok(works.into_iter().map(|w| (w.name.clone(), w)).collect()),
        Err(e) => {
            warn!("Discarding corrupt periodic work registrations: {e}");
            Ok(BTreeMap::new())
        }
    }
}

#[async_trait]
impl BackgroundScheduler for LocalScheduler {
    async fn schedule_periodic(&self, work: PeriodicWork) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut registrations = read_registrations(self.store.as_ref()).await?;
        if registrations.contains_key(&work.name) {
            debug!("Keeping existing periodic work {}", work.name);
            return Ok(false);
        }

        registrations.insert(work.name.clone(), work.clone());
        self.persist(&registrations).await?;

        info!("Scheduled {} every {} day(s)", work.name, work.period_days);
        self.spawn(work);
        Ok(true)
    }

    async fn cancel_by_tag(&self, tag: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut registrations = read_registrations(self.store.as_ref()).await?;
        let before = registrations.len();
        registrations.retain(|_, work| work.tag != tag);

        if registrations.len() != before {
            self.persist(&registrations).await?;
            info!("Cancelled {} periodic work(s) tagged {tag}", before - registrations.len());
        } else {
            debug!("No periodic work tagged {tag}");
        }

        // Tasks may have been started from a registration that is already gone
        let local: Vec<String> = self
            .tasks
            .iter()
            .map(|entry| entry.key().clone())
            .filter(|name| !registrations.contains_key(name))
            .collect();
        for name in local {
            if let Some((_, handle)) = self.tasks.remove(&name) {
                handle.abort();
            }
        }
        Ok(())
    }
}

impl Drop for LocalScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::testing::BrokenStore;
    use crate::database::MemoryStore;
    use crate::features::reminders::notifier::testing::RecordingNotifier;
    use crate::features::reminders::worker::{
        KEY_NOTIFICATION_DESCRIPTION, KEY_NOTIFICATION_ID, KEY_NOTIFICATION_TITLE,
    };

    fn work(name: &str, title: &str) -> PeriodicWork {
        PeriodicWork {
            name: name.to_string(),
            tag: name.to_string(),
            period_days: 1,
            input: WorkInput::new()
                .with(KEY_NOTIFICATION_TITLE, title)
                .with(KEY_NOTIFICATION_DESCRIPTION, "Check the soil")
                .with(KEY_NOTIFICATION_ID, name),
        }
    }

    #[test]
    fn test_work_input_accessors() {
        let input = WorkInput::new().with("a", "1");
        assert_eq!(input.get("a"), Some("1"));
        assert_eq!(input.get("b"), None);
    }

    #[tokio::test]
    async fn test_schedule_keeps_existing() {
        let scheduler = LocalScheduler::load(Arc::new(MemoryStore::new()), Duration::from_secs(60)).await;

        assert!(scheduler.schedule_periodic(work("r1", "First")).await.unwrap());
        assert!(!scheduler.schedule_periodic(work("r1", "Second")).await.unwrap());

        let registrations = scheduler.registrations().await.unwrap();
        assert_eq!(registrations.len(), 1);
        assert_eq!(registrations[0].input.get(KEY_NOTIFICATION_TITLE), Some("First"));
    }

    #[tokio::test]
    async fn test_registrations_survive_restart() {
        let store = MemoryStore::new();
        {
            let scheduler = LocalScheduler::load(Arc::new(store.clone()), Duration::from_secs(60)).await;
            scheduler.schedule_periodic(work("r1", "Water")).await.unwrap();
            scheduler.schedule_periodic(work("r2", "Mist")).await.unwrap();
            scheduler.cancel_by_tag("r2").await.unwrap();
        }

        let restarted = LocalScheduler::load(Arc::new(store), Duration::from_secs(60)).await;
        let names: Vec<_> = restarted.registrations().await.unwrap().into_iter().map(|w| w.name).collect();
        assert_eq!(names, vec!["r1"]);
    }

    #[tokio::test]
    async fn test_cancel_unknown_tag_is_ok() {
        let scheduler = LocalScheduler::load(Arc::new(MemoryStore::new()), Duration::from_secs(60)).await;
        scheduler.cancel_by_tag("nothing").await.unwrap();
        assert!(scheduler.registrations().await.unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_started_work_fires_each_period() {
        let notifier = Arc::new(RecordingNotifier::default());
        let scheduler = LocalScheduler::load(Arc::new(MemoryStore::new()), Duration::from_secs(10)).await;
        scheduler.schedule_periodic(work("r1", "Water")).await.unwrap();
        assert_eq!(scheduler.running(), 0);

        scheduler.start(Arc::new(ReminderWorker::new(notifier.clone()))).await.unwrap();
        assert!(scheduler.is_started());
        assert_eq!(scheduler.running(), 1);

        tokio::time::sleep(Duration::from_secs(25)).await;
        assert_eq!(notifier.shown().len(), 2);

        scheduler.cancel_by_tag("r1").await.unwrap();
        assert_eq!(scheduler.running(), 0);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(notifier.shown().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_work_scheduled_after_start_runs() {
        let notifier = Arc::new(RecordingNotifier::default());
        let scheduler = LocalScheduler::load(Arc::new(MemoryStore::new()), Duration::from_secs(10)).await;
        scheduler.start(Arc::new(ReminderWorker::new(notifier.clone()))).await.unwrap();

        scheduler.schedule_periodic(work("r9", "Feed")).await.unwrap();
        tokio::time::sleep(Duration::from_secs(11)).await;

        let shown = notifier.shown();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].title, "Feed");
    }

    #[tokio::test]
    async fn test_cancel_elsewhere_is_not_resurrected() {
        let store = MemoryStore::new();
        let first = LocalScheduler::load(Arc::new(store.clone()), Duration::from_secs(60)).await;
        first.schedule_periodic(work("r1", "Water")).await.unwrap();

        let second = LocalScheduler::load(Arc::new(store.clone()), Duration::from_secs(60)).await;
        second.cancel_by_tag("r1").await.unwrap();

        first.schedule_periodic(work("r2", "Mist")).await.unwrap();

        let fresh = LocalScheduler::load(Arc::new(store), Duration::from_secs(60)).await;
        let names: Vec<_> = fresh.registrations().await.unwrap().into_iter().map(|w| w.name).collect();
        assert_eq!(names, vec!["r2"]);
    }

    #[tokio::test]
    async fn test_register_elsewhere_is_kept() {
        let store = MemoryStore::new();
        let first = LocalScheduler::load(Arc::new(store.clone()), Duration::from_secs(60)).await;
        let second = LocalScheduler::load(Arc::new(store.clone()), Duration::from_secs(60)).await;

        second.schedule_periodic(work("r1", "Water")).await.unwrap();
        assert!(!first.schedule_periodic(work("r1", "Other")).await.unwrap());
        first.cancel_by_tag("missing").await.unwrap();

        assert_eq!(first.registrations().await.unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reconcile_follows_other_processes() {
        let store = MemoryStore::new();
        let notifier = Arc::new(RecordingNotifier::default());
        let running = LocalScheduler::load(Arc::new(store.clone()), Duration::from_secs(10)).await;
        running.schedule_periodic(work("r1", "Water")).await.unwrap();
        running.start(Arc::new(ReminderWorker::new(notifier.clone()))).await.unwrap();
        assert_eq!(running.running(), 1);

        let cli = LocalScheduler::load(Arc::new(store), Duration::from_secs(10)).await;
        cli.cancel_by_tag("r1").await.unwrap();
        cli.schedule_periodic(work("r2", "Feed")).await.unwrap();

        running.reconcile().await.unwrap();
        assert_eq!(running.running(), 1);

        tokio::time::sleep(Duration::from_secs(11)).await;
        let titles: Vec<_> = notifier.shown().into_iter().map(|n| n.title).collect();
        assert_eq!(titles, vec!["Feed"]);
    }

    #[tokio::test]
    async fn test_reconcile_before_start_spawns_nothing() {
        let scheduler = LocalScheduler::load(Arc::new(MemoryStore::new()), Duration::from_secs(60)).await;
        scheduler.schedule_periodic(work("r1", "Water")).await.unwrap();
        scheduler.reconcile().await.unwrap();
        assert_eq!(scheduler.running(), 0);
    }

    #[tokio::test]
    async fn test_unreadable_store_is_an_error() {
        let scheduler = LocalScheduler::load(Arc::new(BrokenStore), Duration::from_secs(60)).await;
        assert!(scheduler.schedule_periodic(work("r1", "Water")).await.is_err());
        assert!(scheduler.cancel_by_tag("r1").await.is_err());
    }

    #[tokio::test]
    async fn test_out_of_range_period_is_not_started() {
        let notifier = Arc::new(RecordingNotifier::default());
        let scheduler = LocalScheduler::load(Arc::new(MemoryStore::new()), Duration::MAX).await;
        scheduler.start(Arc::new(ReminderWorker::new(notifier))).await.unwrap();

        assert!(scheduler.schedule_periodic(work("r1", "Water")).await.unwrap());
        assert_eq!(scheduler.running(), 0);
        assert_eq!(scheduler.registrations().await.unwrap().len(), 1);
    }
}
