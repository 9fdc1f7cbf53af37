//! Notification repository
//!
//! Persists reminder definitions and keeps the scheduler in step with them.

use crate::database::{keys, KeyValueStore};
use crate::features::reminders::model::Notification;
use crate::features::reminders::scheduler::{BackgroundScheduler, PeriodicWork, WorkInput};
use crate::features::reminders::worker::{
    KEY_NOTIFICATION_DESCRIPTION, KEY_NOTIFICATION_ID, KEY_NOTIFICATION_TITLE,
};
use anyhow::Result;
use log::{error, info, warn};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

pub struct NotificationRepository {
    store: Arc<dyn KeyValueStore>,
    scheduler: Arc<dyn BackgroundScheduler>,
    notifications: Mutex<Vec<Notification>>,
    updates: watch::Sender<Vec<Notification>>,
}

impl NotificationRepository {
    pub async fn load(store: Arc<dyn KeyValueStore>, scheduler: Arc<dyn BackgroundScheduler>) -> Self {
        let notifications = Self::read_persisted(store.as_ref()).await;
        let (updates, _) = watch::channel(notifications.clone());

        NotificationRepository {
            store,
            scheduler,
            notifications: Mutex::new(notifications),
            updates,
        }
    }

    async fn read_persisted(store: &dyn KeyValueStore) -> Vec<Notification> {
        let raw = match store.get(keys::NOTIFICATIONS).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read reminders: {e}");
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Discarding corrupt reminder list: {e}");
            Vec::new()
        })
    }

    pub fn list(&self) -> Vec<Notification> {
        self.updates.borrow().clone()
    }

    pub fn get(&self, id: &str) -> Option<Notification> {
        self.updates.borrow().iter().find(|n| n.id == id).cloned()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Notification>> {
        self.updates.subscribe()
    }

    /// Append a reminder to the persisted list
    pub async fn save(&self, notification: Notification) -> Result<()> {
        let mut notifications = self.notifications.lock().await;
        let mut next = notifications.clone();
        next.push(notification);
        self.commit(&mut notifications, next).await
    }

    /// Register the reminder's recurring work. Returns `false` if it was already scheduled.
    pub async fn schedule(&self, notification: &Notification) -> Result<bool> {
        let scheduled = self.scheduler.schedule_periodic(work_for(notification)).await?;
        if scheduled {
            info!(
                "Scheduled reminder {} every {} day(s)",
                notification.id, notification.frequency
            );
        }
        Ok(scheduled)
    }

    /// Save then schedule, as the add-reminder form does. If scheduling
    /// fails the saved record is removed again, so no reminder is left
    /// listed without work behind it.
    pub async fn create(&self, notification: Notification) -> Result<()> {
        self.save(notification.clone()).await?;

        if let Err(e) = self.schedule(&notification).await {
            if let Err(rollback) = self.remove_record(&notification.id).await {
                error!(
                    "Reminder {} saved without a schedule, rollback failed: {rollback}",
                    notification.id
                );
            }
            return Err(e);
        }
        Ok(())
    }

    /// Cancel the scheduled work, then drop the record.
    ///
    /// If cancelling fails the record is kept so the caller can retry. If the
    /// record removal fails after a successful cancel, the error is returned
    /// and the stale record stays until cancelled again.
    pub async fn cancel(&self, notification: &Notification) -> Result<()> {
        self.scheduler.cancel_by_tag(&notification.id).await?;
        if self.remove_record(&notification.id).await? {
            info!("Cancelled reminder {}", notification.id);
        }
        Ok(())
    }

    async fn remove_record(&self, id: &str) -> Result<bool> {
        let mut notifications = self.notifications.lock().await;
        if !notifications.iter().any(|n| n.id == id) {
            return Ok(false);
        }

        let next: Vec<Notification> = notifications.iter().filter(|n| n.id != id).cloned().collect();
        self.commit(&mut notifications, next).await?;
        Ok(true)
    }

    /// Forget every persisted reminder. Scheduled work is left alone.
    pub async fn clear_all(&self) -> Result<()> {
        let mut notifications = self.notifications.lock().await;
        self.store.remove(keys::NOTIFICATIONS).await?;
        notifications.clear();
        self.updates.send_replace(Vec::new());
        Ok(())
    }

    async fn commit(&self, current: &mut Vec<Notification>, next: Vec<Notification>) -> Result<()> {
        let raw = serde_json::to_string(&next)?;
        self.store.put(keys::NOTIFICATIONS, &raw).await?;
        *current = next;
        self.updates.send_replace(current.clone());
        Ok(())
    }
}

/// Periodic work for a reminder, named and tagged by its id
pub fn work_for(notification: &Notification) -> PeriodicWork {
    PeriodicWork {
        name: notification.id.clone(),
        tag: notification.id.clone(),
        period_days: notification.frequency,
        input: WorkInput::new()
            .with(KEY_NOTIFICATION_TITLE, notification.title.clone())
            .with(KEY_NOTIFICATION_DESCRIPTION, notification.description.clone())
            .with(KEY_NOTIFICATION_ID, notification.id.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::testing::BrokenStore;
    use crate::database::MemoryStore;
    use crate::features::reminders::scheduler::testing::RecordingScheduler;

    fn reminder(id: &str, frequency: i64) -> Notification {
        Notification::new(format!("Title {id}"), format!("Desc {id}"), frequency)
            .unwrap()
            .with_id(id)
    }

    async fn repository() -> (MemoryStore, Arc<RecordingScheduler>, NotificationRepository) {
        let store = MemoryStore::new();
        let scheduler = Arc::new(RecordingScheduler::default());
        let repo = NotificationRepository::load(Arc::new(store.clone()), scheduler.clone()).await;
        (store, scheduler, repo)
    }

    #[tokio::test]
    async fn test_save_appends_and_persists() {
        let (store, _, repo) = repository().await;
        repo.save(reminder("1", 1)).await.unwrap();
        repo.save(reminder("2", 2)).await.unwrap();

        let raw = store.get(keys::NOTIFICATIONS).await.unwrap().unwrap();
        assert_eq!(raw, serde_json::to_string(&vec![reminder("1", 1), reminder("2", 2)]).unwrap());
        assert_eq!(repo.list().len(), 2);
    }

    #[tokio::test]
    async fn test_list_empty_without_record() {
        let (_, _, repo) = repository().await;
        assert!(repo.list().is_empty());
    }

    #[tokio::test]
    async fn test_load_reads_existing_record() {
        let store = MemoryStore::new();
        let json = serde_json::to_string(&vec![reminder("1", 1), reminder("2", 2)]).unwrap();
        store.put(keys::NOTIFICATIONS, &json).await.unwrap();

        let repo =
            NotificationRepository::load(Arc::new(store), Arc::new(RecordingScheduler::default())).await;
        assert_eq!(repo.list(), vec![reminder("1", 1), reminder("2", 2)]);
    }

    #[tokio::test]
    async fn test_schedule_registers_work() {
        let (_, scheduler, repo) = repository().await;
        let n = reminder("test_id_123", 5);

        assert!(repo.schedule(&n).await.unwrap());
        assert!(!repo.schedule(&n).await.unwrap());

        let work = scheduler.work("test_id_123").unwrap();
        assert_eq!(work.tag, "test_id_123");
        assert_eq!(work.period_days, 5);
        assert_eq!(work.input.get(KEY_NOTIFICATION_TITLE), Some("Title test_id_123"));
        assert_eq!(work.input.get(KEY_NOTIFICATION_DESCRIPTION), Some("Desc test_id_123"));
        assert_eq!(work.input.get(KEY_NOTIFICATION_ID), Some("test_id_123"));
    }

    #[tokio::test]
    async fn test_cancel_removes_work_and_record() {
        let (store, scheduler, repo) = repository().await;
        let keep = reminder("keep", 1);
        let gone = reminder("cancel_id_456", 3);
        repo.create(keep.clone()).await.unwrap();
        repo.create(gone.clone()).await.unwrap();

        repo.cancel(&gone).await.unwrap();

        assert!(repo.list().iter().all(|n| n.id != "cancel_id_456"));
        assert!(scheduler.work("cancel_id_456").is_none());
        assert!(scheduler.work("keep").is_some());
        assert_eq!(*scheduler.cancelled_tags.lock().unwrap(), vec!["cancel_id_456"]);

        let raw = store.get(keys::NOTIFICATIONS).await.unwrap().unwrap();
        assert_eq!(raw, serde_json::to_string(&vec![keep]).unwrap());
    }

    #[tokio::test]
    async fn test_cancel_keeps_record_when_scheduler_fails() {
        let store = MemoryStore::new();
        let scheduler = Arc::new(RecordingScheduler {
            fail_cancel: true,
            ..Default::default()
        });
        let repo = NotificationRepository::load(Arc::new(store), scheduler).await;
        let n = reminder("r1", 3);
        repo.create(n.clone()).await.unwrap();

        assert!(repo.cancel(&n).await.is_err());
        assert_eq!(repo.list(), vec![n]);
    }

    #[tokio::test]
    async fn test_cancel_unknown_still_cancels_work() {
        let (_, scheduler, repo) = repository().await;
        repo.cancel(&reminder("orphan", 1)).await.unwrap();
        assert_eq!(*scheduler.cancelled_tags.lock().unwrap(), vec!["orphan"]);
    }

    #[tokio::test]
    async fn test_clear_all_leaves_schedules() {
        let (store, scheduler, repo) = repository().await;
        repo.create(reminder("r1", 1)).await.unwrap();

        repo.clear_all().await.unwrap();

        assert!(repo.list().is_empty());
        assert_eq!(store.get(keys::NOTIFICATIONS).await.unwrap(), None);
        assert!(scheduler.work("r1").is_some());
    }

    #[tokio::test]
    async fn test_unreadable_store() {
        let repo =
            NotificationRepository::load(Arc::new(BrokenStore), Arc::new(RecordingScheduler::default()))
                .await;
        assert!(repo.list().is_empty());
        assert!(repo.save(reminder("r1", 1)).await.is_err());
        assert!(repo.list().is_empty());
    }

    #[tokio::test]
    async fn test_subscribe_sees_changes() {
        let (_, _, repo) = repository().await;
        let mut rx = repo.subscribe();

        repo.save(reminder("r1", 1)).await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().len(), 1);

        repo.cancel(&reminder("r1", 1)).await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_create_rolls_back_when_scheduling_fails() {
        let store = MemoryStore::new();
        let existing = reminder("r0", 1);
        let json = serde_json::to_string(&vec![existing.clone()]).unwrap();
        store.put(keys::NOTIFICATIONS, &json).await.unwrap();

        let scheduler = Arc::new(RecordingScheduler {
            fail_schedule: true,
            ..Default::default()
        });
        let repo = NotificationRepository::load(Arc::new(store.clone()), scheduler.clone()).await;

        let err = repo.create(reminder("r1", 3)).await.unwrap_err();
        assert_eq!(err.to_string(), "scheduler unavailable");

        assert_eq!(repo.list(), vec![existing]);
        assert!(scheduler.work("r1").is_none());
        let raw = store.get(keys::NOTIFICATIONS).await.unwrap().unwrap();
        assert_eq!(raw, json);
    }
}
