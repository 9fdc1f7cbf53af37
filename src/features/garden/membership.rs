//! User-plant membership store
//!
//! The set of catalog identifiers the user has added to their garden.
//! Stored as a string set; exposed as a sorted list.

use crate::database::{keys, KeyValueStore};
use anyhow::Result;
use log::{debug, warn};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

pub struct MembershipStore {
    store: Arc<dyn KeyValueStore>,
    ids: Mutex<BTreeSet<String>>,
    updates: watch::Sender<Vec<String>>,
}

impl MembershipStore {
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let ids = Self::read_persisted(store.as_ref()).await;
        let (updates, _) = watch::channel(ids.iter().cloned().collect());

        MembershipStore {
            store,
            ids: Mutex::new(ids),
            updates,
        }
    }

    async fn read_persisted(store: &dyn KeyValueStore) -> BTreeSet<String> {
        store
            .get_string_set(keys::USER_PLANT_IDS)
            .await
            .unwrap_or_else(|e| {
                warn!("Failed to read garden membership, using empty set: {e}");
                BTreeSet::new()
            })
    }

    /// Receiver holding the current membership; changes after every write
    pub fn observe(&self) -> watch::Receiver<Vec<String>> {
        self.updates.subscribe()
    }

    pub fn current(&self) -> Vec<String> {
        self.updates.borrow().clone()
    }

    pub fn contains(&self, plant_id: &str) -> bool {
        self.updates.borrow().iter().any(|id| id == plant_id)
    }

    /// Re-read storage and publish what was found (empty on failure)
    pub async fn reload(&self) {
        let mut ids = self.ids.lock().await;
        *ids = Self::read_persisted(self.store.as_ref()).await;
        self.updates.send_replace(ids.iter().cloned().collect());
    }

    /// Returns `false` if the id was already a member
    pub async fn add(&self, plant_id: &str) -> Result<bool> {
        let mut ids = self.ids.lock().await;
        if ids.contains(plant_id) {
            return Ok(false);
        }

        let mut next = ids.clone();
        next.insert(plant_id.to_string());
        self.commit(&mut ids, next).await?;
        debug!("Added {plant_id} to garden");
        Ok(true)
    }

    /// Returns `false` if the id was not a member
    pub async fn remove(&self, plant_id: &str) -> Result<bool> {
        let mut ids = self.ids.lock().await;
        if !ids.contains(plant_id) {
            return Ok(false);
        }

        let mut next = ids.clone();
        next.remove(plant_id);
        self.commit(&mut ids, next).await?;
        debug!("Removed {plant_id} from garden");
        Ok(true)
    }

    async fn commit(&self, current: &mut BTreeSet<String>, next: BTreeSet<String>) -> Result<()> {
        self.store.put_string_set(keys::USER_PLANT_IDS, &next).await?;
        *current = next;
        self.updates.send_replace(current.iter().cloned().collect());
        Ok(())
    }
}
