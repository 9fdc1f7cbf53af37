//! Plant repository
//!
//! Owns the user's plant collection. The whole collection lives in memory and
//! is written back as one JSON array after every change. Writers are queued
//! behind a single async mutex so concurrent mutations cannot lose updates.

use crate::database::{keys, KeyValueStore};
use crate::features::plants::model::{now_millis, Plant, PlantMood};
use anyhow::Result;
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

pub struct PlantRepository {
    store: Arc<dyn KeyValueStore>,
    plants: Mutex<Vec<Plant>>,
    updates: watch::Sender<Vec<Plant>>,
}

impl PlantRepository {
    /// Load the persisted collection. Missing or unreadable data gives an empty collection.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let plants = Self::read_persisted(store.as_ref()).await;
        info!("Loaded {} plants", plants.len());

        let (updates, _) = watch::channel(plants.clone());
        PlantRepository {
            store,
            plants: Mutex::new(plants),
            updates,
        }
    }

    async fn read_persisted(store: &dyn KeyValueStore) -> Vec<Plant> {
        let raw = match store.get(keys::PLANTS).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read plant list: {e}");
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Discarding corrupt plant list: {e}");
            Vec::new()
        })
    }

    /// Current plants in insertion order
    pub fn list(&self) -> Vec<Plant> {
        self.updates.borrow().clone()
    }

    pub fn get(&self, plant_id: &str) -> Option<Plant> {
        self.updates
            .borrow()
            .iter()
            .find(|p| p.id == plant_id)
            .cloned()
    }

    /// Receiver that always holds the latest collection
    pub fn subscribe(&self) -> watch::Receiver<Vec<Plant>> {
        self.updates.subscribe()
    }

    /// Append a plant. Duplicate identifiers are not rejected.
    pub async fn add(&self, plant: Plant) -> Result<()> {
        let mut plants = self.plants.lock().await;
        let mut next = plants.clone();
        debug!("Adding plant {} ({})", plant.id, plant.name);
        next.push(plant);
        self.commit(&mut plants, next).await
    }

    /// Replace the first plant with a matching identifier. Returns `false` if none matched.
    pub async fn update(&self, plant: Plant) -> Result<bool> {
        let mut plants = self.plants.lock().await;
        let Some(index) = plants.iter().position(|p| p.id == plant.id) else {
            debug!("Ignoring update for unknown plant {}", plant.id);
            return Ok(false);
        };

        let mut next = plants.clone();
        next[index] = plant;
        self.commit(&mut plants, next).await?;
        Ok(true)
    }

    /// Remove every plant with the identifier. Returns `false` if none matched.
    pub async fn delete(&self, plant_id: &str) -> Result<bool> {
        let mut plants = self.plants.lock().await;
        let next: Vec<Plant> = plants.iter().filter(|p| p.id != plant_id).cloned().collect();
        if next.len() == plants.len() {
            return Ok(false);
        }

        self.commit(&mut plants, next).await?;
        info!("Deleted plant {plant_id}");
        Ok(true)
    }

    pub async fn update_mood(&self, plant_id: &str, mood: PlantMood) -> Result<bool> {
        self.modify(plant_id, |plant| plant.mood = mood).await
    }

    pub async fn update_last_watered(&self, plant_id: &str) -> Result<bool> {
        let watered_at = now_millis();
        self.modify(plant_id, |plant| plant.last_watered = watered_at).await
    }

    /// Read-modify-write of a single plant under the writer lock
    async fn modify(&self, plant_id: &str, f: impl FnOnce(&mut Plant)) -> Result<bool> {
        let mut plants = self.plants.lock().await;
        let Some(index) = plants.iter().position(|p| p.id == plant_id) else {
            debug!("Ignoring change for unknown plant {plant_id}");
            return Ok(false);
        };

        let mut next = plants.clone();
        f(&mut next[index]);
        self.commit(&mut plants, next).await?;
        Ok(true)
    }

    /// Persist `next`, then make it the in-memory state and notify subscribers.
    /// On a failed write the in-memory state is left untouched.
    async fn commit(&self, current: &mut Vec<Plant>, next: Vec<Plant>) -> Result<()> {
        let raw = serde_json::to_string(&next)?;
        self.store.put(keys::PLANTS, &raw).await?;

        *current = next;
        self.updates.send_replace(current.clone());
        Ok(())
    }
}
