//! Garden: catalog adoption on top of the plant repository
//!
//! Owned `Plant` records are the source of truth for what the user has.
//! Adopting a catalog entry records membership and creates a linked plant;
//! releasing it removes both.

use crate::features::catalog::{PlantCatalog, PlantData};
use crate::features::garden::membership::MembershipStore;
use crate::features::plants::{Plant, PlantRepository};
use anyhow::Result;
use log::{info, warn};
use std::sync::Arc;

pub struct Garden {
    catalog: Arc<PlantCatalog>,
    membership: Arc<MembershipStore>,
    plants: Arc<PlantRepository>,
}

impl Garden {
    pub fn new(
        catalog: Arc<PlantCatalog>,
        membership: Arc<MembershipStore>,
        plants: Arc<PlantRepository>,
    ) -> Self {
        Garden {
            catalog,
            membership,
            plants,
        }
    }

    /// Add a catalog species to the garden. Returns `None` for unknown ids.
    /// Adopting twice returns the plant created the first time.
    pub async fn adopt(&self, catalog_id: &str) -> Result<Option<Plant>> {
        let Some(entry) = self.catalog.get(catalog_id) else {
            warn!("Cannot adopt unknown catalog plant {catalog_id}");
            return Ok(None);
        };

        self.membership.add(catalog_id).await?;

        if let Some(existing) = self.plant_for(catalog_id) {
            return Ok(Some(existing));
        }

        let plant = plant_from_catalog(entry);
        self.plants.add(plant.clone()).await?;
        info!("Adopted {} as plant {}", entry.name, plant.id);
        Ok(Some(plant))
    }

    /// Remove a species and every plant adopted from it
    pub async fn release(&self, catalog_id: &str) -> Result<bool> {
        let was_member = self.membership.remove(catalog_id).await?;

        let linked: Vec<String> = self
            .plants
            .list()
            .into_iter()
            .filter(|p| p.catalog_id.as_deref() == Some(catalog_id))
            .map(|p| p.id)
            .collect();

        let mut removed_plant = false;
        for plant_id in linked {
            removed_plant |= self.plants.delete(&plant_id).await?;
        }

        Ok(was_member || removed_plant)
    }

    /// Catalog entries the user has added, in catalog order
    pub fn user_plants(&self) -> Vec<PlantData> {
        self.catalog.join_members(&self.membership.current())
    }

    pub fn plant_for(&self, catalog_id: &str) -> Option<Plant> {
        self.plants
            .list()
            .into_iter()
            .find(|p| p.catalog_id.as_deref() == Some(catalog_id))
    }
}

fn plant_from_catalog(entry: &PlantData) -> Plant {
    let mut plant = Plant::new(entry.name.clone())
        .with_image(entry.image_name.clone())
        .with_care_tips(vec![
            format!("Light: {}", entry.light_needs),
            format!("Water: {}", entry.watering_needs),
        ]);
    plant.catalog_id = Some(entry.id.clone());
    plant
}
