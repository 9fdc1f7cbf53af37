//! Plant catalog loader
//!
//! Reads the read-only list of known species once. A broken document is
//! logged and treated as an empty catalog.

use log::{error, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Catalog document compiled into the binary
const BUNDLED_CATALOG: &str = include_str!("../../../assets/plants.json");

/// A known plant species
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantData {
    pub id: String,
    pub name: String,
    pub image_name: String,
    pub light_needs: String,
    pub watering_needs: String,
}

#[derive(Debug, Clone, Default)]
pub struct PlantCatalog {
    entries: Vec<PlantData>,
}

impl PlantCatalog {
    pub fn new(entries: Vec<PlantData>) -> Self {
        PlantCatalog { entries }
    }

    pub fn bundled() -> Self {
        Self::from_json(BUNDLED_CATALOG)
    }

    /// Load an external catalog file
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents),
            Err(e) => {
                error!("Failed to read plant catalog {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn from_json(contents: &str) -> Self {
        match serde_json::from_str::<Vec<PlantData>>(contents) {
            Ok(entries) => {
                info!("Loaded {} catalog plants", entries.len());
                PlantCatalog { entries }
            }
            Err(e) => {
                error!("Failed to parse plant catalog: {e}");
                Self::default()
            }
        }
    }

    pub fn all(&self) -> &[PlantData] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&PlantData> {
        self.entries.iter().find(|p| p.id == id)
    }

    /// Case-insensitive name search. A blank query matches everything.
    pub fn search(&self, query: &str) -> Vec<&PlantData> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.entries.iter().collect();
        }

        self.entries
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&query))
            .collect()
    }

    /// Catalog entries whose ids are in `member_ids`, in catalog order
    pub fn join_members(&self, member_ids: &[String]) -> Vec<PlantData> {
        let members: HashSet<&str> = member_ids.iter().map(String::as_str).collect();
        self.entries
            .iter()
            .filter(|p| members.contains(p.id.as_str()))
            .cloned()
            .collect()
    }
}
