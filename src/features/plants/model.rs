//! Plant model and mood

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

pub const DEFAULT_WATERING_INTERVAL_DAYS: u32 = 7;

/// Cosmetic mood of a plant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlantMood {
    #[default]
    Happy,
    Thirsty,
    Sleepy,
    Excited,
    Content,
}

impl PlantMood {
    pub const ALL: [PlantMood; 5] = [
        PlantMood::Happy,
        PlantMood::Thirsty,
        PlantMood::Sleepy,
        PlantMood::Excited,
        PlantMood::Content,
    ];

    /// What the plant says when it has no care tips of its own
    pub fn fallback_tip(&self) -> &'static str {
        match self {
            PlantMood::Thirsty => "I'm thirsty! Please water me 🌱",
            PlantMood::Sleepy => "I'm a little tired... let's rest together 😴",
            PlantMood::Excited => "I'm so happy to see you! How was your day? 🌿",
            PlantMood::Content => "Everything is great! Thanks for looking after me 💚",
            PlantMood::Happy => "I'm happy to be growing with you! 🌺",
        }
    }
}

impl std::fmt::Display for PlantMood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlantMood::Happy => write!(f, "HAPPY"),
            PlantMood::Thirsty => write!(f, "THIRSTY"),
            PlantMood::Sleepy => write!(f, "SLEEPY"),
            PlantMood::Excited => write!(f, "EXCITED"),
            PlantMood::Content => write!(f, "CONTENT"),
        }
    }
}

impl std::str::FromStr for PlantMood {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "HAPPY" => Ok(PlantMood::Happy),
            "THIRSTY" => Ok(PlantMood::Thirsty),
            "SLEEPY" => Ok(PlantMood::Sleepy),
            "EXCITED" => Ok(PlantMood::Excited),
            "CONTENT" => Ok(PlantMood::Content),
            _ => Err(anyhow::anyhow!("Invalid plant mood: {}", s)),
        }
    }
}

/// A plant the user owns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub id: String,

    pub name: String,

    /// URI or bundled resource name; empty when the user picked no image
    #[serde(default)]
    pub image_uri: String,

    #[serde(with = "chrono::serde::ts_milliseconds", default = "now_millis")]
    pub last_watered: DateTime<Utc>,

    #[serde(default = "default_watering_interval")]
    pub watering_interval: u32,

    #[serde(default)]
    pub mood: PlantMood,

    #[serde(default)]
    pub care_tips: Vec<String>,

    /// Catalog entry this plant was adopted from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_id: Option<String>,
}

fn default_watering_interval() -> u32 {
    DEFAULT_WATERING_INTERVAL_DAYS
}

/// Current time truncated to the millisecond precision that is persisted
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

impl Plant {
    /// A freshly watered, happy plant with a new identifier
    pub fn new(name: impl Into<String>) -> Self {
        Plant {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            image_uri: String::new(),
            last_watered: now_millis(),
            watering_interval: DEFAULT_WATERING_INTERVAL_DAYS,
            mood: PlantMood::Happy,
            care_tips: Vec::new(),
            catalog_id: None,
        }
    }

    pub fn with_image(mut self, image_uri: impl Into<String>) -> Self {
        self.image_uri = image_uri.into();
        self
    }

    pub fn with_watering_interval(mut self, days: u32) -> Self {
        self.watering_interval = days;
        self
    }

    pub fn with_care_tips(mut self, tips: Vec<String>) -> Self {
        self.care_tips = tips;
        self
    }

    pub fn random_care_tip(&self) -> String {
        let mut rng = rand::rng();
        self.care_tips
            .choose(&mut rng)
            .cloned()
            .unwrap_or_else(|| self.mood.fallback_tip().to_string())
    }

    pub fn next_watering_at(&self) -> DateTime<Utc> {
        self.last_watered + Duration::days(i64::from(self.watering_interval))
    }

    pub fn needs_water(&self, now: DateTime<Utc>) -> bool {
        now >= self.next_watering_at()
    }
}
