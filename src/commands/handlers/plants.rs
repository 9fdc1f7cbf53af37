//! Plant command handlers
//!
//! Handles: plants

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::info;
use std::fmt::Write as _;
use std::sync::Arc;

use crate::app::AppContext;
use crate::cli::{AddPlantArgs, Command, PlantsCommand};
use crate::commands::handler::CommandHandler;
use crate::core::validation::{require_text, ValidationError};
use crate::features::plants::{Plant, PlantMood};

pub struct PlantsHandler;

#[async_trait]
impl CommandHandler for PlantsHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["plants"]
    }

    async fn handle(&self, ctx: Arc<AppContext>, command: &Command) -> Result<String> {
        let Command::Plants(action) = command else {
            return Err(anyhow!("unexpected command {}", command.name()));
        };

        match action {
            PlantsCommand::List => Ok(Self::list(&ctx)),
            PlantsCommand::Add(args) => Self::add(&ctx, args).await,
            PlantsCommand::Remove { id } => {
                if ctx.plants.delete(id).await? {
                    Ok(format!("🗑️ Removed plant {id}"))
                } else {
                    Ok(format!("❌ No plant with id {id}"))
                }
            }
            PlantsCommand::Water { id } => {
                if ctx.plants.update_last_watered(id).await? {
                    Ok(format!("💧 Watered {id}"))
                } else {
                    Ok(format!("❌ No plant with id {id}"))
                }
            }
            PlantsCommand::Mood { id, mood } => {
                let Ok(mood) = mood.parse::<PlantMood>() else {
                    return Ok(format!("❌ Unknown mood '{mood}'"));
                };
                if ctx.plants.update_mood(id, mood).await? {
                    Ok(format!("🌱 {id} is now {mood}"))
                } else {
                    Ok(format!("❌ No plant with id {id}"))
                }
            }
            PlantsCommand::Tip { id } => match ctx.plants.get(id) {
                Some(plant) => Ok(format!("💡 {}", plant.random_care_tip())),
                None => Ok(format!("❌ No plant with id {id}")),
            },
        }
    }
}

impl PlantsHandler {
    fn list(ctx: &AppContext) -> String {
        let plants = ctx.plants.list();
        if plants.is_empty() {
            return "No plants yet".to_string();
        }

        let now = chrono::Utc::now();
        let mut out = String::new();
        for plant in plants {
            let thirsty = if plant.needs_water(now) { " 💧" } else { "" };
            let _ = writeln!(
                out,
                "{}  {} [{}] next watering {}{}",
                plant.id,
                plant.name,
                plant.mood,
                plant.next_watering_at().format("%Y-%m-%d"),
                thirsty
            );
        }
        out
    }

    async fn add(ctx: &AppContext, args: &AddPlantArgs) -> Result<String> {
        if let Err(e) = require_text(&args.name, ValidationError::BlankPlantName) {
            return Ok(format!("❌ {e}"));
        }
        if args.watering_interval == 0 {
            return Ok(format!("❌ {}", ValidationError::NonPositiveFrequency(0)));
        }

        let plant = Plant::new(args.name.clone())
            .with_image(args.image.clone())
            .with_watering_interval(args.watering_interval)
            .with_care_tips(args.tips.clone());
        let id = plant.id.clone();
        ctx.plants.add(plant).await?;

        info!("Added plant {id}");
        Ok(format!("✅ Added {} ({id})", args.name))
    }
}
