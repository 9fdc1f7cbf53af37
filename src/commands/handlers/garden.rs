//! Catalog and garden command handlers
//!
//! Handles: catalog, garden

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::fmt::Write as _;
use std::sync::Arc;

use crate::app::AppContext;
use crate::cli::{CatalogCommand, Command, GardenCommand};
use crate::commands::handler::CommandHandler;
use crate::features::catalog::PlantData;

pub struct GardenHandler;

#[async_trait]
impl CommandHandler for GardenHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["catalog", "garden"]
    }

    async fn handle(&self, ctx: Arc<AppContext>, command: &Command) -> Result<String> {
        match command {
            Command::Catalog(CatalogCommand::Search { query }) => {
                let matches = ctx.catalog.search(query);
                if matches.is_empty() {
                    return Ok(format!("No catalog plants match '{query}'"));
                }
                Ok(Self::render(&ctx, matches))
            }
            Command::Garden(GardenCommand::List) => {
                let members = ctx.garden.user_plants();
                if members.is_empty() {
                    return Ok("Your garden is empty".to_string());
                }
                Ok(Self::render(&ctx, members.iter()))
            }
            Command::Garden(GardenCommand::Add { catalog_id }) => {
                match ctx.garden.adopt(catalog_id).await? {
                    Some(plant) => Ok(format!("✅ {} is in your garden ({})", plant.name, plant.id)),
                    None => Ok(format!("❌ No catalog plant with id {catalog_id}")),
                }
            }
            Command::Garden(GardenCommand::Remove { catalog_id }) => {
                if ctx.garden.release(catalog_id).await? {
                    Ok(format!("🗑️ Removed {catalog_id} from your garden"))
                } else {
                    Ok(format!("❌ {catalog_id} is not in your garden"))
                }
            }
            _ => Err(anyhow!("unexpected command {}", command.name())),
        }
    }
}

impl GardenHandler {
    fn render<'a>(ctx: &AppContext, entries: impl IntoIterator<Item = &'a PlantData>) -> String {
        let mut out = String::new();
        for entry in entries {
            let marker = if ctx.membership.contains(&entry.id) { "✓" } else { " " };
            let _ = writeln!(
                out,
                "[{marker}] {:<16} {} (light: {}, water: {})",
                entry.id, entry.name, entry.light_needs, entry.watering_needs
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::handlers::testing::context;

    #[tokio::test]
    async fn test_search_marks_members() {
        let ctx = context().await;
        GardenHandler
            .handle(
                ctx.clone(),
                &Command::Garden(GardenCommand::Add {
                    catalog_id: "monstera".to_string(),
                }),
            )
            .await
            .unwrap();

        let reply = GardenHandler
            .handle(
                ctx,
                &Command::Catalog(CatalogCommand::Search {
                    query: "MONST".to_string(),
                }),
            )
            .await
            .unwrap();
        assert!(reply.starts_with("[✓] monstera"));
        assert_eq!(reply.lines().count(), 1);
    }

    #[tokio::test]
    async fn test_add_unknown_and_remove_missing() {
        let ctx = context().await;
        let reply = GardenHandler
            .handle(
                ctx.clone(),
                &Command::Garden(GardenCommand::Add {
                    catalog_id: "triffid".to_string(),
                }),
            )
            .await
            .unwrap();
        assert_eq!(reply, "❌ No catalog plant with id triffid");

        let reply = GardenHandler
            .handle(
                ctx,
                &Command::Garden(GardenCommand::Remove {
                    catalog_id: "monstera".to_string(),
                }),
            )
            .await
            .unwrap();
        assert_eq!(reply, "❌ monstera is not in your garden");
    }

    #[tokio::test]
    async fn test_garden_list() {
        let ctx = context().await;
        let reply = GardenHandler
            .handle(ctx.clone(), &Command::Garden(GardenCommand::List))
            .await
            .unwrap();
        assert_eq!(reply, "Your garden is empty");

        ctx.garden.adopt("pothos").await.unwrap();
        let reply = GardenHandler
            .handle(ctx, &Command::Garden(GardenCommand::List))
            .await
            .unwrap();
        assert!(reply.contains("pothos"));
    }
}
