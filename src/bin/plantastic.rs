use anyhow::Result;
use clap::Parser;
use dotenvy::dotenv;
use log::{debug, info};
use std::sync::Arc;

use plantastic::app::AppContext;
use plantastic::cli::Cli;
use plantastic::commands::{default_registry, dispatch};
use plantastic::core::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    debug!("Using database at {}", config.database_path);
    let ctx = Arc::new(AppContext::open(&config).await?);

    if !ctx.settings.onboarding_shown() {
        info!("🌱 Welcome to Plantastic! Add a plant with `plantastic plants add <name>`");
        ctx.settings.mark_onboarding_shown().await?;
    }

    let registry = default_registry();
    let reply = dispatch(&registry, ctx, &cli.command).await?;
    if !reply.is_empty() {
        println!("{}", reply.trim_end());
    }

    Ok(())
}
