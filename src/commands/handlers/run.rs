//! Scheduler loop
//!
//! Handles: run

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;
use tokio::time::MissedTickBehavior;

use crate::app::AppContext;
use crate::cli::Command;
use crate::commands::handler::CommandHandler;
use crate::features::reminders::scheduler::RECONCILE_INTERVAL;

pub struct RunHandler;

#[async_trait]
impl CommandHandler for RunHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["run"]
    }

    async fn handle(&self, ctx: Arc<AppContext>, command: &Command) -> Result<String> {
        if *command != Command::Run {
            return Err(anyhow!("unexpected command {}", command.name()));
        }

        ctx.start_scheduler().await?;
        info!(
            "🌿 Watching {} reminder(s), press Ctrl-C to stop",
            ctx.scheduler.running()
        );

        // Pick up reminders added or cancelled by other invocations
        let mut reconcile = tokio::time::interval(RECONCILE_INTERVAL);
        reconcile.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                signal = &mut shutdown => {
                    signal?;
                    break;
                }
                _ = reconcile.tick() => {
                    if let Err(e) = ctx.scheduler.reconcile().await {
                        warn!("Failed to refresh periodic work: {e}");
                    }
                }
            }
        }

        ctx.scheduler.shutdown();
        let uptime = ctx.start_time.elapsed().as_secs();
        info!("Scheduler stopped after {uptime}s");
        Ok(format!("👋 Stopped after {uptime}s"))
    }
}
