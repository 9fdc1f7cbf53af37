//! Reminder command handlers
//!
//! Handles: reminders
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Periodic reminders with day frequencies
//! - 1.0.0: Extracted from the command dispatcher

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{debug, info};
use std::fmt::Write as _;
use std::sync::Arc;

use crate::app::AppContext;
use crate::cli::{AddReminderArgs, Command, RemindersCommand};
use crate::commands::handler::CommandHandler;
use crate::features::reminders::ReminderDraft;

/// Handler for reminder-related commands
pub struct RemindersHandler;

#[async_trait]
impl CommandHandler for RemindersHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["reminders"]
    }

    async fn handle(&self, ctx: Arc<AppContext>, command: &Command) -> Result<String> {
        let Command::Reminders(action) = command else {
            return Err(anyhow!("unexpected command {}", command.name()));
        };

        match action {
            RemindersCommand::List => Ok(Self::list(&ctx)),
            RemindersCommand::Add(args) => Self::add(&ctx, args).await,
            RemindersCommand::Cancel { id } => {
                let Some(notification) = ctx.reminders.get(id) else {
                    return Ok(format!("❌ No reminder with id {id}"));
                };
                ctx.reminders.cancel(&notification).await?;
                Ok(format!("🗑️ Cancelled '{}'", notification.title))
            }
            RemindersCommand::Clear => {
                let count = ctx.reminders.list().len();
                ctx.reminders.clear_all().await?;
                Ok(format!("🧹 Forgot {count} reminder(s)"))
            }
        }
    }
}

impl RemindersHandler {
    fn list(ctx: &AppContext) -> String {
        let reminders = ctx.reminders.list();
        if reminders.is_empty() {
            return "📭 You have no reminders".to_string();
        }

        let mut out = String::new();
        for n in reminders {
            let days = if n.frequency == 1 { "day".to_string() } else { format!("{} days", n.frequency) };
            let _ = writeln!(out, "⏰ {} every {days}: {} ({})", n.title, n.description, n.id);
        }
        out
    }

    async fn add(ctx: &AppContext, args: &AddReminderArgs) -> Result<String> {
        let draft = ReminderDraft::new(
            args.title.clone(),
            args.description.clone(),
            args.frequency.clone(),
        );
        let notification = match draft.validate() {
            Ok(n) => n,
            Err(e) => {
                debug!("Rejected reminder form: {e}");
                return Ok(format!("❌ {e}"));
            }
        };

        ctx.reminders.create(notification.clone()).await?;
        info!("Created reminder {} every {} day(s)", notification.id, notification.frequency);
        Ok(format!("✅ Reminder '{}' saved ({})", notification.title, notification.id))
    }
}
