//! # Command System
//!
//! Command-line command handling.
//!
//! - **Version**: 3.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 3.0.0: Dispatch parsed CLI commands through the handler registry
//! - 2.1.0: Add modular handler infrastructure (handler trait, registry)

pub mod handler;
pub mod handlers;
pub mod registry;

use anyhow::{anyhow, Result};
use log::debug;
use std::sync::Arc;

use crate::app::AppContext;
use crate::cli::Command;

pub use handler::CommandHandler;
pub use registry::CommandRegistry;

/// Registry with every built-in handler
pub fn default_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    for handler in handlers::create_all_handlers() {
        registry.register(handler);
    }
    registry
}

/// Route a command to its handler and return the reply
pub async fn dispatch(
    registry: &CommandRegistry,
    ctx: Arc<AppContext>,
    command: &Command,
) -> Result<String> {
    let name = command.name();
    let handler = registry
        .get(name)
        .ok_or_else(|| anyhow!("No handler registered for command '{}'", name))?;

    debug!("Dispatching {name}");
    handler.handle(ctx, command).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{RemindersCommand, ThemeCommand};
    use crate::commands::handlers::testing::context;

    #[test]
    fn test_every_command_has_a_handler() {
        let registry = default_registry();
        for name in ["plants", "catalog", "garden", "reminders", "profile", "theme", "run"] {
            assert!(registry.contains(name), "{name} is not registered");
        }
    }

    #[tokio::test]
    async fn test_dispatch_routes_by_name() {
        let registry = default_registry();
        let ctx = context().await;

        let reply = dispatch(&registry, ctx.clone(), &Command::Theme(ThemeCommand::Show))
            .await
            .unwrap();
        assert_eq!(reply, "🎨 LIGHT");

        let reply = dispatch(&registry, ctx, &Command::Reminders(RemindersCommand::List))
            .await
            .unwrap();
        assert_eq!(reply, "📭 You have no reminders");
    }

    #[tokio::test]
    async fn test_dispatch_without_handler_fails() {
        let result = dispatch(&CommandRegistry::new(), context().await, &Command::Run).await;
        assert!(result.is_err());
    }
}
