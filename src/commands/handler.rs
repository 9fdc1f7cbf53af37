//! Command handler trait
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Handlers take parsed CLI commands and return the reply text
//! - 1.0.0: Initial implementation for modular command handling

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::app::AppContext;
use crate::cli::Command;

/// Trait for command handlers
///
/// Each handler processes one or more top-level commands and returns the
/// text to show the user. Handlers are registered with a
/// [`CommandRegistry`](super::registry::CommandRegistry) and dispatched by
/// command name.
///
/// # Example
///
/// ```ignore
/// pub struct ThemeHandler;
///
/// #[async_trait]
/// impl CommandHandler for ThemeHandler {
///     fn command_names(&self) -> &'static [&'static str] {
///         &["theme"]
///     }
///
///     async fn handle(&self, ctx: Arc<AppContext>, command: &Command) -> Result<String> {
///         Ok(ctx.settings.current_theme().to_string())
///     }
/// }
/// ```
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Command name(s) this handler processes
    fn command_names(&self) -> &'static [&'static str];

    /// Handle the command
    ///
    /// Input the user got wrong is reported in the returned text. `Err` is
    /// reserved for failures the user cannot fix.
    async fn handle(&self, ctx: Arc<AppContext>, command: &Command) -> Result<String>;
}
