//! Profile and theme command handlers
//!
//! Handles: profile, theme

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::Arc;

use crate::app::AppContext;
use crate::cli::{Command, ProfileArgs, ProfileCommand, ThemeCommand};
use crate::commands::handler::CommandHandler;
use crate::features::settings::ThemeSetting;

pub struct SettingsHandler;

#[async_trait]
impl CommandHandler for SettingsHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["profile", "theme"]
    }

    async fn handle(&self, ctx: Arc<AppContext>, command: &Command) -> Result<String> {
        match command {
            Command::Profile(ProfileCommand::Show) => {
                let profile = ctx.settings.profile();
                Ok(format!(
                    "👤 {}\n✉️ {}\n🖼️ {}",
                    or_unset(&profile.name),
                    or_unset(&profile.email),
                    or_unset(&profile.avatar_uri)
                ))
            }
            Command::Profile(ProfileCommand::Set(args)) => Self::set_profile(&ctx, args).await,
            Command::Theme(ThemeCommand::Show) => Ok(format!("🎨 {}", ctx.settings.current_theme())),
            Command::Theme(ThemeCommand::Set { theme }) => {
                let Ok(parsed) = theme.to_uppercase().parse::<ThemeSetting>() else {
                    return Ok(format!("❌ Unknown theme '{theme}', use LIGHT, DARK or DYNAMIC"));
                };
                ctx.settings.set_theme(parsed).await?;
                Ok(format!("🎨 Theme set to {parsed}"))
            }
            _ => Err(anyhow!("unexpected command {}", command.name())),
        }
    }
}

impl SettingsHandler {
    async fn set_profile(ctx: &AppContext, args: &ProfileArgs) -> Result<String> {
        let mut profile = ctx.settings.profile();
        if let Some(name) = &args.name {
            profile.name = name.clone();
        }
        if let Some(email) = &args.email {
            profile.email = email.clone();
        }
        if let Some(avatar) = &args.avatar {
            profile.avatar_uri = avatar.clone();
        }

        ctx.settings.save_profile(&profile).await?;
        Ok("✅ Profile saved".to_string())
    }
}

fn or_unset(value: &str) -> &str {
    if value.is_empty() {
        "(not set)"
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::handlers::testing::context;

    #[tokio::test]
    async fn test_theme_set_is_case_insensitive() {
        let ctx = context().await;
        let reply = SettingsHandler
            .handle(ctx.clone(), &Command::Theme(ThemeCommand::Set { theme: "dark".to_string() }))
            .await
            .unwrap();
        assert_eq!(reply, "🎨 Theme set to DARK");
        assert_eq!(ctx.settings.current_theme(), ThemeSetting::Dark);
    }

    #[tokio::test]
    async fn test_unknown_theme_is_reported() {
        let ctx = context().await;
        let reply = SettingsHandler
            .handle(ctx.clone(), &Command::Theme(ThemeCommand::Set { theme: "sepia".to_string() }))
            .await
            .unwrap();
        assert!(reply.starts_with("❌"));
        assert_eq!(ctx.settings.current_theme(), ThemeSetting::Light);
    }

    #[tokio::test]
    async fn test_profile_set_keeps_unspecified_fields() {
        let ctx = context().await;
        ctx.settings.set_user_email("ivy@example.com").await.unwrap();

        SettingsHandler
            .handle(
                ctx.clone(),
                &Command::Profile(ProfileCommand::Set(ProfileArgs {
                    name: Some("Ivy".to_string()),
                    email: None,
                    avatar: None,
                })),
            )
            .await
            .unwrap();

        let reply = SettingsHandler
            .handle(ctx, &Command::Profile(ProfileCommand::Show))
            .await
            .unwrap();
        assert_eq!(reply, "👤 Ivy\n✉️ ivy@example.com\n🖼️ (not set)");
    }
}
