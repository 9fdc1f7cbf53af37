//! Settings store
//!
//! Each preference is an independent entry with its own watch channel.
//! There is no cross-field transaction: `save_profile` is three writes.

use crate::database::{keys, KeyValueStore, StoreKey};
use anyhow::Result;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThemeSetting {
    #[default]
    Light,
    Dark,
    /// Follow the platform's dynamic colour scheme
    Dynamic,
}

impl ThemeSetting {
    pub const ALL: [ThemeSetting; 3] = [ThemeSetting::Light, ThemeSetting::Dark, ThemeSetting::Dynamic];

    /// Decode a persisted value. Anything unrecognised reads as LIGHT.
    pub fn from_stored(raw: Option<&str>) -> Self {
        match raw {
            None => ThemeSetting::default(),
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("Unknown theme preference {raw:?}, using {}", ThemeSetting::default());
                ThemeSetting::default()
            }),
        }
    }
}

impl std::fmt::Display for ThemeSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeSetting::Light => write!(f, "LIGHT"),
            ThemeSetting::Dark => write!(f, "DARK"),
            ThemeSetting::Dynamic => write!(f, "DYNAMIC"),
        }
    }
}

impl std::str::FromStr for ThemeSetting {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "LIGHT" => Ok(ThemeSetting::Light),
            "DARK" => Ok(ThemeSetting::Dark),
            "DYNAMIC" => Ok(ThemeSetting::Dynamic),
            _ => Err(anyhow::anyhow!("Invalid theme: {}", s)),
        }
    }
}

/// Snapshot of the profile fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub avatar_uri: String,
}

pub struct SettingsStore {
    store: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
    theme: watch::Sender<ThemeSetting>,
    user_name: watch::Sender<String>,
    user_email: watch::Sender<String>,
    avatar_uri: watch::Sender<String>,
    onboarding_shown: watch::Sender<bool>,
}

impl SettingsStore {
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let theme = ThemeSetting::from_stored(read_or_none(store.as_ref(), keys::THEME).await.as_deref());
        let user_name = read_or_empty(store.as_ref(), keys::USER_NAME).await;
        let user_email = read_or_empty(store.as_ref(), keys::USER_EMAIL).await;
        let avatar_uri = read_or_empty(store.as_ref(), keys::AVATAR_URI).await;
        let onboarding_shown = store.get_bool(keys::ONBOARDING_SHOWN).await.unwrap_or_else(|e| {
            warn!("Failed to read onboarding flag: {e}");
            false
        });

        SettingsStore {
            store,
            write_lock: Mutex::new(()),
            theme: watch::channel(theme).0,
            user_name: watch::channel(user_name).0,
            user_email: watch::channel(user_email).0,
            avatar_uri: watch::channel(avatar_uri).0,
            onboarding_shown: watch::channel(onboarding_shown).0,
        }
    }

    pub fn theme(&self) -> watch::Receiver<ThemeSetting> {
        self.theme.subscribe()
    }

    pub fn user_name(&self) -> watch::Receiver<String> {
        self.user_name.subscribe()
    }

    pub fn user_email(&self) -> watch::Receiver<String> {
        self.user_email.subscribe()
    }

    pub fn avatar_uri(&self) -> watch::Receiver<String> {
        self.avatar_uri.subscribe()
    }

    pub fn current_theme(&self) -> ThemeSetting {
        *self.theme.borrow()
    }

    pub async fn set_theme(&self, theme: ThemeSetting) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.store.put(keys::THEME, &theme.to_string()).await?;
        self.theme.send_replace(theme);
        debug!("Theme set to {theme}");
        Ok(())
    }

    pub async fn set_user_name(&self, name: &str) -> Result<()> {
        self.set_text(keys::USER_NAME, &self.user_name, name).await
    }

    pub async fn set_user_email(&self, email: &str) -> Result<()> {
        self.set_text(keys::USER_EMAIL, &self.user_email, email).await
    }

    pub async fn set_avatar_uri(&self, uri: &str) -> Result<()> {
        self.set_text(keys::AVATAR_URI, &self.avatar_uri, uri).await
    }

    pub fn profile(&self) -> Profile {
        Profile {
            name: self.user_name.borrow().clone(),
            email: self.user_email.borrow().clone(),
            avatar_uri: self.avatar_uri.borrow().clone(),
        }
    }

    /// Write each profile field in turn. A failure part-way leaves the
    /// earlier fields written.
    pub async fn save_profile(&self, profile: &Profile) -> Result<()> {
        self.set_user_name(&profile.name).await?;
        self.set_user_email(&profile.email).await?;
        self.set_avatar_uri(&profile.avatar_uri).await
    }

    pub fn onboarding_shown(&self) -> bool {
        *self.onboarding_shown.borrow()
    }

    pub async fn mark_onboarding_shown(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.store.put_bool(keys::ONBOARDING_SHOWN, true).await?;
        self.onboarding_shown.send_replace(true);
        Ok(())
    }

    async fn set_text(&self, key: StoreKey, field: &watch::Sender<String>, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.store.put(key, value).await?;
        field.send_replace(value.to_string());
        Ok(())
    }
}

async fn read_or_none(store: &dyn KeyValueStore, key: StoreKey) -> Option<String> {
    store.get(key).await.unwrap_or_else(|e| {
        warn!("Failed to read {key}: {e}");
        None
    })
}

async fn read_or_empty(store: &dyn KeyValueStore, key: StoreKey) -> String {
    read_or_none(store, key).await.unwrap_or_default()
}
