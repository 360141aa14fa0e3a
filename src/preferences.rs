//! Preference manager that merges config.toml defaults with stored overrides.
//!
//! Config values are defaults; values written from inside the app live in the
//! key/value storage and win over them. Writes never touch the config file.

use crate::config::Config;
use crate::storage::{Storage, StorageError, THEME_KEY};
use crate::theme::ThemeVariant;

// ============================================================================
// PreferenceManager
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceManager {
    theme: ThemeVariant,
    confirm_destructive: bool,
}

impl PreferenceManager {
    /// Merge config defaults with whatever the app stored last time.
    ///
    /// Unreadable or unknown stored values fall back to the config value.
    pub fn load<S: Storage>(config: &Config, storage: &S) -> Self {
        let mut prefs = Self::from_config(config);

        match storage.get(THEME_KEY) {
            Ok(Some(raw)) => match stored_theme(&raw) {
                Some(theme) => prefs.theme = theme,
                None => tracing::warn!(value = %raw, "Ignoring unknown stored theme"),
            },
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Failed to read stored theme"),
        }

        prefs
    }

    /// Config only, nothing stored.
    pub fn from_config(config: &Config) -> Self {
        let theme = ThemeVariant::from_str_name(&config.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %config.theme, "Unknown theme in config, using dark");
            ThemeVariant::Dark
        });
        Self {
            theme,
            confirm_destructive: config.confirm_destructive,
        }
    }

    pub fn theme(&self) -> ThemeVariant {
        self.theme
    }

    pub fn confirm_destructive(&self) -> bool {
        self.confirm_destructive
    }

    /// Persist a theme choice and update the in-memory value.
    pub fn set_theme<S: Storage>(
        &mut self,
        storage: &S,
        theme: ThemeVariant,
    ) -> Result<(), StorageError> {
        let json = serde_json::to_string(theme.as_key())?;
        storage.set(THEME_KEY, &json)?;
        self.theme = theme;
        Ok(())
    }
}

/// The theme is stored as a JSON string; a bare word is accepted too.
fn stored_theme(raw: &str) -> Option<ThemeVariant> {
    let name = serde_json::from_str::<String>(raw).unwrap_or_else(|_| raw.to_string());
    ThemeVariant::from_str_name(&name)
}
