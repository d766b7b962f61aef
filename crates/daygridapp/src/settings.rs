//! App preferences kept next to the journal in local storage.
//!
//! Only persistence lives here; playing sounds and scheduling reminders are
//! someone else's job. Stored settings are merged over the defaults field by
//! field, so a document written by an older version (or edited by hand) that
//! lacks a field still loads.

use crate::error::{JournalError, Result};
use crate::store::kv::KeyValueArea;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

pub const SETTINGS_KEY: &str = "app-settings";

pub const DEFAULT_REMINDER_TIME: &str = "20:00";

fn default_reminder_time() -> String {
    DEFAULT_REMINDER_TIME.to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    #[serde(default)]
    pub enabled: bool,
    /// Daily reminder time, `HH:MM`.
    #[serde(default = "default_reminder_time")]
    pub time: String,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            time: default_reminder_time(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[serde(default)]
    pub sound_effects: bool,
    #[serde(default)]
    pub notifications: NotificationSettings,
}

/// Parses a reminder time and returns it as zero-padded `HH:MM`.
pub fn normalize_time(input: &str) -> Result<String> {
    NaiveTime::parse_from_str(input.trim(), "%H:%M")
        .map(|time| time.format("%H:%M").to_string())
        .map_err(|_| {
            JournalError::InvalidSetting(format!("'{}' is not a time (expected HH:MM)", input))
        })
}

pub struct SettingsStore<K: KeyValueArea> {
    area: K,
}

impl<K: KeyValueArea> SettingsStore<K> {
    pub fn new(area: K) -> Self {
        Self { area }
    }

    /// Stored settings over defaults. Unreadable settings load as defaults.
    pub fn load(&self) -> AppSettings {
        let raw = match self.area.get_item(SETTINGS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return AppSettings::default(),
            Err(e) => {
                tracing::error!(error = %e, "failed to read settings");
                return AppSettings::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(error = %e, "stored settings are corrupt, using defaults");
                AppSettings::default()
            }
        }
    }

    pub fn save(&self, settings: &AppSettings) -> Result<()> {
        let raw = serde_json::to_string(settings)?;
        self.area.set_item(SETTINGS_KEY, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::kv_mem::MemKvArea;

    #[test]
    fn test_defaults() {
        let settings = AppSettings::default();
        assert!(!settings.sound_effects);
        assert!(!settings.notifications.enabled);
        assert_eq!(settings.notifications.time, "20:00");
    }

    #[test]
    fn test_load_without_stored_settings() {
        let store = SettingsStore::new(MemKvArea::new());
        assert_eq!(store.load(), AppSettings::default());
    }

    #[test]
    fn test_save_and_load() {
        let store = SettingsStore::new(MemKvArea::new());
        let settings = AppSettings {
            sound_effects: true,
            notifications: NotificationSettings {
                enabled: true,
                time: "07:30".to_string(),
            },
        };
        store.save(&settings).unwrap();
        assert_eq!(store.load(), settings);
    }

    #[test]
    fn test_partial_document_merges_over_defaults() {
        let area = MemKvArea::new();
        area.set_item(SETTINGS_KEY, r#"{"soundEffects":true,"notifications":{"enabled":true}}"#)
            .unwrap();
        let settings = SettingsStore::new(area).load();
        assert!(settings.sound_effects);
        assert!(settings.notifications.enabled);
        assert_eq!(settings.notifications.time, "20:00");
    }

    #[test]
    fn test_corrupt_document_loads_defaults() {
        let area = MemKvArea::new();
        area.set_item(SETTINGS_KEY, "[1,2").unwrap();
        assert_eq!(SettingsStore::new(area).load(), AppSettings::default());
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let json = serde_json::to_value(AppSettings::default()).unwrap();
        assert_eq!(json["soundEffects"], false);
        assert_eq!(json["notifications"]["time"], "20:00");
    }

    #[test]
    fn test_normalize_time() {
        assert_eq!(normalize_time("20:30").unwrap(), "20:30");
        assert_eq!(normalize_time(" 7:05 ").unwrap(), "07:05");
        assert!(normalize_time("25:00").is_err());
        assert!(normalize_time("evening").is_err());
    }
}
