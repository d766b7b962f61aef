use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::settings::{normalize_time, SettingsStore};
use crate::store::kv::KeyValueArea;

/// Requested changes; `None` leaves a value as it is.
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub sound_effects: Option<bool>,
    pub notifications: Option<bool>,
    pub time: Option<String>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self.sound_effects.is_none() && self.notifications.is_none() && self.time.is_none()
    }
}

pub fn run<K: KeyValueArea>(store: &SettingsStore<K>, update: SettingsUpdate) -> Result<CmdResult> {
    let mut settings = store.load();
    if update.is_empty() {
        return Ok(CmdResult::default().with_settings(settings));
    }

    if let Some(time) = &update.time {
        settings.notifications.time = normalize_time(time)?;
    }
    if let Some(sound) = update.sound_effects {
        settings.sound_effects = sound;
    }
    if let Some(enabled) = update.notifications {
        settings.notifications.enabled = enabled;
    }
    store.save(&settings)?;

    let mut result = CmdResult::default().with_settings(settings);
    result.add_message(CmdMessage::success("Settings saved"));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JournalError;
    use crate::store::kv_mem::MemKvArea;

    #[test]
    fn test_show_defaults() {
        let store = SettingsStore::new(MemKvArea::new());
        let result = run(&store, SettingsUpdate::default()).unwrap();
        assert_eq!(result.settings.unwrap().notifications.time, "20:00");
        assert!(result.messages.is_empty());
    }

    #[test]
    fn test_update_persists() {
        let store = SettingsStore::new(MemKvArea::new());
        run(
            &store,
            SettingsUpdate {
                notifications: Some(true),
                time: Some("7:45".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        let settings = store.load();
        assert!(settings.notifications.enabled);
        assert_eq!(settings.notifications.time, "07:45");
        assert!(!settings.sound_effects);
    }

    #[test]
    fn test_invalid_time_changes_nothing() {
        let store = SettingsStore::new(MemKvArea::new());
        let err = run(
            &store,
            SettingsUpdate {
                sound_effects: Some(true),
                time: Some("noon".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, JournalError::InvalidSetting(_)));
        assert!(!store.load().sound_effects);
    }
}
