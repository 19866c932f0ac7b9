//! Reminder settings, read key by key from `.logbook/settings.json`.
//!
//! A missing or malformed key falls back to its own default; the other
//! keys are unaffected.

use logbook_core::{cutoff_hour as parse_cutoff_hour, NagIntensity, NagTone, ReminderConfiguration};
use logbook_store::KvFile;
use serde_json::{Map, Value};
use tracing::{debug, warn};

pub mod keys {
    pub const ENABLED: &str = "nag_enabled";
    pub const CUTOFF_HOUR: &str = "nag_cutoff_hour";
    pub const INTENSITY: &str = "nag_intensity";
    pub const TONE: &str = "nag_tone";
    pub const IN_APP: &str = "nag_in_app";
    pub const BUDDY_NAME: &str = "nag_buddy_name";

    pub const ALL: &[&str] = &[ENABLED, CUTOFF_HOUR, INTENSITY, TONE, IN_APP, BUDDY_NAME];
}

/// Load the reminder configuration. An unreadable file yields all defaults.
pub fn load_configuration(settings: &KvFile) -> ReminderConfiguration {
    match settings.read() {
        Ok(map) => from_settings(&map),
        Err(e) => {
            warn!(error = %e, "settings unreadable, using reminder defaults");
            ReminderConfiguration::default()
        }
    }
}

/// Build a configuration from an already-read settings object.
pub fn from_settings(map: &Map<String, Value>) -> ReminderConfiguration {
    let defaults = ReminderConfiguration::default();

    let enabled = read_bool(map, keys::ENABLED).unwrap_or(defaults.enabled);
    let in_app_enabled = read_bool(map, keys::IN_APP).unwrap_or(defaults.in_app_enabled);

    let cutoff_hour = match map.get(keys::CUTOFF_HOUR) {
        None => defaults.cutoff_hour,
        Some(v) => match v.as_i64().map(parse_cutoff_hour) {
            Some(Ok(h)) => h,
            Some(Err(e)) => {
                warn!(error = %e, "using default cutoff hour");
                defaults.cutoff_hour
            }
            None => {
                warn!(value = %v, "cutoff hour is not an integer, using default");
                defaults.cutoff_hour
            }
        },
    };

    let intensity = match map.get(keys::INTENSITY).and_then(Value::as_str) {
        None => defaults.intensity,
        Some(s) => s.parse::<NagIntensity>().unwrap_or_else(|e| {
            warn!(error = %e, "using default intensity");
            defaults.intensity
        }),
    };

    // Unrecognized tones still nag, in the neutral voice.
    let tone = match map.get(keys::TONE).and_then(Value::as_str) {
        None => defaults.tone,
        Some(s) => s.parse::<NagTone>().unwrap_or_else(|e| {
            debug!(error = %e, "falling back to neutral tone");
            NagTone::Neutral
        }),
    };

    let buddy_name = map
        .get(keys::BUDDY_NAME)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    ReminderConfiguration {
        enabled,
        cutoff_hour,
        intensity,
        tone,
        in_app_enabled,
        buddy_name,
    }
}

fn read_bool(map: &Map<String, Value>, key: &str) -> Option<bool> {
    let v = map.get(key)?;
    let b = v.as_bool();
    if b.is_none() {
        warn!(key, value = %v, "expected a bool, using default");
    }
    b
}

#[cfg(test)]
mod tests {
    use super::*;
    use logbook_core::DEFAULT_CUTOFF_HOUR;
    use serde_json::json;

    fn map(v: Value) -> Map<String, Value> {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn empty_settings_are_defaults() {
        assert_eq!(from_settings(&Map::new()), ReminderConfiguration::default());
    }

    #[test]
    fn full_settings() {
        let config = from_settings(&map(json!({
            "nag_enabled": true,
            "nag_cutoff_hour": 20,
            "nag_intensity": "beast_mode",
            "nag_tone": "sarcastic",
            "nag_in_app": false,
            "nag_buddy_name": " Rex ",
        })));
        assert_eq!(
            config,
            ReminderConfiguration {
                enabled: true,
                cutoff_hour: 20,
                intensity: NagIntensity::BeastMode,
                tone: NagTone::Sarcastic,
                in_app_enabled: false,
                buddy_name: Some("Rex".into()),
            }
        );
    }

    #[test]
    fn bad_values_fall_back_per_key() {
        let config = from_settings(&map(json!({
            "nag_enabled": "yes",
            "nag_cutoff_hour": 31,
            "nag_intensity": "ludicrous",
            "nag_tone": "pirate",
            "nag_in_app": false,
            "nag_buddy_name": "",
        })));
        assert!(!config.enabled);
        assert_eq!(config.cutoff_hour, DEFAULT_CUTOFF_HOUR);
        assert_eq!(config.intensity, NagIntensity::Gentle);
        assert_eq!(config.tone, NagTone::Neutral);
        assert!(!config.in_app_enabled);
        assert!(config.buddy_name.is_none());
    }

    #[test]
    fn non_integer_cutoff_uses_default() {
        let config = from_settings(&map(json!({ "nag_cutoff_hour": "late" })));
        assert_eq!(config.cutoff_hour, DEFAULT_CUTOFF_HOUR);
    }

    #[test]
    fn load_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let kv = KvFile::new(tmp.path().join("settings.json"));
        kv.set(keys::ENABLED, json!(true)).unwrap();
        kv.set(keys::CUTOFF_HOUR, json!(7)).unwrap();
        let config = load_configuration(&kv);
        assert!(config.enabled);
        assert_eq!(config.cutoff_hour, 7);
    }

    #[test]
    fn corrupt_file_yields_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.json");
        std::fs::write(&path, "{{{").unwrap();
        assert_eq!(
            load_configuration(&KvFile::new(&path)),
            ReminderConfiguration::default()
        );
    }
}
