//! Configuration store for user-tunable durations and flags
//!
//! Values live in an external key-value store under their wire names
//! (`pomodoroMinutes`, `autoStart`, ...). [`Settings`] is the typed view the
//! timer engine reads from.

pub mod store;

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::{error::Error, state::TimerState};

pub use store::{JsonFileStore, MemoryStore, SettingsStore};

/// Every key the configuration store recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SettingKey {
    PomodoroMinutes,
    ShortBreakMinutes,
    LongBreakMinutes,
    LongBreakInterval,
    SendNotification,
    SkipBreaks,
    AutoStart,
}

impl SettingKey {
    pub const ALL: [SettingKey; 7] = [
        SettingKey::PomodoroMinutes,
        SettingKey::ShortBreakMinutes,
        SettingKey::LongBreakMinutes,
        SettingKey::LongBreakInterval,
        SettingKey::SendNotification,
        SettingKey::SkipBreaks,
        SettingKey::AutoStart,
    ];

    /// Name used by the persisted store and the HTTP API
    pub fn name(self) -> &'static str {
        match self {
            SettingKey::PomodoroMinutes => "pomodoroMinutes",
            SettingKey::ShortBreakMinutes => "shortBreakMinutes",
            SettingKey::LongBreakMinutes => "longBreakMinutes",
            SettingKey::LongBreakInterval => "longBreakInterval",
            SettingKey::SendNotification => "sendNotification",
            SettingKey::SkipBreaks => "skipBreaks",
            SettingKey::AutoStart => "autoStart",
        }
    }

    pub fn parse(name: &str) -> Result<Self, Error> {
        Self::ALL
            .into_iter()
            .find(|key| key.name() == name)
            .ok_or_else(|| Error::UnknownSetting(name.to_string()))
    }

    pub fn default_value(self) -> SettingValue {
        match self {
            SettingKey::PomodoroMinutes => SettingValue::Int(25),
            SettingKey::ShortBreakMinutes => SettingValue::Int(5),
            SettingKey::LongBreakMinutes => SettingValue::Int(15),
            SettingKey::LongBreakInterval => SettingValue::Int(4),
            SettingKey::SendNotification => SettingValue::Bool(true),
            SettingKey::SkipBreaks => SettingValue::Bool(false),
            SettingKey::AutoStart => SettingValue::Bool(false),
        }
    }

    /// Whether a change to this key resets the running countdown
    pub fn is_duration(self) -> bool {
        matches!(
            self,
            SettingKey::PomodoroMinutes | SettingKey::ShortBreakMinutes | SettingKey::LongBreakMinutes
        )
    }

    /// Check the value kind and clamp integers to a minimum of 1.
    ///
    /// This is the only validation anywhere: the engine trusts what it is given.
    pub fn normalize(self, value: SettingValue) -> Result<SettingValue, Error> {
        match self.default_value() {
            SettingValue::Int(_) => positive(self, value).map(|n| SettingValue::Int(n.into())),
            SettingValue::Bool(_) => flag(self, value).map(SettingValue::Bool),
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single stored value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
}

fn positive(key: SettingKey, value: SettingValue) -> Result<u32, Error> {
    match value {
        SettingValue::Int(n) => Ok(u32::try_from(n.max(1)).unwrap_or(u32::MAX)),
        SettingValue::Bool(_) => Err(Error::WrongKind {
            key: key.name(),
            expected: "integer",
        }),
    }
}

fn flag(key: SettingKey, value: SettingValue) -> Result<bool, Error> {
    match value {
        SettingValue::Bool(b) => Ok(b),
        SettingValue::Int(_) => Err(Error::WrongKind {
            key: key.name(),
            expected: "boolean",
        }),
    }
}

/// Typed snapshot of the configuration store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub work_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    pub long_break_interval: u32,
    pub send_notification: bool,
    pub skip_breaks: bool,
    pub auto_start: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            long_break_interval: 4,
            send_notification: true,
            skip_breaks: false,
            auto_start: false,
        }
    }
}

impl Settings {
    /// Read every recognized key, falling back to defaults for bad values
    pub fn load(store: &dyn SettingsStore) -> Self {
        let mut settings = Self::default();
        for key in SettingKey::ALL {
            let value = store.get(key);
            if let Err(e) = key.normalize(value).and_then(|v| settings.apply(key, v)) {
                tracing::warn!("Ignoring stored value for {}: {}", key, e);
            }
        }
        settings
    }

    pub fn get(&self, key: SettingKey) -> SettingValue {
        match key {
            SettingKey::PomodoroMinutes => SettingValue::Int(self.work_minutes.into()),
            SettingKey::ShortBreakMinutes => SettingValue::Int(self.short_break_minutes.into()),
            SettingKey::LongBreakMinutes => SettingValue::Int(self.long_break_minutes.into()),
            SettingKey::LongBreakInterval => SettingValue::Int(self.long_break_interval.into()),
            SettingKey::SendNotification => SettingValue::Bool(self.send_notification),
            SettingKey::SkipBreaks => SettingValue::Bool(self.skip_breaks),
            SettingKey::AutoStart => SettingValue::Bool(self.auto_start),
        }
    }

    /// Store a value that has already been normalized for `key`
    pub fn apply(&mut self, key: SettingKey, value: SettingValue) -> Result<(), Error> {
        match key {
            SettingKey::PomodoroMinutes => self.work_minutes = positive(key, value)?,
            SettingKey::ShortBreakMinutes => self.short_break_minutes = positive(key, value)?,
            SettingKey::LongBreakMinutes => self.long_break_minutes = positive(key, value)?,
            SettingKey::LongBreakInterval => self.long_break_interval = positive(key, value)?,
            SettingKey::SendNotification => self.send_notification = flag(key, value)?,
            SettingKey::SkipBreaks => self.skip_breaks = flag(key, value)?,
            SettingKey::AutoStart => self.auto_start = flag(key, value)?,
        }
        Ok(())
    }

    /// Configured length of a phase in minutes
    pub fn duration_minutes(&self, state: TimerState) -> u32 {
        match state {
            TimerState::Work => self.work_minutes,
            TimerState::ShortBreak => self.short_break_minutes,
            TimerState::LongBreak => self.long_break_minutes,
        }
    }

    pub fn duration_seconds(&self, state: TimerState) -> u64 {
        u64::from(self.duration_minutes(state)) * 60
    }

    /// All values keyed by wire name
    pub fn to_map(&self) -> BTreeMap<&'static str, SettingValue> {
        SettingKey::ALL
            .into_iter()
            .map(|key| (key.name(), self.get(key)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_store_defaults() {
        let settings = Settings::default();
        for key in SettingKey::ALL {
            assert_eq!(settings.get(key), key.default_value(), "{}", key);
        }
    }

    #[test]
    fn parse_round_trips_wire_names() {
        for key in SettingKey::ALL {
            assert_eq!(SettingKey::parse(key.name()), Ok(key));
        }
        assert_eq!(
            SettingKey::parse("workMinutes"),
            Err(Error::UnknownSetting("workMinutes".to_string()))
        );
    }

    #[test]
    fn normalize_clamps_integers_to_one() {
        let key = SettingKey::ShortBreakMinutes;
        assert_eq!(key.normalize(SettingValue::Int(0)), Ok(SettingValue::Int(1)));
        assert_eq!(key.normalize(SettingValue::Int(-7)), Ok(SettingValue::Int(1)));
        assert_eq!(key.normalize(SettingValue::Int(9)), Ok(SettingValue::Int(9)));
    }

    #[test]
    fn normalize_rejects_wrong_kind() {
        assert!(matches!(
            SettingKey::AutoStart.normalize(SettingValue::Int(1)),
            Err(Error::WrongKind { expected: "boolean", .. })
        ));
        assert!(matches!(
            SettingKey::LongBreakInterval.normalize(SettingValue::Bool(true)),
            Err(Error::WrongKind { expected: "integer", .. })
        ));
    }

    #[test]
    fn only_minute_keys_are_durations() {
        let durations: Vec<_> = SettingKey::ALL.into_iter().filter(|k| k.is_duration()).collect();
        assert_eq!(
            durations,
            vec![
                SettingKey::PomodoroMinutes,
                SettingKey::ShortBreakMinutes,
                SettingKey::LongBreakMinutes
            ]
        );
    }

    #[test]
    fn load_ignores_values_of_the_wrong_kind() {
        let mut store = MemoryStore::new();
        store.insert_raw(SettingKey::PomodoroMinutes, SettingValue::Bool(true));
        store.insert_raw(SettingKey::LongBreakMinutes, SettingValue::Int(30));

        let settings = Settings::load(&store);
        assert_eq!(settings.work_minutes, 25);
        assert_eq!(settings.long_break_minutes, 30);
    }

    #[test]
    fn duration_follows_phase() {
        let settings = Settings {
            work_minutes: 50,
            short_break_minutes: 10,
            long_break_minutes: 20,
            ..Settings::default()
        };
        assert_eq!(settings.duration_seconds(TimerState::Work), 3000);
        assert_eq!(settings.duration_seconds(TimerState::ShortBreak), 600);
        assert_eq!(settings.duration_seconds(TimerState::LongBreak), 1200);
    }

    #[test]
    fn setting_values_use_plain_json() {
        let map = Settings::default().to_map();
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json["pomodoroMinutes"], 25);
        assert_eq!(json["sendNotification"], true);

        let value: SettingValue = serde_json::from_str("false").unwrap();
        assert_eq!(value, SettingValue::Bool(false));
        let value: SettingValue = serde_json::from_str("12").unwrap();
        assert_eq!(value, SettingValue::Int(12));
    }
}
