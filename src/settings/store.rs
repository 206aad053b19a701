//! Key-value backends for the configuration store

use std::{
    collections::BTreeMap,
    fs,
    path::PathBuf,
};

use tracing::{debug, info, warn};

use super::{SettingKey, SettingValue};
use crate::error::Error;

/// External key-value store holding the persisted settings
pub trait SettingsStore: Send {
    /// Stored value for `key`, or its default when absent
    fn get(&self, key: SettingKey) -> SettingValue;

    fn set(&mut self, key: SettingKey, value: SettingValue) -> Result<(), Error>;
}

/// Volatile store, useful when nothing should outlive the process
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<SettingKey, SettingValue>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert without normalizing, to model whatever an external writer left behind
    pub fn insert_raw(&mut self, key: SettingKey, value: SettingValue) {
        self.values.insert(key, value);
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: SettingKey) -> SettingValue {
        self.values.get(&key).copied().unwrap_or_else(|| key.default_value())
    }

    fn set(&mut self, key: SettingKey, value: SettingValue) -> Result<(), Error> {
        self.values.insert(key, value);
        Ok(())
    }
}

/// Flat JSON object on disk, keyed by wire name and rewritten on every `set`.
///
/// Entries that are not setting values (foreign keys, floats, strings) are
/// kept verbatim so a rewrite never drops them.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, serde_json::Value>,
    values: BTreeMap<String, SettingValue>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing or unreadable file yields defaults.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries: BTreeMap<String, serde_json::Value> = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => {
                    info!("Loaded settings from {}", path.display());
                    entries
                }
                Err(e) => {
                    warn!("Settings file {} is corrupt, using defaults: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) => {
                debug!("No settings read from {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };

        let mut values = BTreeMap::new();
        for (name, raw) in &entries {
            match serde_json::from_value::<SettingValue>(raw.clone()) {
                Ok(value) => {
                    values.insert(name.clone(), value);
                }
                Err(_) => warn!("Skipping settings entry {}={} in {}", name, raw, path.display()),
            }
        }

        Self {
            path,
            entries,
            values,
        }
    }

    fn write(&self) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    Error::Persist(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }
        }

        let contents = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| Error::Persist(format!("Failed to encode settings: {}", e)))?;
        fs::write(&self.path, contents)
            .map_err(|e| Error::Persist(format!("Failed to write {}: {}", self.path.display(), e)))
    }
}

impl SettingsStore for JsonFileStore {
    fn get(&self, key: SettingKey) -> SettingValue {
        self.values
            .get(key.name())
            .copied()
            .unwrap_or_else(|| key.default_value())
    }

    fn set(&mut self, key: SettingKey, value: SettingValue) -> Result<(), Error> {
        let name = key.name().to_string();
        let raw = serde_json::to_value(value)
            .map_err(|e| Error::Persist(format!("Failed to encode {}: {}", key, e)))?;

        let previous_entry = self.entries.insert(name.clone(), raw);
        let previous_value = self.values.insert(name.clone(), value);
        if let Err(e) = self.write() {
            match previous_entry {
                Some(previous) => self.entries.insert(name.clone(), previous),
                None => self.entries.remove(&name),
            };
            match previous_value {
                Some(previous) => self.values.insert(name, previous),
                None => self.values.remove(&name),
            };
            return Err(e);
        }

        debug!("Persisted {}={:?} to {}", key, value, self.path.display());
        Ok(())
    }
}

/// Default location of the settings file in the platform config directory
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pomorin")
        .join("settings.json")
}
