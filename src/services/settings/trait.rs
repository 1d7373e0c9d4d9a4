use crate::config::SettingsConfig;
use crate::error::Result;
use std::fmt;

/// Имя настройки: схема GSettings и ключ внутри неё
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SettingKey {
    pub schema: String,
    pub key: String,
}

impl SettingKey {
    pub fn new(schema: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.schema, self.key)
    }
}

/// Synchronous, durable key/value settings store.
pub trait SettingsStore {
    fn get_string(&self, key: &SettingKey) -> Result<String>;
    fn set_string(&mut self, key: &SettingKey, value: &str) -> Result<()>;
    fn get_bool(&self, key: &SettingKey) -> Result<bool>;
    fn set_bool(&mut self, key: &SettingKey, value: bool) -> Result<()>;
}

impl<S: SettingsStore + ?Sized> SettingsStore for Box<S> {
    fn get_string(&self, key: &SettingKey) -> Result<String> {
        (**self).get_string(key)
    }

    fn set_string(&mut self, key: &SettingKey, value: &str) -> Result<()> {
        (**self).set_string(key, value)
    }

    fn get_bool(&self, key: &SettingKey) -> Result<bool> {
        (**self).get_bool(key)
    }

    fn set_bool(&mut self, key: &SettingKey, value: bool) -> Result<()> {
        (**self).set_bool(key, value)
    }
}

/// Factory function to create an appropriate settings store based on the dry_run flag
pub fn create_settings_store(dry_run: bool, keys: &SettingsConfig) -> Box<dyn SettingsStore> {
    if dry_run {
        Box::new(super::memory::MemoryStore::dry_run(keys))
    } else {
        Box::new(super::gsettings::GSettingsStore::new())
    }
}
