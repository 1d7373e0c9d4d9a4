use crate::config::SettingsConfig;
use crate::error::Result;
use crate::focus_error;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use super::r#trait::{SettingKey, SettingsStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    String(String),
    Bool(bool),
}

#[derive(Debug, Default)]
struct MemoryInner {
    values: HashMap<SettingKey, SettingValue>,
    writes: Vec<(SettingKey, SettingValue)>,
    failing_writes: usize,
}

/// In-memory settings store. Clones share state, so a test can keep a handle
/// while the watcher owns another one.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
    log_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Значения по умолчанию GNOME для dry-run режима, под настроенными ключами
    pub fn dry_run(keys: &SettingsConfig) -> Self {
        let mut store = Self::new()
            .with_string(SettingKey::new(&keys.focus_mode_schema, &keys.focus_mode_key), "click")
            .with_bool(SettingKey::new(&keys.pointer_rest_schema, &keys.pointer_rest_key), true);
        store.log_writes = true;
        store
    }

    pub fn with_string(self, key: SettingKey, value: &str) -> Self {
        self.inner
            .lock()
            .values
            .insert(key, SettingValue::String(value.to_string()));
        self
    }

    pub fn with_bool(self, key: SettingKey, value: bool) -> Self {
        self.inner.lock().values.insert(key, SettingValue::Bool(value));
        self
    }

    pub fn value(&self, key: &SettingKey) -> Option<SettingValue> {
        self.inner.lock().values.get(key).cloned()
    }

    #[cfg(test)]
    pub fn writes(&self) -> Vec<(SettingKey, SettingValue)> {
        self.inner.lock().writes.clone()
    }

    #[cfg(test)]
    pub fn write_count(&self) -> usize {
        self.inner.lock().writes.len()
    }

    /// Следующие `count` записей завершатся ошибкой
    #[cfg(test)]
    pub fn fail_next_writes(&self, count: usize) {
        self.inner.lock().failing_writes = count;
    }

    fn write(&mut self, key: &SettingKey, value: SettingValue) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.failing_writes > 0 {
            inner.failing_writes -= 1;
            return Err(focus_error!(settings, "запись {} отклонена", key));
        }

        if self.log_writes {
            info!("[DRY RUN] {} = {:?}", key, value);
        }
        inner.writes.push((key.clone(), value.clone()));
        inner.values.insert(key.clone(), value);
        Ok(())
    }
}

impl SettingsStore for MemoryStore {
    fn get_string(&self, key: &SettingKey) -> Result<String> {
        match self.value(key) {
            Some(SettingValue::String(value)) => Ok(value),
            Some(other) => Err(focus_error!(settings, "{} не строка: {:?}", key, other)),
            None => Err(focus_error!(settings, "настройка {} не найдена", key)),
        }
    }

    fn set_string(&mut self, key: &SettingKey, value: &str) -> Result<()> {
        self.write(key, SettingValue::String(value.to_string()))
    }

    fn get_bool(&self, key: &SettingKey) -> Result<bool> {
        match self.value(key) {
            Some(SettingValue::Bool(value)) => Ok(value),
            Some(other) => Err(focus_error!(settings, "{} не boolean: {:?}", key, other)),
            None => Err(focus_error!(settings, "настройка {} не найдена", key)),
        }
    }

    fn set_bool(&mut self, key: &SettingKey, value: bool) -> Result<()> {
        self.write(key, SettingValue::Bool(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state_and_record_writes() {
        let key = SettingKey::new("org.gnome.desktop.wm.preferences", "focus-mode");
        let handle = MemoryStore::new().with_string(key.clone(), "click");
        let mut store = handle.clone();

        assert_eq!(store.get_string(&key).unwrap(), "click");
        store.set_string(&key, "sloppy").unwrap();

        assert_eq!(handle.value(&key), Some(SettingValue::String("sloppy".to_string())));
        assert_eq!(handle.write_count(), 1);
        // Предзаполнение не считается записью
        assert_eq!(handle.writes()[0].0, key);
    }

    #[test]
    fn test_type_mismatch_and_missing_key() {
        let key = SettingKey::new("org.gnome.mutter", "focus-change-on-pointer-rest");
        let store = MemoryStore::new().with_bool(key.clone(), true);

        assert!(store.get_bool(&key).unwrap());
        assert!(store.get_string(&key).is_err());
        assert!(store.get_bool(&SettingKey::new("org.gnome.mutter", "missing")).is_err());
    }
}
