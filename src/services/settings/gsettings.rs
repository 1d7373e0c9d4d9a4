use crate::error::{FocusError, Result};
use crate::focus_error;
use crate::utils::run_session_command;
use tracing::debug;

use super::r#trait::{SettingKey, SettingsStore};

/// Настройки через утилиту `gsettings`
pub struct GSettingsStore;

impl GSettingsStore {
    pub fn new() -> Self {
        Self
    }

    fn get(&self, key: &SettingKey) -> Result<String> {
        run_session_command("gsettings", &["get", &key.schema, &key.key])
            .map(|stdout| stdout.trim().to_string())
            .map_err(|e| settings_error("get", key, e))
    }

    fn set(&self, key: &SettingKey, value: &str) -> Result<()> {
        debug!("gsettings set {} {}", key, value);
        run_session_command("gsettings", &["set", &key.schema, &key.key, value])
            .map(|_| ())
            .map_err(|e| settings_error("set", key, e))
    }
}

fn settings_error(action: &str, key: &SettingKey, err: FocusError) -> FocusError {
    focus_error!(settings, "gsettings {} {} не удался: {}", action, key, err)
}

/// `'sloppy'` -> `sloppy`
pub fn parse_string(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let quote = raw.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    let inner = raw.strip_prefix(quote)?.strip_suffix(quote)?;

    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            value.extend(chars.next());
        } else {
            value.push(c);
        }
    }
    Some(value)
}

/// Строка в синтаксисе GVariant
pub fn quote_string(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{}'", escaped)
}

pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

impl SettingsStore for GSettingsStore {
    fn get_string(&self, key: &SettingKey) -> Result<String> {
        let raw = self.get(key)?;
        parse_string(&raw).ok_or_else(|| focus_error!(settings, "неожиданный ответ gsettings для {}: {}", key, raw))
    }

    fn set_string(&mut self, key: &SettingKey, value: &str) -> Result<()> {
        self.set(key, &quote_string(value))
    }

    fn get_bool(&self, key: &SettingKey) -> Result<bool> {
        let raw = self.get(key)?;
        parse_bool(&raw).ok_or_else(|| focus_error!(settings, "неожиданный ответ gsettings для {}: {}", key, raw))
    }

    fn set_bool(&mut self, key: &SettingKey, value: bool) -> Result<()> {
        self.set(key, if value { "true" } else { "false" })
    }
}
