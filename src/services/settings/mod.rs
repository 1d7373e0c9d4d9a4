mod gsettings;
mod memory;
mod r#trait;

#[cfg(test)]
pub use self::memory::{MemoryStore, SettingValue};
pub use self::r#trait::{create_settings_store, SettingKey, SettingsStore};
