use crate::config::SettingsConfig;
use crate::error::Result;
use crate::services::settings::{SettingKey, SettingsStore};
use tracing::{debug, info, warn};

/// Значения, захваченные до первого изменения настроек
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusPolicyState {
    pub original_focus_mode: String,
    pub original_pointer_rest: bool,
    pub overridden: bool,
}

/// Sole writer of the focus-mode and pointer-rest settings.
///
/// Nothing is written before `capture_and_override` has recorded the original
/// values, and `teardown` writes them back exactly once.
pub struct FocusSettings<S> {
    store: S,
    focus_mode: SettingKey,
    pointer_rest: SettingKey,
    sloppy_value: String,
    captured: Option<FocusPolicyState>,
}

impl<S: SettingsStore> FocusSettings<S> {
    pub fn new(store: S, keys: &SettingsConfig) -> Self {
        Self {
            store,
            focus_mode: SettingKey::new(&keys.focus_mode_schema, &keys.focus_mode_key),
            pointer_rest: SettingKey::new(&keys.pointer_rest_schema, &keys.pointer_rest_key),
            sloppy_value: keys.sloppy_value.clone(),
            captured: None,
        }
    }

    #[allow(dead_code)]
    pub fn state(&self) -> Option<&FocusPolicyState> {
        self.captured.as_ref()
    }

    #[allow(dead_code)]
    pub fn is_captured(&self) -> bool {
        self.captured.is_some()
    }

    /// Запоминает исходные значения и отключает задержку фокуса
    pub fn capture_and_override(&mut self) -> Result<()> {
        if self.captured.is_some() {
            warn!("Исходные настройки фокуса уже сохранены, повторный захват пропущен");
            return Ok(());
        }

        let original_focus_mode = self.store.get_string(&self.focus_mode)?;
        let original_pointer_rest = self.store.get_bool(&self.pointer_rest)?;
        info!(
            "Исходные настройки: focus-mode={}, pointer-rest={}",
            original_focus_mode, original_pointer_rest
        );

        // Состояние фиксируется только после успешной записи, иначе повторный start её пропустит
        self.store.set_bool(&self.pointer_rest, false)?;
        self.captured = Some(FocusPolicyState {
            original_focus_mode,
            original_pointer_rest,
            overridden: false,
        });
        Ok(())
    }

    pub fn set_sloppy(&mut self) -> Result<()> {
        let Some(state) = self.captured.as_mut() else {
            debug!("set_sloppy до захвата настроек - пропускаем");
            return Ok(());
        };

        state.overridden = true;
        info!("Переключаем focus-mode на {}", self.sloppy_value);
        self.store.set_string(&self.focus_mode, &self.sloppy_value)
    }

    pub fn restore_original(&mut self) -> Result<()> {
        let Some(state) = self.captured.as_mut() else {
            debug!("restore_original до захвата настроек - пропускаем");
            return Ok(());
        };

        state.overridden = false;
        info!("Восстанавливаем focus-mode={}", state.original_focus_mode);
        self.store.set_string(&self.focus_mode, &state.original_focus_mode)
    }

    /// Возвращает обе настройки к исходным значениям. Повторный вызов ничего не пишет.
    pub fn teardown(&mut self) -> Result<()> {
        let Some(state) = self.captured.take() else {
            return Ok(());
        };

        info!(
            "Возвращаем исходные настройки: focus-mode={}, pointer-rest={}",
            state.original_focus_mode, state.original_pointer_rest
        );
        let focus = self.store.set_string(&self.focus_mode, &state.original_focus_mode);
        let pointer = self.store.set_bool(&self.pointer_rest, state.original_pointer_rest);
        focus.and(pointer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::settings::{MemoryStore, SettingValue};

    fn store(mode: &str, rest: bool) -> (MemoryStore, SettingKey, SettingKey) {
        let keys = SettingsConfig::default();
        let focus = SettingKey::new(&keys.focus_mode_schema, &keys.focus_mode_key);
        let pointer = SettingKey::new(&keys.pointer_rest_schema, &keys.pointer_rest_key);
        let store = MemoryStore::new()
            .with_string(focus.clone(), mode)
            .with_bool(pointer.clone(), rest);
        (store, focus, pointer)
    }

    #[test]
    fn test_uninitialized_controller_never_writes() {
        let (handle, _, _) = store("mouse", true);
        let mut settings = FocusSettings::new(handle.clone(), &SettingsConfig::default());

        settings.set_sloppy().unwrap();
        settings.restore_original().unwrap();
        settings.teardown().unwrap();

        assert_eq!(handle.write_count(), 0);
    }

    #[test]
    fn test_capture_reads_before_override() {
        let (handle, focus, pointer) = store("mouse", true);
        let mut settings = FocusSettings::new(handle.clone(), &SettingsConfig::default());

        settings.capture_and_override().unwrap();

        let state = settings.state().unwrap();
        assert_eq!(state.original_focus_mode, "mouse");
        assert!(state.original_pointer_rest);
        assert!(!state.overridden);
        assert_eq!(handle.value(&pointer), Some(SettingValue::Bool(false)));
        assert_eq!(handle.value(&focus), Some(SettingValue::String("mouse".to_string())));
    }

    #[test]
    fn test_second_capture_keeps_first_baseline() {
        let (handle, focus, _) = store("click", true);
        let mut settings = FocusSettings::new(handle.clone(), &SettingsConfig::default());

        settings.capture_and_override().unwrap();
        settings.set_sloppy().unwrap();
        settings.capture_and_override().unwrap();

        assert_eq!(settings.state().unwrap().original_focus_mode, "click");
        settings.restore_original().unwrap();
        assert_eq!(handle.value(&focus), Some(SettingValue::String("click".to_string())));
    }

    #[test]
    fn test_teardown_restores_exactly_once() {
        let (handle, focus, pointer) = store("mouse", true);
        let mut settings = FocusSettings::new(handle.clone(), &SettingsConfig::default());

        settings.capture_and_override().unwrap();
        settings.set_sloppy().unwrap();
        assert!(settings.state().unwrap().overridden);

        settings.teardown().unwrap();
        let writes = handle.write_count();
        settings.teardown().unwrap();

        assert_eq!(handle.write_count(), writes);
        assert!(!settings.is_captured());
        assert_eq!(handle.value(&focus), Some(SettingValue::String("mouse".to_string())));
        assert_eq!(handle.value(&pointer), Some(SettingValue::Bool(true)));
    }

    #[test]
    fn test_failed_override_can_be_retried() {
        let (handle, _, pointer) = store("click", true);
        let mut settings = FocusSettings::new(handle.clone(), &SettingsConfig::default());

        handle.fail_next_writes(1);
        assert!(settings.capture_and_override().is_err());
        assert!(!settings.is_captured());
        assert_eq!(handle.value(&pointer), Some(SettingValue::Bool(true)));

        settings.capture_and_override().unwrap();
        assert!(settings.state().unwrap().original_pointer_rest);
        assert_eq!(handle.value(&pointer), Some(SettingValue::Bool(false)));
    }

    #[test]
    fn test_capture_failure_leaves_controller_uninitialized() {
        let mut settings = FocusSettings::new(MemoryStore::new(), &SettingsConfig::default());
        assert!(settings.capture_and_override().is_err());
        assert!(!settings.is_captured());
    }
}
