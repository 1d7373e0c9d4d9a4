use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Идентификатор приложения, окна которого отслеживаются по умолчанию.
pub const DEFAULT_TARGET_APP_ID: &str = "com.nicesoftware.DcvViewer";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub target: TargetConfig,
    pub policy: PolicyConfig,
    pub settings: SettingsConfig,
    pub backend: BackendConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub filter: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TargetConfig {
    pub app_id: String,
    pub identity: IdentitySource,
}

/// Какое свойство окна сравнивается с `target.app_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdentitySource {
    GtkApplicationId,
    WmClass,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PolicyConfig {
    pub predicate: FullscreenPredicate,
    pub fullscreen_delay_ms: u64,
    pub creation_delay_ms: u64,
}

/// Условие, при котором полноэкранное окно включает sloppy-фокус.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FullscreenPredicate {
    CoversAllMonitors,
    SpansMultipleMonitors,
    AnyFullscreen,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SettingsConfig {
    pub focus_mode_schema: String,
    pub focus_mode_key: String,
    pub sloppy_value: String,
    pub pointer_rest_schema: String,
    pub pointer_rest_key: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    pub polling_interval_ms: u64,
}

impl PolicyConfig {
    pub fn fullscreen_delay(&self) -> Duration {
        Duration::from_millis(self.fullscreen_delay_ms)
    }

    pub fn creation_delay(&self) -> Duration {
        Duration::from_millis(self.creation_delay_ms)
    }
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            focus_mode_schema: "org.gnome.desktop.wm.preferences".to_string(),
            focus_mode_key: "focus-mode".to_string(),
            sloppy_value: "sloppy".to_string(),
            pointer_rest_schema: "org.gnome.mutter".to_string(),
            pointer_rest_key: "focus-change-on-pointer-rest".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                filter: "focus_mode_switcher=info".to_string(),
            },
            target: TargetConfig {
                app_id: DEFAULT_TARGET_APP_ID.to_string(),
                identity: IdentitySource::GtkApplicationId,
            },
            policy: PolicyConfig {
                predicate: FullscreenPredicate::CoversAllMonitors,
                fullscreen_delay_ms: 500,
                creation_delay_ms: 50,
            },
            settings: SettingsConfig::default(),
            backend: BackendConfig {
                polling_interval_ms: 250,
            },
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        // Значения по умолчанию, поверх них файл и переменные окружения
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("FOCUS_SWITCHER_").split("__"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        if self.target.app_id.trim().is_empty() {
            anyhow::bail!("target.app_id не может быть пустым");
        }

        if self.settings.sloppy_value.is_empty() {
            anyhow::bail!("settings.sloppy_value не может быть пустым");
        }

        for (name, value) in [
            ("focus_mode_schema", &self.settings.focus_mode_schema),
            ("focus_mode_key", &self.settings.focus_mode_key),
            ("pointer_rest_schema", &self.settings.pointer_rest_schema),
            ("pointer_rest_key", &self.settings.pointer_rest_key),
        ] {
            if value.trim().is_empty() {
                anyhow::bail!("settings.{} не может быть пустым", name);
            }
        }

        if self.backend.polling_interval_ms < 100 {
            anyhow::bail!("polling_interval_ms должно быть минимум 100");
        }

        Ok(())
    }
}
