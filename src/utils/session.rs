use crate::error::{FocusError, Result};
use tracing::{info, warn};

/// Проверить, что процесс видит графическую сессию
pub fn check_session() -> Result<()> {
    info!("Проверка графической сессии...");

    check_display()?;
    check_session_type();
    check_not_root();

    info!("Проверка графической сессии завершена успешно");
    Ok(())
}

fn check_display() -> Result<()> {
    let name = display_name(std::env::var("DISPLAY").ok())?;
    info!("Используется дисплей {}", name);
    Ok(())
}

fn display_name(value: Option<String>) -> Result<String> {
    match value {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(FocusError::ServiceUnavailable(
            "Переменная DISPLAY не задана. Запустите демон из графической сессии".to_string(),
        )),
    }
}

fn check_session_type() {
    if let Ok(session) = std::env::var("XDG_SESSION_TYPE") {
        if session == "wayland" {
            // Через XWayland видны только X11-клиенты
            warn!("Сессия Wayland: отслеживаются только окна XWayland");
        }
    }
}

fn check_not_root() {
    if std::env::var("USER").unwrap_or_default() == "root" && std::env::var("SUDO_USER").is_err() {
        warn!("Запуск от root без SUDO_USER: настройки будут изменены для root, а не для пользователя");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_requires_non_empty_value() {
        assert_eq!(display_name(Some(":0".to_string())).unwrap(), ":0");
        assert!(display_name(Some(String::new())).is_err());
        assert!(display_name(None).is_err());
    }
}
