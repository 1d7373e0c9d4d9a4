use thiserror::Error;

#[derive(Error, Debug)]
pub enum FocusError {
    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    /// Окно или подписка уже не существуют.
    #[error("Устаревшая ссылка: {0}")]
    StaleReference(String),

    #[error("Ошибка настроек: {0}")]
    Settings(String),

    #[error("Сервис недоступен: {0}")]
    ServiceUnavailable(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl FocusError {
    pub fn is_stale(&self) -> bool {
        matches!(self, FocusError::StaleReference(_))
    }
}

pub type Result<T> = std::result::Result<T, FocusError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! focus_error {
    (stale, $($arg:tt)*) => {
        $crate::error::FocusError::StaleReference(format!($($arg)*))
    };
    (settings, $($arg:tt)*) => {
        $crate::error::FocusError::Settings(format!($($arg)*))
    };
    (service_unavailable, $($arg:tt)*) => {
        $crate::error::FocusError::ServiceUnavailable(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::FocusError::Internal(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_stale_reference_is_detected() {
        let err = focus_error!(stale, "окно {} закрыто", 7);
        assert!(err.is_stale());
        assert_eq!(err.to_string(), "Устаревшая ссылка: окно 7 закрыто");

        let err = focus_error!(settings, "gsettings недоступен");
        assert!(!err.is_stale());
    }
}
