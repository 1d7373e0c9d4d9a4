pub mod window;

pub use window::{DesktopSnapshot, MonitorInfo, WindowGeometry, WindowInfo};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Непрозрачный идентификатор окна, стабильный на время жизни окна
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

/// Индекс монитора в порядке, заданном окружением
pub type MonitorIndex = usize;

/// Идентификатор приложения (GTK application id или WM_CLASS)
pub type AppId = String;

/// Дескриптор активной подписки на уведомление
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// Токен однократного таймера
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(pub u64);

/// Источник уведомлений: дисплей целиком или конкретное окно
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalSource {
    Display,
    Window(WindowId),
}

/// Вид уведомления
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    /// Новое окно на дисплее
    WindowCreated,
    /// Изменился флаг fullscreen окна
    FullscreenChanged,
    /// Окно закрыто и больше не управляется
    Unmanaged,
}

/// Доставленное уведомление: по какой подписке и о каком окне
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification {
    pub subscription: SubscriptionId,
    pub window: WindowId,
}

/// Сообщения единого цикла событий
#[derive(Debug, Clone)]
pub enum Inbound {
    Snapshot(DesktopSnapshot),
    Timer(TimerToken),
}
