use super::{AppId, MonitorIndex, WindowId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Информация об окне
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowInfo {
    pub id: WindowId,
    pub title: String,
    pub class: String,
    pub app_id: Option<AppId>,
    pub geometry: Option<WindowGeometry>,
    pub monitor: Option<MonitorIndex>,
    pub fullscreen: bool,
}

impl WindowInfo {
    pub fn new(id: WindowId, title: String) -> Self {
        Self {
            id,
            title,
            class: String::new(),
            app_id: None,
            geometry: None,
            monitor: None,
            fullscreen: false,
        }
    }

    pub fn with_class(mut self, class: String) -> Self {
        self.class = class;
        self
    }

    pub fn with_app_id(mut self, app_id: impl Into<AppId>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    pub fn with_geometry(mut self, geometry: WindowGeometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn fullscreen(mut self, fullscreen: bool) -> Self {
        self.fullscreen = fullscreen;
        self
    }
}

impl fmt::Display for WindowInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.app_id {
            Some(app_id) => write!(f, "{} \"{}\" ({})", self.id, self.title, app_id),
            None if self.class.is_empty() => write!(f, "{} \"{}\"", self.id, self.title),
            None => write!(f, "{} \"{}\" ({})", self.id, self.title, self.class),
        }
    }
}

/// Геометрия окна или монитора
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl WindowGeometry {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> (i64, i64) {
        (
            self.x as i64 + self.width as i64 / 2,
            self.y as i64 + self.height as i64 / 2,
        )
    }

    pub fn contains(&self, (px, py): (i64, i64)) -> bool {
        let (x, y) = (self.x as i64, self.y as i64);
        px >= x && py >= y && px < x + self.width as i64 && py < y + self.height as i64
    }
}

/// Монитор и его область на общем экране
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonitorInfo {
    pub index: MonitorIndex,
    pub name: String,
    pub geometry: WindowGeometry,
}

/// Полное состояние рабочего стола в момент опроса
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopSnapshot {
    pub windows: Vec<WindowInfo>,
    pub monitors: Vec<MonitorInfo>,
}

impl DesktopSnapshot {
    pub fn new(windows: Vec<WindowInfo>, monitors: Vec<MonitorInfo>) -> Self {
        Self { windows, monitors }
    }

    /// Монитор, содержащий центр геометрии окна (как это делает mutter)
    pub fn monitor_at(&self, geometry: &WindowGeometry) -> Option<MonitorIndex> {
        let center = geometry.center();
        self.monitors
            .iter()
            .find(|monitor| monitor.geometry.contains(center))
            .map(|monitor| monitor.index)
    }

    /// Проставляет мониторы окнам, у которых он ещё не определён
    pub fn assign_monitors(mut self) -> Self {
        let assigned: Vec<Option<MonitorIndex>> = self
            .windows
            .iter()
            .map(|w| w.monitor.or_else(|| w.geometry.as_ref().and_then(|g| self.monitor_at(g))))
            .collect();
        for (window, monitor) in self.windows.iter_mut().zip(assigned) {
            window.monitor = monitor;
        }
        self
    }
}
