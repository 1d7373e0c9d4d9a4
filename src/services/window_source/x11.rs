use crate::config::Config;
use crate::error::{FocusError, Result};
use crate::events::{DesktopSnapshot, Inbound, WindowInfo};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::r#trait::WindowSourceTrait;
use super::wmctrl::WmctrlLister;
use super::xprop::XpropReader;
use super::xrandr::XrandrMonitors;

/// Опрос X11 через wmctrl, xprop и xrandr
pub struct X11Source {
    config: Arc<Config>,
    wmctrl: WmctrlLister,
    xprop: XpropReader,
    xrandr: XrandrMonitors,
    last_snapshot: Option<DesktopSnapshot>,
}

impl X11Source {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        info!("Инициализация X11Source");

        let wmctrl = WmctrlLister::new();
        wmctrl.test().map_err(|e| {
            FocusError::ServiceUnavailable(format!("wmctrl не работает: {}", e))
        })?;

        Ok(Self {
            config,
            wmctrl,
            xprop: XpropReader::new(),
            xrandr: XrandrMonitors::new(),
            last_snapshot: None,
        })
    }

    fn read_snapshot(&self) -> Result<DesktopSnapshot> {
        let monitors = self.xrandr.list_monitors()?;
        let mut windows = Vec::new();

        for window in self.wmctrl.list_windows()? {
            let id = window.id;
            match self.xprop.read(id) {
                Ok(props) => windows.push(Self::merge(window, props)),
                Err(e) => match Self::carry_over(self.last_snapshot.as_ref(), window) {
                    // wmctrl ещё видит окно: сбой xprop временный, свойства берём из прошлого снимка
                    Some(window) => {
                        debug!("xprop для окна {} не ответил ({}), используем прежние свойства", id, e);
                        windows.push(window);
                    }
                    // Окно могло закрыться между вызовами wmctrl и xprop
                    None => debug!("Не удалось прочитать свойства окна {}: {}", id, e),
                },
            }
        }

        Ok(DesktopSnapshot::new(windows, monitors))
    }

    fn carry_over(previous: Option<&DesktopSnapshot>, window: WindowInfo) -> Option<WindowInfo> {
        let known = previous?.windows.iter().find(|w| w.id == window.id)?;
        Some(WindowInfo {
            class: known.class.clone(),
            app_id: known.app_id.clone(),
            fullscreen: known.fullscreen,
            ..window
        })
    }

    fn merge(window: WindowInfo, props: super::xprop::WindowProperties) -> WindowInfo {
        let mut window = window
            .with_class(props.wm_class.unwrap_or_default())
            .fullscreen(props.fullscreen);
        window.app_id = props.gtk_application_id;
        window
    }
}

#[async_trait::async_trait]
impl WindowSourceTrait for X11Source {
    async fn snapshot(&mut self) -> Result<DesktopSnapshot> {
        let snapshot = self.read_snapshot()?;
        self.last_snapshot = Some(snapshot.clone());
        Ok(snapshot)
    }

    async fn run(self: Box<Self>, events_tx: UnboundedSender<Inbound>) -> Result<()> {
        let mut this = *self;
        let period = Duration::from_millis(this.config.backend.polling_interval_ms);
        info!("X11Source опрашивает рабочий стол каждые {}мс", period.as_millis());

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut failures = 0u32;

        loop {
            ticker.tick().await;

            let snapshot = match this.read_snapshot() {
                Ok(snapshot) => {
                    failures = 0;
                    snapshot
                }
                Err(e) => {
                    failures += 1;
                    if failures == 1 {
                        warn!("Не удалось опросить рабочий стол: {}", e);
                    } else if failures % 20 == 0 {
                        error!("Опрос рабочего стола не работает уже {} попыток: {}", failures, e);
                    }
                    continue;
                }
            };

            if this.last_snapshot.as_ref() == Some(&snapshot) {
                continue;
            }
            this.last_snapshot = Some(snapshot.clone());

            if events_tx.send(Inbound::Snapshot(snapshot)).is_err() {
                debug!("Цикл событий закрыт, X11Source завершает работу");
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{WindowGeometry, WindowId};

    #[test]
    fn test_known_window_keeps_properties_when_xprop_fails() {
        let previous = DesktopSnapshot::new(
            vec![WindowInfo::new(WindowId(1), "DCV".to_string())
                .with_class("dcvviewer".to_string())
                .with_app_id("com.nicesoftware.DcvViewer")
                .fullscreen(true)],
            vec![],
        );
        let listed = WindowInfo::new(WindowId(1), "DCV - session".to_string())
            .with_geometry(WindowGeometry::new(1920, 0, 1920, 1080));

        let window = X11Source::carry_over(Some(&previous), listed).unwrap();
        assert_eq!(window.app_id.as_deref(), Some("com.nicesoftware.DcvViewer"));
        assert_eq!(window.class, "dcvviewer");
        assert!(window.fullscreen);
        assert_eq!(window.title, "DCV - session");
        assert_eq!(window.geometry, Some(WindowGeometry::new(1920, 0, 1920, 1080)));
    }

    #[test]
    fn test_unknown_window_is_dropped_when_xprop_fails() {
        let previous = DesktopSnapshot::new(vec![WindowInfo::new(WindowId(1), "a".to_string())], vec![]);

        assert!(X11Source::carry_over(Some(&previous), WindowInfo::new(WindowId(2), "b".to_string())).is_none());
        assert!(X11Source::carry_over(None, WindowInfo::new(WindowId(1), "a".to_string())).is_none());
    }
}
