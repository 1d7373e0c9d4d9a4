use crate::config::Config;
use crate::error::Result;
use crate::events::{DesktopSnapshot, Inbound, MonitorInfo, WindowGeometry, WindowId, WindowInfo};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{interval, Duration};
use tracing::info;

use super::r#trait::WindowSourceTrait;

/// Эмуляция рабочего стола с двумя мониторами и сеансом целевого приложения
pub struct DryRunSource {
    config: Arc<Config>,
    step: usize,
}

const STEPS: [&str; 6] = [
    "только терминал",
    "окно приложения на первом мониторе",
    "второе окно приложения на втором мониторе",
    "оба окна в fullscreen",
    "выход из fullscreen",
    "окна приложения закрыты",
];

impl DryRunSource {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config, step: 0 }
    }

    fn monitors() -> Vec<MonitorInfo> {
        vec![
            MonitorInfo {
                index: 0,
                name: "DRY-1".to_string(),
                geometry: WindowGeometry::new(0, 0, 1920, 1080),
            },
            MonitorInfo {
                index: 1,
                name: "DRY-2".to_string(),
                geometry: WindowGeometry::new(1920, 0, 1920, 1080),
            },
        ]
    }

    fn app_window(&self, id: u64, x: i32, fullscreen: bool) -> WindowInfo {
        WindowInfo::new(WindowId(id), format!("Dry-run session {}", id))
            .with_class("DryRun".to_string())
            .with_app_id(self.config.target.app_id.clone())
            .with_geometry(WindowGeometry::new(x, 0, 1920, 1080))
            .fullscreen(fullscreen)
    }

    fn build(&self, step: usize) -> DesktopSnapshot {
        let terminal = WindowInfo::new(WindowId(0x100), "Terminal - dry_run".to_string())
            .with_class("Terminal".to_string())
            .with_app_id("org.gnome.Terminal")
            .with_geometry(WindowGeometry::new(100, 100, 800, 600));

        let mut windows = vec![terminal];
        match step {
            1 => windows.push(self.app_window(0x200, 0, false)),
            2 => {
                windows.push(self.app_window(0x200, 0, false));
                windows.push(self.app_window(0x201, 1920, false));
            }
            3 => {
                windows.push(self.app_window(0x200, 0, true));
                windows.push(self.app_window(0x201, 1920, true));
            }
            4 => {
                windows.push(self.app_window(0x200, 0, false));
                windows.push(self.app_window(0x201, 1920, false));
            }
            _ => {}
        }

        DesktopSnapshot::new(windows, Self::monitors())
    }
}

#[async_trait::async_trait]
impl WindowSourceTrait for DryRunSource {
    async fn snapshot(&mut self) -> Result<DesktopSnapshot> {
        Ok(self.build(self.step))
    }

    async fn run(self: Box<Self>, events_tx: UnboundedSender<Inbound>) -> Result<()> {
        let mut this = *self;
        info!("Dry-run режим - WindowSource работает в режиме эмуляции");

        let mut ticker = interval(Duration::from_secs(3));
        // Первый тик срабатывает сразу, а начальный снимок уже отдан
        ticker.tick().await;

        loop {
            ticker.tick().await;

            this.step = (this.step + 1) % STEPS.len();
            info!("Dry-run: шаг {} - {}", this.step, STEPS[this.step]);

            if events_tx.send(Inbound::Snapshot(this.build(this.step))).is_err() {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fullscreen_step_covers_both_monitors() {
        let config = Arc::new(Config::default());
        let source = DryRunSource::new(config.clone());

        let snapshot = source.build(3).assign_monitors();
        let app_windows: Vec<&WindowInfo> = snapshot
            .windows
            .iter()
            .filter(|w| w.app_id.as_deref() == Some(config.target.app_id.as_str()))
            .collect();

        assert_eq!(app_windows.len(), 2);
        assert!(app_windows.iter().all(|w| w.fullscreen));
        assert_eq!(app_windows[0].monitor, Some(0));
        assert_eq!(app_windows[1].monitor, Some(1));

        assert_eq!(source.build(0).windows.len(), 1);
        assert_eq!(source.build(5).windows.len(), 1);
    }
}
