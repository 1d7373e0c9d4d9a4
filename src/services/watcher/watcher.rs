use crate::config::Config;
use crate::error::Result;
use crate::events::{AppId, Notification, SignalKind, SignalSource, SubscriptionId, TimerToken, WindowId};
use crate::services::environment::Environment;
use crate::services::settings::SettingsStore;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::focus_settings::FocusSettings;
use super::policy::{FullscreenPolicy, Reaction};
use super::registry::{Route, WindowRegistry};
use super::timers::{Pending, PendingTimers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Inert,
    Running { creation: SubscriptionId },
}

/// Switches focus mode while the target application is fullscreen on every monitor.
///
/// The watcher is driven from a single event loop: `dispatch` for
/// notifications, `fire` for expired timers. Each call runs to completion, so
/// no state here needs locking.
pub struct Watcher<E, S> {
    env: E,
    settings: FocusSettings<S>,
    policy: FullscreenPolicy,
    target_app: AppId,
    creation_delay: Duration,
    registry: WindowRegistry,
    timers: PendingTimers,
    lifecycle: Lifecycle,
}

impl<E: Environment, S: SettingsStore> Watcher<E, S> {
    pub fn new(env: E, store: S, config: &Config) -> Self {
        Self {
            env,
            settings: FocusSettings::new(store, &config.settings),
            policy: FullscreenPolicy::from_config(&config.policy),
            target_app: config.target.app_id.clone(),
            creation_delay: config.policy.creation_delay(),
            registry: WindowRegistry::new(),
            timers: PendingTimers::new(),
            lifecycle: Lifecycle::Inert,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Running { .. })
    }

    #[allow(dead_code)]
    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut E {
        &mut self.env
    }

    #[allow(dead_code)]
    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    #[allow(dead_code)]
    pub fn settings(&self) -> &FocusSettings<S> {
        &self.settings
    }

    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            warn!("Watcher уже запущен - повторный start игнорируется");
            return Ok(());
        }

        self.settings.capture_and_override()?;

        for window in self.env.windows() {
            self.registry.track(&mut self.env, window, &self.target_app);
        }

        let creation = self
            .env
            .subscribe(SignalSource::Display, SignalKind::WindowCreated);
        self.lifecycle = Lifecycle::Running { creation };

        info!(
            "Watcher запущен для {}: отслеживается {} окон",
            self.target_app,
            self.registry.len()
        );
        Ok(())
    }

    pub fn stop(&mut self) {
        let Lifecycle::Running { creation } = self.lifecycle else {
            debug!("Watcher не запущен - stop игнорируется");
            return;
        };

        if let Err(e) = self.env.unsubscribe(creation) {
            debug!("Отписка от создания окон: {}", e);
        }
        self.registry.untrack_all(&mut self.env);
        self.timers.clear();

        if let Err(e) = self.settings.teardown() {
            warn!("Не удалось восстановить настройки фокуса: {}", e);
        }

        self.lifecycle = Lifecycle::Inert;
        info!("Watcher остановлен");
    }

    /// Единая точка доставки уведомлений окружения
    pub fn dispatch(&mut self, notification: Notification) {
        let Lifecycle::Running { creation } = self.lifecycle else {
            debug!("Уведомление {:?} после остановки - пропускаем", notification);
            return;
        };

        if notification.subscription == creation {
            // Приложение окна может быть ещё неизвестно в момент создания
            let token = self.timers.register(Pending::TrackCreated(notification.window));
            self.env.schedule(self.creation_delay, token);
            return;
        }

        match self.registry.route(notification.subscription) {
            Some(Route { window, kind: SignalKind::FullscreenChanged }) => self.on_fullscreen_changed(window),
            Some(Route { window, kind: SignalKind::Unmanaged }) => self.untrack(window),
            Some(route) => debug!("Неожиданный маршрут {:?}", route),
            None => debug!("Уведомление по снятой подписке {:?} - пропускаем", notification.subscription),
        }
    }

    /// Срабатывание ранее запланированного таймера
    pub fn fire(&mut self, token: TimerToken) {
        if !self.is_running() {
            return;
        }

        match self.timers.take(token) {
            None => debug!("Таймер {:?} устарел", token),
            Some(Pending::TrackCreated(window)) => {
                self.registry.track(&mut self.env, window, &self.target_app);
            }
            Some(Pending::EvaluateCoverage(window)) => self.evaluate(window),
        }
    }

    fn on_fullscreen_changed(&mut self, window: WindowId) {
        let fullscreen = self.env.is_fullscreen(window);
        // Предыдущая отложенная проверка этого окна больше не актуальна
        self.timers.invalidate_evaluations(window);

        match self.policy.on_fullscreen_changed(fullscreen) {
            Reaction::Evaluate(delay) => {
                info!("Окно {} вошло в fullscreen, проверка через {}мс", window, delay.as_millis());
                let token = self.timers.register(Pending::EvaluateCoverage(window));
                self.env.schedule(delay, token);
            }
            Reaction::Restore => {
                info!("Окно {} вышло из fullscreen", window);
                if let Err(e) = self.settings.restore_original() {
                    warn!("Не удалось восстановить режим фокуса: {}", e);
                }
            }
        }
    }

    fn evaluate(&mut self, window: WindowId) {
        if !self.registry.contains(window) {
            debug!("Окно {} больше не отслеживается - проверка отменена", window);
            return;
        }

        if self.policy.should_switch(&self.env, &self.target_app) {
            if let Err(e) = self.settings.set_sloppy() {
                warn!("Не удалось включить sloppy-фокус: {}", e);
            }
        } else {
            debug!("Окна {} не покрывают мониторы - режим фокуса не меняется", self.target_app);
        }
    }

    fn untrack(&mut self, window: WindowId) {
        self.registry.untrack(&mut self.env, window);
        self.timers.invalidate_evaluations(window);
    }
}
