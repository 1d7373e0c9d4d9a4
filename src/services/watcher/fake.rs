//! In-memory environment for watcher tests.

use crate::error::Result;
use crate::events::{
    AppId, MonitorIndex, Notification, SignalKind, SignalSource, SubscriptionId, TimerToken, WindowId,
};
use crate::focus_error;
use crate::services::environment::Environment;
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone)]
struct FakeWindow {
    app: Option<AppId>,
    monitor: Option<MonitorIndex>,
    fullscreen: bool,
}

#[derive(Debug, Default)]
pub struct FakeEnvironment {
    windows: BTreeMap<WindowId, FakeWindow>,
    monitors: usize,
    subscriptions: BTreeMap<SubscriptionId, (SignalSource, SignalKind)>,
    next_subscription: u64,
    stale_unsubscribes: usize,
    scheduled: Vec<(Duration, TimerToken)>,
}

impl FakeEnvironment {
    pub fn new(monitors: usize) -> Self {
        Self {
            monitors,
            ..Self::default()
        }
    }

    pub fn add_window(&mut self, id: WindowId, app: Option<&str>, monitor: Option<MonitorIndex>) {
        self.windows.insert(
            id,
            FakeWindow {
                app: app.map(str::to_string),
                monitor,
                fullscreen: false,
            },
        );
    }

    /// Окно появилось: уведомления для подписчиков на создание
    pub fn create_window(&mut self, id: WindowId, app: Option<&str>, monitor: Option<MonitorIndex>) -> Vec<Notification> {
        self.add_window(id, app, monitor);
        self.notify(SignalSource::Display, SignalKind::WindowCreated, id)
    }

    pub fn set_application(&mut self, id: WindowId, app: &str) {
        if let Some(window) = self.windows.get_mut(&id) {
            window.app = Some(app.to_string());
        }
    }

    pub fn move_window(&mut self, id: WindowId, monitor: MonitorIndex) {
        if let Some(window) = self.windows.get_mut(&id) {
            window.monitor = Some(monitor);
        }
    }

    pub fn set_fullscreen(&mut self, id: WindowId, fullscreen: bool) -> Vec<Notification> {
        match self.windows.get_mut(&id) {
            Some(window) if window.fullscreen != fullscreen => {
                window.fullscreen = fullscreen;
                self.notify(SignalSource::Window(id), SignalKind::FullscreenChanged, id)
            }
            _ => Vec::new(),
        }
    }

    /// Окно закрыто; подписки на нём остаются до явной отписки
    pub fn destroy_window(&mut self, id: WindowId) -> Vec<Notification> {
        if self.windows.remove(&id).is_none() {
            return Vec::new();
        }
        self.notify(SignalSource::Window(id), SignalKind::Unmanaged, id)
    }

    fn notify(&self, source: SignalSource, kind: SignalKind, window: WindowId) -> Vec<Notification> {
        self.subscriptions
            .iter()
            .filter(|(_, entry)| **entry == (source, kind))
            .map(|(id, _)| Notification { subscription: *id, window })
            .collect()
    }

    pub fn active_subscriptions(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn subscriptions_on(&self, window: WindowId) -> Vec<SubscriptionId> {
        self.subscriptions
            .iter()
            .filter(|(_, (source, _))| *source == SignalSource::Window(window))
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn stale_unsubscribes(&self) -> usize {
        self.stale_unsubscribes
    }

    /// Забирает запланированные таймеры в порядке планирования
    pub fn take_scheduled(&mut self) -> Vec<(Duration, TimerToken)> {
        std::mem::take(&mut self.scheduled)
    }
}

impl Environment for FakeEnvironment {
    fn windows(&self) -> Vec<WindowId> {
        self.windows.keys().copied().collect()
    }

    fn subscribe(&mut self, source: SignalSource, kind: SignalKind) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.subscriptions.insert(id, (source, kind));
        id
    }

    fn unsubscribe(&mut self, subscription: SubscriptionId) -> Result<()> {
        let stale = match self.subscriptions.remove(&subscription) {
            None => true,
            Some((SignalSource::Window(window), _)) => !self.windows.contains_key(&window),
            Some((SignalSource::Display, _)) => false,
        };
        if stale {
            self.stale_unsubscribes += 1;
            return Err(focus_error!(stale, "подписка {:?} устарела", subscription));
        }
        Ok(())
    }

    fn is_fullscreen(&self, window: WindowId) -> bool {
        self.windows.get(&window).is_some_and(|w| w.fullscreen)
    }

    fn monitor(&self, window: WindowId) -> Option<MonitorIndex> {
        self.windows.get(&window).and_then(|w| w.monitor)
    }

    fn application(&self, window: WindowId) -> Option<AppId> {
        self.windows.get(&window).and_then(|w| w.app.clone())
    }

    fn application_windows(&self, app: &str) -> Vec<WindowId> {
        self.windows
            .iter()
            .filter(|(_, w)| w.app.as_deref() == Some(app))
            .map(|(id, _)| *id)
            .collect()
    }

    fn monitor_count(&self) -> usize {
        self.monitors
    }

    fn schedule(&mut self, delay: Duration, token: TimerToken) {
        self.scheduled.push((delay, token));
    }
}
