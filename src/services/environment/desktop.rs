use crate::config::IdentitySource;
use crate::debug_if_enabled;
use crate::error::Result;
use crate::events::{
    AppId, DesktopSnapshot, Inbound, MonitorIndex, MonitorInfo, Notification, SignalKind,
    SignalSource, SubscriptionId, TimerToken, WindowId, WindowInfo,
};
use crate::focus_error;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use super::r#trait::Environment;

/// Environment built from successive desktop snapshots.
///
/// Window sources only report full snapshots; `Desktop` diffs each new one
/// against the previous state and turns the differences into notifications
/// for whoever subscribed to them. Timers are tokio sleeps that post their
/// token back into the event loop channel.
pub struct Desktop {
    identity: IdentitySource,
    windows: HashMap<WindowId, WindowInfo>,
    // Порядок окон из последнего снимка
    order: Vec<WindowId>,
    monitors: Vec<MonitorInfo>,
    subscriptions: BTreeMap<SubscriptionId, (SignalSource, SignalKind)>,
    next_subscription: u64,
    events_tx: UnboundedSender<Inbound>,
}

impl Desktop {
    pub fn new(identity: IdentitySource, events_tx: UnboundedSender<Inbound>) -> Self {
        Self {
            identity,
            windows: HashMap::new(),
            order: Vec::new(),
            monitors: Vec::new(),
            subscriptions: BTreeMap::new(),
            next_subscription: 1,
            events_tx,
        }
    }

    /// Устанавливает начальное состояние без генерации уведомлений
    pub fn prime(&mut self, snapshot: DesktopSnapshot) {
        self.install(snapshot);
        debug!(
            "Начальный снимок: {} окон, {} мониторов",
            self.order.len(),
            self.monitors.len()
        );
    }

    /// Применяет новый снимок и возвращает уведомления для активных подписок
    pub fn apply(&mut self, snapshot: DesktopSnapshot) -> Vec<Notification> {
        let previous = self.install(snapshot);
        let mut changes = Vec::new();

        for id in &self.order {
            let current = &self.windows[id];
            match previous.get(id) {
                None => {
                    debug_if_enabled!("Новое окно: {}", current);
                    changes.push((SignalSource::Display, SignalKind::WindowCreated, *id));
                }
                Some(old) if old.fullscreen != current.fullscreen => {
                    debug_if_enabled!("Окно {} fullscreen: {} -> {}", id, old.fullscreen, current.fullscreen);
                    changes.push((SignalSource::Window(*id), SignalKind::FullscreenChanged, *id));
                }
                Some(_) => {}
            }
        }

        let mut removed: Vec<WindowId> = previous
            .keys()
            .filter(|id| !self.windows.contains_key(id))
            .copied()
            .collect();
        removed.sort();
        for id in removed {
            debug_if_enabled!("Окно закрыто: {}", id);
            changes.push((SignalSource::Window(id), SignalKind::Unmanaged, id));
        }

        changes
            .into_iter()
            .flat_map(|(source, kind, window)| {
                self.subscribers(source, kind)
                    .map(move |subscription| Notification { subscription, window })
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    fn install(&mut self, snapshot: DesktopSnapshot) -> HashMap<WindowId, WindowInfo> {
        let snapshot = snapshot.assign_monitors();
        self.monitors = snapshot.monitors;
        self.order = snapshot.windows.iter().map(|w| w.id).collect();
        let windows = snapshot.windows.into_iter().map(|w| (w.id, w)).collect();
        std::mem::replace(&mut self.windows, windows)
    }

    fn subscribers(
        &self,
        source: SignalSource,
        kind: SignalKind,
    ) -> impl Iterator<Item = SubscriptionId> + '_ {
        self.subscriptions
            .iter()
            .filter(move |(_, entry)| **entry == (source, kind))
            .map(|(id, _)| *id)
    }

    #[cfg(test)]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}

impl Environment for Desktop {
    fn windows(&self) -> Vec<WindowId> {
        self.order.clone()
    }

    fn subscribe(&mut self, source: SignalSource, kind: SignalKind) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscriptions.insert(id, (source, kind));
        id
    }

    fn unsubscribe(&mut self, subscription: SubscriptionId) -> Result<()> {
        match self.subscriptions.remove(&subscription) {
            None => Err(focus_error!(stale, "подписка {:?} не найдена", subscription)),
            Some((SignalSource::Window(window), _)) if !self.windows.contains_key(&window) => {
                Err(focus_error!(stale, "окно {} уже закрыто", window))
            }
            Some(_) => Ok(()),
        }
    }

    fn is_fullscreen(&self, window: WindowId) -> bool {
        self.windows.get(&window).is_some_and(|w| w.fullscreen)
    }

    fn monitor(&self, window: WindowId) -> Option<MonitorIndex> {
        self.windows.get(&window).and_then(|w| w.monitor)
    }

    fn application(&self, window: WindowId) -> Option<AppId> {
        let info = self.windows.get(&window)?;
        match self.identity {
            IdentitySource::GtkApplicationId => info.app_id.clone(),
            IdentitySource::WmClass if info.class.is_empty() => None,
            IdentitySource::WmClass => Some(info.class.clone()),
        }
    }

    fn application_windows(&self, app: &str) -> Vec<WindowId> {
        self.order
            .iter()
            .filter(|id| self.application(**id).as_deref() == Some(app))
            .copied()
            .collect()
    }

    fn monitor_count(&self) -> usize {
        self.monitors.len()
    }

    fn schedule(&mut self, delay: Duration, token: TimerToken) {
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(Inbound::Timer(token)).is_err() {
                debug!("Цикл событий остановлен, таймер {:?} отброшен", token);
            }
        });
    }
}
