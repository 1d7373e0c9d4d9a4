use crate::error::Result;
use crate::events::{AppId, MonitorIndex, SignalKind, SignalSource, SubscriptionId, TimerToken, WindowId};
use std::time::Duration;

/// Windowing environment as seen by the watcher.
///
/// Everything the watcher needs from the compositor goes through this trait:
/// window enumeration, notification subscriptions, per-window queries and
/// one-shot timers. Deliveries come back to the watcher as
/// [`crate::events::Notification`] and [`TimerToken`] values through the
/// event loop, never as callbacks.
pub trait Environment {
    /// Currently open windows
    fn windows(&self) -> Vec<WindowId>;

    /// Subscribe to `kind` notifications of `source`
    fn subscribe(&mut self, source: SignalSource, kind: SignalKind) -> SubscriptionId;

    /// Drop a subscription. Returns `FocusError::StaleReference` when the
    /// subscription or its window is already gone.
    fn unsubscribe(&mut self, subscription: SubscriptionId) -> Result<()>;

    fn is_fullscreen(&self, window: WindowId) -> bool;

    fn monitor(&self, window: WindowId) -> Option<MonitorIndex>;

    /// Owning application, `None` while the association is not known yet
    fn application(&self, window: WindowId) -> Option<AppId>;

    /// All live windows of an application
    fn application_windows(&self, app: &str) -> Vec<WindowId>;

    fn monitor_count(&self) -> usize;

    /// Deliver `token` back to the watcher once, after `delay`
    fn schedule(&mut self, delay: Duration, token: TimerToken);
}
