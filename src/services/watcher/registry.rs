use crate::events::{SignalKind, SignalSource, SubscriptionId, WindowId};
use crate::services::environment::Environment;
use smallvec::SmallVec;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Подписки одного окна: fullscreen и unmanaged
pub type SubscriptionSet = SmallVec<[SubscriptionId; 2]>;

/// Куда доставлять уведомление по подписке
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub window: WindowId,
    pub kind: SignalKind,
}

/// Tracked windows and the subscriptions the watcher holds on them.
///
/// A window is registered at most once. Every subscription id stored in a
/// window's set also has a route, and both disappear together on untrack.
#[derive(Debug, Default)]
pub struct WindowRegistry {
    windows: HashMap<WindowId, SubscriptionSet>,
    routes: HashMap<SubscriptionId, Route>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, window: WindowId) -> bool {
        self.windows.contains_key(&window)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn route(&self, subscription: SubscriptionId) -> Option<Route> {
        self.routes.get(&subscription).copied()
    }

    #[allow(dead_code)]
    pub fn subscriptions(&self, window: WindowId) -> Option<&SubscriptionSet> {
        self.windows.get(&window)
    }

    /// Начинает отслеживать окно целевого приложения. Возвращает true, если окно добавлено.
    pub fn track<E: Environment + ?Sized>(&mut self, env: &mut E, window: WindowId, target_app: &str) -> bool {
        if self.contains(window) {
            debug!("Окно {} уже отслеживается", window);
            return false;
        }

        match env.application(window) {
            None => {
                debug!("Окно {} без приложения - пропускаем", window);
                return false;
            }
            Some(app) if app != target_app => {
                debug!("Окно {} принадлежит {} - пропускаем", window, app);
                return false;
            }
            Some(_) => {}
        }

        let mut set = SubscriptionSet::new();
        for kind in [SignalKind::FullscreenChanged, SignalKind::Unmanaged] {
            let id = env.subscribe(SignalSource::Window(window), kind);
            self.routes.insert(id, Route { window, kind });
            set.push(id);
        }
        self.windows.insert(window, set);

        info!("Отслеживаем окно {} приложения {}", window, target_app);
        true
    }

    /// Отписывается от всех уведомлений окна. Ошибки отписки (окно уже уничтожено) игнорируются.
    pub fn untrack<E: Environment + ?Sized>(&mut self, env: &mut E, window: WindowId) -> bool {
        let Some(set) = self.windows.remove(&window) else {
            return false;
        };

        for id in set {
            self.routes.remove(&id);
            match env.unsubscribe(id) {
                Ok(()) => {}
                Err(e) if e.is_stale() => debug!("Отписка {:?} от окна {}: {}", id, window, e),
                Err(e) => warn!("Не удалось отписаться {:?} от окна {}: {}", id, window, e),
            }
        }

        info!("Окно {} больше не отслеживается", window);
        true
    }

    pub fn untrack_all<E: Environment + ?Sized>(&mut self, env: &mut E) {
        let mut windows: Vec<WindowId> = self.windows.keys().copied().collect();
        windows.sort();
        for window in windows {
            self.untrack(env, window);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::watcher::fake::FakeEnvironment;

    const APP: &str = "com.nicesoftware.DcvViewer";

    fn env() -> FakeEnvironment {
        let mut env = FakeEnvironment::new(2);
        env.add_window(WindowId(1), Some(APP), Some(0));
        env.add_window(WindowId(2), Some(APP), Some(1));
        env.add_window(WindowId(3), Some("org.gnome.Terminal"), Some(0));
        env.add_window(WindowId(4), None, Some(0));
        env
    }

    #[test]
    fn test_track_only_target_windows_once() {
        let mut env = env();
        let mut registry = WindowRegistry::new();

        assert!(registry.track(&mut env, WindowId(1), APP));
        assert!(!registry.track(&mut env, WindowId(1), APP));
        assert!(!registry.track(&mut env, WindowId(3), APP));
        assert!(!registry.track(&mut env, WindowId(4), APP));
        assert!(!registry.track(&mut env, WindowId(99), APP));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.subscriptions(WindowId(1)).map(|s| s.len()), Some(2));
        assert_eq!(env.active_subscriptions(), 2);
        assert!(env.subscriptions_on(WindowId(3)).is_empty());
    }

    #[test]
    fn test_routes_follow_subscriptions() {
        let mut env = env();
        let mut registry = WindowRegistry::new();
        registry.track(&mut env, WindowId(2), APP);

        let set = registry.subscriptions(WindowId(2)).unwrap().clone();
        assert_eq!(
            registry.route(set[0]),
            Some(Route { window: WindowId(2), kind: SignalKind::FullscreenChanged })
        );
        assert_eq!(
            registry.route(set[1]),
            Some(Route { window: WindowId(2), kind: SignalKind::Unmanaged })
        );

        registry.untrack(&mut env, WindowId(2));
        assert_eq!(registry.route(set[0]), None);
        assert_eq!(registry.route(set[1]), None);
    }

    #[test]
    fn test_untrack_swallows_stale_references() {
        let mut env = env();
        let mut registry = WindowRegistry::new();
        registry.track(&mut env, WindowId(1), APP);

        env.destroy_window(WindowId(1));
        assert!(registry.untrack(&mut env, WindowId(1)));
        assert!(!registry.contains(WindowId(1)));
        assert!(!registry.untrack(&mut env, WindowId(1)));
        assert_eq!(env.stale_unsubscribes(), 2);
    }

    #[test]
    fn test_any_track_untrack_sequence_keeps_single_entries() {
        let mut env = env();
        let mut registry = WindowRegistry::new();
        let ops = [(1, true), (1, true), (2, true), (1, false), (1, true), (2, true), (2, false), (2, false), (1, true)];

        for (window, track) in ops {
            if track {
                registry.track(&mut env, WindowId(window), APP);
            } else {
                registry.untrack(&mut env, WindowId(window));
            }
            // Ровно две подписки на каждое отслеживаемое окно
            assert_eq!(env.active_subscriptions(), registry.len() * 2);
        }

        assert_eq!(registry.len(), 1);
        registry.untrack_all(&mut env);
        assert!(registry.is_empty());
        assert_eq!(env.active_subscriptions(), 0);

        // На пустом реестре безопасно
        registry.untrack_all(&mut env);
    }
}
