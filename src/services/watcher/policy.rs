use crate::config::{FullscreenPredicate, PolicyConfig};
use crate::services::environment::Environment;
use std::time::Duration;
use tracing::debug;

use super::coverage::{application_monitors, covers_all_monitors, spans_multiple_monitors};

/// Что делать при смене fullscreen-состояния отслеживаемого окна
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    /// Проверить покрытие мониторов после задержки
    Evaluate(Duration),
    /// Немедленно вернуть исходный режим фокуса
    Restore,
}

/// Decides how a fullscreen transition of a tracked window affects focus.
///
/// Entering fullscreen never switches immediately: the application is still
/// spreading its windows over the monitors when the flag flips, so coverage
/// is evaluated after `delay` against the application's live window set.
#[derive(Debug, Clone)]
pub struct FullscreenPolicy {
    predicate: FullscreenPredicate,
    delay: Duration,
}

impl FullscreenPolicy {
    pub fn new(predicate: FullscreenPredicate, delay: Duration) -> Self {
        Self { predicate, delay }
    }

    pub fn from_config(config: &PolicyConfig) -> Self {
        Self::new(config.predicate, config.fullscreen_delay())
    }

    pub fn on_fullscreen_changed(&self, fullscreen: bool) -> Reaction {
        if fullscreen {
            Reaction::Evaluate(self.delay)
        } else {
            Reaction::Restore
        }
    }

    /// Нужно ли включать sloppy-фокус для приложения прямо сейчас
    pub fn should_switch<E: Environment + ?Sized>(&self, env: &E, app: &str) -> bool {
        let result = match self.predicate {
            FullscreenPredicate::CoversAllMonitors => {
                covers_all_monitors(application_monitors(env, app), env.monitor_count())
            }
            FullscreenPredicate::SpansMultipleMonitors => {
                spans_multiple_monitors(application_monitors(env, app))
            }
            FullscreenPredicate::AnyFullscreen => env
                .application_windows(app)
                .into_iter()
                .any(|window| env.is_fullscreen(window)),
        };
        debug!("Проверка {:?} для {}: {}", self.predicate, app, result);
        result
    }
}
