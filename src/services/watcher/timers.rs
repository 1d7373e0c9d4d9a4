use crate::events::{TimerToken, WindowId};
use std::collections::HashMap;

/// Зачем был запланирован таймер
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pending {
    /// Проверка покрытия мониторов после входа окна в fullscreen
    EvaluateCoverage(WindowId),
    /// Отложенное отслеживание только что созданного окна
    TrackCreated(WindowId),
}

/// Outstanding one-shot timers.
///
/// Timers cannot be cancelled once handed to the environment, so they are
/// invalidated here instead: a token that is no longer present is stale and
/// its expiry is ignored. Tokens only grow, so an expiry from an earlier
/// activation never matches a newer entry.
#[derive(Debug, Default)]
pub struct PendingTimers {
    next: u64,
    pending: HashMap<TimerToken, Pending>,
}

impl PendingTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, purpose: Pending) -> TimerToken {
        self.next += 1;
        let token = TimerToken(self.next);
        self.pending.insert(token, purpose);
        token
    }

    /// Забирает таймер при срабатывании; `None` для устаревшего токена
    pub fn take(&mut self, token: TimerToken) -> Option<Pending> {
        self.pending.remove(&token)
    }

    /// Инвалидирует все проверки покрытия для окна
    pub fn invalidate_evaluations(&mut self, window: WindowId) -> usize {
        let before = self.pending.len();
        self.pending
            .retain(|_, pending| *pending != Pending::EvaluateCoverage(window));
        before - self.pending.len()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalidated_tokens_become_stale() {
        let mut timers = PendingTimers::new();
        let eval = timers.register(Pending::EvaluateCoverage(WindowId(1)));
        let other = timers.register(Pending::EvaluateCoverage(WindowId(2)));
        let created = timers.register(Pending::TrackCreated(WindowId(1)));

        assert_eq!(timers.invalidate_evaluations(WindowId(1)), 1);
        assert_eq!(timers.take(eval), None);
        assert_eq!(timers.take(other), Some(Pending::EvaluateCoverage(WindowId(2))));
        assert_eq!(timers.take(created), Some(Pending::TrackCreated(WindowId(1))));
        // Каждый таймер срабатывает один раз
        assert_eq!(timers.take(created), None);
    }

    #[test]
    fn test_tokens_are_not_reused_after_clear() {
        let mut timers = PendingTimers::new();
        let old = timers.register(Pending::TrackCreated(WindowId(5)));
        timers.clear();
        assert!(timers.is_empty());

        let new = timers.register(Pending::TrackCreated(WindowId(5)));
        assert_ne!(old, new);
        assert_eq!(timers.take(old), None);
        assert_eq!(timers.len(), 1);
    }
}
