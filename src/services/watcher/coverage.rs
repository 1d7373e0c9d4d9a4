//! Monitor coverage of an application's windows.
//!
//! Both predicates use set semantics: several windows on the same monitor
//! count once, and the order of windows does not matter.

use crate::events::MonitorIndex;
use crate::services::environment::Environment;
use std::collections::BTreeSet;

/// True when the distinct monitors occupied equal `total_monitors`.
/// Always false without windows, whatever `total_monitors` is.
pub fn covers_all_monitors<I>(monitors: I, total_monitors: usize) -> bool
where
    I: IntoIterator<Item = MonitorIndex>,
{
    let occupied: BTreeSet<MonitorIndex> = monitors.into_iter().collect();
    !occupied.is_empty() && occupied.len() == total_monitors
}

/// True when more than one distinct monitor is occupied.
pub fn spans_multiple_monitors<I>(monitors: I) -> bool
where
    I: IntoIterator<Item = MonitorIndex>,
{
    monitors.into_iter().collect::<BTreeSet<_>>().len() > 1
}

/// Monitors of every live window of `app`; windows without a monitor are skipped.
pub fn application_monitors<E: Environment + ?Sized>(env: &E, app: &str) -> Vec<MonitorIndex> {
    env.application_windows(app)
        .into_iter()
        .filter_map(|window| env.monitor(window))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_windows_never_cover() {
        for total in 0..4 {
            assert!(!covers_all_monitors(Vec::new(), total));
        }
        assert!(!spans_multiple_monitors(Vec::new()));
    }

    #[test]
    fn test_covers_all_monitors() {
        assert!(covers_all_monitors(vec![0, 1, 2], 3));
        assert!(!covers_all_monitors(vec![0, 0, 1], 3));
        assert!(covers_all_monitors(vec![0, 1], 2));
        // Порядок не важен
        assert!(covers_all_monitors(vec![1, 0, 1], 2));
        assert!(covers_all_monitors(vec![0], 1));
        assert!(!covers_all_monitors(vec![0, 1], 1));
    }

    #[test]
    fn test_spans_multiple_monitors() {
        assert!(!spans_multiple_monitors(vec![0]));
        assert!(!spans_multiple_monitors(vec![2, 2, 2]));
        assert!(spans_multiple_monitors(vec![0, 1]));
        assert!(spans_multiple_monitors(vec![2, 0, 2]));
    }
}
