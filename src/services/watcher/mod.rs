//! Watcher service: window tracking and focus-mode reconciliation.
//!
//! Everything in here is synchronous and environment-agnostic. The watcher
//! reaches the desktop only through [`Environment`](crate::services::environment::Environment)
//! and the settings only through `FocusSettings`.

mod coverage;
mod focus_settings;
mod policy;
mod registry;
mod timers;
mod watcher;

#[cfg(test)]
pub(crate) mod fake;

pub use self::watcher::Watcher;
