//! Environment seam between the watcher and the desktop.
//!
//! The watcher only talks to the [`Environment`] trait. [`Desktop`] is the
//! production implementation fed with snapshots by a window source; tests use
//! an in-memory fake.

mod desktop;
mod r#trait;

pub use self::desktop::Desktop;
pub use self::r#trait::Environment;
