//! WindowSource service: responsibility and boundaries
//!
//! This module and its submodules are responsible ONLY for reading the desktop
//! state (windows, their application, geometry and fullscreen flag, monitors)
//! and emitting full snapshots into the event loop. Diffing snapshots into
//! notifications belongs to `Desktop`; every focus decision belongs to the
//! watcher.

mod dry_run;
mod wmctrl;
mod x11;
mod xprop;
mod xrandr;
mod r#trait;

pub use self::r#trait::create_window_source;
