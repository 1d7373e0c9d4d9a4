pub mod environment;
pub mod runner;
pub mod settings;
pub mod watcher;
pub mod window_source;

pub use environment::Desktop;
pub use settings::create_settings_store;
pub use watcher::Watcher;
pub use window_source::create_window_source;
