use crate::config::Config;
use crate::error::Result;
use crate::events::{DesktopSnapshot, Inbound};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Trait for window sources that can run in different modes
#[async_trait::async_trait]
pub trait WindowSourceTrait: Send {
    /// Read the current desktop state once
    async fn snapshot(&mut self) -> Result<DesktopSnapshot>;

    /// Keep producing snapshots into the event loop until the receiver goes away
    async fn run(self: Box<Self>, events_tx: UnboundedSender<Inbound>) -> Result<()>;
}

/// Factory function to create an appropriate window source based on the dry_run flag
pub fn create_window_source(
    config: Arc<Config>,
    dry_run: bool,
) -> Result<Box<dyn WindowSourceTrait>> {
    if dry_run {
        Ok(Box::new(super::dry_run::DryRunSource::new(config)))
    } else {
        Ok(Box::new(super::x11::X11Source::new(config)?))
    }
}
