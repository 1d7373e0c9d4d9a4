use crate::events::Inbound;
use crate::services::environment::Desktop;
use crate::services::settings::SettingsStore;
use crate::services::watcher::Watcher;
use std::future::Future;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};

/// Единый цикл событий: снимки рабочего стола и таймеры обрабатываются строго по одному.
///
/// Возвращается при срабатывании `shutdown` или закрытии канала; остановка
/// watcher остаётся за вызывающим.
pub async fn run_until<S, F>(
    watcher: &mut Watcher<Desktop, S>,
    mut events_rx: UnboundedReceiver<Inbound>,
    shutdown: F,
) where
    S: SettingsStore,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Получен сигнал завершения");
                break;
            }
            message = events_rx.recv() => match message {
                Some(Inbound::Snapshot(snapshot)) => {
                    let notifications = watcher.env_mut().apply(snapshot);
                    for notification in notifications {
                        watcher.dispatch(notification);
                    }
                }
                Some(Inbound::Timer(token)) => watcher.fire(token),
                None => {
                    warn!("Канал событий закрыт");
                    break;
                }
            }
        }
    }
}
