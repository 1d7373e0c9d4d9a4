use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::mpsc::unbounded_channel;
use tracing::{error, info, warn};
mod config;
mod error;
mod events;
mod services;
mod utils;

use config::Config;
use services::{create_settings_store, create_window_source, runner, Desktop, Watcher};

#[derive(Parser, Debug)]
#[command(name = "focus-mode-switcher")]
#[command(about = "Включает sloppy-фокус, пока целевое приложение развёрнуто на все мониторы")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "focus-mode-switcher.toml")]
    config: String,

    /// Режим сухого запуска (эмуляция окон, настройки только в памяти)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (по умолчанию из конфигурации)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Загрузка конфигурации
    let config = Arc::new(Config::load(&args.config)?);

    // Инициализация системы логирования
    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    init_tracing(level, &config.logging.filter)?;

    info!("Запуск focus-mode-switcher v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    if args.dry_run {
        warn!("Режим сухого запуска - настройки GNOME не изменяются");
    } else {
        utils::session::check_session()?;
    }

    let (events_tx, events_rx) = unbounded_channel();
    let mut source = create_window_source(config.clone(), args.dry_run)?;

    let mut desktop = Desktop::new(config.target.identity, events_tx.clone());
    desktop.prime(source.snapshot().await?);

    let store = create_settings_store(args.dry_run, &config.settings);
    let mut watcher = Watcher::new(desktop, store, &config);
    watcher.start()?;

    let source_handle = tokio::spawn(async move {
        if let Err(e) = source.run(events_tx).await {
            error!("Ошибка в WindowSource: {}", e);
        }
    });

    info!("Отслеживание окон {} запущено", config.target.app_id);

    runner::run_until(&mut watcher, events_rx, shutdown_signal()).await;

    info!("Завершение работы...");

    // Сначала возвращаем настройки, затем останавливаем опрос
    watcher.stop();
    source_handle.abort();
    let _ = source_handle.await;

    info!("focus-mode-switcher завершил работу");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal as unix_signal, SignalKind};

        match unix_signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    result = signal::ctrl_c() => log_ctrl_c(result),
                    _ = terminate.recv() => info!("Получен SIGTERM"),
                }
                return;
            }
            Err(e) => warn!("Не удалось подписаться на SIGTERM: {}", e),
        }
    }

    log_ctrl_c(signal::ctrl_c().await);
}

fn log_ctrl_c(result: std::io::Result<()>) {
    match result {
        Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
        Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
    }
}

fn init_tracing(level: &str, filter: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("{},{}", level, filter)))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().compact())
        .init();

    Ok(())
}
