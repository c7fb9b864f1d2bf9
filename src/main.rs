use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenv::dotenv;
use tokio::io::AsyncBufReadExt;
use tokio::sync::Mutex;

use group_warden_bot::config::{JsonFileConfigStore, ModerationConfig};
use group_warden_bot::engine::{MessageEvent, ModerationEngine};
use group_warden_bot::handlers;
use group_warden_bot::keepalive;
use group_warden_bot::responder::NoopResponder;
use group_warden_bot::tip_scheduler::TipScheduler;
use group_warden_bot::transport::{LoggingTransport, SharedTransport};
use group_warden_bot::warning_ledger::{
    LedgerStore, MemoryLedgerStore, RedisLedgerStore, WarningLedger,
};

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();
    dotenv().ok();
    log::info!("Starting the group moderation bot...");

    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "warden.json".to_string());
    let cfg = ModerationConfig::load(&config_path)
        .with_context(|| format!("loading configuration from {config_path}"))?;

    let redis_url = env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1/".to_string());
    let store: Box<dyn LedgerStore> = match RedisLedgerStore::new(&redis_url) {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!("redis unavailable ({e}), warnings will not survive a restart");
            Box::<MemoryLedgerStore>::default()
        }
    };
    let ledger = WarningLedger::open(store);

    let transport: SharedTransport =
        Arc::new(Mutex::new(Box::new(LoggingTransport::default())));
    let mut engine = ModerationEngine::new(
        cfg.clone(),
        Box::new(JsonFileConfigStore::new(&config_path)),
        ledger,
        Box::new(NoopResponder),
    );

    let port = env::var("KEEPALIVE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    tokio::spawn(keepalive::serve(cfg.bot_name.clone(), port));
    tokio::spawn(TipScheduler::new(&cfg, transport.clone()).run());

    // Event loop: one newline-delimited JSON event per line on stdin, applied
    // strictly in arrival order. The real transport is an external
    // collaborator; this binary is the wiring harness around the engine.
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                log::info!("interrupt received, shutting down");
                break;
            }
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<MessageEvent>(&line) {
                        Ok(event) => {
                            let mut transport = transport.lock().await;
                            handlers::handle_event(&mut engine, transport.as_mut(), event);
                        }
                        Err(e) => log::warn!("discarding malformed event: {e}"),
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    log::warn!("stdin closed: {e}");
                    break;
                }
            }
        }
    }

    // Pending ledger mutations must reach durable storage before exit.
    if let Err(e) = engine.ledger_mut().flush() {
        log::error!("final ledger flush failed: {e}");
    }
    log::info!("shutdown complete");
    Ok(())
}
