//! Periodic tip broadcaster. Independent of the message pipeline: it only
//! reads configuration and talks to the transport, never the ledger.

use rand::seq::SliceRandom;
use tokio::time::{sleep, Duration};

use crate::config::{ModerationConfig, DEFAULT_TIP_INTERVAL_HOURS, TIP_INTER_SEND_DELAY_SECS};
use crate::transport::SharedTransport;

pub struct TipScheduler {
    tips: Vec<String>,
    interval: Duration,
    transport: SharedTransport,
}

impl TipScheduler {
    pub fn new(cfg: &ModerationConfig, transport: SharedTransport) -> Self {
        let hours = if cfg.daily_tip_interval_hours == 0 {
            DEFAULT_TIP_INTERVAL_HOURS
        } else {
            cfg.daily_tip_interval_hours
        };
        TipScheduler {
            tips: cfg.daily_tips.clone(),
            interval: Duration::from_secs(hours * 3600),
            transport,
        }
    }

    /// Fire forever on the configured interval. Exits immediately when no
    /// tips are configured.
    pub async fn run(self) {
        if self.tips.is_empty() {
            log::info!("no daily tips configured, scheduler idle");
            return;
        }
        loop {
            sleep(self.interval).await;
            self.broadcast_once().await;
        }
    }

    /// Send one randomly chosen tip to every group the transport reports,
    /// pacing the sends. Selection is uniform with replacement; repeats are
    /// possible.
    pub async fn broadcast_once(&self) {
        let tip = match pick_tip(&self.tips) {
            Some(tip) => tip.clone(),
            None => return,
        };
        let groups = self.transport.lock().await.group_chats();
        for chat_id in groups {
            if let Err(e) = self.transport.lock().await.send_text(&chat_id, &tip) {
                log::error!("tip broadcast to {chat_id} failed: {e}");
            }
            sleep(Duration::from_secs(TIP_INTER_SEND_DELAY_SECS)).await;
        }
    }
}

fn pick_tip(tips: &[String]) -> Option<&String> {
    tips.choose(&mut rand::thread_rng())
}
