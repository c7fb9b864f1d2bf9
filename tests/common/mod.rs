//! Shared fixtures for the integration tests: a recording transport, a
//! shared in-memory ledger store that survives an engine rebuild, and event
//! builders.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use group_warden_bot::config::{MemoryConfigStore, ModerationConfig};
use group_warden_bot::engine::{MessageEvent, ModerationEngine};
use group_warden_bot::errors::{PersistenceError, TransportError};
use group_warden_bot::identity::Identity;
use group_warden_bot::responder::{NoopResponder, Responder};
use group_warden_bot::transport::ChatTransport;
use group_warden_bot::warning_ledger::{LedgerStore, WarningLedger, WarningRecord};

pub const GROUP: &str = "12036304@g.us";
pub const OWNER: &str = "923000000001";

/// Everything the engine asked the transport to do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Text { chat_id: String, text: String },
    Mention { chat_id: String, text: String, mention: Identity },
    Lock { chat_id: String, locked: bool },
    Remove { chat_id: String, identity: Identity },
    Admin { chat_id: String, identity: Identity, is_admin: bool },
}

#[derive(Default)]
pub struct RecordingTransport {
    pub outbound: Vec<Outbound>,
    pub groups: Vec<String>,
    /// When set, administrative actions are refused the way a transport
    /// without admin rights refuses them.
    pub refuse_admin_actions: bool,
}

impl RecordingTransport {
    pub fn texts(&self) -> Vec<&str> {
        self.outbound
            .iter()
            .filter_map(|o| match o {
                Outbound::Text { text, .. } => Some(text.as_str()),
                Outbound::Mention { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn admin_result(&self) -> Result<(), TransportError> {
        if self.refuse_admin_actions {
            Err(TransportError::Privilege("bot is not a group admin".into()))
        } else {
            Ok(())
        }
    }
}

impl ChatTransport for RecordingTransport {
    fn send_text(&mut self, chat_id: &str, text: &str) -> Result<(), TransportError> {
        self.outbound.push(Outbound::Text {
            chat_id: chat_id.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    fn send_text_with_mention(
        &mut self,
        chat_id: &str,
        text: &str,
        mention: &Identity,
    ) -> Result<(), TransportError> {
        self.outbound.push(Outbound::Mention {
            chat_id: chat_id.to_string(),
            text: text.to_string(),
            mention: mention.clone(),
        });
        Ok(())
    }

    fn set_group_locked(&mut self, chat_id: &str, locked: bool) -> Result<(), TransportError> {
        let result = self.admin_result();
        if result.is_ok() {
            self.outbound.push(Outbound::Lock {
                chat_id: chat_id.to_string(),
                locked,
            });
        }
        result
    }

    fn remove_participant(
        &mut self,
        chat_id: &str,
        identity: &Identity,
    ) -> Result<(), TransportError> {
        let result = self.admin_result();
        if result.is_ok() {
            self.outbound.push(Outbound::Remove {
                chat_id: chat_id.to_string(),
                identity: identity.clone(),
            });
        }
        result
    }

    fn set_participant_admin(
        &mut self,
        chat_id: &str,
        identity: &Identity,
        is_admin: bool,
    ) -> Result<(), TransportError> {
        let result = self.admin_result();
        if result.is_ok() {
            self.outbound.push(Outbound::Admin {
                chat_id: chat_id.to_string(),
                identity: identity.clone(),
                is_admin,
            });
        }
        result
    }

    fn group_chats(&self) -> Vec<String> {
        self.groups.clone()
    }
}

/// Ledger store over shared memory, so a rebuilt engine reloads what the
/// previous one persisted — a simulated restart.
#[derive(Clone, Default)]
pub struct SharedMemoryStore {
    records: Arc<Mutex<HashMap<Identity, WarningRecord>>>,
}

impl LedgerStore for SharedMemoryStore {
    fn load(&mut self) -> Result<HashMap<Identity, WarningRecord>, PersistenceError> {
        Ok(self.records.lock().unwrap().clone())
    }

    fn save(&mut self, records: &HashMap<Identity, WarningRecord>) -> Result<(), PersistenceError> {
        *self.records.lock().unwrap() = records.clone();
        Ok(())
    }
}

/// A responder with one canned answer, for the question stage.
pub struct CannedResponder(pub &'static str);

impl Responder for CannedResponder {
    fn answer(&self, _question: &str) -> Option<String> {
        Some(self.0.to_string())
    }
}

pub fn base_config() -> ModerationConfig {
    let mut cfg = ModerationConfig::default();
    cfg.owner = Identity::normalize(OWNER);
    cfg
}

pub fn engine_with(cfg: ModerationConfig) -> ModerationEngine {
    engine_with_store(cfg, SharedMemoryStore::default())
}

pub fn engine_with_store(cfg: ModerationConfig, store: SharedMemoryStore) -> ModerationEngine {
    ModerationEngine::new(
        cfg,
        Box::<MemoryConfigStore>::default(),
        WarningLedger::open(Box::new(store)),
        Box::new(NoopResponder),
    )
}

pub fn message(sender: &str, body: &str, timestamp: i64) -> MessageEvent {
    MessageEvent {
        chat_id: GROUP.to_string(),
        sender: Identity::raw(sender),
        body: body.to_string(),
        has_link: false,
        is_sticker: false,
        has_media: false,
        timestamp,
    }
}

pub fn link_message(sender: &str, timestamp: i64) -> MessageEvent {
    MessageEvent {
        has_link: true,
        ..message(sender, "check https://example.com", timestamp)
    }
}
