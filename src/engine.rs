//! The moderation decision pipeline.
//!
//! [`ModerationEngine::evaluate`] turns one inbound [`MessageEvent`] into an
//! ordered list of [`Action`]s. It is deterministic given the current rate
//! window and ledger state, and it performs no side effects itself — the
//! event loop in [`crate::handlers`] applies the actions through the
//! transport and the ledger.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::admin_handlers;
use crate::config::{ConfigStore, ModerationConfig, COMMAND_MARKER};
use crate::identity::{is_group_chat, Identity};
use crate::quiet_hours;
use crate::rate_limiter::RateLimiter;
use crate::responder::Responder;
use crate::triggers::{reason, TriggerPolicy};
use crate::warning_ledger::WarningLedger;

/// One inbound message, as delivered by the transport collaborator.
/// Immutable once constructed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    pub chat_id: String,
    pub sender: Identity,
    pub body: String,
    #[serde(default)]
    pub has_link: bool,
    #[serde(default)]
    pub is_sticker: bool,
    #[serde(default)]
    pub has_media: bool,
    pub timestamp: i64,
}

impl MessageEvent {
    /// Canonicalize the sender handle. Called once at the boundary; all
    /// downstream comparisons assume a normalized identity.
    pub fn normalized(mut self) -> Self {
        self.sender = self.sender.normalized();
        self
    }
}

/// A decision the engine hands back to the caller. The engine never executes
/// side effects; the transport collaborator applies these in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Allow,
    Warn { reason: String },
    SendText { text: String },
    SendTextWithMention { text: String, mention: Identity },
    SetGroupLocked { locked: bool },
    RemoveParticipant { identity: Identity },
    SetParticipantAdmin { identity: Identity, is_admin: bool },
}

static INTERROGATIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(what|how|why|when|where|who|which|can|does|is|are)\b")
        .expect("interrogative regex")
});

/// Keywords that route a statement-shaped message to the responder anyway.
const DOMAIN_KEYWORDS: &[&str] = &["rules", "admin", "group", "bot"];

/// Minimum body length for the responder stage; shorter messages are chatter.
const MIN_QUESTION_LEN: usize = 11;

fn looks_like_question(body: &str) -> bool {
    if body.trim().len() < MIN_QUESTION_LEN {
        return false;
    }
    if body.contains('?') || INTERROGATIVE_RE.is_match(body.trim_start()) {
        return true;
    }
    let lowered = body.to_lowercase();
    DOMAIN_KEYWORDS.iter().any(|k| lowered.contains(k))
}

/// Orchestrates rate limiting, quiet hours, instant triggers, owner commands
/// and the question responder into one fixed-priority pipeline.
pub struct ModerationEngine {
    cfg: ModerationConfig,
    cfg_store: Box<dyn ConfigStore>,
    rate_limiter: RateLimiter,
    triggers: TriggerPolicy,
    ledger: WarningLedger,
    responder: Box<dyn Responder>,
}

impl ModerationEngine {
    pub fn new(
        cfg: ModerationConfig,
        cfg_store: Box<dyn ConfigStore>,
        ledger: WarningLedger,
        responder: Box<dyn Responder>,
    ) -> Self {
        let rate_limiter = RateLimiter::new(cfg.flood_control.window_seconds);
        let triggers = TriggerPolicy::from_config(&cfg);
        ModerationEngine {
            cfg,
            cfg_store,
            rate_limiter,
            triggers,
            ledger,
            responder,
        }
    }

    pub fn config(&self) -> &ModerationConfig {
        &self.cfg
    }

    pub fn ledger(&self) -> &WarningLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut WarningLedger {
        &mut self.ledger
    }

    /// Evaluate one event against the fixed priority order, short-circuiting
    /// at the first stage that produces a blocking decision:
    ///
    /// 1. discard empty bodies and non-group contexts
    /// 2. flood control
    /// 3. quiet hours
    /// 4. instant content triggers
    /// 5. owner commands
    /// 6. question responder
    pub fn evaluate(&mut self, event: &MessageEvent) -> Vec<Action> {
        if event.body.trim().is_empty() || !is_group_chat(&event.chat_id) {
            return Vec::new();
        }

        let exempt = self.cfg.is_exempt(&event.sender);

        if self.cfg.flood_control.enabled && !exempt {
            let count = self.rate_limiter.record(&event.sender, event.timestamp);
            if count > self.cfg.flood_control.max_messages_per_window {
                return vec![
                    Action::SendText {
                        text: format!(
                            "{} is sending messages too quickly. Slow down.",
                            event.sender.number()
                        ),
                    },
                    Action::Warn {
                        reason: reason::FLOOD.to_string(),
                    },
                ];
            }
        }

        if !exempt && quiet_hours::applies(&self.cfg.quiet_hours, event.timestamp) {
            return vec![Action::SendText {
                text: self.cfg.quiet_hours.reminder_message.clone(),
            }];
        }

        if !exempt {
            if let Some(reason) = self.triggers.classify(event) {
                return vec![Action::Warn {
                    reason: reason.to_string(),
                }];
            }
        }

        let body = event.body.trim();
        if body.starts_with(COMMAND_MARKER) && self.cfg.is_owner(&event.sender) {
            let cmd = admin_handlers::parse_command(body);
            return admin_handlers::dispatch(
                cmd,
                &mut self.cfg,
                self.cfg_store.as_mut(),
                &mut self.ledger,
            );
        }

        if looks_like_question(&event.body) {
            if let Some(answer) = self.responder.answer(&event.body) {
                return vec![Action::SendText { text: answer }];
            }
        }

        vec![Action::Allow]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_detection_needs_length() {
        assert!(!looks_like_question("why?"));
        assert!(looks_like_question("why is the group locked?"));
    }

    #[test]
    fn question_detection_on_interrogative_start() {
        assert!(looks_like_question("How do I join the meetup"));
        assert!(!looks_like_question("meet me at the corner"));
    }

    #[test]
    fn question_detection_on_domain_keyword() {
        assert!(looks_like_question("please post the rules again"));
    }
}
