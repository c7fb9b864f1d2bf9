//! Command execution. The dispatcher owns no state of its own; it reads and
//! writes the warning ledger and the configuration it is handed, and returns
//! the transport-side effects as actions.

use crate::admin_handlers::{AdminCommand, WhitelistOp};
use crate::config::{ConfigStore, ModerationConfig};
use crate::engine::Action;
use crate::warning_ledger::WarningLedger;

const HELP_TEXT: &str = "Supported commands:\n\
    !rules\n\
    !status\n\
    !warnreset\n\
    !whitelist {add|remove|list} [number]\n\
    !grouplock / !groupunlock\n\
    !kick <number> / !ban <number>\n\
    !makeadmin <number> / !removeadmin <number>\n\
    !warn <number> [reason]";

/// Execute an owner command. Whitelist mutations persist the configuration
/// synchronously; a persist failure is logged and the in-memory change
/// stands.
pub fn dispatch(
    cmd: AdminCommand,
    cfg: &mut ModerationConfig,
    cfg_store: &mut dyn ConfigStore,
    ledger: &mut WarningLedger,
) -> Vec<Action> {
    match cmd {
        AdminCommand::Rules => vec![Action::SendText {
            text: cfg.group_rules_text.clone(),
        }],
        AdminCommand::Status => vec![Action::SendText {
            text: format!(
                "{} is online.\nWarned senders: {}\nWarn limit: {}",
                cfg.bot_name,
                ledger.len(),
                cfg.warn_limit
            ),
        }],
        AdminCommand::WarnReset => {
            ledger.reset();
            vec![Action::SendText {
                text: "Warning ledger cleared.".to_string(),
            }]
        }
        AdminCommand::Whitelist(op) => whitelist(op, cfg, cfg_store),
        AdminCommand::GroupLock => vec![Action::SetGroupLocked { locked: true }],
        AdminCommand::GroupUnlock => vec![Action::SetGroupLocked { locked: false }],
        AdminCommand::Kick(identity) | AdminCommand::Ban(identity) => {
            vec![Action::RemoveParticipant { identity }]
        }
        AdminCommand::MakeAdmin(identity) => vec![Action::SetParticipantAdmin {
            identity,
            is_admin: true,
        }],
        AdminCommand::RemoveAdmin(identity) => vec![Action::SetParticipantAdmin {
            identity,
            is_admin: false,
        }],
        AdminCommand::Warn { identity, reason } => {
            let count = ledger.add_warning(&identity, &reason);
            let mut actions = vec![Action::SendText {
                text: format!(
                    "{} warned ({}/{}): {}",
                    identity.number(),
                    count,
                    cfg.warn_limit,
                    reason
                ),
            }];
            if count == cfg.warn_limit {
                actions.push(Action::SendText {
                    text: format!(
                        "{} has reached the warning limit.",
                        identity.number()
                    ),
                });
            }
            actions
        }
        AdminCommand::Usage(usage) => vec![Action::SendText {
            text: usage.to_string(),
        }],
        AdminCommand::Unknown => vec![Action::SendText {
            text: HELP_TEXT.to_string(),
        }],
    }
}

fn whitelist(
    op: WhitelistOp,
    cfg: &mut ModerationConfig,
    cfg_store: &mut dyn ConfigStore,
) -> Vec<Action> {
    match op {
        WhitelistOp::Add(identity) => {
            let added = cfg.whitelist.insert(identity.clone());
            if added {
                save_config(cfg, cfg_store);
            }
            let text = if added {
                format!("{} added to whitelist.", identity.number())
            } else {
                format!("{} is already whitelisted.", identity.number())
            };
            vec![Action::SendText { text }]
        }
        WhitelistOp::Remove(identity) => {
            let removed = cfg.whitelist.remove(&identity);
            if removed {
                save_config(cfg, cfg_store);
            }
            let text = if removed {
                format!("{} removed from whitelist.", identity.number())
            } else {
                format!("{} is not on the whitelist.", identity.number())
            };
            vec![Action::SendText { text }]
        }
        WhitelistOp::List => {
            let text = if cfg.whitelist.is_empty() {
                "Whitelist is empty.".to_string()
            } else {
                let numbers: Vec<&str> =
                    cfg.whitelist.iter().map(|id| id.number()).collect();
                format!("Whitelisted:\n{}", numbers.join("\n"))
            };
            vec![Action::SendText { text }]
        }
    }
}

fn save_config(cfg: &ModerationConfig, cfg_store: &mut dyn ConfigStore) {
    if let Err(e) = cfg_store.save(cfg) {
        log::warn!("config persist failed, in-memory whitelist stands: {e}");
    }
}
