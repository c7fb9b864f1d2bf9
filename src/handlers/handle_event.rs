//! Applies the engine's decisions through the transport and the ledger.
//!
//! Evaluation and application for one event run back to back on the single
//! event loop, so a `Warn` decision and the ledger mutation it implies are
//! atomic with respect to other events for the same sender.

use crate::engine::{Action, MessageEvent, ModerationEngine};
use crate::errors::TransportError;
use crate::transport::ChatTransport;

/// Process one inbound event end to end: normalize the sender, evaluate the
/// pipeline, apply the resulting actions. Never fails: transport errors are
/// logged and swallowed so the next event always gets processed.
pub fn handle_event(
    engine: &mut ModerationEngine,
    transport: &mut dyn ChatTransport,
    event: MessageEvent,
) {
    let event = event.normalized();
    let actions = engine.evaluate(&event);
    apply_actions(engine, transport, &event, actions);
}

fn apply_actions(
    engine: &mut ModerationEngine,
    transport: &mut dyn ChatTransport,
    event: &MessageEvent,
    actions: Vec<Action>,
) {
    for action in actions {
        match action {
            Action::Allow => {}
            Action::Warn { reason } => apply_warning(engine, transport, event, &reason),
            Action::SendText { text } => {
                swallow(transport.send_text(&event.chat_id, &text));
            }
            Action::SendTextWithMention { text, mention } => {
                swallow(transport.send_text_with_mention(&event.chat_id, &text, &mention));
            }
            Action::SetGroupLocked { locked } => {
                let refused = transport_result(transport.set_group_locked(&event.chat_id, locked));
                report_privileged(transport, &event.chat_id, refused);
            }
            Action::RemoveParticipant { identity } => {
                let refused =
                    transport_result(transport.remove_participant(&event.chat_id, &identity));
                report_privileged(transport, &event.chat_id, refused);
            }
            Action::SetParticipantAdmin { identity, is_admin } => {
                let refused = transport_result(transport.set_participant_admin(
                    &event.chat_id,
                    &identity,
                    is_admin,
                ));
                report_privileged(transport, &event.chat_id, refused);
            }
        }
    }
}

/// The ledger half of a `Warn` decision: record it, report the new count,
/// and escalate once the limit is reached.
fn apply_warning(
    engine: &mut ModerationEngine,
    transport: &mut dyn ChatTransport,
    event: &MessageEvent,
    reason: &str,
) {
    let warn_limit = engine.config().warn_limit;
    let count = engine.ledger_mut().add_warning(&event.sender, reason);
    let text = format!(
        "Warning {}/{} for {}: {}",
        count,
        warn_limit,
        event.sender.number(),
        reason
    );
    swallow(transport.send_text_with_mention(&event.chat_id, &text, &event.sender));
    // Escalate exactly once, on the warning that reaches the limit.
    if count == warn_limit {
        swallow(transport.send_text(
            &event.chat_id,
            &format!(
                "{} has reached the warning limit.",
                event.sender.number()
            ),
        ));
    }
}

/// A privilege refusal becomes a user-visible failure message; any other
/// failure is just logged.
fn report_privileged(
    transport: &mut dyn ChatTransport,
    chat_id: &str,
    refused: Option<String>,
) {
    if let Some(text) = refused {
        swallow(transport.send_text(chat_id, &text));
    }
}

fn transport_result(result: Result<(), TransportError>) -> Option<String> {
    match result {
        Ok(()) => None,
        Err(TransportError::Privilege(detail)) => {
            log::warn!("administrative action refused: {detail}");
            Some(format!("Could not apply that action: {detail}"))
        }
        Err(e) => {
            log::error!("transport error: {e}");
            None
        }
    }
}

fn swallow(result: Result<(), TransportError>) {
    if let Err(e) = result {
        log::error!("outbound send failed: {e}");
    }
}
