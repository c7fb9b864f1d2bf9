//! Outbound side of the system. The engine only emits [`crate::engine::Action`]
//! values; a [`ChatTransport`] implementation owns the actual sends and
//! membership changes, and may refuse an administrative action.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::errors::TransportError;
use crate::identity::Identity;

/// Transport handle shared between the event loop and the tip scheduler.
pub type SharedTransport = Arc<Mutex<Box<dyn ChatTransport>>>;

/// The chat transport collaborator. All methods are synchronous from the
/// caller's perspective; an implementation talking to a network is expected
/// to carry its own timeouts.
pub trait ChatTransport: Send {
    fn send_text(&mut self, chat_id: &str, text: &str) -> Result<(), TransportError>;

    fn send_text_with_mention(
        &mut self,
        chat_id: &str,
        text: &str,
        mention: &Identity,
    ) -> Result<(), TransportError>;

    /// Switch the group between everyone-may-post and admins-only.
    fn set_group_locked(&mut self, chat_id: &str, locked: bool) -> Result<(), TransportError>;

    fn remove_participant(
        &mut self,
        chat_id: &str,
        identity: &Identity,
    ) -> Result<(), TransportError>;

    fn set_participant_admin(
        &mut self,
        chat_id: &str,
        identity: &Identity,
        is_admin: bool,
    ) -> Result<(), TransportError>;

    /// Group chats the bot is currently a member of, for broadcasts.
    fn group_chats(&self) -> Vec<String>;
}

/// Transport that logs every outbound action instead of delivering it. Used
/// by the shipped binary, where the real transport is an external
/// collaborator wired in by the host.
#[derive(Default)]
pub struct LoggingTransport {
    pub groups: Vec<String>,
}

impl ChatTransport for LoggingTransport {
    fn send_text(&mut self, chat_id: &str, text: &str) -> Result<(), TransportError> {
        log::info!("send [{chat_id}]: {text}");
        Ok(())
    }

    fn send_text_with_mention(
        &mut self,
        chat_id: &str,
        text: &str,
        mention: &Identity,
    ) -> Result<(), TransportError> {
        log::info!("send [{chat_id}] @{}: {text}", mention.number());
        Ok(())
    }

    fn set_group_locked(&mut self, chat_id: &str, locked: bool) -> Result<(), TransportError> {
        log::info!("set group {chat_id} locked={locked}");
        Ok(())
    }

    fn remove_participant(
        &mut self,
        chat_id: &str,
        identity: &Identity,
    ) -> Result<(), TransportError> {
        log::info!("remove {} from {chat_id}", identity.number());
        Ok(())
    }

    fn set_participant_admin(
        &mut self,
        chat_id: &str,
        identity: &Identity,
        is_admin: bool,
    ) -> Result<(), TransportError> {
        log::info!("set {} admin={is_admin} in {chat_id}", identity.number());
        Ok(())
    }

    fn group_chats(&self) -> Vec<String> {
        self.groups.clone()
    }
}
