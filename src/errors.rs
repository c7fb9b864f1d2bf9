//! Error taxonomy. Configuration problems are fatal at startup; everything
//! else is logged and survived so one bad event can never stall the pipeline.

use thiserror::Error;

/// Malformed or missing configuration. The process does not start.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {0}: {1}")]
    Read(String, #[source] std::io::Error),
    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Ledger or config write/read failure. Non-fatal: in-memory state stays
/// authoritative and the next mutation retries the write.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("store unavailable: {0}")]
    Store(String),
    #[error("cannot encode state: {0}")]
    Encode(String),
    #[error("cannot decode persisted state: {0}")]
    Decode(String),
}

impl From<redis::RedisError> for PersistenceError {
    fn from(e: redis::RedisError) -> Self {
        PersistenceError::Store(e.to_string())
    }
}

/// Outbound side failures reported by the transport collaborator.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The transport refused an administrative action, typically because the
    /// bot lacks admin rights in the chat. Surfaced to the owner as a
    /// user-visible failure message.
    #[error("insufficient privilege: {0}")]
    Privilege(String),
    /// A plain send failed. Logged and swallowed.
    #[error("send failed: {0}")]
    Send(String),
}
