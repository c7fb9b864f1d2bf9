pub mod admin_handlers;
pub mod config;
pub mod engine;
pub mod errors;
pub mod handlers;
pub mod identity;
pub mod keepalive;
pub mod quiet_hours;
pub mod rate_limiter;
pub mod responder;
pub mod tip_scheduler;
pub mod transport;
pub mod triggers;
pub mod utils;
pub mod warning_ledger;
