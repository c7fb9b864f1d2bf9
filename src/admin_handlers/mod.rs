//! Owner-only administrative commands: parsing and execution.

mod commands;
mod dispatcher;

pub use commands::{parse_command, AdminCommand, WhitelistOp};
pub use dispatcher::dispatch;
