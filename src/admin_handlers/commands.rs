//! Command parsing. A command line starts with the marker character; tokens
//! are whitespace-separated, the first token (case-insensitive) selects the
//! handler and the rest are positional arguments.

use crate::config::COMMAND_MARKER;
use crate::identity::Identity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WhitelistOp {
    Add(Identity),
    Remove(Identity),
    List,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    Rules,
    Status,
    WarnReset,
    Whitelist(WhitelistOp),
    GroupLock,
    GroupUnlock,
    Kick(Identity),
    Ban(Identity),
    MakeAdmin(Identity),
    RemoveAdmin(Identity),
    Warn { identity: Identity, reason: String },
    /// Unrecognized token, or a recognized one with its arguments missing.
    /// Resolves to user-visible help text, not an error.
    Unknown,
    /// A recognized command with a malformed argument list; carries the
    /// usage line to show.
    Usage(&'static str),
}

const DEFAULT_WARN_REASON: &str = "No reason provided";

/// Parse a marker-prefixed command line. The caller has already checked the
/// sender is the owner; anyone else's command-shaped text never reaches this.
pub fn parse_command(body: &str) -> AdminCommand {
    let line = body.trim();
    let line = match line.strip_prefix(COMMAND_MARKER) {
        Some(rest) => rest,
        None => return AdminCommand::Unknown,
    };
    let mut tokens = line.split_whitespace();
    let head = match tokens.next() {
        Some(head) => head.to_lowercase(),
        None => return AdminCommand::Unknown,
    };
    let args: Vec<&str> = tokens.collect();

    match head.as_str() {
        "rules" => AdminCommand::Rules,
        "status" => AdminCommand::Status,
        "warnreset" => AdminCommand::WarnReset,
        "grouplock" => AdminCommand::GroupLock,
        "groupunlock" => AdminCommand::GroupUnlock,
        "whitelist" => match args.split_first() {
            Some((&"add", rest)) if !rest.is_empty() => {
                AdminCommand::Whitelist(WhitelistOp::Add(Identity::normalize(rest[0])))
            }
            Some((&"remove", rest)) if !rest.is_empty() => {
                AdminCommand::Whitelist(WhitelistOp::Remove(Identity::normalize(rest[0])))
            }
            Some((&"list", _)) => AdminCommand::Whitelist(WhitelistOp::List),
            _ => AdminCommand::Usage("usage: !whitelist {add|remove|list} [number]"),
        },
        "kick" => one_identity(&args, "usage: !kick <number>", AdminCommand::Kick),
        "ban" => one_identity(&args, "usage: !ban <number>", AdminCommand::Ban),
        "makeadmin" => one_identity(&args, "usage: !makeadmin <number>", AdminCommand::MakeAdmin),
        "removeadmin" => {
            one_identity(&args, "usage: !removeadmin <number>", AdminCommand::RemoveAdmin)
        }
        "warn" => match args.split_first() {
            Some((&number, rest)) => AdminCommand::Warn {
                identity: Identity::normalize(number),
                reason: if rest.is_empty() {
                    DEFAULT_WARN_REASON.to_string()
                } else {
                    rest.join(" ")
                },
            },
            None => AdminCommand::Usage("usage: !warn <number> [reason]"),
        },
        _ => AdminCommand::Unknown,
    }
}

fn one_identity(
    args: &[&str],
    usage: &'static str,
    build: fn(Identity) -> AdminCommand,
) -> AdminCommand {
    match args.first() {
        Some(&number) => build(Identity::normalize(number)),
        None => AdminCommand::Usage(usage),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn head_token_is_case_insensitive() {
        assert_eq!(parse_command("!RULES"), AdminCommand::Rules);
        assert_eq!(parse_command("!WarnReset"), AdminCommand::WarnReset);
    }

    #[test]
    fn whitelist_add_normalizes_argument() {
        match parse_command("!whitelist add 923001234567") {
            AdminCommand::Whitelist(WhitelistOp::Add(id)) => {
                assert_eq!(id.as_str(), "923001234567@c.us")
            }
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn warn_joins_reason_tokens() {
        match parse_command("!warn 923001234567 spamming the group") {
            AdminCommand::Warn { identity, reason } => {
                assert_eq!(identity.as_str(), "923001234567@c.us");
                assert_eq!(reason, "spamming the group");
            }
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn warn_without_reason_uses_default() {
        match parse_command("!warn 923001234567") {
            AdminCommand::Warn { reason, .. } => assert_eq!(reason, "No reason provided"),
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn missing_argument_yields_usage() {
        assert!(matches!(parse_command("!kick"), AdminCommand::Usage(_)));
        assert!(matches!(
            parse_command("!whitelist"),
            AdminCommand::Usage(_)
        ));
    }

    #[test]
    fn unrecognized_token_is_unknown() {
        assert_eq!(parse_command("!frobnicate now"), AdminCommand::Unknown);
        assert_eq!(parse_command("!"), AdminCommand::Unknown);
    }
}
