//! Normalized sender handles. All per-sender state (ledger, rate windows,
//! whitelist, owner checks) is keyed by [`Identity`]; normalization happens
//! once at the boundary and never again downstream.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::identity_rules::{COUNTRY_CODE, GROUP_SUFFIX, TRUNK_PREFIX, USER_SUFFIX};

/// An opaque, normalized sender handle. Two identities are equal iff their
/// normalized forms are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Wrap a string without normalizing. Only for values that are already
    /// canonical (deserialized ledger keys) or about to be normalized.
    pub fn raw(s: impl Into<String>) -> Self {
        Identity(s.into())
    }

    /// Normalize a phone-number-shaped handle:
    /// strip everything but digits; a 10-digit number starting with the
    /// trunk prefix gets its leading digit replaced with the country code;
    /// the canonical user suffix is appended if absent.
    pub fn normalize(input: &str) -> Self {
        let bare = input
            .strip_suffix(USER_SUFFIX)
            .unwrap_or(input);
        let mut digits: String = bare.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.len() == 10 && digits.starts_with(TRUNK_PREFIX) {
            digits = format!("{}{}", COUNTRY_CODE, &digits[1..]);
        }
        Identity(format!("{}{}", digits, USER_SUFFIX))
    }

    pub fn normalized(self) -> Self {
        Identity::normalize(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The bare number, without the canonical suffix. Used by user-facing
    /// listings.
    pub fn number(&self) -> &str {
        self.0.strip_suffix(USER_SUFFIX).unwrap_or(&self.0)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A chat id names a tracked group context only when it carries the group
/// suffix.
pub fn is_group_chat(chat_id: &str) -> bool {
    chat_id.ends_with(GROUP_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_formatting_and_appends_suffix() {
        assert_eq!(
            Identity::normalize("+92 300 123-4567").as_str(),
            "923001234567@c.us"
        );
    }

    #[test]
    fn rewrites_ten_digit_trunk_number() {
        assert_eq!(
            Identity::normalize("0301234567").as_str(),
            "92301234567@c.us"
        );
    }

    #[test]
    fn leaves_international_form_alone() {
        assert_eq!(
            Identity::normalize("923001234567").as_str(),
            "923001234567@c.us"
        );
    }

    #[test]
    fn idempotent_on_canonical_input() {
        let once = Identity::normalize("923001234567@c.us");
        let twice = once.clone().normalized();
        assert_eq!(once, twice);
    }

    #[test]
    fn equality_is_on_normalized_form() {
        assert_eq!(
            Identity::normalize("+92-300-1234567"),
            Identity::normalize("923001234567@c.us")
        );
    }

    #[test]
    fn number_strips_suffix() {
        assert_eq!(Identity::normalize("923001234567").number(), "923001234567");
    }

    #[test]
    fn group_suffix_detection() {
        assert!(is_group_chat("12036304@g.us"));
        assert!(!is_group_chat("923001234567@c.us"));
        assert!(!is_group_chat(""));
    }
}
