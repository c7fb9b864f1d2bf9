//! Instant-sanction content classification.

use crate::config::ModerationConfig;
use crate::engine::MessageEvent;

/// Warning reasons for the instant triggers.
pub mod reason {
    pub const LINK: &str = "Posting links is not allowed";
    pub const STICKER: &str = "Stickers are not allowed";
    pub const MEDIA: &str = "Media messages are not allowed";
    pub const FLOOD: &str = "Flooding messages";
}

/// Classifies message content into the first matching instant-sanction
/// reason, in fixed priority order: link, then sticker, then media. Each
/// trigger only fires when its config flag is set. Never consulted for the
/// owner or whitelisted senders.
pub struct TriggerPolicy {
    on_link: bool,
    on_sticker: bool,
    on_media: bool,
}

impl TriggerPolicy {
    pub fn from_config(cfg: &ModerationConfig) -> Self {
        TriggerPolicy {
            on_link: cfg.instant_warn_on_link,
            on_sticker: cfg.instant_warn_on_sticker,
            on_media: cfg.instant_warn_on_media,
        }
    }

    pub fn classify(&self, event: &MessageEvent) -> Option<&'static str> {
        if self.on_link && event.has_link {
            return Some(reason::LINK);
        }
        if self.on_sticker && event.is_sticker {
            return Some(reason::STICKER);
        }
        if self.on_media && event.has_media {
            return Some(reason::MEDIA);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Identity;

    fn event(has_link: bool, is_sticker: bool, has_media: bool) -> MessageEvent {
        MessageEvent {
            chat_id: "group@g.us".into(),
            sender: Identity::normalize("923001234567"),
            body: "hello".into(),
            has_link,
            is_sticker,
            has_media,
            timestamp: 0,
        }
    }

    fn policy(link: bool, sticker: bool, media: bool) -> TriggerPolicy {
        TriggerPolicy {
            on_link: link,
            on_sticker: sticker,
            on_media: media,
        }
    }

    #[test]
    fn link_takes_priority() {
        let p = policy(true, true, true);
        assert_eq!(p.classify(&event(true, true, true)), Some(reason::LINK));
    }

    #[test]
    fn disabled_trigger_falls_through() {
        let p = policy(false, true, true);
        assert_eq!(p.classify(&event(true, true, false)), Some(reason::STICKER));
    }

    #[test]
    fn clean_message_matches_nothing() {
        let p = policy(true, true, true);
        assert_eq!(p.classify(&event(false, false, false)), None);
    }
}
