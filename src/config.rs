//! Centralized configuration: identity conventions, static constants, and the
//! serde-backed [`ModerationConfig`] loaded once at startup.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, PersistenceError};
use crate::identity::Identity;

/// **Identity conventions:** suffixes and dialing rules for sender handles.
pub mod identity_rules {
    /// Canonical suffix appended to every normalized sender handle
    /// (e.g. `"923001234567@c.us"`).
    pub const USER_SUFFIX: &str = "@c.us";
    /// Suffix carried by group chat ids; anything else is not a tracked
    /// group context.
    pub const GROUP_SUFFIX: &str = "@g.us";
    /// Local trunk prefix that 10-digit national numbers start with.
    pub const TRUNK_PREFIX: char = '0';
    /// Country code that replaces the trunk prefix in international form.
    pub const COUNTRY_CODE: &str = "92";
}

/// Marker character that every owner command starts with.
pub const COMMAND_MARKER: char = '!';

/// Redis key holding the persisted warning ledger as one JSON blob.
pub const LEDGER_KEY: &str = "warden:ledger";

/// Default interval between daily tip broadcasts, in hours.
pub const DEFAULT_TIP_INTERVAL_HOURS: u64 = 24;

/// Delay between consecutive tip sends to different groups, so the outbound
/// side of the transport is not hammered.
pub const TIP_INTER_SEND_DELAY_SECS: u64 = 1;

/// Flood-control section of the configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FloodControl {
    pub enabled: bool,
    pub window_seconds: u64,
    pub max_messages_per_window: usize,
}

impl Default for FloodControl {
    fn default() -> Self {
        FloodControl {
            enabled: true,
            window_seconds: 10,
            max_messages_per_window: 6,
        }
    }
}

/// Quiet-hours section of the configuration. Hours are in local wall-clock
/// terms after shifting UTC by `utc_offset_hours`; no DST handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuietHours {
    pub enabled: bool,
    pub start_hour: u32,
    pub end_hour: u32,
    pub utc_offset_hours: i32,
    pub reminder_message: String,
}

impl Default for QuietHours {
    fn default() -> Self {
        QuietHours {
            enabled: false,
            start_hour: 0,
            end_hour: 6,
            utc_offset_hours: 5,
            reminder_message: "The group is quiet at this hour. Please post later.".to_string(),
        }
    }
}

/// Full moderation configuration, loaded once at process start and read-only
/// during a session except for whitelist mutations issued through commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModerationConfig {
    pub owner: Identity,
    pub bot_name: String,
    pub whitelist: BTreeSet<Identity>,
    pub warn_limit: u32,
    pub flood_control: FloodControl,
    pub quiet_hours: QuietHours,
    pub instant_warn_on_link: bool,
    pub instant_warn_on_sticker: bool,
    pub instant_warn_on_media: bool,
    pub group_rules_text: String,
    pub group_name: String,
    pub daily_tips: Vec<String>,
    pub daily_tip_interval_hours: u64,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        ModerationConfig {
            owner: Identity::raw(""),
            bot_name: "GroupWarden".to_string(),
            whitelist: BTreeSet::new(),
            warn_limit: 3,
            flood_control: FloodControl::default(),
            quiet_hours: QuietHours::default(),
            instant_warn_on_link: true,
            instant_warn_on_sticker: false,
            instant_warn_on_media: false,
            group_rules_text: "Be kind. No spam, no links.".to_string(),
            group_name: String::new(),
            daily_tips: Vec::new(),
            daily_tip_interval_hours: DEFAULT_TIP_INTERVAL_HOURS,
        }
    }
}

impl ModerationConfig {
    /// Load and validate a configuration file. Any violation is fatal.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.display().to_string(), e))?;
        let mut cfg: ModerationConfig = serde_json::from_str(&text)?;
        cfg.normalize();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Normalize the identity fields once, at the boundary. After this every
    /// owner/whitelist comparison works on canonical handles only.
    pub fn normalize(&mut self) {
        self.owner = self.owner.clone().normalized();
        self.whitelist = self
            .whitelist
            .iter()
            .cloned()
            .map(Identity::normalized)
            .collect();
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.owner.number().is_empty() {
            return Err(ConfigError::Invalid("owner identity is required".into()));
        }
        if self.warn_limit < 1 {
            return Err(ConfigError::Invalid("warnLimit must be at least 1".into()));
        }
        if self.quiet_hours.start_hour > 23 || self.quiet_hours.end_hour > 23 {
            return Err(ConfigError::Invalid(
                "quietHours start/end must be within 0..24".into(),
            ));
        }
        if self.flood_control.enabled && self.flood_control.window_seconds == 0 {
            return Err(ConfigError::Invalid(
                "floodControl windowSeconds must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn is_owner(&self, id: &Identity) -> bool {
        *id == self.owner
    }

    pub fn is_whitelisted(&self, id: &Identity) -> bool {
        self.whitelist.contains(id)
    }

    /// Exempt identities skip flood control, quiet hours and instant triggers.
    pub fn is_exempt(&self, id: &Identity) -> bool {
        self.is_owner(id) || self.is_whitelisted(id)
    }
}

/// Write-back side of the configuration, used by the whitelist commands.
pub trait ConfigStore: Send {
    fn save(&mut self, cfg: &ModerationConfig) -> Result<(), PersistenceError>;
}

/// Persists the configuration back to the JSON file it was loaded from.
pub struct JsonFileConfigStore {
    path: PathBuf,
}

impl JsonFileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileConfigStore { path: path.into() }
    }
}

impl ConfigStore for JsonFileConfigStore {
    fn save(&mut self, cfg: &ModerationConfig) -> Result<(), PersistenceError> {
        let text = serde_json::to_string_pretty(cfg)
            .map_err(|e| PersistenceError::Encode(e.to_string()))?;
        fs::write(&self.path, text)
            .map_err(|e| PersistenceError::Store(format!("{}: {}", self.path.display(), e)))
    }
}

/// No-op store for tests and dry runs.
#[derive(Default)]
pub struct MemoryConfigStore {
    pub saved: Option<ModerationConfig>,
}

impl ConfigStore for MemoryConfigStore {
    fn save(&mut self, cfg: &ModerationConfig) -> Result<(), PersistenceError> {
        self.saved = Some(cfg.clone());
        Ok(())
    }
}
