//! Configuration load/validate/write-back against a real file.

use std::io::Write;

use group_warden_bot::config::{ConfigStore, JsonFileConfigStore, ModerationConfig};
use group_warden_bot::identity::Identity;

fn write_config(json: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(json.as_bytes()).expect("write config");
    file
}

#[test]
fn loads_and_normalizes_a_minimal_config() {
    let file = write_config(
        r#"{
            "owner": "0300123456",
            "botName": "Warden",
            "whitelist": ["92 300 999-8877"],
            "warnLimit": 4
        }"#,
    );
    let cfg = ModerationConfig::load(file.path()).expect("valid config");
    // ten-digit trunk number rewritten to international form
    assert_eq!(cfg.owner.as_str(), "92300123456@c.us");
    assert!(cfg.is_whitelisted(&Identity::normalize("923009998877")));
    assert_eq!(cfg.warn_limit, 4);
    // untouched fields resolve to their declared defaults
    assert!(cfg.flood_control.enabled);
    assert_eq!(cfg.flood_control.window_seconds, 10);
}

#[test]
fn rejects_invalid_quiet_hours() {
    let file = write_config(
        r#"{"owner": "923001234567", "quietHours": {"startHour": 25}}"#,
    );
    assert!(ModerationConfig::load(file.path()).is_err());
}

#[test]
fn rejects_malformed_json() {
    let file = write_config("{ not json");
    assert!(ModerationConfig::load(file.path()).is_err());
}

#[test]
fn whitelist_change_round_trips_through_the_file() {
    let file = write_config(r#"{"owner": "923001234567"}"#);
    let mut cfg = ModerationConfig::load(file.path()).expect("valid config");

    cfg.whitelist.insert(Identity::normalize("923009998877"));
    let mut store = JsonFileConfigStore::new(file.path());
    store.save(&cfg).expect("persist config");

    let reloaded = ModerationConfig::load(file.path()).expect("reload config");
    assert!(reloaded.is_whitelisted(&Identity::normalize("923009998877")));
}
