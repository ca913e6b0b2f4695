use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect::<HashMap<_, _>>();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn defaults_without_env() {
    let config = PanelSystemConfig::from_lookup(lookup(&[])).expect("config");
    assert_eq!(config, PanelSystemConfig::default());
    assert_eq!(config.base_path, "/");
    assert_eq!(config.pending_ms, 200);
    assert_eq!(config.reopen, ReopenPolicy::RestoreLast);
}

#[test]
fn reads_every_variable() {
    let config = PanelSystemConfig::from_lookup(lookup(&[
        ("PANELS_BASE_PATH", "/app"),
        ("PANELS_PENDING_MS", "350"),
        ("PANELS_REOPEN_POLICY", "reset"),
        ("PANELS_LOG_CAPACITY", "16"),
    ]))
    .expect("config");
    assert_eq!(config.base_path, "/app");
    assert_eq!(config.pending_ms, 350);
    assert_eq!(config.reopen, ReopenPolicy::ResetToDefault);
    assert_eq!(config.log_capacity, 16);
    assert_eq!(config.pending().min_pending.as_millis(), 350);
}

#[test]
fn bad_numbers_fall_back_to_defaults() {
    let config = PanelSystemConfig::from_lookup(lookup(&[("PANELS_PENDING_MS", "soon")])).expect("config");
    assert_eq!(config.pending_ms, DEFAULT_PENDING_MS);
}

#[test]
fn unknown_reopen_policy_is_rejected() {
    let err = PanelSystemConfig::from_lookup(lookup(&[("PANELS_REOPEN_POLICY", "sometimes")])).expect_err("policy");
    assert!(matches!(err, PanelError::Config(ref msg) if msg.contains("sometimes")));
}

#[test]
fn relative_base_path_is_rejected() {
    let err = PanelSystemConfig::from_lookup(lookup(&[("PANELS_BASE_PATH", "app")])).expect_err("base path");
    assert!(matches!(err, PanelError::Config(_)));
}

#[test]
fn reopen_policy_parse_accepts_long_names() {
    assert_eq!("restore_last".parse::<ReopenPolicy>().expect("policy"), ReopenPolicy::RestoreLast);
    assert_eq!(" Reset_To_Default ".parse::<ReopenPolicy>().expect("policy"), ReopenPolicy::ResetToDefault);
}

#[test]
fn manifest_deserializes_with_defaults() {
    let manifest: SystemManifest = serde_json::from_value(serde_json::json!({
        "panels": [
            { "name": "left", "default_path": "/categories", "routes": ["/categories", "/categories/$category"] },
            { "name": "right", "default_path": "/posts", "pending": true }
        ]
    }))
    .expect("manifest");
    assert_eq!(manifest.config, PanelSystemConfig::default());
    assert_eq!(manifest.panels.len(), 2);
    assert_eq!(manifest.panels[0].routes.len(), 2);
    assert!(manifest.panels[1].routes.is_empty());
    assert!(manifest.panels[1].pending);
}
