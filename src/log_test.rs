use super::*;

fn event(panel: &str, action: NavAction, path: Option<&str>) -> NavigationEvent {
    NavigationEvent { panel: panel.to_owned(), action, path: path.map(str::to_owned) }
}

#[test]
fn describes_navigate_and_close() {
    assert_eq!(describe(&event("left", NavAction::Navigate, Some("/x"))), "[nav:left] → /x");
    assert_eq!(describe(&event("left", NavAction::Close, None)), "[nav:left] closed");
}

#[test]
fn evicts_oldest_at_capacity() {
    let log = NavigationLog::new(2);
    log.record(&event("left", NavAction::Navigate, Some("/a")));
    log.record(&event("left", NavAction::Navigate, Some("/b")));
    log.record(&event("left", NavAction::Close, None));
    let messages = log.entries().into_iter().map(|e| e.message).collect::<Vec<_>>();
    assert_eq!(messages, vec!["[nav:left] → /b", "[nav:left] closed"]);
    assert!(log.entries().iter().all(|e| e.kind == "nav" && e.ts > 0));
}

#[test]
fn zero_capacity_keeps_one_entry() {
    let log = NavigationLog::new(0);
    log.push("info", "one");
    log.push("info", "two");
    assert_eq!(log.len(), 1);
    log.clear();
    assert!(log.is_empty());
}

#[test]
fn observer_records_into_shared_log() {
    let log = Arc::new(NavigationLog::new(5));
    let hook = log.observer();
    hook(&event("right", NavAction::Navigate, Some("/posts")));
    assert_eq!(log.len(), 1);
}

#[test]
fn from_config_uses_log_capacity() {
    let config = PanelSystemConfig { log_capacity: 3, ..PanelSystemConfig::default() };
    assert_eq!(NavigationLog::from_config(&config).capacity(), 3);
    assert_eq!(NavigationLog::from_config(&PanelSystemConfig::default()).capacity(), 200);
}
