use super::*;

#[test]
fn new_parses_initial_href() {
    let host = MemoryHost::new("/?left=%2Fcategories%3Fskip%3D10");
    assert_eq!(host.pathname(), "/");
    assert_eq!(host.raw_query().get("left").and_then(Value::as_str), Some("/categories?skip=10"));
}

#[test]
fn navigate_replaces_query_with_open_panels_only() {
    let host = MemoryHost::new("/?utm=1");
    let mut query = PanelQuery::closed(&["left", "right"]);
    query.set("right", Some("/posts".to_owned()));
    host.navigate("/", &query);
    let raw = host.raw_query();
    assert_eq!(raw.len(), 1);
    assert_eq!(raw.get("right").and_then(Value::as_str), Some("/posts"));
    assert_eq!(host.navigation_count(), 1);
    assert_eq!(host.history_len(), 2);
}

#[test]
fn back_and_forward_walk_history() {
    let host = MemoryHost::new("/");
    host.open("/?left=%2Fa");
    assert!(host.back());
    assert!(host.raw_query().is_empty());
    assert!(!host.back());
    assert!(host.forward());
    assert_eq!(host.href(), "/?left=%2Fa");
    assert!(!host.forward());
}

#[test]
fn set_param_pushes_entry_without_counting_navigation() {
    let host = MemoryHost::default();
    host.set_param("left", Some("/categories"));
    host.set_param("right", Some("/posts"));
    host.set_param("left", None);
    assert_eq!(host.href(), "/?right=%2Fposts");
    assert_eq!(host.navigation_count(), 0);
    assert_eq!(host.history_len(), 4);
}

#[test]
fn default_build_href_skips_closed_panels() {
    let host = MemoryHost::default();
    let mut query = PanelQuery::closed(&["left", "right"]);
    query.set("left", Some("/a b".to_owned()));
    assert_eq!(host.build_href("/", &query), "/?left=%2Fa+b");
}
