use serde_json::json;

use super::*;
use crate::config::ReopenPolicy;
use crate::controls::PanelControl;
use crate::host::MemoryHost;
use crate::log::NavigationLog;

fn panel(name: &str, default_path: &str) -> Panel {
    Panel::new(name, Arc::new(RouteTable::new()), default_path)
}

#[test]
fn builder_keeps_registration_order() {
    let system = PanelSystem::builder().panel(panel("right", "/posts")).panel(panel("left", "/categories")).build().expect("system");
    assert_eq!(system.names(), ["right".to_owned(), "left".to_owned()]);
    assert_eq!(system.panel("left").expect("left").default_path(), "/categories");
    assert!(system.panel("sidebar").is_none());
}

#[test]
fn builder_rejects_duplicates_empty_names_and_no_panels() {
    let dup = PanelSystem::builder().panel(panel("left", "/")).panel(panel("left", "/other")).build();
    assert_eq!(dup.expect_err("duplicate"), PanelError::DuplicatePanel("left".to_owned()));

    let empty = PanelSystem::builder().panel(panel("", "/")).build();
    assert!(matches!(empty, Err(PanelError::Config(_))));

    assert!(matches!(PanelSystem::builder().build(), Err(PanelError::Config(_))));
}

#[test]
fn builder_validates_config() {
    let config = PanelSystemConfig { base_path: "app".to_owned(), ..PanelSystemConfig::default() };
    let result = PanelSystem::builder().panel(panel("left", "/")).config(config).build();
    assert!(matches!(result, Err(PanelError::Config(_))));
}

#[test]
fn validate_search_keeps_registered_string_values() {
    let system = PanelSystem::builder().panel(panel("left", "/")).panel(panel("right", "/")).build().expect("system");
    let raw = json!({ "left": "/categories", "right": 3, "utm": "mail" });
    let query = system.validate_search(raw.as_object().expect("object"));
    assert_eq!(query.get("left"), Some("/categories"));
    assert_eq!(query.get("right"), None);
    assert!(!query.contains("utm"));
}

#[test]
fn hooks_fail_fast_outside_their_scope() {
    let system = PanelSystem::builder().panel(panel("left", "/")).build().expect("system");
    assert_eq!(
        system.use_panel(None).expect_err("provider"),
        PanelError::NotRegistered { hook: "use_panel", within: "a panel provider" }
    );
    assert_eq!(
        system.use_current_panel(None).expect_err("outlet"),
        PanelError::NotRegistered { hook: "use_current_panel", within: "a panel outlet" }
    );
}

#[test]
fn hooks_resolve_inside_scope() {
    let system = PanelSystem::builder().panel(panel("left", "/categories")).build().expect("system");
    let coordinator = system.provider(Arc::new(MemoryHost::new("/?left=%2Fcategories")));
    let ctx = coordinator.snapshot();

    let controls = system.use_panel(Some(&ctx)).expect("controls");
    assert!(controls.is_panel_mode());
    assert_eq!(controls.iter().map(PanelControl::name).collect::<Vec<_>>(), vec!["left"]);

    let identity = coordinator.identity("left").expect("identity");
    assert_eq!(system.use_current_panel(Some(&identity)).expect("identity").name(), "left");
}

#[test]
fn providers_own_separate_routers() {
    let system = PanelSystem::builder().panel(panel("left", "/categories")).build().expect("system");
    let first = system.provider(Arc::new(MemoryHost::default()));
    let second = system.provider(Arc::new(MemoryHost::default()));
    let a = first.get_router("left").expect("router");
    let b = second.get_router("left").expect("router");
    assert!(!Arc::ptr_eq(&a, &b));
}

#[test]
fn link_builders_come_from_the_system() {
    let system = PanelSystem::builder().panel(panel("left", "/categories")).build().expect("system");
    assert_eq!(system.link().panel("left", "/a").href(None).expect("href"), "/");
    assert_eq!(system.main_link("/about").href(None).expect("href"), "/about");
}

#[test]
fn navigation_log_as_observer() {
    let log = Arc::new(NavigationLog::new(10));
    let system = PanelSystem::builder()
        .panel(panel("left", "/categories"))
        .on_navigate({
            let hook = log.observer();
            move |event: &NavigationEvent| hook(event)
        })
        .build()
        .expect("system");
    let coordinator = system.provider(Arc::new(MemoryHost::default()));
    coordinator.navigate_panel("left", "/categories/phones", None).expect("navigate");
    coordinator.close_panel("left").expect("close");
    coordinator.navigate_main("/about");

    let messages = log.entries().into_iter().map(|e| e.message).collect::<Vec<_>>();
    assert_eq!(messages, vec!["[nav:left] → /categories/phones", "[nav:left] closed", "[nav:main] → /about"]);
}

#[test]
fn from_manifest_builds_memory_panels() {
    let manifest: SystemManifest = serde_json::from_value(json!({
        "config": { "reopen": "reset_to_default", "pending_ms": 50 },
        "panels": [
            { "name": "left", "default_path": "/categories", "routes": ["/categories", "/categories/$category"] },
            { "name": "right", "default_path": "/posts", "pending": true }
        ]
    }))
    .expect("manifest");
    let system = PanelSystem::from_manifest(&manifest).expect("system");
    assert_eq!(system.names(), ["left".to_owned(), "right".to_owned()]);
    assert_eq!(system.config().reopen, ReopenPolicy::ResetToDefault);
    assert!(system.panel("left").expect("left").pending().is_none());
    assert_eq!(system.panel("right").expect("right").pending().expect("pending").min_pending.as_millis(), 50);

    let coordinator = system.provider(Arc::new(MemoryHost::new("/?left=%2Fcategories%2Fbooks")));
    let location = coordinator.get_router("left").expect("router").location();
    assert_eq!(location.pathname, "/categories/books");
}

#[test]
fn navigation_log_is_sized_by_config() {
    let config = PanelSystemConfig { log_capacity: 2, ..PanelSystemConfig::default() };
    let seen = Arc::new(std::sync::Mutex::new(0_usize));
    let counter = Arc::clone(&seen);
    let system = PanelSystem::builder()
        .panel(panel("left", "/categories"))
        .config(config)
        .on_navigate(move |_: &NavigationEvent| *counter.lock().unwrap() += 1)
        .navigation_log()
        .build()
        .expect("system");
    let log = system.navigation_log().expect("log");
    assert_eq!(log.capacity(), 2);

    let coordinator = system.provider(Arc::new(MemoryHost::default()));
    coordinator.navigate_panel("left", "/categories/a", None).expect("navigate");
    coordinator.navigate_panel("left", "/categories/b", None).expect("navigate");
    coordinator.close_panel("left").expect("close");

    let messages = log.entries().into_iter().map(|e| e.message).collect::<Vec<_>>();
    assert_eq!(messages, vec!["[nav:left] → /categories/b", "[nav:left] closed"]);
    assert_eq!(*seen.lock().unwrap(), 3);
}

#[test]
fn navigation_log_is_off_by_default() {
    let system = PanelSystem::builder().panel(panel("left", "/")).build().expect("system");
    assert!(system.navigation_log().is_none());
}
