use std::sync::Arc;

use super::*;
use crate::host::MemoryHost;
use crate::memory::RouteTable;
use crate::panel::Panel;
use crate::system::PanelSystem;

const PLAIN: ClickModifiers = ClickModifiers { button: 0, meta: false, ctrl: false, shift: false, alt: false };

fn system() -> PanelSystem {
    PanelSystem::builder()
        .panel(Panel::new("left", Arc::new(RouteTable::new().route("/categories/$category")), "/categories"))
        .panel(Panel::new("right", Arc::new(RouteTable::new().route("/posts/$id")), "/posts"))
        .build()
        .expect("system")
}

fn setup(href: &str) -> (Arc<MemoryHost>, PanelContext) {
    let host = Arc::new(MemoryHost::new(href));
    let ctx = system().provider(host.clone()).snapshot();
    (host, ctx)
}

#[test]
fn only_plain_primary_clicks_are_intercepted() {
    assert!(PLAIN.is_plain_left_click());
    assert!(!ClickModifiers { meta: true, ..PLAIN }.is_plain_left_click());
    assert!(!ClickModifiers { ctrl: true, ..PLAIN }.is_plain_left_click());
    assert!(!ClickModifiers { shift: true, ..PLAIN }.is_plain_left_click());
    assert!(!ClickModifiers { button: 1, ..PLAIN }.is_plain_left_click());
}

// =============================================================================
// PANEL LINK
// =============================================================================

#[test]
fn panel_link_value_substitutes_params_and_search() {
    let link = PanelLink::new("left", "/categories/$category")
        .param("category", "tv & audio")
        .search(SearchParams::from([("skip", "10")]));
    assert_eq!(link.value().expect("value"), "/categories/tv%20%26%20audio?skip=10");
}

#[test]
fn panel_link_missing_param_fails() {
    let err = PanelLink::new("left", "/categories/$category").value().expect_err("missing");
    assert!(matches!(err, PanelError::MissingParameter { ref key, .. } if key == "category"));
}

#[test]
fn panel_link_href_without_provider_carries_only_its_panel() {
    let href = PanelLink::new("left", "/categories/phones").href(None).expect("href");
    assert_eq!(href, "/?left=%2Fcategories%2Fphones");
}

#[test]
fn panel_link_href_keeps_other_panels() {
    let (_host, ctx) = setup("/?right=%2Fposts");
    let href = PanelLink::new("left", "/categories/phones").href(Some(&ctx)).expect("href");
    assert_eq!(href, "/?left=%2Fcategories%2Fphones&right=%2Fposts");
}

#[test]
fn panel_link_click_navigates_on_plain_click() {
    let (host, ctx) = setup("/");
    let link = PanelLink::new("left", "/categories/phones");
    assert_eq!(link.click(Some(&ctx), PLAIN).expect("click"), ClickOutcome::Handled);
    assert_eq!(host.href(), "/?left=%2Fcategories%2Fphones");
}

#[test]
fn panel_link_click_falls_through_for_modified_clicks_and_missing_provider() {
    let (host, ctx) = setup("/");
    let link = PanelLink::new("left", "/categories/phones");
    let meta = ClickModifiers { meta: true, ..PLAIN };
    assert_eq!(link.click(Some(&ctx), meta).expect("click"), ClickOutcome::Default);
    assert_eq!(link.click(None, PLAIN).expect("click"), ClickOutcome::Default);
    assert_eq!(host.navigation_count(), 0);
}

#[test]
fn panel_link_click_on_unknown_panel_falls_through() {
    let (host, ctx) = setup("/");
    let outcome = PanelLink::new("sidebar", "/x").click(Some(&ctx), PLAIN).expect("click");
    assert_eq!(outcome, ClickOutcome::Default);
    assert_eq!(host.navigation_count(), 0);
}

#[test]
fn panel_scoped_link_and_nav() {
    let system = system();
    let host = Arc::new(MemoryHost::default());
    let ctx = system.provider(host.clone()).snapshot();
    let left = system.panel("left").expect("left");

    let href = left.link("/categories/$category").param("category", "books").href(Some(&ctx)).expect("href");
    assert_eq!(href, "/?left=%2Fcategories%2Fbooks");

    let nav = left.nav(Some(&ctx)).expect("nav");
    assert!(!nav.is_open());
    nav.navigate("/categories/books", None);
    assert_eq!(host.href(), "/?left=%2Fcategories%2Fbooks");
    nav.close();
    assert_eq!(host.href(), "/");
}

#[test]
fn panel_nav_requires_provider_and_registration() {
    let (_host, ctx) = setup("/");
    let stray = Panel::new("sidebar", Arc::new(RouteTable::new()), "/");
    assert_eq!(
        stray.nav(None).expect_err("no provider"),
        PanelError::NotRegistered { hook: "Panel::nav", within: "a panel provider" }
    );
    assert_eq!(stray.nav(Some(&ctx)).expect_err("unknown"), PanelError::UnknownPanel("sidebar".to_owned()));
}

// =============================================================================
// SYSTEM LINK
// =============================================================================

#[test]
fn link_target_resolution() {
    assert_eq!(LinkTarget::from("/posts/1").resolve().expect("path"), Some("/posts/1".to_owned()));
    assert_eq!(LinkTarget::Path(String::new()).resolve().expect("empty"), None);
    assert_eq!(LinkTarget::Close.resolve().expect("close"), None);
    let params = Params::from([("id".to_owned(), "5".to_owned())]);
    let route = LinkTarget::route("/posts/$id", Some(params), Some(SearchParams::from([("tab", "info")])));
    assert_eq!(route.resolve().expect("route"), Some("/posts/5?tab=info".to_owned()));
}

#[test]
fn system_link_href_without_provider_is_root() {
    let link = SystemLink::new().panel("left", "/categories");
    assert_eq!(link.href(None).expect("href"), "/");
}

#[test]
fn system_link_href_applies_targets_and_keeps_the_rest() {
    let (_host, ctx) = setup("/?right=%2Fposts%2F2");
    let link = SystemLink::new().panel("left", "/categories/phones").panel("sidebar", "/ignored");
    assert_eq!(link.href(Some(&ctx)).expect("href"), "/?left=%2Fcategories%2Fphones&right=%2Fposts%2F2");

    let closing = SystemLink::new().panel("left", "/categories").close("right");
    assert_eq!(closing.href(Some(&ctx)).expect("href"), "/?left=%2Fcategories");
}

#[test]
fn system_link_later_target_replaces_earlier() {
    let (_host, ctx) = setup("/");
    let link = SystemLink::new().panel("left", "/a").panel("left", "/b");
    assert_eq!(link.href(Some(&ctx)).expect("href"), "/?left=%2Fb");
}

#[test]
fn system_link_click_is_one_host_navigation() {
    let (host, ctx) = setup("/?right=%2Fposts");
    let link = SystemLink::new()
        .panel("left", LinkTarget::route("/categories/$category", Some(Params::from([("category".to_owned(), "tv".to_owned())])), None))
        .panel("right", "/posts/3");
    assert_eq!(link.click(Some(&ctx), PLAIN).expect("click"), ClickOutcome::Handled);
    assert_eq!(host.navigation_count(), 1);
    assert_eq!(host.href(), "/?left=%2Fcategories%2Ftv&right=%2Fposts%2F3");
}

#[test]
fn system_link_click_with_only_unknown_targets_does_nothing() {
    let (host, ctx) = setup("/");
    let link = SystemLink::new().panel("sidebar", "/x");
    assert_eq!(link.click(Some(&ctx), PLAIN).expect("click"), ClickOutcome::Handled);
    assert_eq!(host.navigation_count(), 0);
}

#[test]
fn system_link_missing_param_fails() {
    let (_host, ctx) = setup("/");
    let link = SystemLink::new().panel("left", LinkTarget::route("/categories/$category", None, None));
    assert!(link.href(Some(&ctx)).is_err());
    assert!(link.click(Some(&ctx), PLAIN).is_err());
}

// =============================================================================
// MAIN LINK
// =============================================================================

#[test]
fn main_link_href_clears_every_panel() {
    let (_host, ctx) = setup("/?left=%2Fcategories&right=%2Fposts");
    let link = MainLink::new("/users/$id").param("id", "7");
    assert_eq!(link.href(Some(&ctx)).expect("href"), "/users/7");
    assert_eq!(link.href(None).expect("href"), "/users/7");
}

#[test]
fn main_link_click_leaves_panel_mode() {
    let (host, ctx) = setup("/?left=%2Fcategories");
    let link = MainLink::new("/about");
    assert_eq!(link.click(Some(&ctx), ClickModifiers { ctrl: true, ..PLAIN }).expect("click"), ClickOutcome::Default);
    assert_eq!(link.click(Some(&ctx), PLAIN).expect("click"), ClickOutcome::Handled);
    assert_eq!(host.href(), "/about");
    assert!(!ctx.coordinator().is_panel_mode());
}
