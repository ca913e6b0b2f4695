use std::sync::Arc;

use panels::links::LinkTarget;
use panels::{MemoryHost, Panel, PanelSystem, RouteTable};

use super::*;

fn children() -> Children {
    Box::new(|| "link".into_any())
}

fn provide_scope(href: &str) {
    let system = PanelSystem::builder()
        .panel(Panel::new("left", Arc::new(RouteTable::new()), "/categories"))
        .build()
        .expect("system");
    let coordinator = system.provider(Arc::new(MemoryHost::new(href)));
    let source = coordinator.clone();
    provide_context(PanelScope::new(coordinator, Memo::new(move |_| source.query())));
}

fn is_missing_param(err: Option<PanelError>, expected: &str) -> bool {
    matches!(err, Some(PanelError::MissingParameter { key, .. }) if key == expected)
}

#[test]
fn panel_link_resolves_template_up_front() {
    Owner::new().with(|| {
        let props = PanelLinkProps::builder().panel("left").to("/categories/$category").children(children()).build();
        assert!(is_missing_param(PanelLink(props).err(), "category"));

        let params = Params::from([("category".to_owned(), "phones".to_owned())]);
        let props = PanelLinkProps::builder()
            .panel("left")
            .to("/categories/$category")
            .params(params)
            .children(children())
            .build();
        assert!(PanelLink(props).is_ok());
    });
}

#[test]
fn main_link_works_without_provider() {
    Owner::new().with(|| {
        let props = MainLinkProps::builder().to("/about").children(children()).build();
        assert!(MainLink(props).is_ok());

        let props = MainLinkProps::builder().to("/posts/$id").children(children()).build();
        assert!(is_missing_param(MainLink(props).err(), "id"));
    });
}

#[test]
fn system_link_checks_targets_against_provider() {
    Owner::new().with(|| {
        provide_scope("/");
        let broken = links::SystemLink::new().panel("left", LinkTarget::route("/categories/$category", None, None));
        let props = SystemLinkProps::builder().targets(broken).children(children()).build();
        assert!(is_missing_param(SystemLink(props).err(), "category"));

        let targets = links::SystemLink::new().panel("left", "/categories").close("sidebar");
        let props = SystemLinkProps::builder().targets(targets).children(children()).build();
        assert!(SystemLink(props).is_ok());
    });
}
