use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use panels::codec::{self, Params, SearchParams};
use panels::links::{LinkTarget, MainLink, SystemLink};
use panels::{Coordinator, MemoryHost, PanelError, PanelSystem, PanelSystemConfig, SystemManifest};
use serde_json::{Value, json};
use tracing::{info, warn};


#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Panel(#[from] PanelError),
    #[error("failed to read manifest: {0}")]
    Io(#[from] io::Error),
    #[error("invalid manifest: {0}")]
    Manifest(#[from] serde_yaml::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "panels", about = "Inspect and build multi-panel page addresses")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split a panel value into pathname and query.
    Decode { value: String },
    /// Build a panel value from a pathname and `key=value` query pairs.
    Encode {
        pathname: String,
        #[arg(long = "search", value_parser = parse_pair)]
        search: Vec<(String, String)>,
    },
    /// Substitute `$param` tokens in a path template.
    Resolve {
        template: String,
        #[arg(long = "param", value_parser = parse_pair)]
        params: Vec<(String, String)>,
    },
    /// Describe every panel of a page address.
    Inspect(PageArgs),
    /// Page address after moving or closing panels.
    Href(HrefArgs),
    /// Main-site address that closes every panel.
    MainHref(MainHrefArgs),
}

#[derive(Args, Debug)]
struct PageArgs {
    #[arg(long, env = "PANELS_MANIFEST")]
    manifest: PathBuf,

    #[arg(long, default_value_t = false, help = "Read config from PANELS_* env vars instead of the manifest")]
    env_config: bool,

    #[arg(long, default_value = "/", help = "Current page address, e.g. /?left=%2Fcategories")]
    current: String,
}

#[derive(Args, Debug)]
struct HrefArgs {
    #[command(flatten)]
    page: PageArgs,

    #[arg(long = "set", value_parser = parse_pair, help = "Open or move a panel: name=value")]
    set: Vec<(String, String)>,

    #[arg(long = "close", help = "Close a panel")]
    close: Vec<String>,
}

#[derive(Args, Debug)]
struct MainHrefArgs {
    #[command(flatten)]
    page: PageArgs,

    to: String,

    #[arg(long = "param", value_parser = parse_pair)]
    params: Vec<(String, String)>,
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    let cli = Cli::parse();
    let output = run(cli.command)?;
    print_json(&output)
}

fn run(command: Command) -> Result<Value, CliError> {
    match command {
        Command::Decode { value } => Ok(decode(&value)),
        Command::Encode { pathname, search } => {
            let search = search.into_iter().collect::<SearchParams>();
            Ok(json!({ "value": codec::encode_panel_value(&pathname, Some(&search)) }))
        }
        Command::Resolve { template, params } => {
            let params = params.into_iter().collect::<Params>();
            Ok(json!({ "path": codec::resolve_template(&template, Some(&params))? }))
        }
        Command::Inspect(page) => {
            let (system, manifest) = load_page(&page)?;
            Ok(inspect(&provider(&system, &page.current), &manifest))
        }
        Command::Href(args) => {
            let (system, _) = load_page(&args.page)?;
            let coordinator = provider(&system, &args.page.current);
            Ok(json!({ "href": panel_href(&coordinator, args.set, args.close)? }))
        }
        Command::MainHref(args) => {
            let (system, _) = load_page(&args.page)?;
            let coordinator = provider(&system, &args.page.current);
            let link = MainLink::new(args.to).params(args.params.into_iter().collect());
            Ok(json!({ "href": link.href(Some(&coordinator.snapshot()))? }))
        }
    }
}

fn decode(value: &str) -> Value {
    let decoded = codec::decode_panel_value(value);
    json!({
        "pathname": decoded.pathname,
        "search": decoded.search,
        "params": decoded.search_params().map(|p| p.to_map()),
    })
}

fn load_page(page: &PageArgs) -> Result<(PanelSystem, SystemManifest), CliError> {
    let raw = fs::read_to_string(&page.manifest)?;
    let (system, manifest) = system_from_yaml(&raw, page.env_config)?;
    info!(manifest = %page.manifest.display(), panels = system.names().len(), "manifest loaded");
    Ok((system, manifest))
}

fn system_from_yaml(raw: &str, env_config: bool) -> Result<(PanelSystem, SystemManifest), CliError> {
    let mut manifest: SystemManifest = serde_yaml::from_str(raw)?;
    if env_config {
        manifest.config = PanelSystemConfig::from_env()?;
    }
    let system = PanelSystem::from_manifest(&manifest)?;
    Ok((system, manifest))
}

fn provider(system: &PanelSystem, current: &str) -> Coordinator {
    let coordinator = system.provider(Arc::new(MemoryHost::new(current)));
    coordinator.sync();
    coordinator
}

fn inspect(coordinator: &Coordinator, manifest: &SystemManifest) -> Value {
    let query = coordinator.query();
    let panels = manifest
        .panels
        .iter()
        .map(|entry| {
            let value = query.get(&entry.name);
            let location = value.and_then(|_| coordinator.panel_location(&entry.name));
            let route = value.and_then(|_| coordinator.panel_match(&entry.name));
            json!({
                "name": entry.name,
                "open": value.is_some(),
                "value": value,
                "pathname": location.as_ref().map(|l| l.pathname.clone()),
                "search": location.as_ref().map(|l| l.search.to_map()),
                "route": route.map(|m| json!({ "pattern": m.pattern, "params": m.params })),
            })
        })
        .collect::<Vec<_>>();
    json!({ "panel_mode": query.any_open(), "panels": panels })
}

fn panel_href(coordinator: &Coordinator, set: Vec<(String, String)>, close: Vec<String>) -> Result<String, CliError> {
    let mut link = SystemLink::new();
    for (name, value) in set {
        if coordinator.panel(&name).is_none() {
            warn!(panel = %name, "ignoring unknown panel");
        }
        link = link.panel(name, LinkTarget::Path(value));
    }
    for name in close {
        if coordinator.panel(&name).is_none() {
            warn!(panel = %name, "ignoring unknown panel");
        }
        link = link.close(name);
    }
    Ok(link.href(Some(&coordinator.snapshot()))?)
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw.split_once('=').ok_or_else(|| format!("expected key=value, got `{raw}`"))?;
    if key.is_empty() {
        return Err(format!("empty key in `{raw}`"));
    }
    Ok((key.to_owned(), value.to_owned()))
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
