//! oslc-browser: browse linked OSLC resources from the terminal
//!
//! Usage:
//!   oslc-browser read <uri> [--preview]        → show one resource
//!   oslc-browser links <uri>                   → followable link types
//!   oslc-browser expand <uri> [--depth N]      → grow the resource graph
//!   oslc-browser columns <uri> -l <link>...    → drill down link by link
//!   oslc-browser favorites                     → configured favorites
//!   oslc-browser config                        → effective configuration
//!
//! A favorite's label can stand in for any <uri>.

use anyhow::Context;
use clap::{Parser, Subcommand};
use oslc_browser::render;
use oslc_browser::BrowserConfig;
use oslc_browser_client::{OslcClient, ReadRequest, ResourceSource};
use oslc_browser_nav::{followable_links, Navigator};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "oslc-browser",
    about = "Browse linked OSLC lifecycle resources",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file (TOML)
    #[arg(short, long, global = true, default_value = "oslc-browser.toml")]
    config: PathBuf,

    /// User id (or set OSLC_BROWSER_USER)
    #[arg(short, long, global = true)]
    user: Option<String>,

    /// Password (or set OSLC_BROWSER_PASSWORD)
    #[arg(short, long, global = true)]
    password: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Read and print one resource
    Read {
        uri: String,
        /// Ask for the compact preview representation
        #[arg(long, default_value_t = false)]
        preview: bool,
    },
    /// List the link types a resource can be browsed along
    Links { uri: String },
    /// Expand the resource graph outward from a root
    Expand {
        uri: String,
        /// Number of expansion rounds
        #[arg(short, long, default_value_t = 1)]
        depth: usize,
    },
    /// Open columns by following link types from the root
    Columns {
        uri: String,
        /// Link local names to follow, one column each
        #[arg(short, long = "link")]
        links: Vec<String>,
    },
    /// List configured favorites
    Favorites,
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = BrowserConfig::load(&cli.config)
        .with_env_overrides()
        .with_credentials(cli.user.clone(), cli.password.clone());

    match &cli.command {
        Commands::Favorites => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&config.favorites)?);
            } else {
                print!("{}", render::format_favorites(&config.favorites));
            }
        }
        Commands::Config => print!("{}", config.to_toml()),
        Commands::Read { uri, preview } => read(&cli, &config, &resolve(&config, uri), *preview).await?,
        Commands::Links { uri } => links(&cli, &config, &resolve(&config, uri)).await?,
        Commands::Expand { uri, depth } => expand(&cli, &config, &resolve(&config, uri), *depth).await?,
        Commands::Columns { uri, links } => columns(&config, &resolve(&config, uri), links).await?,
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "oslc_browser=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Favorite labels resolve to their URI; anything else is taken as a URI.
fn resolve(config: &BrowserConfig, target: &str) -> String {
    match config.favorite(target) {
        Some(fav) => fav.uri.clone(),
        None => target.to_string(),
    }
}

fn source(config: &BrowserConfig) -> anyhow::Result<Arc<OslcClient>> {
    let client = OslcClient::new(config.fetch_config()).context("Failed to build HTTP client")?;
    Ok(Arc::new(client))
}

fn navigator(config: &BrowserConfig) -> anyhow::Result<Navigator> {
    let filter = config.link_filter().context("Invalid filter rule in config")?;
    Ok(Navigator::new(source(config)?, filter).with_fallback_proxy(config.network.fallback_proxy.clone()))
}

async fn read(cli: &Cli, config: &BrowserConfig, uri: &str, preview: bool) -> anyhow::Result<()> {
    let request = if preview {
        ReadRequest::preview(uri)
    } else {
        ReadRequest::full(uri)
    };
    let resource = source(config)?
        .read(request)
        .await
        .with_context(|| format!("Could not read {}", uri))?;

    if cli.json {
        let properties: BTreeMap<_, _> = resource.properties().collect();
        let doc = serde_json::json!({
            "uri": resource.uri(),
            "label": resource.label(),
            "etag": resource.etag(),
            "kind": resource.kind(),
            "smallPreview": resource.small_preview(),
            "properties": properties,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        print!("{}", render::format_resource(&resource));
    }
    Ok(())
}

async fn links(cli: &Cli, config: &BrowserConfig, uri: &str) -> anyhow::Result<()> {
    let nav = navigator(config)?;
    let links = nav.link_types(uri).await.with_context(|| format!("Could not read {}", uri))?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&links)?);
    } else {
        print!("{}", render::format_link_types(&links));
    }
    Ok(())
}

async fn expand(cli: &Cli, config: &BrowserConfig, uri: &str, depth: usize) -> anyhow::Result<()> {
    let mut nav = navigator(config)?;
    let root = nav.navigate(uri).await.with_context(|| format!("Could not read {}", uri))?;

    let mut frontier = vec![root.uri().to_string()];
    for round in 0..depth {
        let mut next = Vec::new();
        for node in &frontier {
            if nav.graph().state().node(node).is_some_and(|n| n.expanded) {
                continue;
            }
            if nav.graph_mut().expand(node).await.is_err() {
                continue;
            }
            next.extend(nav.graph().state().successors(node).map(str::to_string));
        }
        info!("Expansion round {} done, {} nodes", round + 1, nav.graph().state().nodes().len());
        frontier = next;
    }

    let state = nav.graph().state();
    if cli.json {
        let doc = serde_json::json!({ "nodes": state.nodes(), "edges": state.edges() });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        print!("{}", render::format_graph(state));
    }
    Ok(())
}

async fn columns(config: &BrowserConfig, uri: &str, path: &[String]) -> anyhow::Result<()> {
    let mut nav = navigator(config)?;
    nav.navigate(uri).await.with_context(|| format!("Could not read {}", uri))?;

    for (column_index, link_name) in path.iter().enumerate() {
        let Some(selected) = nav.columns().state().columns().last().and_then(|c| c.first()).cloned() else {
            break;
        };
        // Column resources are previews; list links from the full resource.
        let full = nav.link_types(selected.uri()).await;
        let targets = match full {
            Ok(links) => links.into_iter().find(|l| &l.local_name == link_name).map(|l| l.targets),
            Err(_) => followable_links(&selected, nav.filter())
                .into_iter()
                .find(|l| &l.local_name == link_name)
                .map(|l| l.targets),
        };
        let Some(targets) = targets else {
            anyhow::bail!("{} has no link type {}", selected.uri(), link_name);
        };
        nav.columns_mut().select_link_type(&targets, column_index).await;
    }

    print!("{}", render::format_columns(nav.columns().state()));
    Ok(())
}
