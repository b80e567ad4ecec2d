use crate::config::TreeConfig;
use crate::handler::{HandlerRef, HandlerRegistry};
use crate::manifest::{build_tree, load_manifest, Manifest};
use crate::openapi::ApiDocument;
use crate::tree::Route;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Command-line interface for routetree
#[derive(Parser, Debug)]
#[command(name = "routetree")]
#[command(about = "Inspect route tree manifests", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Tree configuration file (YAML or JSON); ROUTETREE_* variables override it
    #[arg(long, global = true, env = "ROUTETREE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the flattened route table of a manifest
    Routes {
        /// Path to the manifest file (YAML or JSON)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Print JSON including each route's merged documentation
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the OpenAPI document assembled from a manifest
    Doc {
        /// Path to the manifest file (YAML or JSON)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Emit YAML instead of JSON
        #[arg(long, default_value_t = false)]
        yaml: bool,
    },
}

/// Parse the process arguments and run the selected command against stdout.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(&cli, &mut out)
}

/// Run `cli`, writing command output to `out`.
pub fn execute(cli: &Cli, out: &mut dyn Write) -> Result<()> {
    let config = match &cli.config {
        Some(path) => TreeConfig::load(path)?,
        None => TreeConfig::from_env(),
    };

    match &cli.command {
        Commands::Routes { manifest, json } => {
            let routes = flatten_manifest(manifest, &config)?;
            if *json {
                let table: Vec<_> = routes
                    .iter()
                    .map(|route| {
                        json!({
                            "index": route.index,
                            "method": route.method.as_str(),
                            "path": route.path,
                            "handlers": route.handler_names(),
                            "doc": route.doc.to_json(),
                        })
                    })
                    .collect();
                writeln!(out, "{}", serde_json::to_string_pretty(&table)?)?;
            } else {
                for route in &routes {
                    writeln!(
                        out,
                        "{:>3}  {:<7} {:<40} {}",
                        route.index,
                        route.method.as_str(),
                        route.path,
                        route.handler_names().join(" -> ")
                    )?;
                }
            }
        }
        Commands::Doc { manifest, yaml } => {
            let routes = flatten_manifest(manifest, &config)?;
            let document = ApiDocument::from_routes(&routes, &config);
            document.to_spec()?;
            if *yaml {
                write!(out, "{}", document.to_yaml()?)?;
            } else {
                writeln!(out, "{}", document.to_json_string()?)?;
            }
        }
    }
    Ok(())
}

fn flatten_manifest(path: &Path, config: &TreeConfig) -> Result<Vec<Route>> {
    let manifest = load_manifest(path)?;
    let registry = inspection_registry(&manifest);
    let root = build_tree(&manifest, &registry, config)
        .with_context(|| format!("Failed to build tree from {}", path.display()))?;
    Ok(root.routes())
}

/// Built-in handlers plus a pass-through stub for every other name the manifest uses.
fn inspection_registry(manifest: &Manifest) -> HandlerRegistry {
    let mut registry = HandlerRegistry::with_builtins();
    for name in manifest.handler_names() {
        if !registry.contains(&name) {
            debug!(handler_name = %name, "Registering inspection stub");
            registry.insert(HandlerRef::before(&name, |_ctx| {}));
        }
    }
    registry
}
