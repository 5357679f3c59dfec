use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use molecule_finder::{
    api,
    config::FinderConfig,
    render,
    resolver::{ResolveError, Resolver},
};

#[derive(Parser)]
#[command(name = "molfind")]
#[command(about = "Molecular properties, Wikipedia summary and PubChem data for a SMILES string")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port for the web server
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to a JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Resolve one SMILES string and print the result
    Lookup {
        /// SMILES string to resolve
        smiles: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Path to a JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Initialize tracing with output to stderr (for one-shot lookups) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "molecule_finder=debug,tower_http=debug".into()),
    );

    if use_stderr {
        // Lookup mode: stdout carries the report only
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn serve(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut config = FinderConfig::load(config_path.as_deref())?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let resolver = Resolver::from_config(&config.lookup).context("Failed to build HTTP clients")?;
    let app = api::create_router(Arc::new(resolver));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Molecule Finder listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn lookup(smiles: &str, json: bool, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = FinderConfig::load(config_path.as_deref())?;
    let resolver = Resolver::from_config(&config.lookup).context("Failed to build HTTP clients")?;

    match resolver.resolve(smiles).await {
        Ok(result) if json => println!("{}", serde_json::to_string_pretty(&result)?),
        Ok(result) => print!("{}", render::render_text(&result)),
        Err(e @ ResolveError::InvalidStructure { .. }) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let use_stderr = matches!(cli.command, Some(Commands::Lookup { .. }));
    init_tracing(use_stderr);

    match cli.command {
        Some(Commands::Serve { host, port, config }) => serve(host, port, config).await?,
        Some(Commands::Lookup {
            smiles,
            json,
            config,
        }) => lookup(&smiles, json, config).await?,
        None => serve(None, None, None).await?,
    }

    Ok(())
}
