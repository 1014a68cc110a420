//! ccg-server binary: loads configuration and card data, then serves
//! matches over TCP.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use ccg_server::cards::CardRegistry;
use ccg_server::core::MatchConfig;
use ccg_server::effects::EffectSolver;
use ccg_server::games::starter;
use ccg_server::transport;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "ccg-server")]
#[command(about = "Authoritative card game match server", long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:7777")]
    bind: SocketAddr,

    /// Match configuration (JSON); defaults are used when omitted
    #[arg(long, value_name = "CONFIG_JSON")]
    config: Option<PathBuf>,

    /// Card database (JSON array of definitions); the starter set when omitted
    #[arg(long, value_name = "CARDS_JSON")]
    cards: Option<PathBuf>,

    /// Fixed RNG seed for every match
    #[arg(long)]
    seed: Option<u64>,
}

fn load_config(cli: &Cli) -> anyhow::Result<MatchConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            MatchConfig::from_json(&json)?
        }
        None => MatchConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    config.validate()?;
    Ok(config)
}

fn load_cards(cli: &Cli) -> anyhow::Result<CardRegistry> {
    match &cli.cards {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Ok(CardRegistry::from_json(&json)?)
        }
        None => Ok(starter::card_registry()?),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let registry = load_cards(&cli)?;
    info!(cards = registry.len(), players = config.players_per_match, "configuration loaded");

    let solver = EffectSolver::new(Arc::new(registry), Arc::new(config));
    let listener = TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("binding {}", cli.bind))?;

    tokio::select! {
        result = transport::serve(listener, solver) => result?,
        _ = tokio::signal::ctrl_c() => info!("shutting down"),
    }
    Ok(())
}
