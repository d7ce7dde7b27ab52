use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::signal;

use phantasma_devnode::{DevNode, Ledger, NodeState};

/// Phantasma development node
#[derive(Parser)]
#[command(name = "phantasma-devnode", version, about = "In-memory Phantasma node for local development")]
struct Args {
    /// JSON-RPC server port
    #[arg(long, default_value = "7077")]
    port: u16,

    /// Ledger fixture to serve (JSON). The built-in sample is used when omitted.
    #[arg(long)]
    fixture: Option<PathBuf>,

    /// Write the ledger to this path and exit
    #[arg(long)]
    dump_fixture: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let ledger = match &args.fixture {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading fixture");
            Ledger::from_file(path).unwrap_or_else(|e| {
                tracing::error!("Could not load fixture: {e}");
                std::process::exit(1);
            })
        }
        None => Ledger::sample(),
    };

    ledger.validate().unwrap_or_else(|e| {
        tracing::error!("Fixture validation failed: {e}");
        std::process::exit(1);
    });

    if let Some(path) = &args.dump_fixture {
        ledger.to_file(path)?;
        tracing::info!(path = %path.display(), "fixture written");
        return Ok(());
    }

    tracing::info!(
        chains = ledger.chains.len(),
        blocks = ledger.blocks.len(),
        tokens = ledger.tokens.len(),
        "ledger loaded"
    );

    let node = DevNode::on_port(args.port, Arc::new(NodeState::new(ledger)));

    tokio::select! {
        result = node.start() => {
            match result {
                Ok(addr) => tracing::info!(%addr, "RPC server stopped"),
                Err(e) => tracing::error!(error = %e, "RPC server error"),
            }
        }

        _ = signal::ctrl_c() => {
            tracing::info!("received shutdown signal");
        }
    }

    tracing::info!("devnode shutting down");
    Ok(())
}
