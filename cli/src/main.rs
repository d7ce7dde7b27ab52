use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;

use phantasma_rpc::methods::{self, ParamType};
use phantasma_rpc::{is_valid_address, ClientConfig, ClientError, PhantasmaClient};

/// Phantasma node CLI
#[derive(Parser)]
#[command(name = "phantasma", version, about = "Query a Phantasma node over JSON-RPC")]
struct Cli {
    /// Node endpoint, overrides the config file
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Client configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show an account's name and balances
    Account { address: String },

    /// Show the height of a chain
    Height {
        #[arg(long, default_value = "main")]
        chain: String,
    },

    /// Show a block by hash, or by --chain and --height
    Block {
        hash: Option<String>,

        #[arg(long, default_value = "main")]
        chain: String,

        #[arg(long)]
        height: Option<u64>,

        /// Print the serialized block instead
        #[arg(long)]
        raw: bool,
    },

    /// Show a transaction
    Tx { hash: String },

    /// List chains
    Chains,

    /// List tokens
    Tokens,

    /// Show one token
    Token { symbol: String },

    /// List transfers of a token
    Transfers {
        symbol: String,

        #[arg(long, default_value = "1")]
        page: u64,

        #[arg(long, default_value = "10")]
        page_size: u64,

        /// Include page, pageSize, total and totalPages
        #[arg(long)]
        with_meta: bool,
    },

    /// Show the balance of one token for an address
    Balance {
        address: String,
        symbol: String,

        #[arg(long, default_value = "main")]
        chain: String,
    },

    /// List active auctions
    Auctions {
        #[arg(default_value = "")]
        symbol: String,

        #[arg(long, default_value = "1")]
        page: u64,

        #[arg(long, default_value = "10")]
        page_size: u64,

        #[arg(long)]
        with_meta: bool,
    },

    /// Call any catalogue method by name
    Call {
        /// Method name, e.g. getBlockHeight or get_block_height
        method: String,

        args: Vec<String>,
    },

    /// Client configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Write a default configuration file
    Init {
        #[arg(long, default_value = "phantasma.toml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Commands::Config { command } = &cli.command {
        match command {
            ConfigCommands::Init { output, force } => cmd_config_init(output, *force),
        }
        return;
    }

    let client = connect(&cli).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    if let Err(e) = run(&client, cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn connect(cli: &Cli) -> Result<PhantasmaClient, ClientError> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    };
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
    }
    tracing::debug!(url = %config.rpc_url(), "connecting to node");
    PhantasmaClient::from_config(&config)
}

async fn run(client: &PhantasmaClient, command: Commands) -> Result<(), ClientError> {
    match command {
        Commands::Account { address } => {
            check_address("account", &address)?;
            print_json(&client.get_account(&address).await?)
        }
        Commands::Height { chain } => print_json(&client.get_block_height(&chain).await?),
        Commands::Block {
            hash,
            chain,
            height,
            raw,
        } => match (hash, height) {
            (Some(hash), _) if raw => print_json(&client.get_raw_block_by_hash(&hash).await?),
            (Some(hash), _) => print_json(&client.get_block_by_hash(&hash).await?),
            (None, Some(height)) if raw => print_json(&client.get_raw_block_by_height(&chain, height).await?),
            (None, Some(height)) => print_json(&client.get_block_by_height(&chain, height).await?),
            (None, None) => {
                return Err(ClientError::InvalidArguments {
                    method: "block".into(),
                    reason: "pass a block hash or --height".into(),
                })
            }
        },
        Commands::Tx { hash } => print_json(&client.get_transaction(&hash).await?),
        Commands::Chains => print_json(&client.get_chains().await?),
        Commands::Tokens => print_json(&client.get_tokens().await?),
        Commands::Token { symbol } => print_json(&client.get_token(&symbol).await?),
        Commands::Transfers {
            symbol,
            page,
            page_size,
            with_meta,
        } => {
            if with_meta {
                print_json(&client.get_token_transfers_page(&symbol, page, page_size).await?)
            } else {
                print_json(&client.get_token_transfers(&symbol, page, page_size).await?)
            }
        }
        Commands::Balance { address, symbol, chain } => {
            check_address("balance", &address)?;
            print_json(&client.get_token_balance(&address, &symbol, &chain).await?)
        }
        Commands::Auctions {
            symbol,
            page,
            page_size,
            with_meta,
        } => {
            if with_meta {
                print_json(&client.get_auctions_page(&symbol, page, page_size).await?)
            } else {
                print_json(&client.get_auctions(&symbol, page, page_size).await?)
            }
        }
        Commands::Call { method, args } => {
            let args = coerce_args(&method, args)?;
            tracing::debug!(%method, ?args, "dynamic call");
            print_json(&client.call_by_name(&method, args).await?)
        }
        Commands::Config { .. } => Ok(()),
    }
}

/// Reject malformed addresses before any request is sent.
fn check_address(command: &str, address: &str) -> Result<(), ClientError> {
    if is_valid_address(address) {
        Ok(())
    } else {
        Err(ClientError::InvalidArguments {
            method: command.to_string(),
            reason: format!("{address:?} is not a Phantasma address"),
        })
    }
}

/// Turn command-line strings into positional parameters using the method's
/// declared parameter types. Unknown methods and surplus arguments pass
/// through as strings so the client reports them.
fn coerce_args(method: &str, args: Vec<String>) -> Result<Vec<Value>, ClientError> {
    let params = methods::find(method).map(|m| m.params).unwrap_or(&[]);
    args.into_iter()
        .enumerate()
        .map(|(i, arg)| match params.get(i).map(|p| (p.name, p.kind)) {
            Some((name, ParamType::Integer)) => {
                arg.parse::<u64>()
                    .map(Value::from)
                    .map_err(|_| ClientError::InvalidArguments {
                        method: method.to_string(),
                        reason: format!("`{name}` must be a non-negative integer, got {arg:?}"),
                    })
            }
            _ => Ok(Value::String(arg)),
        })
        .collect()
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ClientError> {
    let json = serde_json::to_string_pretty(value).map_err(ClientError::Encode)?;
    println!("{json}");
    Ok(())
}

fn cmd_config_init(output: &Path, force: bool) {
    if output.exists() && !force {
        eprintln!("{} already exists (use --force to overwrite)", output.display());
        std::process::exit(1);
    }

    let config = ClientConfig::default();
    config.to_file(output).unwrap_or_else(|e| {
        eprintln!("Error writing config file: {e}");
        std::process::exit(1);
    });

    println!("Config file created: {}", output.display());
    println!("  Endpoint: {}", config.endpoint);
    println!("  RPC URL: {}", config.rpc_url());
    println!("  Timeout: {}s", config.timeout_secs);
}
