//! Historia daemon: entry point for running a Historia node.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use historia_crypto::{commit_raw, OsSecrets, SecretSource};
use historia_node::{
    init_logging, HistoriaNode, Keeper, LogFormat, NodeConfig, ProtocolCall, ShutdownController,
    StorageBackend,
};
use historia_reputation::{label, score};
use historia_types::{Address, Amount, CommitHash, EventId};

#[derive(Parser)]
#[command(name = "historia-daemon", about = "Historia claim adjudication node")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "HISTORIA_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory for ledger storage.
    #[arg(long, env = "HISTORIA_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Storage backend: "lmdb" or "memory".
    #[arg(long, env = "HISTORIA_STORAGE")]
    storage: Option<String>,

    /// Log level or filter directive, e.g. "info" or "debug,historia_node=trace".
    #[arg(long, env = "HISTORIA_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "HISTORIA_LOG_FORMAT")]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Start the node.
    #[command(name = "node")]
    Node {
        #[command(subcommand)]
        action: NodeAction,
    },
    /// Print a fresh random secret for a commitment.
    Secret,
    /// Compute the commitment of a vote.
    CommitHash {
        #[arg(long)]
        address: String,
        /// "1" for, "0" against.
        #[arg(long)]
        vote: String,
        #[arg(long)]
        secret: String,
    },
    /// Check a vote and secret against a commitment.
    VerifyHash {
        #[arg(long)]
        address: String,
        #[arg(long)]
        vote: String,
        #[arg(long)]
        secret: String,
        #[arg(long)]
        hash: String,
    },
    /// Score a voting record.
    Score {
        #[arg(long)]
        win_rate: f64,
        #[arg(long)]
        total_votes: u64,
        /// Whole units staked.
        #[arg(long)]
        total_staked: f64,
    },
    /// Execute one protocol call against the configured store.
    Call {
        #[arg(long)]
        caller: String,
        /// Attached value in raw units.
        #[arg(long, default_value = "0")]
        send: String,
        func: String,
        args: Vec<String>,
    },
    /// Show an event and its lineage.
    Show { id: String },
    /// Show the stats, reputation and credit of an address.
    Stats { address: String },
}

#[derive(clap::Subcommand)]
enum NodeAction {
    /// Run the node until SIGINT/SIGTERM.
    Run,
}

fn load_config(cli: &Cli) -> anyhow::Result<NodeConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let path = path.to_string_lossy();
            NodeConfig::from_toml_file(&path)
                .with_context(|| format!("failed to load config from {path}"))?
        }
        None => NodeConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(storage) = &cli.storage {
        config.storage = match storage.to_ascii_lowercase().as_str() {
            "lmdb" => StorageBackend::Lmdb,
            "memory" => StorageBackend::Memory,
            other => anyhow::bail!("unknown storage backend '{other}'"),
        };
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.log_format = format.clone();
    }
    Ok(config)
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let format: LogFormat = config.log_format()?;
    init_logging(format, &config.log_level)?;

    match cli.command {
        Command::Node {
            action: NodeAction::Run,
        } => run_node(config).await?,

        Command::Secret => {
            let secret = OsSecrets.generate()?;
            println!("{}", secret.expose());
        }

        Command::CommitHash {
            address,
            vote,
            secret,
        } => {
            println!("{}", commit_raw(&address, &vote, &secret)?);
        }

        Command::VerifyHash {
            address,
            vote,
            secret,
            hash,
        } => {
            let expected: CommitHash = hash.parse()?;
            let ok = commit_raw(&address, &vote, &secret)? == expected;
            println!("{}", if ok { "match" } else { "mismatch" });
            if !ok {
                std::process::exit(1);
            }
        }

        Command::Score {
            win_rate,
            total_votes,
            total_staked,
        } => {
            let value = score(win_rate, total_votes, total_staked, &[]);
            println!("{value:.1} {}", label(value));
        }

        Command::Call {
            caller,
            send,
            func,
            args,
        } => {
            let node = HistoriaNode::open(config)?;
            let caller = Address::parse(caller)?;
            let call = ProtocolCall::new(caller, send.parse::<Amount>()?, func, args);
            let receipt = node.execute(call).await?;
            tracing::info!(event = %receipt.event, "call accepted");
            print_json(&receipt.snapshot)?;
        }

        Command::Show { id } => {
            let node = HistoriaNode::open(config)?;
            let id: EventId = id.parse()?;
            let lineage = node.lineage(id).await?;
            print_json(&lineage)?;
        }

        Command::Stats { address } => {
            let node = HistoriaNode::open(config)?;
            let address = Address::parse(address)?;
            let reputation = node.reputation(&address).await;
            print_json(&reputation)?;
            println!("credit: {}", node.credit(&address).await);
        }
    }

    Ok(())
}

async fn run_node(config: NodeConfig) -> anyhow::Result<()> {
    tracing::info!(
        data_dir = %config.data_dir.display(),
        storage = ?config.storage,
        keeper = config.enable_keeper,
        "starting Historia node"
    );
    let enable_keeper = config.enable_keeper;
    let enable_metrics = config.enable_metrics;
    let node = Arc::new(HistoriaNode::open(config)?);

    let shutdown = ShutdownController::new();
    let keeper = enable_keeper.then(|| Keeper::new(node.clone()).spawn(shutdown.subscribe()));

    shutdown.wait_for_signal().await;

    if let Some(handle) = keeper {
        if let Err(e) = handle.await {
            tracing::warn!(error = %e, "keeper task ended abnormally");
        }
    }
    if enable_metrics {
        print!("{}", node.metrics().encode()?);
    }
    tracing::info!("Historia daemon exited cleanly");
    Ok(())
}
