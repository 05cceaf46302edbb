//! phrasedrill CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "phrasedrill", version, about = "Language phrase-drilling practice harness")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive practice session
    Drill {
        /// Difficulty tier: easy, medium, hard
        #[arg(long, default_value = "easy")]
        tier: String,

        /// Phrase pack (.toml or .json); defaults to the built-in pack
        #[arg(long)]
        pack: Option<PathBuf>,

        /// RNG seed for a reproducible phrase order
        #[arg(long)]
        seed: Option<u64>,

        /// Write a session report JSON here on exit
        #[arg(long)]
        report: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate phrase-pack files
    Validate {
        /// Path to a phrase pack or a directory of packs
        #[arg(long)]
        pack: PathBuf,
    },

    /// Show per-phrase progress counters
    Stats {
        /// Progress file; defaults to the configured path
        #[arg(long)]
        progress: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example phrase pack
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("phrasedrill=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Drill {
            tier,
            pack,
            seed,
            report,
            config,
        } => commands::drill::execute(tier, pack, seed, report, config).await,
        Commands::Validate { pack } => commands::validate::execute(pack),
        Commands::Stats { progress, config } => commands::stats::execute(progress, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
