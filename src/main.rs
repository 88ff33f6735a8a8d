//! need-a-number - random numbers behind blocking and non-blocking delays

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use need_a_number::config::Config;
use need_a_number::number::Variant;
use need_a_number::server;

#[derive(Parser)]
#[command(name = "need-a-number")]
#[command(about = "Random numbers behind blocking and non-blocking delays")]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Interface to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Worker threads of the serving runtime
        #[arg(short, long)]
        workers: Option<usize>,

        /// Delay of the slow endpoints in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
    },

    /// Print the route table
    Routes,

    /// Write the effective configuration to a file
    Init {
        /// Destination (defaults to the user config directory)
        path: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!("need_a_number={},tower_http=debug", log_level).into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    let _ = dotenvy::dotenv();

    match cli.command {
        Commands::Serve {
            host,
            port,
            workers,
            delay_ms,
        } => {
            let mut config = Config::load(cli.config.as_deref())?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(workers) = workers {
                config.runtime.worker_threads = workers;
            }
            if let Some(delay_ms) = delay_ms {
                config.number.delay_ms = delay_ms;
            }
            config.validate()?;

            let runtime = server::build_runtime(&config.runtime)?;
            runtime.block_on(server::run(config))?;
        }

        Commands::Routes => {
            println!("{:<16} {:<30} DESCRIPTION", "PATH", "WAIT");
            for variant in Variant::ALL {
                println!(
                    "{:<16} {:<30} {}",
                    variant.path(),
                    variant.strategy(),
                    variant.description()
                );
            }
        }

        Commands::Init { path } => {
            let config = Config::load(cli.config.as_deref())?;
            let path = config.init_file(path)?;

            println!("✓ Config written to {}", path.display());
        }
    }

    Ok(())
}
