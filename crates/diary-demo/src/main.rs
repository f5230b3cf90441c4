//! Diary demo binary
//!
//! ```text
//! diary-demo run --scenario all
//! diary-demo run --scenario login --validation-mode concurrent
//! diary-demo serve --addr 127.0.0.1:3000
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use diary_demo::server::{self, AppState};
use diary_demo::users::{self, UserStore};
use diary_demo::{DemoResult, Harness, Scenario};
use diary_rs::{DispatchConfig, Dispatcher, ValidationMode};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Demo command line arguments
#[derive(Parser, Debug)]
#[command(name = "diary-demo")]
#[command(about = "Food diary request dispatch demonstration")]
struct Args {
    /// JSON dispatch configuration file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the configured validator execution mode
    #[arg(long, global = true, value_enum)]
    validation_mode: Option<Mode>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run end-to-end dispatch scenarios
    Run {
        /// Scenario to run
        #[arg(long, value_enum, default_value_t = Scenario::All)]
        scenario: Scenario,
    },
    /// Serve the users feature over HTTP
    Serve {
        /// Listen address
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Sequential,
    Concurrent,
}

impl From<Mode> for ValidationMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Sequential => Self::Sequential,
            Mode::Concurrent => Self::Concurrent,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    setup_tracing(args.verbose);

    if let Err(e) = run(args).await {
        error!(error = %e, "demo failed");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> DemoResult<()> {
    let mut config = match &args.config {
        Some(path) => DispatchConfig::from_json(&tokio::fs::read_to_string(path).await?)?,
        None => DispatchConfig::default(),
    };
    if let Some(mode) = args.validation_mode {
        config = config.with_validation_mode(mode.into());
    }
    info!(?config, "dispatch configuration");

    let shutdown = CancellationToken::new();
    tokio::spawn(cancel_on_ctrl_c(shutdown.clone()));

    match args.command {
        Command::Run { scenario } => {
            Harness::new(&config)?.run(scenario, &shutdown).await?;
            info!("all selected scenarios passed");
        }
        Command::Serve { addr } => {
            let (store, user_id) = UserStore::seeded();
            info!(user = %user_id, "seeded demo user ann@example.com");
            let dispatcher = Dispatcher::with_config(users::registry(store)?, &config);
            server::serve(addr, AppState::new(dispatcher, shutdown)).await?;
        }
    }
    Ok(())
}

async fn cancel_on_ctrl_c(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for ctrl-c");
        return;
    }
    info!("shutdown requested");
    shutdown.cancel();
}

fn setup_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("diary_rs=debug,diary_demo=debug,info")
        } else {
            EnvFilter::new("diary_rs=info,diary_demo=info,warn")
        }
    });

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
