//! moexiss CLI - Moscow Exchange ISS reference lists and end-of-day history.

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use moexiss_lib::prelude::*;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

use display::Format;

#[derive(Parser)]
#[command(name = "moexiss")]
#[command(about = "Moscow Exchange ISS client", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(flatten)]
    connection: ConnectionArgs,
}

/// Credentials and endpoint overrides shared by every command.
#[derive(Debug, Args)]
pub(crate) struct ConnectionArgs {
    /// MOEX Passport user name
    #[arg(long, env = "MOEX_USERNAME", global = true)]
    username: Option<String>,

    /// MOEX Passport password
    #[arg(long, env = "MOEX_PASSWORD", global = true, hide_env_values = true)]
    password: Option<String>,

    /// ISS base URL
    #[arg(long, env = "MOEX_ISS_URL", global = true)]
    iss_url: Option<String>,

    /// MOEX Passport authentication URL
    #[arg(long, env = "MOEX_AUTH_URL", global = true)]
    auth_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value = "30", global = true)]
    timeout: u64,
}

impl ConnectionArgs {
    /// Client configuration with any overrides applied.
    pub(crate) fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig {
            timeout: Duration::from_secs(self.timeout),
            ..ClientConfig::default()
        };
        if let Some(url) = &self.iss_url {
            config.endpoints.iss_base.clone_from(url);
        }
        if let Some(url) = &self.auth_url {
            config.endpoints.auth.clone_from(url);
        }
        config
    }

    /// Passport credentials, required by commands that read history.
    pub(crate) fn credentials(&self) -> Result<Credentials> {
        let username = self
            .username
            .as_deref()
            .context("No user name: pass --username or set MOEX_USERNAME")?;
        let password = self
            .password
            .as_deref()
            .context("No password: pass --password or set MOEX_PASSWORD")?;
        Ok(Credentials::new(username, password))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Log in to MOEX Passport and report the outcome
    Auth,

    /// List trading engines
    Engines {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: Format,
    },

    /// List the markets of an engine
    Markets {
        /// Engine code (e.g., stock)
        engine: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: Format,
    },

    /// List the boards of a market
    Boards {
        /// Engine code (e.g., stock)
        engine: String,

        /// Market code (e.g., shares)
        market: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: Format,
    },

    /// Download end-of-day history for a board (requires credentials)
    History {
        /// Engine code (e.g., stock)
        engine: String,

        /// Market code (e.g., shares)
        market: String,

        /// Board id (e.g., TQBR)
        board: String,

        /// Trading date (YYYY-MM-DD). Defaults to yesterday.
        #[arg(short, long)]
        date: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: Format,

        /// Output file path. Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Pick engine, market, and board interactively, then download history
    Browse {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: Format,

        /// Output file path. Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let connection = &cli.connection;
    match command {
        Commands::Auth => commands::auth::auth(connection).await,
        Commands::Engines { format } => {
            commands::reference::list(connection, &ReferenceRequest::Engines, format, cli.quiet)
                .await
        }
        Commands::Markets { engine, format } => {
            commands::reference::list(
                connection,
                &ReferenceRequest::markets(engine),
                format,
                cli.quiet,
            )
            .await
        }
        Commands::Boards {
            engine,
            market,
            format,
        } => {
            commands::reference::list(
                connection,
                &ReferenceRequest::boards(engine, market),
                format,
                cli.quiet,
            )
            .await
        }
        Commands::History {
            engine,
            market,
            board,
            date,
            format,
            output,
        } => {
            commands::history::history(
                connection,
                &engine,
                &market,
                &board,
                date.as_deref(),
                format,
                output,
                cli.quiet,
            )
            .await
        }
        Commands::Browse { format, output } => {
            commands::browse::browse(connection, format, output, cli.quiet).await
        }
    }
}
