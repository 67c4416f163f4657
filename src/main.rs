//! Binary entry point for trainsync.
//!
//! Synchronizes training unit records between a SaaS register and CSV files.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr/stdout in the main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use trainsync::cli::{self, ConnectionOptions};
use trainsync::observability;

/// Trainsync - synchronizes training unit records with CSV files.
#[derive(Parser)]
#[command(name = "trainsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Connection settings; anything not given here is prompted for.
#[derive(Args)]
struct ConnectionArgs {
    /// Site URL, e.g. <https://app.example.com/acme>.
    #[arg(long, env = "TRAINSYNC_SITE_URL", global = true)]
    site_url: Option<String>,

    /// Tenant override when it cannot be derived from the site URL.
    #[arg(long, env = "TRAINSYNC_TENANT", global = true)]
    tenant: Option<String>,

    /// Base URL of the SCIM-style identity API.
    #[arg(long, env = "TRAINSYNC_IDENTITY_URL", global = true)]
    identity_url: Option<String>,

    /// Username for authentication.
    #[arg(long, env = "TRAINSYNC_USERNAME", global = true)]
    username: Option<String>,

    /// Password for authentication (prompted for when absent).
    #[arg(long, env = "TRAINSYNC_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,

    /// API key for the identity API (prompted for when absent).
    #[arg(long, env = "TRAINSYNC_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,
}

impl From<ConnectionArgs> for ConnectionOptions {
    fn from(args: ConnectionArgs) -> Self {
        Self {
            site_url: args.site_url,
            tenant: args.tenant,
            identity_url: args.identity_url,
            username: args.username,
            password: args.password,
            api_key: args.api_key,
        }
    }
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Export the training register to a dated CSV file.
    Export {
        /// Directory the export file is written into.
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Create training units from a CSV file.
    Import {
        /// Path to the CSV file.
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    observability::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[error] {e:#}");
            ExitCode::FAILURE
        },
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let options = ConnectionOptions::from(cli.connection);
    match cli.command {
        Some(Commands::Export { output_dir }) => {
            cli::export::execute(options, &output_dir).context("export failed")
        },
        Some(Commands::Import { file }) => {
            cli::import::execute(options, &file).context("import failed")
        },
        None => run_interactive(options),
    }
}

/// Interactive fallback: prompt for the action when no subcommand was given.
fn run_interactive(options: ConnectionOptions) -> anyhow::Result<()> {
    println!("1) Export training units to CSV");
    println!("2) Import training units from CSV");
    let choice = cli::prompt_line("Choose an action [1/2]")?;
    match choice.as_str() {
        "1" => cli::export::execute(options, std::path::Path::new(".")).context("export failed"),
        "2" => {
            let file = cli::prompt_line("Path to CSV file")?;
            cli::import::execute(options, std::path::Path::new(&file)).context("import failed")
        },
        other => anyhow::bail!("unrecognized choice '{other}'"),
    }
}
