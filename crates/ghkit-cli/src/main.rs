//! ghkit CLI - command-line access to the simplified GitHub operations.

mod commands;

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ghkit_core::Config;
use ghkit_github::GitHubClient;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use commands::{ApiCommand, ConfigCommand};

#[derive(Parser)]
#[command(name = "ghkit")]
#[command(author, version, about = "ghkit - simplified GitHub REST operations", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// GitHub access token (falls back to GITHUB_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    /// Organization owning the repositories (overrides config)
    #[arg(long, global = true)]
    org: Option<String>,

    /// Follow pagination links to the last page
    #[arg(long, global = true)]
    all_pages: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    #[command(flatten)]
    Api(ApiCommand),
}

/// `RUST_LOG` wins when set; otherwise `debug` with `--verbose`, else `info`.
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(if verbose { "debug" } else { "info" }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries the JSON output, logs go to stderr
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose, rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let config_path = match cli.config_file {
        Some(path) => path,
        None => Config::config_path()?,
    };
    let mut config = Config::load_from(&config_path)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Config { command } => {
            commands::run_config(&mut config, &config_path, command, &mut out)?;
        }
        Commands::Api(command) => {
            let token = cli
                .token
                .or_else(|| std::env::var("GITHUB_TOKEN").ok())
                .unwrap_or_default();
            if token.is_empty() {
                warn!("No token provided, requests are sent anonymously");
            }

            let mut client = GitHubClient::from_config(&config.github.unwrap_or_default(), token)?;
            if let Some(org) = cli.org {
                client.set_organization(org);
            }
            if cli.all_pages {
                client.set_all_pages(true);
            }
            debug!(
                base_url = client.base_url(),
                organization = client.organization(),
                all_pages = client.all_pages(),
                "Client ready"
            );

            commands::run(&client, command, &mut out).await?;
        }
    }

    out.flush()?;
    Ok(())
}
