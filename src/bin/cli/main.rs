mod client;
mod commands;
mod form;
mod localities;
mod output;

use clap::{Parser, Subcommand};
use client::EcoletaClient;
use ecoleta::config;
use localities::{IbgeClient, DEFAULT_IBGE_URL};
use output::{OutputConfig, OutputFormat};
use std::process;

const DEFAULT_SERVER_URL: &str = "http://localhost:3333";

/// CLI for the Ecoleta collection point registry
#[derive(Parser, Debug)]
#[clap(name = "ecoleta-cli", about = "CLI for the Ecoleta collection point registry")]
struct Cli {
    /// Server URL to connect to
    #[clap(long, env = "ECOLETA_URL", global = true)]
    server_url: Option<String>,

    /// Base URL of the IBGE localities API
    #[clap(long, env = "ECOLETA_IBGE_URL", global = true)]
    ibge_url: Option<String>,

    /// Output format
    #[clap(long, value_enum, default_value_t = OutputFormat::Human, global = true)]
    format: OutputFormat,

    /// Quiet mode: minimal output (just IDs or names)
    #[clap(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Browse the item catalog
    #[command(subcommand)]
    Items(commands::item::ItemCommands),
    /// List, show and register collection points
    #[command(subcommand)]
    Points(commands::point::PointCommands),
    /// Look up states and cities
    #[command(subcommand)]
    Localities(commands::locality::LocalityCommands),
}

/// Resolves the server URL from CLI args, config file, or defaults
///
/// Precedence: CLI flag / env var > config file > default
fn resolve_server_url(cli_url: Option<String>) -> String {
    if let Some(url) = cli_url {
        return url;
    }

    let config_path = config::get_config_dir_path().map(|dir| dir.join("config.toml"));
    if let Ok(update) = config::config_from_file(config_path) {
        if let Some(url) = update.server_url {
            return url;
        }
    }

    DEFAULT_SERVER_URL.to_string()
}

/// Formats an error for human-readable stderr output
fn format_error(err: &dyn std::error::Error) -> String {
    let err_string = err.to_string();

    if err_string.contains("error sending request")
        || err_string.contains("connection refused")
        || err_string.contains("Connection refused")
        || err_string.contains("tcp connect error")
    {
        return format!(
            "Could not connect to server. Is ecoleta running?\n  {}",
            err_string
        );
    }

    err_string
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let client = EcoletaClient::new(resolve_server_url(cli.server_url));
    let ibge = IbgeClient::new(cli.ibge_url.unwrap_or_else(|| DEFAULT_IBGE_URL.to_string()));
    let output_config = OutputConfig {
        format: cli.format,
        quiet: cli.quiet,
    };

    let result = match cli.command {
        Commands::Items(cmd) => commands::item::execute(&client, cmd, &output_config).await,
        Commands::Points(cmd) => {
            commands::point::execute(&client, &ibge, cmd, &output_config).await
        }
        Commands::Localities(cmd) => {
            commands::locality::execute(&ibge, cmd, &output_config).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", format_error(e.as_ref()));
        process::exit(1);
    }
}
