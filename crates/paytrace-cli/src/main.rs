//! paytrace CLI entrypoint.

use clap::Parser;
use std::path::PathBuf;

mod commands;
mod config;
mod handlers;

use commands::Commands;
use config::CliConfig;

#[derive(Parser)]
#[command(name = "paytrace")]
#[command(author, version, about = "Traced Stripe API calls", long_about = None)]
struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true, env = "PAYTRACE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref())?;

    paytrace_trace::init_tracer(&config.tracing)?;

    let result = match cli.command {
        Commands::Request {
            method,
            url,
            headers,
            data,
            api_key,
        } => handlers::request(&config, method, url, headers, data, api_key).await,
        Commands::Config => handlers::show_config(&config),
    };

    paytrace_trace::shutdown_tracer();
    result
}
