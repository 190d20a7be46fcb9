//! CLI command definitions.

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Send a traced request to the Stripe API
    Request {
        /// HTTP method
        method: String,

        /// Absolute request URL
        url: String,

        /// Header line, e.g. "Stripe-Version: 2024-06-20"
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// Request parameters as a JSON object
        #[arg(short, long)]
        data: Option<String>,

        /// Secret key, falls back to STRIPE_API_KEY
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Show the effective configuration
    Config,
}
