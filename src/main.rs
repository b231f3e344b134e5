//! skroutz-basket - cheapest-shop finder for a Skroutz shopping list
//!
//! A Rust implementation with TLS fingerprint emulation for reliable scraping.

use anyhow::Result;
use clap::{Parser, Subcommand};
use skroutz_basket::commands::{BasketCommand, PricesCommand};
use skroutz_basket::config::{Config, OutputFormat, ShoppingList};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "skroutz-basket",
    version,
    about = "Cheapest-shop finder for a Skroutz shopping list",
    long_about = "Scrapes per-shop prices for a shopping list and ranks the shops \
                  that stock every item by total cost."
)]
struct Cli {
    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "SKROUTZ_PROXY")]
    proxy: Option<String>,

    /// Delay between requests in milliseconds
    #[arg(long, default_value = "2000", global = true, env = "SKROUTZ_DELAY")]
    delay: u64,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Only consider offers with a guaranteed direct-purchase path
    #[arg(long, global = true)]
    direct_only: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the cheapest shop(s) for a whole shopping list
    #[command(alias = "b")]
    Basket {
        /// Path to the shopping list TOML file
        list: PathBuf,
    },

    /// List per-shop prices for a single item
    #[command(alias = "p")]
    Prices {
        /// Item key (product page slug)
        item: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    config.format = cli.format;
    config.delay_ms = cli.delay;

    if cli.direct_only {
        config.only_direct_purchase = true;
    }

    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }

    match cli.command {
        Commands::Basket { list } => {
            let list = ShoppingList::from_file(&list)?;
            let cmd = BasketCommand::new(config);
            let output = cmd.execute(&list).await?;
            println!("{}", output);
        }

        Commands::Prices { item } => {
            let cmd = PricesCommand::new(config);
            let output = cmd.execute(&item).await?;
            println!("{}", output);
        }
    }

    Ok(())
}
