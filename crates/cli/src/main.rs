//! Paperleaf CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations (includes the session table)
//! paperleaf-cli migrate
//!
//! # Advance an order through its lifecycle
//! paperleaf-cli set-order-status --order 42 --status shipped
//!
//! # Repair order lines with missing price or quantity
//! paperleaf-cli fix-order-lines
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `set-order-status` - Apply an order status transition
//! - `fix-order-lines` - Backfill malformed order lines

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "paperleaf-cli")]
#[command(author, version, about = "Paperleaf CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Apply an order status transition
    SetOrderStatus {
        /// Order ID
        #[arg(short, long)]
        order: i32,

        /// Target status (`processing`, `shipped`, `delivered`, `cancelled`)
        #[arg(short, long)]
        status: String,
    },
    /// Repair order lines with missing price or quantity
    FixOrderLines,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::SetOrderStatus { order, status } => {
            commands::orders::set_status(order, &status).await?;
        }
        Commands::FixOrderLines => commands::orders::fix_order_lines().await?,
    }
    Ok(())
}
