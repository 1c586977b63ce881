//! Silk Saree CLI - database migrations, admin users, demo data and charts.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! saree-cli migrate
//!
//! # Create an admin user (password read from ADMIN_PASSWORD)
//! ADMIN_PASSWORD=... saree-cli admin create -u priya
//!
//! # Seed demo categories, sarees and settings
//! saree-cli seed
//!
//! # Render a demo chart
//! saree-cli chart histogram -o grades.svg
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `admin create` / `admin set-password` - Manage admin users
//! - `seed` - Insert demo catalog data into an empty catalog
//! - `chart` - Render the demo plots to SVG

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::chart::ChartKind;

#[derive(Parser)]
#[command(name = "saree-cli")]
#[command(author, version, about = "Silk Saree CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Seed the catalog with demo data (only when it is empty)
    Seed {
        /// YAML catalog to load instead of the built-in demo sarees
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Render a demo chart to an SVG file
    Chart {
        /// Which chart to render
        #[arg(value_enum)]
        kind: ChartKind,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin user (password from `ADMIN_PASSWORD`)
    Create {
        /// Admin username
        #[arg(short, long)]
        username: String,
    },
    /// Replace an admin user's password (password from `ADMIN_PASSWORD`)
    SetPassword {
        /// Admin username
        #[arg(short, long)]
        username: String,
    },
}

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "saree_cli=info,silk_saree_admin=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

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
        Commands::Admin { action } => match action {
            AdminAction::Create { username } => {
                commands::admin::create_user(&username).await?;
            }
            AdminAction::SetPassword { username } => {
                commands::admin::set_password(&username).await?;
            }
        },
        Commands::Seed { file } => commands::seed::run(file.as_deref()).await?,
        Commands::Chart { kind, output } => commands::chart::render(kind, &output)?,
    }
    Ok(())
}
