//! Orebi CLI - Catalog seeding and admin provisioning.
//!
//! # Usage
//!
//! ```bash
//! # Clear and reseed the catalog, provisioning the admin from ADMIN_* vars
//! orebi-cli seed
//!
//! # Seed a custom catalog, aborting on any clear failure
//! orebi-cli seed --catalog ./catalogs/outdoor.yaml --clear-policy fail-fast
//!
//! # Run the whole workflow against an in-memory store
//! orebi-cli seed --dry-run
//!
//! # Provision the admin account only
//! orebi-cli admin provision --show-credentials
//!
//! # Validate a catalog and print a summary
//! orebi-cli catalog show --catalog ./catalogs/outdoor.yaml
//! ```
//!
//! # Commands
//!
//! - `seed` - Clear catalog collections, seed them, provision the admin
//! - `admin provision` - Create the admin account from the environment
//! - `catalog show` - Validate and summarize a catalog definition
//!
//! Exits with status 1 on any fatal error.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::error::Error;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use orebi_catalog::policy::{ClearPolicy, ReferencePolicy};

mod commands;

#[derive(Parser)]
#[command(name = "orebi-cli")]
#[command(author, version, about = "Orebi catalog tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clear and reseed the catalog collections
    Seed {
        /// Catalog file, or the name of a built-in catalog
        #[arg(short, long, default_value = "furniture")]
        catalog: String,

        /// Overrides `SEED_CLEAR_POLICY` (`best-effort`, `fail-fast`)
        #[arg(long)]
        clear_policy: Option<ClearPolicy>,

        /// Overrides `SEED_REFERENCE_POLICY` (`fallback`, `strict`)
        #[arg(long)]
        reference_policy: Option<ReferencePolicy>,

        /// Run against an in-memory store instead of `MONGO_URI`
        #[arg(long)]
        dry_run: bool,

        /// Log the admin password once if the account is created
        #[arg(long)]
        show_credentials: bool,
    },
    /// Manage the admin account
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Inspect catalog definitions
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create the admin from `ADMIN_EMAIL`/`ADMIN_PASSWORD` if missing
    Provision {
        /// Log the admin password once if the account is created
        #[arg(long)]
        show_credentials: bool,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Validate a catalog and print a summary
    Show {
        /// Catalog file, or the name of a built-in catalog
        #[arg(short, long, default_value = "furniture")]
        catalog: String,

        /// Treat unknown category/brand references as errors
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        let mut cause = e.source();
        while let Some(inner) = cause {
            tracing::error!("  caused by: {inner}");
            cause = inner.source();
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Commands::Seed {
            catalog,
            clear_policy,
            reference_policy,
            dry_run,
            show_credentials,
        } => {
            commands::seed::run(commands::seed::SeedArgs {
                catalog,
                clear_policy,
                reference_policy,
                dry_run,
                show_credentials,
            })
            .await?;
        }
        Commands::Admin { action } => match action {
            AdminAction::Provision { show_credentials } => {
                commands::admin::provision(show_credentials).await?;
            }
        },
        Commands::Catalog { action } => match action {
            CatalogAction::Show { catalog, strict } => {
                let policy = if strict {
                    ReferencePolicy::Strict
                } else {
                    ReferencePolicy::Fallback
                };
                commands::catalog::show(&catalog, policy).await?;
            }
        },
    }
    Ok(())
}
