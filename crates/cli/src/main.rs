//! Bazaar CLI - fixture checks and catalog queries.
//!
//! # Usage
//!
//! ```bash
//! # Validate the embedded fixtures, or a directory of fixture files
//! bazaar-cli fixtures check
//! bazaar-cli fixtures check --dir ./fixtures
//!
//! # Query the catalog
//! bazaar-cli products search masala --limit 5
//! bazaar-cli products trending --city Lahore --weather rain
//! bazaar-cli bundles search biryani
//! bazaar-cli bundles featured --json
//! ```
//!
//! # Commands
//!
//! - `fixtures check` - Parse fixtures and report cross-reference problems
//! - `products search|trending` - Product queries
//! - `bundles search|featured` - Recipe bundle queries

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bazaar-cli")]
#[command(author, version, about = "Bazaar storefront CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect fixture data
    Fixtures {
        #[command(subcommand)]
        action: FixturesAction,
    },
    /// Query products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Query recipe bundles
    Bundles {
        #[command(subcommand)]
        action: BundlesAction,
    },
}

#[derive(Subcommand)]
enum FixturesAction {
    /// Parse fixtures and check cross-references
    Check {
        /// Directory with products.json, categories.json and recipeBundles.json
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

/// Options shared by every catalog query.
#[derive(Args)]
struct QueryOptions {
    /// Load fixtures from this directory instead of the embedded set
    #[arg(long, env = "STOREFRONT_FIXTURES_DIR")]
    fixtures: Option<PathBuf>,

    /// Maximum number of results
    #[arg(short, long)]
    limit: Option<usize>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum ProductsAction {
    /// Case-insensitive search over name and description
    Search {
        query: String,
        #[command(flatten)]
        options: QueryOptions,
    },
    /// Trending products for a location
    Trending {
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        weather: Option<String>,
        #[command(flatten)]
        options: QueryOptions,
    },
}

#[derive(Subcommand)]
enum BundlesAction {
    /// Case-insensitive search over name, description and cuisine
    Search {
        query: String,
        #[command(flatten)]
        options: QueryOptions,
    },
    /// Featured bundles
    Featured {
        #[command(flatten)]
        options: QueryOptions,
    },
}

fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Fixtures { action } => match action {
            FixturesAction::Check { dir } => commands::fixtures::check(dir.as_deref())?,
        },
        Commands::Products { action } => match action {
            ProductsAction::Search { query, options } => {
                let catalog = commands::catalog::load(options.fixtures.as_deref())?;
                commands::catalog::search_products(&catalog, &query, options.limit, options.json)?;
            }
            ProductsAction::Trending {
                city,
                region,
                weather,
                options,
            } => {
                let catalog = commands::catalog::load(options.fixtures.as_deref())?;
                let location = commands::catalog::location(city, region, weather);
                commands::catalog::trending_products(
                    &catalog,
                    location.as_ref(),
                    options.limit,
                    options.json,
                )?;
            }
        },
        Commands::Bundles { action } => match action {
            BundlesAction::Search { query, options } => {
                let catalog = commands::catalog::load(options.fixtures.as_deref())?;
                commands::catalog::search_bundles(&catalog, &query, options.limit, options.json)?;
            }
            BundlesAction::Featured { options } => {
                let catalog = commands::catalog::load(options.fixtures.as_deref())?;
                commands::catalog::featured_bundles(&catalog, options.limit, options.json)?;
            }
        },
    }
    Ok(())
}
