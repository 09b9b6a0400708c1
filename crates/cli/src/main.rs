//! Modern Webshop CLI - browse the catalog and manage the cart from a shell.
//!
//! # Usage
//!
//! ```bash
//! # List apparel, cheapest first
//! webshop catalog list --category apparel --sort price_asc
//!
//! # Add two medium black hoodies
//! webshop cart add 2 -q 2 -o Size=M -o Color=Black
//!
//! # Show the cart
//! webshop cart show
//! ```
//!
//! # Commands
//!
//! - `catalog list` / `catalog show` - Read the demo catalog
//! - `cart show|add|update|remove|clear` - Manage the persisted cart
//!
//! The cart lives in the same data directory the storefront server uses
//! (`WEBSHOP_DATA_DIR`, or `--data-dir`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use webshop_storefront::cart::CartStore;
use webshop_storefront::catalog::{InMemoryCatalog, ProductQuery};
use webshop_storefront::config::StorefrontConfig;
use webshop_storefront::storage::FileStore;

mod commands;

use commands::{CliError, parse_option};

#[derive(Parser)]
#[command(name = "webshop")]
#[command(author, version, about = "Modern Webshop CLI tools")]
struct Cli {
    /// Directory holding the persisted cart (overrides `WEBSHOP_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products
    List {
        /// Category slug (e.g. apparel)
        #[arg(short, long)]
        category: Option<String>,

        /// Text to look for in names and descriptions
        #[arg(short, long)]
        search: Option<String>,

        /// Sort key (`name_asc`, `name_desc`, `price_asc`, `price_desc`, `rating_desc`)
        #[arg(long)]
        sort: Option<String>,

        /// 1-based page number
        #[arg(short, long)]
        page: Option<u32>,
    },
    /// Show one product
    Show {
        /// Product ID
        id: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart and its total
    Show,
    /// Add a product
    Add {
        /// Product ID
        id: String,

        /// How many to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        /// Option choice as NAME=VALUE (repeatable)
        #[arg(short = 'o', long = "option", value_parser = parse_option)]
        options: Vec<(String, String)>,
    },
    /// Set a line item's quantity (0 or less removes it)
    Update {
        /// Product ID
        id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,

        /// Option choice as NAME=VALUE (repeatable)
        #[arg(short = 'o', long = "option", value_parser = parse_option)]
        options: Vec<(String, String)>,
    },
    /// Remove a line item
    Remove {
        /// Product ID
        id: String,

        /// Option choice as NAME=VALUE (repeatable)
        #[arg(short = 'o', long = "option", value_parser = parse_option)]
        options: Vec<(String, String)>,
    },
    /// Empty the cart
    Clear,
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = StorefrontConfig::from_env()?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    let catalog = InMemoryCatalog::demo();

    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List {
                category,
                search,
                sort,
                page,
            } => {
                let query = ProductQuery {
                    category: category.map(Into::into),
                    search,
                    sort,
                    page,
                };
                commands::catalog::list(&catalog, &query, config.page_size);
            }
            CatalogAction::Show { id } => commands::catalog::show(&catalog, &id)?,
        },
        Commands::Cart { action } => {
            let storage = FileStore::open(config.data_dir.clone())?;
            let mut cart = CartStore::load(Arc::new(storage), config.option_matching);
            match action {
                CartAction::Show => {}
                CartAction::Add {
                    id,
                    quantity,
                    options,
                } => commands::cart::add(&mut cart, &catalog, &id, quantity, options)?,
                CartAction::Update {
                    id,
                    quantity,
                    options,
                } => commands::cart::update(&mut cart, &catalog, &id, quantity, options)?,
                CartAction::Remove { id, options } => {
                    commands::cart::remove(&mut cart, &catalog, &id, options);
                }
                CartAction::Clear => commands::cart::clear(&mut cart),
            }
            commands::cart::show(&cart, config.shipping_rate);
        }
    }
    Ok(())
}
