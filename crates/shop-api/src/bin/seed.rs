//! # Seed Data Generator
//!
//! Populates the database with a small demo catalog and a demo user.
//!
//! ## Usage
//! ```bash
//! # Uses SHOP_DB_PATH (default ./shop.db)
//! cargo run -p shop-api --bin seed
//!
//! # Specify database path
//! cargo run -p shop-api --bin seed -- --db ./data/shop.db
//! ```

use std::env;

use shop_api::{init_tracing, AppConfig};
use shop_db::{Database, DbError};
use tracing::{info, warn};

/// Demo catalog: (name, description, price in cents)
const CATALOG: &[(&str, &str, i64)] = &[
    ("Round Widget", "A widget that is round", 299),
    ("Square Widget", "A widget that is square", 199),
    ("Shoe", "A single left shoe", 7999),
    ("Shoe", "A single right shoe", 7999),
    ("Hat", "Wool, one size", 1500),
    ("Pen", "Blue ink", 1000),
    ("Notebook", "A5, dotted", 450),
    ("Sock", "Sold individually", 250),
];

const DEMO_USERNAME: &str = "demo";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load()?;

    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.db_path = args[i + 1].clone().into();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Shop Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: $SHOP_DB_PATH or ./shop.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    init_tracing(&config.log_filter);

    info!(path = %config.db_path.display(), "Seeding database");
    let db = Database::new(config.db_config()).await?;

    let existing = db.items().count().await?;
    if existing > 0 {
        warn!(existing, "Catalog already populated, skipping items");
    } else {
        for (name, description, price_cents) in CATALOG {
            let item = db.items().insert(name, Some(*description), *price_cents).await?;
            info!(item_id = item.id, name = %item.name, "Item seeded");
        }
    }

    // The demo user's stored hash is a placeholder; nothing here can log in.
    match db.users().create(DEMO_USERNAME, "!").await {
        Ok(user) => info!(user_id = user.id, "Demo user created"),
        Err(DbError::UniqueViolation { .. }) => warn!("Demo user already exists"),
        Err(e) => return Err(e.into()),
    }

    info!(items = db.items().count().await?, "Seed complete");
    db.close().await;
    Ok(())
}
