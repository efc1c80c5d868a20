//! # Seed Data Generator
//!
//! Loads the demo catalogue into a database for development.
//!
//! ## Usage
//! ```bash
//! # Default database path
//! cargo run -p taller-db --bin seed
//!
//! # Specify database path
//! cargo run -p taller-db --bin seed -- --db ./data/taller.db
//! ```
//!
//! Nothing is inserted if the products table already has rows.

use std::env;
use taller_db::seed::seed_demo_products;
use taller_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./data/taller.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Taller POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./data/taller.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Taller POS Seed Data Generator");
    println!("=================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let inserted = seed_demo_products(&db).await?;
    if inserted == 0 {
        let existing = db.products().count().await?;
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
    } else {
        println!("✓ Inserted {} demo products", inserted);
    }

    let low_stock = db.stats().low_stock_count().await?;
    println!("  Low stock products: {}", low_stock);

    db.close().await;
    println!();
    println!("✓ Seed complete!");

    Ok(())
}
