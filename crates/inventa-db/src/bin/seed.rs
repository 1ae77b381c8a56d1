//! # Seed Data Generator
//!
//! Bootstraps a database with the default admin account and a small demo
//! catalog for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./inventa_dev.db (default)
//! cargo run -p inventa-db --bin seed
//!
//! # Specify database path
//! cargo run -p inventa-db --bin seed -- --db ./data/inventa.db
//!
//! # Also record a few demo transactions
//! cargo run -p inventa-db --bin seed -- --with-history
//! ```

use std::env;

use inventa_core::{NewProduct, TransactionKind, DEFAULT_ADMIN_NAME};
use inventa_db::{Database, DbConfig};

/// Demo catalog: (name, category, cost cents, sale cents, stock).
const DEMO_PRODUCTS: &[(&str, &str, i64, i64, i64)] = &[
    ("Cola 330ml", "beverages", 80, 150, 48),
    ("Orange Juice 1L", "beverages", 210, 350, 20),
    ("Sparkling Water 500ml", "beverages", 60, 120, 36),
    ("Potato Chips", "snacks", 110, 220, 30),
    ("Chocolate Bar", "snacks", 90, 180, 40),
    ("Trail Mix 200g", "snacks", 240, 420, 15),
    ("Whole Milk 1L", "dairy", 120, 190, 24),
    ("Greek Yogurt", "dairy", 140, 260, 18),
    ("White Bread", "bakery", 130, 240, 12),
    ("Croissant", "bakery", 70, 160, 3),
    ("Paper Towels", "household", 180, 320, 10),
    ("Dish Soap", "household", 150, 280, 4),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./inventa_dev.db");
    let mut with_history = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--with-history" => {
                with_history = true;
            }
            "--help" | "-h" => {
                println!("Inventa Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./inventa_dev.db)");
                println!("      --with-history Record a few demo purchases and sales");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Inventa Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // First-run admin bootstrap
    if db.accounts().ensure_default_admin().await? {
        println!("✓ Default admin account created ({})", DEFAULT_ADMIN_NAME);
    } else {
        println!("  Admin already seeded, skipping");
    }

    // Check existing products
    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping catalog seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Seeding catalog...");

    let products = db.products();
    let mut ids = Vec::with_capacity(DEMO_PRODUCTS.len());

    for &(name, category, cost_cents, sale_cents, stock) in DEMO_PRODUCTS {
        let created = products
            .create(&NewProduct {
                name: name.to_string(),
                category: category.to_string(),
                cost_cents,
                sale_cents,
                stock,
            })
            .await?;
        ids.push(created.id);
    }

    println!("✓ Seeded {} products", ids.len());

    if with_history {
        println!();
        println!("Recording demo transactions...");

        let engine = db.engine();
        for (offset, &id) in ids.iter().enumerate() {
            // Restock a few units, then sell a couple
            engine
                .execute(TransactionKind::Purchase, id, 2 + (offset as i64 % 3))
                .await?;
            engine.execute(TransactionKind::Sale, id, 1).await?;
        }

        let summary = engine.compute_summary().await?;
        println!("✓ Recorded {} transactions", db.ledger().count().await?);
        println!(
            "  Sales: {}  Purchases: {}  Margin: {} ({:.1}%)",
            summary.total_sales,
            summary.total_purchases,
            summary.net_margin,
            summary.margin_percent
        );
    }

    let low = db
        .products()
        .list_low_stock(inventa_core::DEFAULT_LOW_STOCK_THRESHOLD)
        .await?;
    if !low.is_empty() {
        println!();
        println!("⚠ {} products at or below the low-stock threshold:", low.len());
        for p in &low {
            println!("  {} ({} left)", p.name, p.stock);
        }
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
