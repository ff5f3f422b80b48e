//! # Seed Data Generator
//!
//! Populates the database with a jewelry catalog, clients and staff for
//! development.
//!
//! ## Usage
//! ```bash
//! # 200 products (default)
//! cargo run -p atelier-db --bin seed
//!
//! # Custom amount and path
//! cargo run -p atelier-db --bin seed -- --count 1000 --db ./data/atelier.db
//! ```
//!
//! ## Generated Data
//! - Products: `{KIND}-{METAL}-{NNN}` SKUs, prices 1 500.00 - 250 000.00,
//!   stock 0 - 12
//! - Clients: every third one is a permanent (loyalty) client
//! - Staff: one admin, two sellers

use chrono::Utc;
use std::env;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use atelier_core::{Client, Product, StaffMember, StaffRole};
use atelier_db::repository::client::generate_client_id;
use atelier_db::repository::product::generate_product_id;
use atelier_db::repository::staff::generate_staff_id;
use atelier_db::{Database, DbConfig};

/// Piece kinds: (SKU code, display name, base price in major units)
const KINDS: &[(&str, &str, i64)] = &[
    ("RING", "Ring", 12_000),
    ("EAR", "Earrings", 9_500),
    ("PND", "Pendant", 7_000),
    ("BRC", "Bracelet", 15_000),
    ("CHN", "Chain", 11_000),
    ("BRO", "Brooch", 6_500),
];

/// Metals: (SKU code, display name, price multiplier in percent)
const METALS: &[(&str, &str, i64)] = &[
    ("SV", "Silver 925", 100),
    ("GD", "Gold 585", 450),
    ("WG", "White gold 585", 500),
    ("PT", "Platinum 950", 900),
];

const STONES: &[&str] = &["", "with topaz", "with garnet", "with emerald", "with diamond"];

const FIRST_NAMES: &[&str] = &["Anna", "Ivan", "Maria", "Sergey", "Olga", "Dmitry", "Elena"];
const LAST_NAMES: &[&str] = &["Ivanova", "Sidorov", "Petrova", "Smirnov", "Kuznetsova"];

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,atelier=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./atelier_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Atelier Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./atelier_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    info!(db = %db_path, count, "Seeding database");

    let db = Database::new(DbConfig::new(&db_path)).await?;

    let existing = db.products().count().await?;
    if existing > 0 {
        warn!(existing, "Database already has products, skipping seed");
        return Ok(());
    }

    let start = std::time::Instant::now();
    let mut generated = 0;

    'outer: for (kind_idx, kind) in KINDS.iter().enumerate() {
        for (metal_idx, metal) in METALS.iter().enumerate() {
            for (stone_idx, stone) in STONES.iter().enumerate() {
                if generated >= count {
                    break 'outer;
                }

                let seed = kind_idx * 100 + metal_idx * 10 + stone_idx;
                let product = generate_product(kind, metal, stone, seed);

                if let Err(e) = db.products().insert(&product).await {
                    warn!(sku = %product.sku, error = %e, "Failed to insert product");
                    continue;
                }

                generated += 1;
            }
        }
    }

    // The kind × metal × stone grid is finite; fill the rest with numbered editions.
    let mut edition = 0;
    while generated < count {
        let kind = &KINDS[edition % KINDS.len()];
        let metal = &METALS[edition % METALS.len()];
        let mut product = generate_product(kind, metal, "", 1000 + edition);
        product.sku = format!("{}-{}-E{:04}", kind.0, metal.0, edition);
        product.name = format!("{} edition #{}", product.name, edition + 1);

        db.products().insert(&product).await?;
        generated += 1;
        edition += 1;
    }

    info!(generated, elapsed = ?start.elapsed(), "Products generated");

    let now = Utc::now();
    for (idx, last_name) in LAST_NAMES.iter().enumerate() {
        let client = Client {
            id: generate_client_id(),
            first_name: FIRST_NAMES[idx % FIRST_NAMES.len()].to_string(),
            last_name: last_name.to_string(),
            patronymic: None,
            phone: Some(format!("+7 900 555-00-{:02}", idx)),
            is_permanent: idx % 3 == 0,
            created_at: now,
        };
        db.clients().insert(&client).await?;
    }

    for (name, role) in [
        ("Store admin", StaffRole::Admin),
        ("Seller 1", StaffRole::Seller),
        ("Seller 2", StaffRole::Seller),
    ] {
        let member = StaffMember {
            id: generate_staff_id(),
            display_name: name.to_string(),
            role,
            created_at: now,
        };
        db.staff().insert(&member).await?;
    }

    info!(
        products = db.products().count().await?,
        clients = db.clients().count().await?,
        staff = db.staff().count().await?,
        "Seed complete"
    );

    Ok(())
}

/// Generates a single product with deterministic pseudo-random data.
fn generate_product(
    kind: &(&str, &str, i64),
    metal: &(&str, &str, i64),
    stone: &str,
    seed: usize,
) -> Product {
    let now = Utc::now();
    let (kind_code, kind_name, base) = *kind;
    let (metal_code, metal_name, multiplier) = *metal;

    let sku = format!("{}-{}-{:03}", kind_code, metal_code, seed % 1000);

    let stone_premium = if stone.is_empty() { 0 } else { 3_000 + (seed as i64 * 37) % 20_000 };
    let major = (base * multiplier / 100 + stone_premium).clamp(1_500, 250_000);

    let name = if stone.is_empty() {
        format!("{metal_name} {}", kind_name.to_lowercase())
    } else {
        format!("{metal_name} {} {stone}", kind_name.to_lowercase())
    };

    Product {
        id: generate_product_id(),
        sku,
        name,
        description: None,
        price_cents: major * 100,
        in_stock: (seed % 13) as i64,
        created_at: now,
        updated_at: now,
    }
}
