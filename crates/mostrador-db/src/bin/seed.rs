//! # Seed Data Generator
//!
//! Populates a development database with products and demo sales.
//!
//! ## Usage
//! ```bash
//! # 200 products, 50 sales (defaults)
//! cargo run -p mostrador-db --bin seed
//!
//! # Custom amounts
//! cargo run -p mostrador-db --bin seed -- --products 1000 --sales 300
//!
//! # Specify database path (otherwise MOSTRADOR_DB_PATH, then ./mostrador_dev.db)
//! cargo run -p mostrador-db --bin seed -- --db ./data/mostrador.db
//! ```
//!
//! Sales go through the Sale Orchestrator, so every one of them gets a
//! number, a stock decrease and a mirrored treasury movement. Payment
//! methods rotate through all variants; check sales get due dates spread
//! over the next few weeks so the upcoming-check query has something to
//! show.

use chrono::{Duration, Utc};
use mostrador_core::{
    CheckDetails, CoreError, Money, PaymentMethod, ProductDraft, Quantity, SaleDraft,
    SaleLineDraft,
};
use mostrador_db::{Database, LedgerConfig, LedgerError};
use rust_decimal::Decimal;
use serde_json::json;
use std::env;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Product families for realistic test data
const FAMILIES: &[(&str, &[&str])] = &[
    (
        "ALM",
        &[
            "Yerba Mate 1kg",
            "Azúcar 1kg",
            "Harina 000 1kg",
            "Arroz Largo Fino",
            "Fideos Tirabuzón",
            "Aceite Girasol 1.5L",
            "Puré de Tomate",
            "Lentejas 400g",
        ],
    ),
    (
        "FER",
        &[
            "Tornillo 6x40",
            "Tarugo Nylon 8mm",
            "Cinta Aisladora",
            "Lija al Agua 120",
            "Pincel N°20",
            "Cable 2.5mm (metro)",
        ],
    ),
    (
        "LIM",
        &[
            "Lavandina 1L",
            "Detergente 750ml",
            "Esponja Doble Uso",
            "Trapo de Piso",
            "Bolsa Residuo 60x90",
        ],
    ),
    (
        "FIA",
        &[
            "Queso Cremoso (kg)",
            "Jamón Cocido (kg)",
            "Salame Milán (kg)",
            "Mortadela (kg)",
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,mostrador=debug,sqlx=warn")),
        )
        .init();

    let mut config = LedgerConfig::from_env()?;
    if env::var("MOSTRADOR_DB_PATH").is_err() {
        config.db.database_path = "./mostrador_dev.db".into();
    }

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut product_count: usize = 200;
    let mut sale_count: usize = 50;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--products" | "-p" => {
                if i + 1 < args.len() {
                    product_count = args[i + 1].parse()?;
                    i += 1;
                }
            }
            "--sales" | "-s" => {
                if i + 1 < args.len() {
                    sale_count = args[i + 1].parse()?;
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.db.database_path = args[i + 1].clone().into();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Mostrador Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -p, --products <N>  Number of products to generate (default: 200)");
                println!("  -s, --sales <N>     Number of demo sales to register (default: 50)");
                println!("  -d, --db <PATH>     Database file path (default: $MOSTRADOR_DB_PATH or ./mostrador_dev.db)");
                println!("  -h, --help          Show this help message");
                return Ok(());
            }
            other => warn!(arg = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    info!(
        path = %config.db.database_path.display(),
        products = product_count,
        sales = sale_count,
        "Seeding database"
    );

    let db = Database::new(config.db.clone()).await?;

    let existing = db.products().count().await?;
    if existing > 0 {
        warn!(existing = existing, "Database already has products, skipping seed");
        return Ok(());
    }

    // Products
    let start = std::time::Instant::now();
    let mut product_ids = Vec::with_capacity(product_count);

    'families: for round in 0.. {
        for (family_idx, (code, names)) in FAMILIES.iter().enumerate() {
            for (name_idx, name) in names.iter().enumerate() {
                if product_ids.len() >= product_count {
                    break 'families;
                }

                let seed = round * 100 + family_idx * 10 + name_idx;
                let draft = generate_product(code, name, round, seed);

                match db.products().insert(&draft).await {
                    Ok(product) => product_ids.push(product.id),
                    Err(e) => warn!(sku = %draft.sku, error = %e, "Failed to insert product"),
                }
            }
        }
    }

    info!(
        count = product_ids.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Products generated"
    );

    // Sales
    let orchestrator = db
        .orchestrator()
        .with_max_attempts(config.register_attempts);

    let mut registered = 0usize;
    let mut refused = 0usize;

    if !product_ids.is_empty() {
        for n in 0..sale_count {
            let draft = generate_sale(&db, &product_ids, n).await?;

            match orchestrator.register(draft).await {
                Ok(_) => registered += 1,
                Err(LedgerError::Core(CoreError::InsufficientStock { sku, .. })) => {
                    warn!(sku = %sku, "Demo sale refused: insufficient stock");
                    refused += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    // Summary
    let treasury = db.treasury();
    let summary = treasury.summary().await?;
    let upcoming = treasury.upcoming_checks(config.upcoming_check_days).await?;

    let report = json!({
        "database": config.db.database_path.display().to_string(),
        "products": product_ids.len(),
        "salesRegistered": registered,
        "salesRefused": refused,
        "treasury": summary,
        "upcomingChecks": {
            "days": config.upcoming_check_days,
            "count": upcoming.len(),
        },
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    db.close().await;
    Ok(())
}

/// Generates a single product with deterministic data.
fn generate_product(code: &str, name: &str, round: usize, seed: usize) -> ProductDraft {
    let sku = format!("{}-{:04}", code, seed);

    let full_name = if round == 0 {
        name.to_string()
    } else {
        format!("{} (lote {})", name, round + 1)
    };

    // Price: 1.99 - 99.99
    let price_cents = 199 + ((seed * 37) % 9800) as i64;

    // Cost: 55-75% of price
    let cost_cents = price_cents * (55 + (seed % 20) as i64) / 100;

    // Weighed goods get fractional stock
    let stock = if name.contains("(kg)") || name.contains("(metro)") {
        Quantity::new(Decimal::new(5_000 + (seed % 7) as i64 * 1_250, 3))
    } else {
        Quantity::units(5 + (seed % 60) as i64)
    };

    ProductDraft {
        sku,
        name: full_name,
        cost_price: Money::from_cents(cost_cents),
        sale_price: Money::from_cents(price_cents),
        stock,
    }
}

/// Builds the `n`th demo sale: one or two lines, payment methods rotating.
async fn generate_sale(
    db: &Database,
    product_ids: &[i64],
    n: usize,
) -> Result<SaleDraft, Box<dyn std::error::Error>> {
    let method = PaymentMethod::ALL[n % PaymentMethod::ALL.len()];

    let mut lines = Vec::new();
    for offset in [0, 7].iter().take(1 + n % 2) {
        let product_id = product_ids[(n * 13 + offset) % product_ids.len()];
        if let Some(product) = db.products().get_by_id(product_id).await? {
            lines.push(SaleLineDraft::new(
                product_id,
                Quantity::units(1 + (n % 3) as i64),
                product.sale_price,
            ));
        }
    }

    let check = if method.is_check() {
        let today = Utc::now().date_naive();
        CheckDetails {
            bank: Some("Banco de la Nación Argentina".to_string()),
            number: Some(format!("{:08}", 10_000 + n)),
            drawer: Some(format!("Cliente {}", n)),
            issue_date: Some(today),
            // Derived expiry lands 5 to 25 days out
            due_date: Some(today + Duration::days((n % 21) as i64 - 25)),
            expiry_date: None,
        }
    } else {
        CheckDetails::default()
    };

    Ok(SaleDraft {
        customer_name: Some(format!("Cliente {}", n)),
        description: (n % 4 == 0).then(|| "Venta mostrador".to_string()),
        payment_method: Some(method),
        check,
        lines,
        ..SaleDraft::default()
    })
}
