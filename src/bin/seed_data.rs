//! Populates the database with a small demo catalog.
//!
//! Run with: cargo run --bin seed-data

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::info;

use kids_store::{
    config,
    services::{
        carts::CreateCartInput,
        catalog::{CreateManufacturerInput, CreateProductInput, CreateSeasonInput},
        customers::CreateCustomerInput,
    },
    AppState, ContentRef,
};

const PRODUCTS: &[(&str, &str, i64, bool)] = &[
    ("Rain jacket", "rain-jacket", 1999, true),
    ("Wool mittens", "wool-mittens", 799, false),
    ("Linen shorts", "linen-shorts", 1250, false),
    ("Knitted hat", "knitted-hat", 999, true),
];

#[tokio::main]
async fn main() -> Result<()> {
    let mut cfg = config::load_config().context("failed to load configuration")?;
    cfg.auto_migrate = true;
    config::init_tracing(cfg.log_level(), cfg.log_json);

    info!("=== Kids Store seed data ===");
    let state = AppState::init(cfg).await?;
    let services = &state.services;

    let manufacturer = services
        .catalog
        .create_manufacturer(CreateManufacturerInput {
            name: "Little Steps".to_string(),
            slug: "little-steps".to_string(),
            country: "Portugal".to_string(),
            image: None,
        })
        .await?;

    let mut seasons = Vec::new();
    for name in ["spring", "summer", "autumn", "winter"] {
        let season = services
            .catalog
            .create_season(CreateSeasonInput {
                name: name.to_string(),
                image: format!("season/{}/cover.jpg", name),
            })
            .await?;
        seasons.push(season);
    }
    info!("Created {} seasons", seasons.len());

    let release_date = NaiveDate::from_ymd_opt(2021, 11, 21).context("invalid release date")?;
    let mut products = Vec::new();
    for (i, (name, slug, cents, offer)) in PRODUCTS.iter().enumerate() {
        let product = services
            .catalog
            .create_product(CreateProductInput {
                name: name.to_string(),
                manufacturer_id: manufacturer.id,
                season_id: seasons[i % seasons.len()].id,
                price: Decimal::new(*cents, 2),
                description: format!("{} by {}", name, manufacturer.name),
                slug: slug.to_string(),
                stock: Some(10),
                offer_of_the_week: *offer,
                release_date,
                image: format!("product/{}/main.jpg", slug),
            })
            .await?;
        products.push(product);
    }
    for product in &products {
        info!("  {} -> {}", product.slug, state.media_url(&product.image));
    }
    info!("Created {} products", products.len());

    let customer = services
        .customers
        .create_customer(CreateCustomerInput {
            user_id: 1,
            is_active: true,
            phone: "+10000000000".to_string(),
            address: "1 Demo Street".to_string(),
        })
        .await?;

    let cart = services
        .carts
        .create_cart(CreateCartInput {
            owner_id: customer.id,
            for_anonymous_user: false,
        })
        .await?;
    for product in products.iter().take(2) {
        services
            .carts
            .add_line(cart.id, ContentRef::Product(product.id), 2)
            .await?;
    }

    let totals = services.carts.cart_totals(cart.id).await?;
    info!(
        "Demo cart {} holds {} items worth {}",
        cart.id, totals.total_products, totals.final_price
    );

    info!("=== Seed data complete ===");
    Ok(())
}
