#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use kids_store::{
    config::AppConfig,
    db::{self, DbConfig},
    entities::{CartModel, CustomerModel, ManufacturerModel, ProductModel, SeasonModel},
    events::{self, EventSender},
    media::{LocalMediaStorage, MediaStorage},
    services::{
        carts::CreateCartInput,
        catalog::{CreateManufacturerInput, CreateProductInput, CreateSeasonInput},
        customers::CreateCustomerInput,
        AppServices,
    },
};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use tempfile::TempDir;

/// Services over a fresh, migrated in-memory SQLite database.
pub struct TestApp {
    pub db: Arc<DatabaseConnection>,
    pub config: Arc<AppConfig>,
    pub services: AppServices,
    pub media_dir: TempDir,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config(configure: impl FnOnce(&mut AppConfig)) -> Self {
        let media_dir = TempDir::new().expect("failed to create media dir");

        let mut cfg = AppConfig::new("sqlite::memory:".to_string(), "test".to_string());
        cfg.media_root = media_dir.path().to_string_lossy().into_owned();
        configure(&mut cfg);

        let pool = db::establish_connection_with_config(&DbConfig::in_memory())
            .await
            .expect("failed to open test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to migrate test database");

        let (sender, rx) = EventSender::channel(events::DEFAULT_EVENT_CHANNEL_CAPACITY);
        let event_task = tokio::spawn(events::process_events(rx));

        let db = Arc::new(pool);
        let config = Arc::new(cfg);
        let storage: Arc<dyn MediaStorage> = Arc::new(LocalMediaStorage::new(media_dir.path()));
        let services = AppServices::new(db.clone(), Arc::new(sender), config.clone(), storage);

        Self {
            db,
            config,
            services,
            media_dir,
            _event_task: event_task,
        }
    }

    pub async fn manufacturer(&self, name: &str, country: &str) -> ManufacturerModel {
        self.services
            .catalog
            .create_manufacturer(CreateManufacturerInput {
                name: name.to_string(),
                slug: slugify(name),
                country: country.to_string(),
                image: None,
            })
            .await
            .expect("failed to create manufacturer")
    }

    pub async fn season(&self, name: &str) -> SeasonModel {
        self.services
            .catalog
            .create_season(CreateSeasonInput {
                name: name.to_string(),
                image: format!("season/{}/cover.jpg", name),
            })
            .await
            .expect("failed to create season")
    }

    /// A product with its own manufacturer and a summer season.
    pub async fn product(&self, name: &str, price: Decimal) -> ProductModel {
        let manufacturer = self.manufacturer("Little Steps", "Portugal").await;
        let season = self.season("summer").await;
        self.product_in(name, price, &manufacturer, &season).await
    }

    pub async fn product_in(
        &self,
        name: &str,
        price: Decimal,
        manufacturer: &ManufacturerModel,
        season: &SeasonModel,
    ) -> ProductModel {
        self.services
            .catalog
            .create_product(product_input(name, price, manufacturer.id, season.id))
            .await
            .expect("failed to create product")
    }

    pub async fn customer(&self, user_id: i32) -> CustomerModel {
        self.services
            .customers
            .create_customer(CreateCustomerInput {
                user_id,
                is_active: true,
                phone: "+10000000000".to_string(),
                address: "1 Demo Street".to_string(),
            })
            .await
            .expect("failed to create customer")
    }

    pub async fn cart_for(&self, customer: &CustomerModel) -> CartModel {
        self.services
            .carts
            .create_cart(CreateCartInput {
                owner_id: customer.id,
                for_anonymous_user: false,
            })
            .await
            .expect("failed to create cart")
    }
}

pub fn product_input(
    name: &str,
    price: Decimal,
    manufacturer_id: i32,
    season_id: i32,
) -> CreateProductInput {
    CreateProductInput {
        name: name.to_string(),
        manufacturer_id,
        season_id,
        price,
        description: String::new(),
        slug: slugify(name),
        stock: None,
        offer_of_the_week: false,
        release_date: NaiveDate::from_ymd_opt(2021, 11, 21).unwrap(),
        image: format!("product/{}/main.jpg", slugify(name)),
    }
}

pub fn slugify(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// Money read back from SQLite goes through a float; compare at cent precision.
pub fn money(value: Decimal) -> Decimal {
    value.round_dp(2)
}
