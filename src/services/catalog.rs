use crate::{
    entities::{
        manufacturer, product, season, Manufacturer, ManufacturerModel, Product, ProductModel,
        Season, SeasonModel, SeasonName,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use super::validation::{validate_money, validate_not_blank, SLUG_RE};

/// Manages manufacturers, seasons and products.
#[derive(Clone)]
pub struct CatalogService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl CatalogService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn create_manufacturer(
        &self,
        input: CreateManufacturerInput,
    ) -> Result<ManufacturerModel, ServiceError> {
        input.validate()?;

        let manufacturer = manufacturer::ActiveModel {
            name: Set(input.name),
            slug: Set(input.slug),
            country: Set(input.country),
            image: Set(input.image),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        self.event_sender
            .send_or_log(Event::ManufacturerCreated(manufacturer.id))
            .await;

        info!("Created manufacturer {}", manufacturer);
        Ok(manufacturer)
    }

    pub async fn get_manufacturer(&self, id: i32) -> Result<ManufacturerModel, ServiceError> {
        Manufacturer::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Manufacturer", id))
    }

    pub async fn list_manufacturers(&self) -> Result<Vec<ManufacturerModel>, ServiceError> {
        Ok(Manufacturer::find()
            .order_by_asc(manufacturer::Column::Name)
            .all(&*self.db)
            .await?)
    }

    /// Deletes a manufacturer together with all of its products.
    #[instrument(skip(self))]
    pub async fn delete_manufacturer(&self, id: i32) -> Result<(), ServiceError> {
        let manufacturer = self.get_manufacturer(id).await?;
        manufacturer.delete(&*self.db).await?;
        info!("Deleted manufacturer {}", id);
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn create_season(&self, input: CreateSeasonInput) -> Result<SeasonModel, ServiceError> {
        input.validate()?;
        let name = SeasonName::parse(&input.name).map_err(|_| {
            ServiceError::ValidationError(format!(
                "name: '{}' is not one of summer, winter, spring, autumn",
                input.name
            ))
        })?;

        let season = season::ActiveModel {
            name: Set(name),
            image: Set(input.image),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        self.event_sender
            .send_or_log(Event::SeasonCreated(season.id))
            .await;

        info!("Created season {}", season);
        Ok(season)
    }

    pub async fn get_season(&self, id: i32) -> Result<SeasonModel, ServiceError> {
        Season::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Season", id))
    }

    pub async fn list_seasons(&self) -> Result<Vec<SeasonModel>, ServiceError> {
        Ok(Season::find()
            .order_by_asc(season::Column::Id)
            .all(&*self.db)
            .await?)
    }

    /// Deletes a season together with all of its products.
    #[instrument(skip(self))]
    pub async fn delete_season(&self, id: i32) -> Result<(), ServiceError> {
        let season = self.get_season(id).await?;
        season.delete(&*self.db).await?;
        info!("Deleted season {}", id);
        Ok(())
    }

    /// Creates a product. Manufacturer and season must already exist.
    #[instrument(skip(self))]
    pub async fn create_product(
        &self,
        input: CreateProductInput,
    ) -> Result<ProductModel, ServiceError> {
        input.validate()?;

        let txn = self.db.begin().await?;

        Manufacturer::find_by_id(input.manufacturer_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Manufacturer", input.manufacturer_id))?;
        Season::find_by_id(input.season_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Season", input.season_id))?;

        let product = product::ActiveModel {
            name: Set(input.name),
            manufacturer_id: Set(input.manufacturer_id),
            season_id: Set(input.season_id),
            price: Set(input.price),
            description: Set(input.description),
            slug: Set(input.slug),
            stock: Set(input.stock.unwrap_or(1)),
            offer_of_the_week: Set(input.offer_of_the_week),
            release_date: Set(input.release_date),
            image: Set(input.image),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::ProductCreated(product.id))
            .await;

        info!("Created product {} ({})", product.id, product.slug);
        Ok(product)
    }

    pub async fn get_product(&self, id: i32) -> Result<ProductModel, ServiceError> {
        Product::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", id))
    }

    /// Slugs are indexed but not unique; the lowest id wins.
    pub async fn find_product_by_slug(&self, slug: &str) -> Result<ProductModel, ServiceError> {
        Product::find()
            .filter(product::Column::Slug.eq(slug))
            .order_by_asc(product::Column::Id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", slug))
    }

    pub async fn list_products(&self, filter: ProductFilter) -> Result<Vec<ProductModel>, ServiceError> {
        let mut query = Product::find();
        if let Some(manufacturer_id) = filter.manufacturer_id {
            query = query.filter(product::Column::ManufacturerId.eq(manufacturer_id));
        }
        if let Some(season_id) = filter.season_id {
            query = query.filter(product::Column::SeasonId.eq(season_id));
        }
        if filter.offers_only {
            query = query.filter(product::Column::OfferOfTheWeek.eq(true));
        }
        if filter.in_stock_only {
            query = query.filter(product::Column::Stock.gt(0));
        }
        Ok(query
            .order_by_desc(product::Column::ReleaseDate)
            .order_by_asc(product::Column::Id)
            .all(&*self.db)
            .await?)
    }

    /// Applies a partial update. A price change publishes
    /// `ProductPriceChanged`; existing cart lines keep their snapshot.
    #[instrument(skip(self))]
    pub async fn update_product(
        &self,
        id: i32,
        input: UpdateProductInput,
    ) -> Result<ProductModel, ServiceError> {
        input.validate()?;

        let existing = self.get_product(id).await?;
        let old_price = existing.price;
        let old_stock = existing.stock;

        let mut active: product::ActiveModel = existing.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(price) = input.price {
            active.price = Set(price);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(slug) = input.slug {
            active.slug = Set(slug);
        }
        if let Some(stock) = input.stock {
            active.stock = Set(stock);
        }
        if let Some(offer) = input.offer_of_the_week {
            active.offer_of_the_week = Set(offer);
        }
        if let Some(release_date) = input.release_date {
            active.release_date = Set(release_date);
        }
        if let Some(image) = input.image {
            active.image = Set(image);
        }

        let product = active.update(&*self.db).await?;

        if product.price != old_price {
            self.event_sender
                .send_or_log(Event::ProductPriceChanged {
                    product_id: id,
                    old_price,
                    new_price: product.price,
                })
                .await;
            info!("Product {} price {} -> {}", id, old_price, product.price);
        }
        if product.stock != old_stock {
            self.event_sender
                .send_or_log(Event::ProductStockChanged {
                    product_id: id,
                    stock: product.stock,
                })
                .await;
        }

        Ok(product)
    }

    pub async fn set_price(&self, id: i32, price: Decimal) -> Result<ProductModel, ServiceError> {
        self.update_product(
            id,
            UpdateProductInput {
                price: Some(price),
                ..Default::default()
            },
        )
        .await
    }

    /// Adds `delta` to the stock count; the result may not go negative.
    #[instrument(skip(self))]
    pub async fn adjust_stock(&self, id: i32, delta: i32) -> Result<ProductModel, ServiceError> {
        let txn = self.db.begin().await?;

        let existing = Product::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", id))?;

        let stock = existing
            .stock
            .checked_add(delta)
            .filter(|s| *s >= 0)
            .ok_or_else(|| {
                ServiceError::InvalidOperation(format!(
                    "Stock of product {} cannot change by {} from {}",
                    id, delta, existing.stock
                ))
            })?;

        let mut active: product::ActiveModel = existing.into();
        active.stock = Set(stock);
        let product = active.update(&txn).await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::ProductStockChanged {
                product_id: id,
                stock,
            })
            .await;

        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i32) -> Result<(), ServiceError> {
        let product = self.get_product(id).await?;
        product.delete(&*self.db).await?;
        info!("Deleted product {}", id);
        Ok(())
    }

    /// `"{id} | {name} | {manufacturer} | {season}"`
    pub async fn product_label(&self, id: i32) -> Result<String, ServiceError> {
        let product = self.get_product(id).await?;
        let manufacturer = self.get_manufacturer(product.manufacturer_id).await?;
        let season = self.get_season(product.season_id).await?;
        Ok(product.label(&manufacturer.name, &season.name.to_string()))
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateManufacturerInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 50), regex = "SLUG_RE")]
    pub slug: String,
    #[validate(length(min = 1, max = 100))]
    pub country: String,
    #[validate(length(max = 100))]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSeasonInput {
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub image: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProductInput {
    #[validate(length(min = 1, max = 255), custom = "validate_not_blank")]
    pub name: String,
    pub manufacturer_id: i32,
    pub season_id: i32,
    #[validate(custom = "validate_money")]
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, max = 50), regex = "SLUG_RE")]
    pub slug: String,
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
    #[serde(default)]
    pub offer_of_the_week: bool,
    pub release_date: NaiveDate,
    #[validate(length(min = 1, max = 100))]
    pub image: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProductInput {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(custom = "validate_money")]
    pub price: Option<Decimal>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 50), regex = "SLUG_RE")]
    pub slug: Option<String>,
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
    pub offer_of_the_week: Option<bool>,
    pub release_date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 100))]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    pub manufacturer_id: Option<i32>,
    pub season_id: Option<i32>,
    #[serde(default)]
    pub offers_only: bool,
    #[serde(default)]
    pub in_stock_only: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product_input() -> CreateProductInput {
        CreateProductInput {
            name: "Rain jacket".to_string(),
            manufacturer_id: 1,
            season_id: 1,
            price: dec!(19.99),
            description: String::new(),
            slug: "rain-jacket".to_string(),
            stock: None,
            offer_of_the_week: false,
            release_date: NaiveDate::from_ymd_opt(2021, 11, 21).unwrap(),
            image: "product/rain-jacket/front.jpg".to_string(),
        }
    }

    #[test]
    fn product_input_validation() {
        assert!(product_input().validate().is_ok());

        let mut bad_slug = product_input();
        bad_slug.slug = "rain jacket".to_string();
        assert!(bad_slug.validate().is_err());

        let mut bad_price = product_input();
        bad_price.price = dec!(-1);
        assert!(bad_price.validate().is_err());

        let mut bad_stock = product_input();
        bad_stock.stock = Some(-3);
        assert!(bad_stock.validate().is_err());

        let mut blank_name = product_input();
        blank_name.name = "   ".to_string();
        assert!(blank_name.validate().is_err());
    }

    #[test]
    fn empty_update_is_valid() {
        assert!(UpdateProductInput::default().validate().is_ok());
        let update = UpdateProductInput {
            price: Some(dec!(0.001)),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
