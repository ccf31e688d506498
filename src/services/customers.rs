use crate::{
    entities::{
        customer, customer_order, wishlist_item, Customer, CustomerModel, CustomerOrder, Order,
        OrderModel, Product, ProductModel,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

/// Storefront profiles, their wishlists and order history.
///
/// Deleting a customer removes everything that hangs off it: carts and
/// their lines, orders, notifications and wishlist links.
#[derive(Clone)]
pub struct CustomerService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl CustomerService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Creates the profile for an identity. An identity has at most one.
    #[instrument(skip(self, input), fields(user_id = input.user_id))]
    pub async fn create_customer(
        &self,
        input: CreateCustomerInput,
    ) -> Result<CustomerModel, ServiceError> {
        input.validate()?;

        let txn = self.db.begin().await?;

        let existing = Customer::find()
            .filter(customer::Column::UserId.eq(input.user_id))
            .one(&txn)
            .await?;
        if let Some(existing) = existing {
            return Err(ServiceError::Conflict(format!(
                "User {} already has customer {}",
                input.user_id, existing.id
            )));
        }

        let customer = customer::ActiveModel {
            user_id: Set(input.user_id),
            is_active: Set(input.is_active),
            phone: Set(input.phone),
            address: Set(input.address),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::CustomerCreated(customer.id))
            .await;

        info!("Created {}", customer);
        Ok(customer)
    }

    pub async fn get_customer(&self, id: i32) -> Result<CustomerModel, ServiceError> {
        Customer::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Customer", id))
    }

    pub async fn find_by_user_id(&self, user_id: i32) -> Result<CustomerModel, ServiceError> {
        Customer::find()
            .filter(customer::Column::UserId.eq(user_id))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Customer for user {} not found", user_id)))
    }

    #[instrument(skip(self, input))]
    pub async fn update_customer(
        &self,
        id: i32,
        input: UpdateCustomerInput,
    ) -> Result<CustomerModel, ServiceError> {
        input.validate()?;

        let existing = self.get_customer(id).await?;
        let mut active: customer::ActiveModel = existing.into();
        if let Some(phone) = input.phone {
            active.phone = Set(phone);
        }
        if let Some(address) = input.address {
            active.address = Set(address);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        let customer = active.update(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::CustomerUpdated(id))
            .await;

        Ok(customer)
    }

    pub async fn set_active(&self, id: i32, is_active: bool) -> Result<CustomerModel, ServiceError> {
        self.update_customer(
            id,
            UpdateCustomerInput {
                is_active: Some(is_active),
                ..Default::default()
            },
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_customer(&self, id: i32) -> Result<(), ServiceError> {
        let customer = self.get_customer(id).await?;
        customer.delete(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::CustomerDeleted(id))
            .await;

        info!("Deleted customer {}", id);
        Ok(())
    }

    /// Adding a product twice leaves a single wishlist entry.
    #[instrument(skip(self))]
    pub async fn add_to_wishlist(
        &self,
        customer_id: i32,
        product_id: i32,
    ) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;

        Customer::find_by_id(customer_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Customer", customer_id))?;
        Product::find_by_id(product_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", product_id))?;

        let existing = wishlist_item::Entity::find()
            .filter(wishlist_item::Column::CustomerId.eq(customer_id))
            .filter(wishlist_item::Column::ProductId.eq(product_id))
            .one(&txn)
            .await?;

        if existing.is_none() {
            wishlist_item::ActiveModel {
                customer_id: Set(customer_id),
                product_id: Set(product_id),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(())
    }

    /// Returns whether an entry was removed.
    pub async fn remove_from_wishlist(
        &self,
        customer_id: i32,
        product_id: i32,
    ) -> Result<bool, ServiceError> {
        let result = wishlist_item::Entity::delete_many()
            .filter(wishlist_item::Column::CustomerId.eq(customer_id))
            .filter(wishlist_item::Column::ProductId.eq(product_id))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn wishlist(&self, customer_id: i32) -> Result<Vec<ProductModel>, ServiceError> {
        let customer = self.get_customer(customer_id).await?;
        Ok(customer
            .find_related(Product)
            .order_by_asc(crate::entities::product::Column::Id)
            .all(&*self.db)
            .await?)
    }

    /// Orders linked through the customer's order history.
    pub async fn order_history(&self, customer_id: i32) -> Result<Vec<OrderModel>, ServiceError> {
        let links = CustomerOrder::find()
            .filter(customer_order::Column::CustomerId.eq(customer_id))
            .find_also_related(Order)
            .order_by_desc(customer_order::Column::OrderId)
            .all(&*self.db)
            .await?;

        Ok(links.into_iter().filter_map(|(_, order)| order).collect())
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCustomerInput {
    pub user_id: i32,
    #[serde(default)]
    pub is_active: bool,
    #[validate(length(max = 20))]
    pub phone: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub address: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCustomerInput {
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_defaults_to_empty() {
        let input: CreateCustomerInput =
            serde_json::from_str(r#"{"user_id": 7, "phone": "555"}"#).unwrap();
        assert_eq!(input.address, "");
        assert!(!input.is_active);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn phone_is_limited_to_twenty_chars() {
        let input = CreateCustomerInput {
            user_id: 1,
            is_active: true,
            phone: "0".repeat(21),
            address: String::new(),
        };
        assert!(input.validate().is_err());
    }
}
