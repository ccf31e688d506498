use crate::{
    config::AppConfig,
    entities::{
        cart, cart_product, customer_order, order, BuyingType, Cart, CartModel, CartProduct,
        CartProductModel, Customer, Order, OrderModel, OrderStatus,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

use super::carts::recompute_cart_aggregates;
use super::validation::validate_not_blank;

/// Turns carts into orders and moves orders through their statuses.
#[derive(Clone)]
pub struct OrderService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
    config: Arc<AppConfig>,
}

impl OrderService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        event_sender: Arc<EventSender>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            db,
            event_sender,
            config,
        }
    }

    /// Places an order for the customer's cart.
    ///
    /// The cart must belong to the customer, hold at least one line and not
    /// be part of another order. Its aggregates are recomputed, it is
    /// flagged `in_order`, and the order is linked to the customer's order
    /// history, all in one transaction.
    #[instrument(skip(self, input), fields(customer_id = input.customer_id, cart_id = input.cart_id))]
    pub async fn place_order(&self, input: PlaceOrderInput) -> Result<OrderModel, ServiceError> {
        input.validate()?;

        let txn = self.db.begin().await?;

        Customer::find_by_id(input.customer_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Customer", input.customer_id))?;

        let cart = Cart::find_by_id(input.cart_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Cart", input.cart_id))?;

        if cart.owner_id != input.customer_id {
            return Err(ServiceError::InvalidOperation(format!(
                "Cart {} does not belong to customer {}",
                cart.id, input.customer_id
            )));
        }
        if cart.in_order {
            return Err(ServiceError::Conflict(format!(
                "Cart {} has already been ordered",
                cart.id
            )));
        }

        let line_count = CartProduct::find()
            .filter(cart_product::Column::CartId.eq(cart.id))
            .count(&txn)
            .await?;
        if line_count == 0 {
            return Err(ServiceError::InvalidOperation(format!(
                "Cart {} is empty",
                cart.id
            )));
        }

        let cart = recompute_cart_aggregates(&txn, &cart).await?;
        let mut cart_active: cart::ActiveModel = cart.into();
        cart_active.in_order = Set(true);
        let cart = cart_active.update(&txn).await?;

        let today = Utc::now().date_naive();
        let order = order::ActiveModel {
            customer_id: Set(input.customer_id),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            phone: Set(input.phone),
            address: Set(input.address),
            cart_id: Set(cart.id),
            status: Set(OrderStatus::default()),
            buying_type: Set(input.buying_type.unwrap_or_default()),
            comment: Set(input.comment),
            created_at: Set(today),
            order_date: Set(input.order_date.unwrap_or(today)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        customer_order::ActiveModel {
            customer_id: Set(order.customer_id),
            order_id: Set(order.id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::OrderPlaced {
                order_id: order.id,
                cart_id: cart.id,
                customer_id: order.customer_id,
            })
            .await;

        info!(
            "Placed order {} for customer {}: {} items, {} ({})",
            order.id,
            order.customer_id,
            cart.total_products,
            cart.final_price,
            order.buying_type.description()
        );
        Ok(order)
    }

    pub async fn get_order(&self, order_id: i32) -> Result<OrderModel, ServiceError> {
        Order::find_by_id(order_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Order", order_id))
    }

    /// The order together with the cart it was placed from.
    pub async fn get_order_details(&self, order_id: i32) -> Result<OrderDetails, ServiceError> {
        let order = self.get_order(order_id).await?;
        let cart = order
            .find_related(Cart)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Cart", order.cart_id))?;
        let lines = cart
            .find_related(CartProduct)
            .order_by_asc(cart_product::Column::Id)
            .all(&*self.db)
            .await?;

        Ok(OrderDetails { order, cart, lines })
    }

    /// Newest first.
    pub async fn list_orders_for_customer(
        &self,
        customer_id: i32,
    ) -> Result<Vec<OrderModel>, ServiceError> {
        Ok(Order::find()
            .filter(order::Column::CustomerId.eq(customer_id))
            .order_by_desc(order::Column::Id)
            .all(&*self.db)
            .await?)
    }

    pub async fn list_orders_by_status(
        &self,
        status: OrderStatus,
    ) -> Result<Vec<OrderModel>, ServiceError> {
        Ok(Order::find()
            .filter(order::Column::Status.eq(status))
            .order_by_asc(order::Column::OrderDate)
            .order_by_asc(order::Column::Id)
            .all(&*self.db)
            .await?)
    }

    /// Moves an order to `status`.
    ///
    /// Any status may follow any other unless `strict_order_transitions` is
    /// enabled, in which case only the next step of
    /// new -> in_progress -> is_ready -> completed is accepted.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        order_id: i32,
        status: OrderStatus,
    ) -> Result<OrderModel, ServiceError> {
        let txn = self.db.begin().await?;

        let existing = Order::find_by_id(order_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Order", order_id))?;
        let old_status = existing.status;

        if self.config.strict_order_transitions && !old_status.can_transition_to(status) {
            warn!("Rejected order {} transition {} -> {}", order_id, old_status, status);
            return Err(ServiceError::InvalidOperation(format!(
                "Order {} cannot move from {} to {}",
                order_id, old_status, status
            )));
        }

        let mut active: order::ActiveModel = existing.into();
        active.status = Set(status);
        active.created_at = Set(Utc::now().date_naive());
        let order = active.update(&txn).await?;

        txn.commit().await?;

        if old_status != status {
            self.event_sender
                .send_or_log(Event::OrderStatusChanged {
                    order_id,
                    old_status,
                    new_status: status,
                })
                .await;
            info!("Order {} status {} -> {}", order_id, old_status, status);
        }

        Ok(order)
    }

    /// Edits the shipping snapshot of an order.
    #[instrument(skip(self, input))]
    pub async fn update_order(
        &self,
        order_id: i32,
        input: UpdateOrderInput,
    ) -> Result<OrderModel, ServiceError> {
        input.validate()?;

        let existing = self.get_order(order_id).await?;
        let mut active: order::ActiveModel = existing.into();

        if let Some(first_name) = input.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = input.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(phone) = input.phone {
            active.phone = Set(phone);
        }
        if let Some(address) = input.address {
            active.address = Set(address);
        }
        if let Some(buying_type) = input.buying_type {
            active.buying_type = Set(buying_type);
        }
        if let Some(comment) = input.comment {
            active.comment = Set(Some(comment).filter(|c| !c.is_empty()));
        }
        if let Some(order_date) = input.order_date {
            active.order_date = Set(order_date);
        }
        active.created_at = Set(Utc::now().date_naive());

        let order = active.update(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::OrderUpdated(order.id))
            .await;

        Ok(order)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PlaceOrderInput {
    pub customer_id: i32,
    pub cart_id: i32,
    #[validate(length(min = 1, max = 255), custom = "validate_not_blank")]
    pub first_name: String,
    #[validate(length(min = 1, max = 255), custom = "validate_not_blank")]
    pub last_name: String,
    #[validate(length(min = 1, max = 20), custom = "validate_not_blank")]
    pub phone: String,
    #[validate(length(min = 1, max = 255), custom = "validate_not_blank")]
    pub address: String,
    pub buying_type: Option<BuyingType>,
    pub comment: Option<String>,
    pub order_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateOrderInput {
    #[validate(length(min = 1, max = 255))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub last_name: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub address: Option<String>,
    pub buying_type: Option<BuyingType>,
    /// An empty string clears the comment.
    pub comment: Option<String>,
    pub order_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderDetails {
    pub order: OrderModel,
    pub cart: CartModel,
    pub lines: Vec<CartProductModel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> PlaceOrderInput {
        PlaceOrderInput {
            customer_id: 1,
            cart_id: 1,
            first_name: "Anna".to_string(),
            last_name: "Petrova".to_string(),
            phone: "+7 900 000 00 00".to_string(),
            address: "Lenina 1".to_string(),
            buying_type: None,
            comment: None,
            order_date: None,
        }
    }

    #[test]
    fn place_order_input_validation() {
        assert!(input().validate().is_ok());

        let mut blank = input();
        blank.first_name = " ".to_string();
        assert!(blank.validate().is_err());

        let mut long_phone = input();
        long_phone.phone = "1".repeat(21);
        assert!(long_phone.validate().is_err());
    }

    #[test]
    fn buying_type_accepts_both_spellings() {
        let json = r#"{"customer_id":1,"cart_id":2,"first_name":"A","last_name":"B",
            "phone":"1","address":"C","buying_type":"self-pickup"}"#;
        let parsed: PlaceOrderInput = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.buying_type, Some(BuyingType::SelfPickup));
        assert_eq!(parsed.comment, None);
    }
}
