use crate::{
    content::{self, ContentRef},
    entities::{
        cart, cart_product, Cart, CartModel, CartProduct, CartProductModel, Customer,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::validation::{line_total, MAX_MONEY};

/// Shopping cart service.
///
/// Every line write snapshots `qty * price` from the live product row, and
/// every mutation recomputes the cart aggregates inside the same
/// transaction. Aggregates written by the recompute are guarded by the
/// cart's `version` column; a lost race surfaces as
/// [`ServiceError::ConcurrentModification`].
#[derive(Clone)]
pub struct CartService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl CartService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Creates an empty cart owned by an existing customer.
    #[instrument(skip(self))]
    pub async fn create_cart(&self, input: CreateCartInput) -> Result<CartModel, ServiceError> {
        let txn = self.db.begin().await?;

        Customer::find_by_id(input.owner_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Customer", input.owner_id))?;

        let cart = cart::ActiveModel {
            owner_id: Set(input.owner_id),
            total_products: Set(0),
            final_price: Set(Decimal::ZERO),
            in_order: Set(false),
            for_anonymous_user: Set(input.for_anonymous_user),
            version: Set(1),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::CartCreated(cart.id))
            .await;

        info!("Created cart {} for customer {}", cart.id, cart.owner_id);
        Ok(cart)
    }

    pub async fn get_cart(&self, cart_id: i32) -> Result<CartWithLines, ServiceError> {
        let cart = Cart::find_by_id(cart_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Cart", cart_id))?;

        let lines = cart
            .find_related(CartProduct)
            .order_by_asc(cart_product::Column::Id)
            .all(&*self.db)
            .await?;

        Ok(CartWithLines { cart, lines })
    }

    /// The newest cart of a customer that has not been turned into an order.
    pub async fn open_cart_for(&self, customer_id: i32) -> Result<Option<CartModel>, ServiceError> {
        Ok(Cart::find()
            .filter(cart::Column::OwnerId.eq(customer_id))
            .filter(cart::Column::InOrder.eq(false))
            .order_by_desc(cart::Column::Id)
            .one(&*self.db)
            .await?)
    }

    /// Adds `qty` units of a sellable item. When the cart already holds a
    /// line for the same item its quantity grows instead, and the line is
    /// re-priced at the current product price.
    #[instrument(skip(self))]
    pub async fn add_line(
        &self,
        cart_id: i32,
        item: ContentRef,
        qty: i32,
    ) -> Result<CartProductModel, ServiceError> {
        if qty < 1 {
            return Err(ServiceError::ValidationError(format!(
                "qty: must be a positive integer, got {}",
                qty
            )));
        }

        let txn = self.db.begin().await?;
        let cart = load_open_cart(&txn, cart_id).await?;
        let (_, price) = content::resolve_sellable(&txn, item).await?;

        let existing = CartProduct::find()
            .filter(cart_product::Column::CartId.eq(cart_id))
            .filter(cart_product::Column::ContentType.eq(item.kind()))
            .filter(cart_product::Column::ObjectId.eq(item.object_id()))
            .one(&txn)
            .await?;

        let line = match existing {
            Some(line) => {
                let qty = line.qty.checked_add(qty).ok_or_else(|| {
                    ServiceError::ValidationError("qty: overflow".to_string())
                })?;
                let final_price = line_total(price, qty)?;
                let mut active: cart_product::ActiveModel = line.into();
                active.qty = Set(qty);
                active.final_price = Set(final_price);
                active.update(&txn).await?
            }
            None => {
                let final_price = line_total(price, qty)?;
                cart_product::ActiveModel {
                    user_id: Set(cart.owner_id),
                    cart_id: Set(cart_id),
                    final_price: Set(final_price),
                    content_type: Set(item.kind()),
                    object_id: Set(item.object_id()),
                    qty: Set(qty),
                    ..Default::default()
                }
                .insert(&txn)
                .await?
            }
        };

        let cart = recompute_cart_aggregates(&txn, &cart).await?;
        txn.commit().await?;

        self.line_saved(&line, &cart).await;
        Ok(line)
    }

    /// Sets a line's quantity and re-snapshots its price.
    #[instrument(skip(self))]
    pub async fn update_line_qty(
        &self,
        line_id: i32,
        qty: i32,
    ) -> Result<CartProductModel, ServiceError> {
        let txn = self.db.begin().await?;

        let line = find_line(&txn, line_id).await?;
        let cart = load_open_cart(&txn, line.cart_id).await?;
        let item = ContentRef::new(line.content_type, line.object_id);
        let (_, price) = content::resolve_sellable(&txn, item).await?;
        let final_price = line_total(price, qty)?;

        let mut active: cart_product::ActiveModel = line.into();
        active.qty = Set(qty);
        active.final_price = Set(final_price);
        let line = active.update(&txn).await?;

        let cart = recompute_cart_aggregates(&txn, &cart).await?;
        txn.commit().await?;

        self.line_saved(&line, &cart).await;
        Ok(line)
    }

    #[instrument(skip(self))]
    pub async fn remove_line(&self, line_id: i32) -> Result<CartModel, ServiceError> {
        let txn = self.db.begin().await?;

        let line = find_line(&txn, line_id).await?;
        let cart = load_open_cart(&txn, line.cart_id).await?;
        line.delete(&txn).await?;

        let cart = recompute_cart_aggregates(&txn, &cart).await?;
        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::CartLineRemoved {
                cart_id: cart.id,
                line_id,
            })
            .await;
        self.recomputed(&cart).await;

        info!("Removed line {} from cart {}", line_id, cart.id);
        Ok(cart)
    }

    #[instrument(skip(self))]
    pub async fn clear_cart(&self, cart_id: i32) -> Result<CartModel, ServiceError> {
        let txn = self.db.begin().await?;

        let cart = load_open_cart(&txn, cart_id).await?;
        let removed = CartProduct::delete_many()
            .filter(cart_product::Column::CartId.eq(cart_id))
            .exec(&txn)
            .await?
            .rows_affected;

        let cart = recompute_cart_aggregates(&txn, &cart).await?;
        txn.commit().await?;

        self.recomputed(&cart).await;
        info!("Cleared {} lines from cart {}", removed, cart_id);
        Ok(cart)
    }

    /// Hands an anonymous cart over to a customer, e.g. after sign-in.
    /// The cart's lines follow the new owner.
    #[instrument(skip(self))]
    pub async fn assign_to_customer(
        &self,
        cart_id: i32,
        customer_id: i32,
    ) -> Result<CartModel, ServiceError> {
        let txn = self.db.begin().await?;

        let cart = load_open_cart(&txn, cart_id).await?;
        if !cart.for_anonymous_user {
            return Err(ServiceError::InvalidOperation(format!(
                "Cart {} already belongs to customer {}",
                cart_id, cart.owner_id
            )));
        }
        Customer::find_by_id(customer_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Customer", customer_id))?;

        CartProduct::update_many()
            .col_expr(cart_product::Column::UserId, Expr::value(customer_id))
            .filter(cart_product::Column::CartId.eq(cart_id))
            .exec(&txn)
            .await?;

        let mut active: cart::ActiveModel = cart.into();
        active.owner_id = Set(customer_id);
        active.for_anonymous_user = Set(false);
        let cart = active.update(&txn).await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::CartAssigned {
                cart_id,
                customer_id,
            })
            .await;

        info!("Assigned cart {} to customer {}", cart_id, customer_id);
        Ok(cart)
    }

    /// Aggregates computed from the current lines without writing them.
    pub async fn cart_totals(&self, cart_id: i32) -> Result<CartTotals, ServiceError> {
        let cart = self.get_cart(cart_id).await?;
        CartTotals::from_lines(&cart.lines)
    }

    /// Rewrites the stored aggregates from the current lines. Needed after
    /// lines were written outside this service.
    #[instrument(skip(self))]
    pub async fn recompute_aggregates(&self, cart_id: i32) -> Result<CartModel, ServiceError> {
        let txn = self.db.begin().await?;

        let cart = Cart::find_by_id(cart_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Cart", cart_id))?;
        let cart = recompute_cart_aggregates(&txn, &cart).await?;

        txn.commit().await?;

        self.recomputed(&cart).await;
        Ok(cart)
    }

    /// `"Product: {name} (cart)"` for each line, in line order.
    pub async fn line_labels(&self, cart_id: i32) -> Result<Vec<String>, ServiceError> {
        let cart = self.get_cart(cart_id).await?;
        let mut labels = Vec::with_capacity(cart.lines.len());
        for line in &cart.lines {
            let item = ContentRef::new(line.content_type, line.object_id);
            let object = content::resolve(&*self.db, item).await?;
            labels.push(line.label(&object.display_name()));
        }
        Ok(labels)
    }

    async fn line_saved(&self, line: &CartProductModel, cart: &CartModel) {
        self.event_sender
            .send_or_log(Event::CartLineSaved {
                cart_id: cart.id,
                line_id: line.id,
                final_price: line.final_price,
            })
            .await;
        self.recomputed(cart).await;
        info!(
            "Saved line {} in cart {}: qty {} = {}",
            line.id, cart.id, line.qty, line.final_price
        );
    }

    async fn recomputed(&self, cart: &CartModel) {
        self.event_sender
            .send_or_log(Event::CartRecomputed {
                cart_id: cart.id,
                total_products: cart.total_products,
                final_price: cart.final_price,
            })
            .await;
    }
}

/// Recomputes and stores `total_products` and `final_price` for `cart`.
///
/// The write only applies if the stored version still equals
/// `cart.version`; otherwise another writer got there first and
/// `ConcurrentModification` is returned. Returns the cart as stored.
pub async fn recompute_cart_aggregates<C>(conn: &C, cart: &CartModel) -> Result<CartModel, ServiceError>
where
    C: ConnectionTrait,
{
    let lines = CartProduct::find()
        .filter(cart_product::Column::CartId.eq(cart.id))
        .all(conn)
        .await?;
    let totals = CartTotals::from_lines(&lines)?;
    let version = cart.version + 1;

    let result = Cart::update_many()
        .col_expr(cart::Column::TotalProducts, Expr::value(totals.total_products))
        .col_expr(cart::Column::FinalPrice, Expr::value(totals.final_price))
        .col_expr(cart::Column::Version, Expr::value(version))
        .filter(cart::Column::Id.eq(cart.id))
        .filter(cart::Column::Version.eq(cart.version))
        .exec(conn)
        .await?;

    debug!(
        "Cart {} aggregates: {} items, {}",
        cart.id, totals.total_products, totals.final_price
    );
    if result.rows_affected == 0 {
        warn!("Cart {} changed underneath version {}", cart.id, cart.version);
        return Err(ServiceError::ConcurrentModification {
            entity: "Cart",
            id: cart.id,
        });
    }

    Ok(CartModel {
        total_products: totals.total_products,
        final_price: totals.final_price,
        version,
        ..cart.clone()
    })
}

/// Loads a cart that may still be edited.
async fn load_open_cart<C>(conn: &C, cart_id: i32) -> Result<CartModel, ServiceError>
where
    C: ConnectionTrait,
{
    let cart = Cart::find_by_id(cart_id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Cart", cart_id))?;

    if cart.in_order {
        return Err(ServiceError::InvalidOperation(format!(
            "Cart {} is already part of an order",
            cart_id
        )));
    }
    Ok(cart)
}

async fn find_line<C>(conn: &C, line_id: i32) -> Result<CartProductModel, ServiceError>
where
    C: ConnectionTrait,
{
    CartProduct::find_by_id(line_id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Cart line", line_id))
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCartInput {
    pub owner_id: i32,
    #[serde(default)]
    pub for_anonymous_user: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CartWithLines {
    pub cart: CartModel,
    pub lines: Vec<CartProductModel>,
}

/// Cart aggregates derived from line snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartTotals {
    pub total_products: i32,
    pub final_price: Decimal,
    pub line_count: usize,
}

impl CartTotals {
    pub fn from_lines(lines: &[CartProductModel]) -> Result<Self, ServiceError> {
        let mut total_products: i32 = 0;
        let mut final_price = Decimal::ZERO;

        for line in lines {
            total_products = total_products.checked_add(line.qty).ok_or_else(|| {
                ServiceError::ValidationError("total_products: overflow".to_string())
            })?;
            final_price += line.final_price;
        }

        let final_price = final_price.round_dp(2);
        if final_price > MAX_MONEY {
            return Err(ServiceError::ValidationError(format!(
                "final_price: cart total {} exceeds {}",
                final_price, MAX_MONEY
            )));
        }

        Ok(Self {
            total_products,
            final_price,
            line_count: lines.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ContentType;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    fn line(id: i32, qty: i32, final_price: Decimal) -> CartProductModel {
        CartProductModel {
            id,
            user_id: 1,
            cart_id: 1,
            final_price,
            content_type: ContentType::Product,
            object_id: id,
            qty,
        }
    }

    #[test]
    fn empty_cart_totals_are_zero() {
        let totals = CartTotals::from_lines(&[]).unwrap();
        assert_eq!(totals.total_products, 0);
        assert_eq!(totals.final_price, Decimal::ZERO);
        assert_eq!(totals.line_count, 0);
    }

    #[test]
    fn totals_sum_quantities_and_snapshots() {
        let lines = vec![line(1, 3, dec!(59.97)), line(2, 1, dec!(24.99))];
        let totals = CartTotals::from_lines(&lines).unwrap();
        assert_eq!(totals.total_products, 4);
        assert_eq!(totals.final_price, dec!(84.96));
        assert_eq!(totals.line_count, 2);
    }

    #[test]
    fn totals_reject_overflowing_price() {
        let lines = vec![line(1, 1, dec!(9999999.99)), line(2, 1, dec!(0.01))];
        assert_matches!(
            CartTotals::from_lines(&lines),
            Err(ServiceError::ValidationError(_))
        );
    }
}
