use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shopping cart entity.
///
/// `total_products` and `final_price` are cached aggregates over the cart's
/// lines. Nothing in the schema keeps them current; writes that go around
/// `CartService` leave them stale until `CartService::recompute_aggregates`
/// runs. `version` is bumped on every aggregate rewrite.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "carts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub owner_id: i32,
    pub total_products: i32,
    #[sea_orm(column_type = "Decimal(Some((9, 2)))")]
    pub final_price: Decimal,
    pub in_order: bool,
    pub for_anonymous_user: bool,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cart_product::Entity")]
    CartProducts,
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::OwnerId",
        to = "super::customer::Column::Id",
        on_delete = "Cascade"
    )]
    Owner,
}

impl Related<super::cart_product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CartProducts.def()
    }
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
