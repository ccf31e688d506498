use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A placed purchase.
///
/// The shipping fields are a snapshot taken at placement and may differ
/// from the customer's own profile (gift orders). `created_at` is refreshed
/// on every save; `order_date` is the requested fulfilment date.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub customer_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
    pub cart_id: i32,
    pub status: OrderStatus,
    pub buying_type: BuyingType,
    #[sea_orm(column_type = "Text", nullable)]
    pub comment: Option<String>,
    pub created_at: NaiveDate,
    pub order_date: NaiveDate,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id",
        on_delete = "Cascade"
    )]
    Customer,
    #[sea_orm(
        belongs_to = "super::cart::Entity",
        from = "Column::CartId",
        to = "super::cart::Column::Id",
        on_delete = "Cascade"
    )]
    Cart,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::cart::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cart.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Order #{} ({})", self.id, self.status)
    }
}

/// Order status. Stored values match the storefront's existing data.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(100))")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[sea_orm(string_value = "new")]
    New,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "is_ready")]
    IsReady,
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl Default for OrderStatus {
    fn default() -> Self {
        Self::New
    }
}

impl OrderStatus {
    pub fn parse(raw: &str) -> Result<Self, DbErr> {
        Self::try_from_value(&raw.trim().to_ascii_lowercase())
    }

    /// The next status in the linear fulfilment sequence.
    pub fn successor(self) -> Option<Self> {
        match self {
            Self::New => Some(Self::InProgress),
            Self::InProgress => Some(Self::IsReady),
            Self::IsReady => Some(Self::Completed),
            Self::Completed => None,
        }
    }

    /// Strict transition table: one step forward, or staying put.
    pub fn can_transition_to(self, next: Self) -> bool {
        self == next || self.successor() == Some(next)
    }

    /// Human-readable description of the status.
    pub fn description(self) -> &'static str {
        match self {
            Self::New => "New order",
            Self::InProgress => "Order in progress",
            Self::IsReady => "Order is ready",
            Self::Completed => "Order handed over",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_value())
    }
}

/// How the customer receives the order. Self-pickup is stored as `"self"`.
///
/// `ActiveEnum` is implemented by hand (mirroring what `DeriveActiveEnum` would
/// generate for `rs_type = "String"`, `db_type = "String(StringLen::N(100))"`)
/// because the derive turns `string_value = "self"` into a `Self` identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum BuyingType {
    #[serde(rename = "self", alias = "self-pickup")]
    SelfPickup,
    #[serde(rename = "delivery")]
    Delivery,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyingTypeEnum;

impl sea_orm::sea_query::Iden for BuyingTypeEnum {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(s, "{}", "BuyingType").unwrap();
    }
}

impl ActiveEnum for BuyingType {
    type Value = String;

    type ValueVec = Vec<String>;

    fn name() -> sea_orm::sea_query::DynIden {
        sea_orm::sea_query::SeaRc::new(BuyingTypeEnum) as sea_orm::sea_query::DynIden
    }

    fn to_value(&self) -> Self::Value {
        match self {
            Self::SelfPickup => "self",
            Self::Delivery => "delivery",
        }
        .to_owned()
    }

    fn try_from_value(v: &Self::Value) -> Result<Self, DbErr> {
        match v.as_ref() {
            "self" => Ok(Self::SelfPickup),
            "delivery" => Ok(Self::Delivery),
            _ => Err(DbErr::Type(format!(
                "unexpected value for {} enum: {}",
                stringify!(BuyingType),
                v
            ))),
        }
    }

    fn db_type() -> sea_orm::ColumnDef {
        sea_orm::prelude::ColumnTypeTrait::def(sea_orm::ColumnType::String(
            sea_orm::sea_query::StringLen::N(100),
        ))
    }
}

impl From<BuyingType> for sea_orm::sea_query::Value {
    fn from(v: BuyingType) -> Self {
        <BuyingType as ActiveEnum>::to_value(&v).into()
    }
}

impl sea_orm::TryGetable for BuyingType {
    fn try_get_by<I: sea_orm::ColIdx>(
        res: &sea_orm::QueryResult,
        idx: I,
    ) -> Result<Self, sea_orm::TryGetError> {
        let value = <String as sea_orm::TryGetable>::try_get_by(res, idx)?;
        <Self as ActiveEnum>::try_from_value(&value).map_err(sea_orm::TryGetError::DbErr)
    }
}

impl sea_orm::sea_query::ValueType for BuyingType {
    fn try_from(v: sea_orm::sea_query::Value) -> Result<Self, sea_orm::sea_query::ValueTypeErr> {
        let value = <String as sea_orm::sea_query::ValueType>::try_from(v)?;
        <Self as ActiveEnum>::try_from_value(&value).map_err(|_| sea_orm::sea_query::ValueTypeErr)
    }

    fn type_name() -> String {
        <String as sea_orm::sea_query::ValueType>::type_name()
    }

    fn array_type() -> sea_orm::sea_query::ArrayType {
        <String as sea_orm::sea_query::ValueType>::array_type()
    }

    fn column_type() -> sea_orm::sea_query::ColumnType {
        <Self as ActiveEnum>::db_type()
            .get_column_type()
            .to_owned()
            .into()
    }

    fn enum_type_name() -> Option<&'static str> {
        Some(stringify!(BuyingType))
    }
}

impl sea_orm::sea_query::Nullable for BuyingType {
    fn null() -> sea_orm::sea_query::Value {
        <String as sea_orm::sea_query::Nullable>::null()
    }
}

impl Default for BuyingType {
    fn default() -> Self {
        Self::SelfPickup
    }
}

impl BuyingType {
    /// Accepts the stored value as well as `"self-pickup"`.
    pub fn parse(raw: &str) -> Result<Self, DbErr> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "self-pickup" | "self_pickup" => Ok(Self::SelfPickup),
            other => Self::try_from_value(&other.to_string()),
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::SelfPickup => "Self-pickup",
            Self::Delivery => "Delivery",
        }
    }
}

impl fmt::Display for BuyingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_value())
    }
}
