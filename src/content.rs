//! Polymorphic `(content_type, object_id)` references.
//!
//! Cart lines and gallery images point at "some catalog entity". Instead of
//! an open lookup table the reference is a closed tagged union over the
//! kinds this storefront knows, with one resolver per kind. Each use site
//! declares which kinds it accepts.

use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, EntityTrait, QuerySelect};
use serde::{Deserialize, Serialize};

use crate::entities::{
    manufacturer, product, season, ContentType, Manufacturer, Product, Season,
};
use crate::errors::ServiceError;

/// Kinds a cart line may reference. Only items with a price can be sold.
pub const SELLABLE_KINDS: &[ContentType] = &[ContentType::Product];

/// Kinds an image gallery entry may be attached to.
pub const GALLERY_KINDS: &[ContentType] = &[
    ContentType::Product,
    ContentType::Manufacturer,
    ContentType::Season,
];

/// Unresolved reference to a catalog entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum ContentRef {
    Product(i32),
    Manufacturer(i32),
    Season(i32),
}

impl ContentRef {
    /// Builds a reference from its stored column pair.
    pub fn new(kind: ContentType, object_id: i32) -> Self {
        match kind {
            ContentType::Product => Self::Product(object_id),
            ContentType::Manufacturer => Self::Manufacturer(object_id),
            ContentType::Season => Self::Season(object_id),
        }
    }

    /// Builds a reference from a raw discriminator, rejecting unknown kinds.
    pub fn parse(kind: &str, object_id: i32) -> Result<Self, ServiceError> {
        let kind = ContentType::parse(kind).map_err(|_| {
            ServiceError::ValidationError(format!("unknown content type '{}'", kind))
        })?;
        Ok(Self::new(kind, object_id))
    }

    pub fn kind(&self) -> ContentType {
        match self {
            Self::Product(_) => ContentType::Product,
            Self::Manufacturer(_) => ContentType::Manufacturer,
            Self::Season(_) => ContentType::Season,
        }
    }

    pub fn object_id(&self) -> i32 {
        match self {
            Self::Product(id) | Self::Manufacturer(id) | Self::Season(id) => *id,
        }
    }

    /// Fails with a validation error unless the kind is in `allowed`.
    pub fn ensure_kind_in(&self, allowed: &[ContentType]) -> Result<(), ServiceError> {
        if allowed.contains(&self.kind()) {
            Ok(())
        } else {
            Err(ServiceError::ValidationError(format!(
                "content type '{}' is not allowed here",
                self.kind()
            )))
        }
    }
}

/// A resolved reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentObject {
    Product(product::Model),
    Manufacturer(manufacturer::Model),
    Season(season::Model),
}

impl ContentObject {
    pub fn kind(&self) -> ContentType {
        match self {
            Self::Product(_) => ContentType::Product,
            Self::Manufacturer(_) => ContentType::Manufacturer,
            Self::Season(_) => ContentType::Season,
        }
    }

    pub fn object_id(&self) -> i32 {
        match self {
            Self::Product(p) => p.id,
            Self::Manufacturer(m) => m.id,
            Self::Season(s) => s.id,
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Self::Product(p) => p.name.clone(),
            Self::Manufacturer(m) => m.name.clone(),
            Self::Season(s) => s.name.to_string(),
        }
    }

    /// Unit price, for kinds that carry one.
    pub fn price(&self) -> Option<Decimal> {
        match self {
            Self::Product(p) => Some(p.price),
            Self::Manufacturer(_) | Self::Season(_) => None,
        }
    }

    /// Path segment used when storing uploads for this object.
    pub fn upload_segment(&self) -> String {
        match self {
            Self::Product(p) => p.slug.clone(),
            Self::Manufacturer(m) => m.slug.clone(),
            Self::Season(s) => s.name.to_string(),
        }
    }
}

/// Resolves a reference, failing with `NotFound` when the row is missing.
pub async fn resolve<C>(conn: &C, reference: ContentRef) -> Result<ContentObject, ServiceError>
where
    C: ConnectionTrait,
{
    match reference {
        ContentRef::Product(id) => resolve_product(conn, id, false)
            .await
            .map(ContentObject::Product),
        ContentRef::Manufacturer(id) => Manufacturer::find_by_id(id)
            .one(conn)
            .await?
            .map(ContentObject::Manufacturer)
            .ok_or_else(|| ServiceError::not_found("Manufacturer", id)),
        ContentRef::Season(id) => Season::find_by_id(id)
            .one(conn)
            .await?
            .map(ContentObject::Season)
            .ok_or_else(|| ServiceError::not_found("Season", id)),
    }
}

/// Resolves a reference a cart line can sell and returns it with its price.
///
/// The product row is read with a shared lock so the price cannot change
/// between this read and the line write in the same transaction. SQLite has
/// no row locks; its writer lock serialises the transaction instead.
pub async fn resolve_sellable<C>(
    conn: &C,
    reference: ContentRef,
) -> Result<(ContentObject, Decimal), ServiceError>
where
    C: ConnectionTrait,
{
    reference.ensure_kind_in(SELLABLE_KINDS)?;

    let object = match reference {
        ContentRef::Product(id) => ContentObject::Product(resolve_product(conn, id, true).await?),
        other => resolve(conn, other).await?,
    };

    let price = object.price().ok_or_else(|| {
        ServiceError::ValidationError(format!(
            "{} {} has no price",
            object.kind(),
            object.object_id()
        ))
    })?;

    Ok((object, price))
}

async fn resolve_product<C>(conn: &C, id: i32, lock: bool) -> Result<product::Model, ServiceError>
where
    C: ConnectionTrait,
{
    let mut query = Product::find_by_id(id);
    if lock {
        query = query.lock_shared();
    }
    query
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Product", id))
}
