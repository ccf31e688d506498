use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::content_type::ContentType;

/// Image attached to any gallery-eligible entity through
/// `(content_type, object_id)`; there is no foreign key on `object_id`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "image_gallery")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub content_type: ContentType,
    pub object_id: i32,
    pub image: String,
    pub use_in_slider: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
