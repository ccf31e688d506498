use crate::{
    content::{self, ContentRef, GALLERY_KINDS},
    entities::{
        image_gallery, manufacturer, product, season, ImageGallery, ImageGalleryModel,
        Manufacturer, Product, Season,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    media::{MediaStorage, UploadTarget, MAX_IMAGE_PATH_LEN},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Images attached to catalog entities, optionally shown in the slider.
#[derive(Clone)]
pub struct GalleryService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
    storage: Arc<dyn MediaStorage>,
}

impl GalleryService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        event_sender: Arc<EventSender>,
        storage: Arc<dyn MediaStorage>,
    ) -> Self {
        Self {
            db,
            event_sender,
            storage,
        }
    }

    /// Attaches an already stored image reference to an entity.
    #[instrument(skip(self))]
    pub async fn attach_image(
        &self,
        target: ContentRef,
        image: &str,
        use_in_slider: bool,
    ) -> Result<ImageGalleryModel, ServiceError> {
        target.ensure_kind_in(GALLERY_KINDS)?;
        if image.is_empty() || image.len() > MAX_IMAGE_PATH_LEN {
            return Err(ServiceError::ValidationError(format!(
                "image: reference must be 1 to {} characters",
                MAX_IMAGE_PATH_LEN
            )));
        }

        let txn = self.db.begin().await?;
        content::resolve(&txn, target).await?;

        let entry = image_gallery::ActiveModel {
            content_type: Set(target.kind()),
            object_id: Set(target.object_id()),
            image: Set(image.to_string()),
            use_in_slider: Set(use_in_slider),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::GalleryImageAttached {
                entry_id: entry.id,
                content_type: entry.content_type,
                object_id: entry.object_id,
            })
            .await;

        info!("Attached {} to {} {}", entry.image, entry.content_type, entry.object_id);
        Ok(entry)
    }

    /// Stores `data` under the entity's upload directory and attaches it.
    /// The file is removed again if the gallery row cannot be written.
    #[instrument(skip(self, data), fields(bytes = data.len()))]
    pub async fn upload_image(
        &self,
        target: ContentRef,
        file_name: &str,
        data: &[u8],
        use_in_slider: bool,
    ) -> Result<ImageGalleryModel, ServiceError> {
        target.ensure_kind_in(GALLERY_KINDS)?;
        let object = content::resolve(&*self.db, target).await?;

        let upload = UploadTarget::new(object.kind(), object.upload_segment(), file_name);
        let reference = self.storage.store(&upload, data).await?;

        match self.attach_image(target, &reference, use_in_slider).await {
            Ok(entry) => Ok(entry),
            Err(e) => {
                if let Err(cleanup) = self.storage.remove(&reference).await {
                    warn!("Failed to remove orphaned upload {}: {}", reference, cleanup);
                }
                Err(e)
            }
        }
    }

    pub async fn images_for(&self, target: ContentRef) -> Result<Vec<ImageGalleryModel>, ServiceError> {
        Ok(ImageGallery::find()
            .filter(image_gallery::Column::ContentType.eq(target.kind()))
            .filter(image_gallery::Column::ObjectId.eq(target.object_id()))
            .order_by_asc(image_gallery::Column::Id)
            .all(&*self.db)
            .await?)
    }

    pub async fn slider_images(&self) -> Result<Vec<ImageGalleryModel>, ServiceError> {
        Ok(ImageGallery::find()
            .filter(image_gallery::Column::UseInSlider.eq(true))
            .order_by_asc(image_gallery::Column::Id)
            .all(&*self.db)
            .await?)
    }

    pub async fn set_use_in_slider(
        &self,
        entry_id: i32,
        use_in_slider: bool,
    ) -> Result<ImageGalleryModel, ServiceError> {
        let entry = self.get_entry(entry_id).await?;
        let mut active: image_gallery::ActiveModel = entry.into();
        active.use_in_slider = Set(use_in_slider);
        Ok(active.update(&*self.db).await?)
    }

    /// Removes the gallery row. With `remove_file` the stored image goes too,
    /// unless another gallery entry or catalog row still references it.
    /// A failed file removal leaves the row in place.
    #[instrument(skip(self))]
    pub async fn detach_image(&self, entry_id: i32, remove_file: bool) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;

        let entry = ImageGallery::find_by_id(entry_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Gallery image", entry_id))?;
        let image = entry.image.clone();
        entry.delete(&txn).await?;

        if remove_file {
            if image_in_use(&txn, &image).await? {
                debug!("Keeping {}: still referenced", image);
            } else {
                self.storage.remove(&image).await?;
            }
        }

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::GalleryImageDetached(entry_id))
            .await;
        Ok(())
    }

    async fn get_entry(&self, entry_id: i32) -> Result<ImageGalleryModel, ServiceError> {
        ImageGallery::find_by_id(entry_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Gallery image", entry_id))
    }
}

/// Whether any gallery entry or catalog image column points at `image`.
async fn image_in_use<C: ConnectionTrait>(conn: &C, image: &str) -> Result<bool, ServiceError> {
    let gallery = ImageGallery::find()
        .filter(image_gallery::Column::Image.eq(image))
        .count(conn)
        .await?;
    let products = Product::find()
        .filter(product::Column::Image.eq(image))
        .count(conn)
        .await?;
    let manufacturers = Manufacturer::find()
        .filter(manufacturer::Column::Image.eq(image))
        .count(conn)
        .await?;
    let seasons = Season::find()
        .filter(season::Column::Image.eq(image))
        .count(conn)
        .await?;

    Ok(gallery + products + manufacturers + seasons > 0)
}
