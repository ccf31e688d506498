use crate::{
    entities::{notification, Customer, Notification, NotificationModel},
    errors::ServiceError,
    events::{Event, EventSender},
};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{debug, instrument};

use super::validation::validate_not_blank;

/// In-app messages for customers.
#[derive(Clone)]
pub struct NotificationService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl NotificationService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, text))]
    pub async fn notify(
        &self,
        recipient_id: i32,
        text: &str,
    ) -> Result<NotificationModel, ServiceError> {
        validate_not_blank(text)
            .map_err(|_| ServiceError::ValidationError("text: must not be blank".to_string()))?;

        Customer::find_by_id(recipient_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Customer", recipient_id))?;

        let notification = notification::ActiveModel {
            recipient_id: Set(recipient_id),
            text: Set(text.to_string()),
            read: Set(false),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        self.event_sender
            .send_or_log(Event::NotificationCreated {
                notification_id: notification.id,
                recipient_id,
            })
            .await;

        debug!("Notification {} sent to {}", notification.id, recipient_id);
        Ok(notification)
    }

    /// Newest first.
    pub async fn list_for(
        &self,
        recipient_id: i32,
        unread_only: bool,
    ) -> Result<Vec<NotificationModel>, ServiceError> {
        let mut query = Notification::find()
            .filter(notification::Column::RecipientId.eq(recipient_id));
        if unread_only {
            query = query.filter(notification::Column::Read.eq(false));
        }
        Ok(query
            .order_by_desc(notification::Column::Id)
            .all(&*self.db)
            .await?)
    }

    pub async fn unread_count(&self, recipient_id: i32) -> Result<u64, ServiceError> {
        Ok(Notification::find()
            .filter(notification::Column::RecipientId.eq(recipient_id))
            .filter(notification::Column::Read.eq(false))
            .count(&*self.db)
            .await?)
    }

    pub async fn mark_read(&self, id: i32) -> Result<NotificationModel, ServiceError> {
        let existing = Notification::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Notification", id))?;
        if existing.read {
            return Ok(existing);
        }

        let mut active: notification::ActiveModel = existing.into();
        active.read = Set(true);
        Ok(active.update(&*self.db).await?)
    }

    /// Returns how many notifications changed.
    pub async fn mark_all_read(&self, recipient_id: i32) -> Result<u64, ServiceError> {
        let result = Notification::update_many()
            .col_expr(notification::Column::Read, Expr::value(true))
            .filter(notification::Column::RecipientId.eq(recipient_id))
            .filter(notification::Column::Read.eq(false))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
