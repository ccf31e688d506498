//! Business operations over the storefront tables.
//!
//! Each service owns a handle to the connection pool and the event sender.
//! Multi-row writes run in a single transaction; events are published only
//! after commit.

pub mod carts;
pub mod catalog;
pub mod customers;
pub mod gallery;
pub mod notifications;
pub mod orders;
pub mod validation;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::events::EventSender;
use crate::media::MediaStorage;

pub use carts::CartService;
pub use catalog::CatalogService;
pub use customers::CustomerService;
pub use gallery::GalleryService;
pub use notifications::NotificationService;
pub use orders::OrderService;

/// Every service wired to the same pool, event channel and media storage.
#[derive(Clone)]
pub struct AppServices {
    pub catalog: Arc<CatalogService>,
    pub carts: Arc<CartService>,
    pub orders: Arc<OrderService>,
    pub customers: Arc<CustomerService>,
    pub notifications: Arc<NotificationService>,
    pub gallery: Arc<GalleryService>,
}

impl AppServices {
    pub fn new(
        db: Arc<DatabaseConnection>,
        event_sender: Arc<EventSender>,
        config: Arc<AppConfig>,
        storage: Arc<dyn MediaStorage>,
    ) -> Self {
        Self {
            catalog: Arc::new(CatalogService::new(db.clone(), event_sender.clone())),
            carts: Arc::new(CartService::new(db.clone(), event_sender.clone())),
            orders: Arc::new(OrderService::new(
                db.clone(),
                event_sender.clone(),
                config,
            )),
            customers: Arc::new(CustomerService::new(db.clone(), event_sender.clone())),
            notifications: Arc::new(NotificationService::new(
                db.clone(),
                event_sender.clone(),
            )),
            gallery: Arc::new(GalleryService::new(db, event_sender, storage)),
        }
    }
}
