//! Kids Store data layer
//!
//! Catalog (manufacturers, seasons, products), carts with price-snapshot
//! lines, orders, customer profiles, notifications and an image gallery,
//! persisted through sea-orm.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod content;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod media;
pub mod services;

use sea_orm::DatabaseConnection;
use std::sync::Arc;

pub use content::{ContentObject, ContentRef};
pub use errors::ServiceError;
pub use services::AppServices;

/// Shared handles for an embedding application.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: Arc<config::AppConfig>,
    pub event_sender: Arc<events::EventSender>,
    pub services: AppServices,
}

impl AppState {
    /// Connects using `config`, wires every service to local media storage
    /// and starts the event processing loop.
    pub async fn init(config: config::AppConfig) -> Result<Self, ServiceError> {
        let db = Arc::new(db::establish_connection_from_app_config(&config).await?);
        let (event_sender, rx) = events::EventSender::channel(events::DEFAULT_EVENT_CHANNEL_CAPACITY);
        tokio::spawn(events::process_events(rx));

        let storage: Arc<dyn media::MediaStorage> =
            Arc::new(media::LocalMediaStorage::from_config(&config));
        let config = Arc::new(config);
        let event_sender = Arc::new(event_sender);
        let services = AppServices::new(db.clone(), event_sender.clone(), config.clone(), storage);

        Ok(Self {
            db,
            config,
            event_sender,
            services,
        })
    }

    /// Public URL for an `image` column value.
    pub fn media_url(&self, reference: &str) -> String {
        media::url_for(&self.config.media_url, reference)
    }
}
