use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::entities::{ContentType, OrderStatus};

/// Default capacity for the event channel
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 1024;

// Events emitted after a write has been committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // Catalog events
    ManufacturerCreated(i32),
    SeasonCreated(i32),
    ProductCreated(i32),
    ProductPriceChanged {
        product_id: i32,
        old_price: Decimal,
        new_price: Decimal,
    },
    ProductStockChanged {
        product_id: i32,
        stock: i32,
    },

    // Cart events
    CartCreated(i32),
    CartLineSaved {
        cart_id: i32,
        line_id: i32,
        final_price: Decimal,
    },
    CartLineRemoved {
        cart_id: i32,
        line_id: i32,
    },
    CartRecomputed {
        cart_id: i32,
        total_products: i32,
        final_price: Decimal,
    },
    CartAssigned {
        cart_id: i32,
        customer_id: i32,
    },

    // Order events
    OrderPlaced {
        order_id: i32,
        cart_id: i32,
        customer_id: i32,
    },
    OrderUpdated(i32),
    OrderStatusChanged {
        order_id: i32,
        old_status: OrderStatus,
        new_status: OrderStatus,
    },

    // Customer events
    CustomerCreated(i32),
    CustomerUpdated(i32),
    CustomerDeleted(i32),

    NotificationCreated {
        notification_id: i32,
        recipient_id: i32,
    },

    GalleryImageAttached {
        entry_id: i32,
        content_type: ContentType,
        object_id: i32,
    },
    GalleryImageDetached(i32),
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Creates a sender together with its receiving end
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }

    /// Sends without waiting; a full or closed channel is logged and the
    /// event dropped so the committed write is never reported as failed.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.sender.try_send(event) {
            warn!("Dropping event: {}", e);
        }
    }
}

/// Drains the channel, logging each event. Runs until every sender is dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::OrderStatusChanged {
                order_id,
                old_status,
                new_status,
            } => info!(
                "Order {} moved from {} to {}: {}",
                order_id,
                old_status,
                new_status,
                new_status.description()
            ),
            Event::ProductPriceChanged {
                product_id,
                old_price,
                new_price,
            } => info!(
                "Product {} price changed {} -> {}",
                product_id, old_price, new_price
            ),
            other => debug!("Received event: {:?}", other),
        }
    }

    info!("Event channel closed; stopping event processing");
}
