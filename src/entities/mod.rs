//! sea-orm entities, one module per table.

pub mod cart;
pub mod cart_product;
pub mod content_type;
pub mod customer;
pub mod customer_order;
pub mod image_gallery;
pub mod manufacturer;
pub mod notification;
pub mod order;
pub mod product;
pub mod season;
pub mod wishlist_item;

pub use cart::{Entity as Cart, Model as CartModel};
pub use cart_product::{Entity as CartProduct, Model as CartProductModel};
pub use content_type::ContentType;
pub use customer::{Entity as Customer, Model as CustomerModel};
pub use customer_order::{Entity as CustomerOrder, Model as CustomerOrderModel};
pub use image_gallery::{Entity as ImageGallery, Model as ImageGalleryModel};
pub use manufacturer::{Entity as Manufacturer, Model as ManufacturerModel};
pub use notification::{Entity as Notification, Model as NotificationModel};
pub use order::{BuyingType, Entity as Order, Model as OrderModel, OrderStatus};
pub use product::{Entity as Product, Model as ProductModel};
pub use season::{Entity as Season, Model as SeasonModel, SeasonName};
pub use wishlist_item::{Entity as WishlistItem, Model as WishlistItemModel};
