pub use sea_orm_migration::prelude::*;

mod m20211121_000001_create_catalog_tables;
mod m20211121_000002_create_customers_table;
mod m20211121_000003_create_cart_tables;
mod m20211121_000004_create_order_tables;
mod m20211121_000005_create_notifications_table;
mod m20211121_000006_create_image_gallery_table;
mod m20211205_000007_add_cart_version;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20211121_000001_create_catalog_tables::Migration),
            Box::new(m20211121_000002_create_customers_table::Migration),
            Box::new(m20211121_000003_create_cart_tables::Migration),
            Box::new(m20211121_000004_create_order_tables::Migration),
            Box::new(m20211121_000005_create_notifications_table::Migration),
            Box::new(m20211121_000006_create_image_gallery_table::Migration),
            Box::new(m20211205_000007_add_cart_version::Migration),
        ]
    }
}
