use sea_orm_migration::prelude::*;

use super::m20211121_000002_create_customers_table::Customers;
use super::m20211121_000003_create_cart_tables::Carts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Orders::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Orders::CustomerId).integer().not_null())
                    .col(ColumnDef::new(Orders::FirstName).string_len(255).not_null())
                    .col(ColumnDef::new(Orders::LastName).string_len(255).not_null())
                    .col(ColumnDef::new(Orders::Phone).string_len(20).not_null())
                    .col(ColumnDef::new(Orders::Address).string_len(255).not_null())
                    .col(ColumnDef::new(Orders::CartId).integer().not_null())
                    .col(
                        ColumnDef::new(Orders::Status)
                            .string_len(100)
                            .not_null()
                            .default("new"),
                    )
                    .col(
                        ColumnDef::new(Orders::BuyingType)
                            .string_len(100)
                            .not_null()
                            .default("self"),
                    )
                    .col(ColumnDef::new(Orders::Comment).text().null())
                    .col(ColumnDef::new(Orders::CreatedAt).date().not_null())
                    .col(ColumnDef::new(Orders::OrderDate).date().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_customer_id")
                            .from(Orders::Table, Orders::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_cart_id")
                            .from(Orders::Table, Orders::CartId)
                            .to(Carts::Table, Carts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_orders_customer_id")
                    .table(Orders::Table)
                    .col(Orders::CustomerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_orders_status")
                    .table(Orders::Table)
                    .col(Orders::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CustomerOrders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CustomerOrders::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CustomerOrders::CustomerId).integer().not_null())
                    .col(ColumnDef::new(CustomerOrders::OrderId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customer_orders_customer_id")
                            .from(CustomerOrders::Table, CustomerOrders::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customer_orders_order_id")
                            .from(CustomerOrders::Table, CustomerOrders::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_customer_orders_pair")
                    .table(CustomerOrders::Table)
                    .col(CustomerOrders::CustomerId)
                    .col(CustomerOrders::OrderId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CustomerOrders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
    CustomerId,
    FirstName,
    LastName,
    Phone,
    Address,
    CartId,
    Status,
    BuyingType,
    Comment,
    CreatedAt,
    OrderDate,
}

#[derive(DeriveIden)]
enum CustomerOrders {
    Table,
    Id,
    CustomerId,
    OrderId,
}
