use sea_orm_migration::prelude::*;

use super::m20211121_000002_create_customers_table::Customers;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Carts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Carts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Carts::OwnerId).integer().not_null())
                    .col(
                        ColumnDef::new(Carts::TotalProducts)
                            .integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Carts::TotalProducts).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Carts::FinalPrice)
                            .decimal_len(9, 2)
                            .not_null()
                            .default(0)
                            .check(Expr::col(Carts::FinalPrice).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Carts::InOrder)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Carts::ForAnonymousUser)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_carts_owner_id")
                            .from(Carts::Table, Carts::OwnerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // content_type + object_id form the polymorphic reference to the sold item
        manager
            .create_table(
                Table::create()
                    .table(CartProducts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CartProducts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CartProducts::UserId).integer().not_null())
                    .col(ColumnDef::new(CartProducts::CartId).integer().not_null())
                    .col(
                        ColumnDef::new(CartProducts::FinalPrice)
                            .decimal_len(9, 2)
                            .not_null()
                            .check(Expr::col(CartProducts::FinalPrice).gte(0)),
                    )
                    .col(
                        ColumnDef::new(CartProducts::ContentType)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(ColumnDef::new(CartProducts::ObjectId).integer().not_null())
                    .col(
                        ColumnDef::new(CartProducts::Qty)
                            .integer()
                            .not_null()
                            .default(1)
                            .check(Expr::col(CartProducts::Qty).gte(1)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cart_products_user_id")
                            .from(CartProducts::Table, CartProducts::UserId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cart_products_cart_id")
                            .from(CartProducts::Table, CartProducts::CartId)
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
                    .name("idx_cart_products_cart_id")
                    .table(CartProducts::Table)
                    .col(CartProducts::CartId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_cart_products_content")
                    .table(CartProducts::Table)
                    .col(CartProducts::ContentType)
                    .col(CartProducts::ObjectId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CartProducts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Carts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Carts {
    Table,
    Id,
    OwnerId,
    TotalProducts,
    FinalPrice,
    InOrder,
    ForAnonymousUser,
}

#[derive(DeriveIden)]
enum CartProducts {
    Table,
    Id,
    UserId,
    CartId,
    FinalPrice,
    ContentType,
    ObjectId,
    Qty,
}
