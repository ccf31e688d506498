use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // user_id points at the external identity provider; no FK is declared.
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Customers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Customers::UserId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Customers::IsActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Customers::Phone).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Customers::Address)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CustomerWishlist::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CustomerWishlist::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CustomerWishlist::CustomerId).integer().not_null())
                    .col(ColumnDef::new(CustomerWishlist::ProductId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customer_wishlist_customer_id")
                            .from(CustomerWishlist::Table, CustomerWishlist::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customer_wishlist_product_id")
                            .from(CustomerWishlist::Table, CustomerWishlist::ProductId)
                            .to(
                                super::m20211121_000001_create_catalog_tables::Products::Table,
                                super::m20211121_000001_create_catalog_tables::Products::Id,
                            )
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_customer_wishlist_pair")
                    .table(CustomerWishlist::Table)
                    .col(CustomerWishlist::CustomerId)
                    .col(CustomerWishlist::ProductId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CustomerWishlist::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Customers {
    Table,
    Id,
    UserId,
    IsActive,
    Phone,
    Address,
}

#[derive(DeriveIden)]
enum CustomerWishlist {
    Table,
    Id,
    CustomerId,
    ProductId,
}
