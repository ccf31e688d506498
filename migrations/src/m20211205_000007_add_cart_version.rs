use sea_orm_migration::prelude::*;

use super::m20211121_000003_create_cart_tables::Carts;

/// Adds the optimistic-lock counter checked when cart aggregates are rewritten.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Carts::Table)
                    .add_column(
                        ColumnDef::new(CartVersion::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Carts::Table)
                    .drop_column(CartVersion::Version)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum CartVersion {
    Version,
}
