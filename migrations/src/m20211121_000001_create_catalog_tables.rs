use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Manufacturers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Manufacturers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Manufacturers::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Manufacturers::Slug).string_len(50).not_null())
                    .col(ColumnDef::new(Manufacturers::Country).string_len(100).not_null())
                    .col(ColumnDef::new(Manufacturers::Image).string_len(100).null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_manufacturers_slug")
                    .table(Manufacturers::Table)
                    .col(Manufacturers::Slug)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Seasons::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Seasons::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Seasons::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Seasons::Image).string_len(100).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Products::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Products::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Products::ManufacturerId).integer().not_null())
                    .col(ColumnDef::new(Products::SeasonId).integer().not_null())
                    .col(
                        ColumnDef::new(Products::Price)
                            .decimal_len(9, 2)
                            .not_null()
                            .check(Expr::col(Products::Price).gte(0)),
                    )
                    .col(ColumnDef::new(Products::Description).text().not_null())
                    .col(ColumnDef::new(Products::Slug).string_len(50).not_null())
                    .col(
                        ColumnDef::new(Products::Stock)
                            .integer()
                            .not_null()
                            .default(1)
                            .check(Expr::col(Products::Stock).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Products::OfferOfTheWeek)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Products::ReleaseDate).date().not_null())
                    .col(ColumnDef::new(Products::Image).string_len(100).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_manufacturer_id")
                            .from(Products::Table, Products::ManufacturerId)
                            .to(Manufacturers::Table, Manufacturers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_season_id")
                            .from(Products::Table, Products::SeasonId)
                            .to(Seasons::Table, Seasons::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_products_slug")
                    .table(Products::Table)
                    .col(Products::Slug)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_products_manufacturer_id")
                    .table(Products::Table)
                    .col(Products::ManufacturerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_products_season_id")
                    .table(Products::Table)
                    .col(Products::SeasonId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Seasons::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Manufacturers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Manufacturers {
    Table,
    Id,
    Name,
    Slug,
    Country,
    Image,
}

#[derive(DeriveIden)]
pub enum Seasons {
    Table,
    Id,
    Name,
    Image,
}

#[derive(DeriveIden)]
pub enum Products {
    Table,
    Id,
    Name,
    ManufacturerId,
    SeasonId,
    Price,
    Description,
    Slug,
    Stock,
    OfferOfTheWeek,
    ReleaseDate,
    Image,
}
