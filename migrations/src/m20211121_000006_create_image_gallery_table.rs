use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Polymorphic: (content_type, object_id) may point at any gallery-eligible table,
        // so there is no foreign key on object_id.
        manager
            .create_table(
                Table::create()
                    .table(ImageGallery::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ImageGallery::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ImageGallery::ContentType)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ImageGallery::ObjectId).integer().not_null())
                    .col(ColumnDef::new(ImageGallery::Image).string_len(100).not_null())
                    .col(
                        ColumnDef::new(ImageGallery::UseInSlider)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_image_gallery_content")
                    .table(ImageGallery::Table)
                    .col(ImageGallery::ContentType)
                    .col(ImageGallery::ObjectId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ImageGallery::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ImageGallery {
    Table,
    Id,
    ContentType,
    ObjectId,
    Image,
    UseInSlider,
}
