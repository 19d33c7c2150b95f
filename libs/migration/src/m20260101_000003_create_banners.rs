use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Banners::Table)
                    .if_not_exists()
                    .col(pk_uuid(Banners::Id))
                    .col(text(Banners::Image))
                    .col(string_len(Banners::TitleUz, 100))
                    .col(string_len(Banners::TitleRu, 100))
                    .col(string_len(Banners::TitleEn, 100))
                    .col(text(Banners::DescriptionUz))
                    .col(text(Banners::DescriptionRu))
                    .col(text(Banners::DescriptionEn))
                    .col(
                        timestamp_with_time_zone(Banners::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Banners::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Banners {
    Table,
    Id,
    Image,
    TitleUz,
    TitleRu,
    TitleEn,
    DescriptionUz,
    DescriptionRu,
    DescriptionEn,
    CreatedAt,
}
