use sea_orm_migration::sea_query::extension::postgres::Type;
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(AgeRange::Enum)
                    .values([
                        AgeRange::Infants,
                        AgeRange::YoungChildren,
                        AgeRange::Children,
                        AgeRange::Teenagers,
                        AgeRange::Adults,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(pk_uuid(Categories::Id))
                    .col(uuid_null(Categories::ParentId))
                    .col(string_len(Categories::NameUz, 100))
                    .col(string_len(Categories::NameRu, 100))
                    .col(string_len(Categories::NameEn, 100))
                    .col(text_null(Categories::Image))
                    .col(
                        timestamp_with_time_zone(Categories::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_categories_parent_id")
                            .from(Categories::Table, Categories::ParentId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_categories_parent_id")
                    .table(Categories::Table)
                    .col(Categories::ParentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(pk_uuid(Tags::Id))
                    .col(string_len(Tags::NameUz, 100))
                    .col(string_len(Tags::NameRu, 100))
                    .col(string_len(Tags::NameEn, 100))
                    .col(
                        timestamp_with_time_zone(Tags::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(pk_uuid(Products::Id))
                    .col(string_len(Products::Title, 100))
                    .col(text(Products::DescriptionUz))
                    .col(text(Products::DescriptionRu))
                    .col(text(Products::DescriptionEn))
                    .col(text(Products::InstructionUz))
                    .col(text(Products::InstructionRu))
                    .col(text(Products::InstructionEn))
                    .col(json_binary(Products::IllnessUz).default("[]"))
                    .col(json_binary(Products::IllnessRu).default("[]"))
                    .col(json_binary(Products::IllnessEn).default("[]"))
                    .col(json_binary(Products::CompositionUz).default("[]"))
                    .col(json_binary(Products::CompositionRu).default("[]"))
                    .col(json_binary(Products::CompositionEn).default("[]"))
                    .col(json_binary(Products::Links).default("[]"))
                    .col(integer(Products::Price))
                    .col(integer_null(Products::OldPrice))
                    .col(integer(Products::Total).default(0))
                    .col(boolean_null(Products::New))
                    .col(
                        ColumnDef::new(Products::AgeRange)
                            .enumeration(
                                AgeRange::Enum,
                                [
                                    AgeRange::Infants,
                                    AgeRange::YoungChildren,
                                    AgeRange::Children,
                                    AgeRange::Teenagers,
                                    AgeRange::Adults,
                                ],
                            )
                            .not_null()
                            .default("18+"),
                    )
                    .col(uuid(Products::CategoryId))
                    .col(
                        timestamp_with_time_zone(Products::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Products::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_category_id")
                            .from(Products::Table, Products::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Stock and prices never go negative.
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                ALTER TABLE products
                    ADD CONSTRAINT chk_products_total_non_negative CHECK (total >= 0),
                    ADD CONSTRAINT chk_products_price_non_negative CHECK (price >= 0),
                    ADD CONSTRAINT chk_products_old_price_non_negative CHECK (old_price IS NULL OR old_price >= 0)
                "#,
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TRIGGER products_touch_updated_at
                    BEFORE UPDATE ON products
                    FOR EACH ROW
                    EXECUTE FUNCTION util.touch_updated_at()
                "#,
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_category_id")
                    .table(Products::Table)
                    .col(Products::CategoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_price")
                    .table(Products::Table)
                    .col(Products::Price)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProductTags::Table)
                    .if_not_exists()
                    .col(uuid(ProductTags::ProductId))
                    .col(uuid(ProductTags::TagId))
                    .primary_key(
                        Index::create()
                            .col(ProductTags::ProductId)
                            .col(ProductTags::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_tags_product_id")
                            .from(ProductTags::Table, ProductTags::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_tags_tag_id")
                            .from(ProductTags::Table, ProductTags::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Comments::Table)
                    .if_not_exists()
                    .col(pk_uuid(Comments::Id))
                    .col(uuid(Comments::ProductId))
                    .col(uuid_null(Comments::UserId))
                    .col(text(Comments::Text))
                    .col(double(Comments::Rating))
                    .col(
                        timestamp_with_time_zone(Comments::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_product_id")
                            .from(Comments::Table, Comments::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_user_id")
                            .from(Comments::Table, Comments::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "ALTER TABLE comments ADD CONSTRAINT chk_comments_rating_range CHECK (rating >= 1.0 AND rating <= 5.0)",
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_comments_product_id")
                    .table(Comments::Table)
                    .col(Comments::ProductId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Faqs::Table)
                    .if_not_exists()
                    .col(pk_uuid(Faqs::Id))
                    .col(text(Faqs::QuestionUz))
                    .col(text(Faqs::QuestionRu))
                    .col(text(Faqs::QuestionEn))
                    .col(text(Faqs::AnswerUz))
                    .col(text(Faqs::AnswerRu))
                    .col(text(Faqs::AnswerEn))
                    .col(
                        timestamp_with_time_zone(Faqs::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Favorites::Table)
                    .if_not_exists()
                    .col(uuid(Favorites::UserId))
                    .col(uuid(Favorites::ProductId))
                    .col(
                        timestamp_with_time_zone(Favorites::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(Favorites::UserId)
                            .col(Favorites::ProductId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorites_user_id")
                            .from(Favorites::Table, Favorites::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorites_product_id")
                            .from(Favorites::Table, Favorites::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(Favorites::Table)
                    .table(Faqs::Table)
                    .table(Comments::Table)
                    .table(ProductTags::Table)
                    .table(Products::Table)
                    .table(Tags::Table)
                    .table(Categories::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .drop_type(Type::drop().name(AgeRange::Enum).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    ParentId,
    NameUz,
    NameRu,
    NameEn,
    Image,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Tags {
    Table,
    Id,
    NameUz,
    NameRu,
    NameEn,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    Title,
    DescriptionUz,
    DescriptionRu,
    DescriptionEn,
    InstructionUz,
    InstructionRu,
    InstructionEn,
    IllnessUz,
    IllnessRu,
    IllnessEn,
    CompositionUz,
    CompositionRu,
    CompositionEn,
    Links,
    Price,
    OldPrice,
    Total,
    New,
    AgeRange,
    CategoryId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ProductTags {
    Table,
    ProductId,
    TagId,
}

#[derive(DeriveIden)]
enum Comments {
    Table,
    Id,
    ProductId,
    UserId,
    Text,
    Rating,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Faqs {
    Table,
    Id,
    QuestionUz,
    QuestionRu,
    QuestionEn,
    AnswerUz,
    AnswerRu,
    AnswerEn,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Favorites {
    Table,
    UserId,
    ProductId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AgeRange {
    #[sea_orm(iden = "age_range")]
    Enum,
    #[sea_orm(iden = "0-2")]
    Infants,
    #[sea_orm(iden = "3-7")]
    YoungChildren,
    #[sea_orm(iden = "8-12")]
    Children,
    #[sea_orm(iden = "13-17")]
    Teenagers,
    #[sea_orm(iden = "18+")]
    Adults,
}
