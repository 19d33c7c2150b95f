//! Integration tests for banners against a real Postgres.

use domain_banners::*;
use test_utils::{TestDatabase, assertions::*};

fn create_input(title: &str) -> CreateBanner {
    CreateBanner {
        image: "https://cdn.example.com/banner.png".to_string(),
        title_uz: title.to_string(),
        title_ru: title.to_string(),
        title_en: title.to_string(),
        description_uz: String::new(),
        description_ru: String::new(),
        description_en: "Seasonal discount".to_string(),
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_partial_update_keeps_other_fields() {
    let db = TestDatabase::new().await;
    let service = BannerService::new(PgBannerRepository::new(db.connection()));

    let created = service.create_banner(create_input("Autumn")).await.unwrap();
    let updated = service
        .update_banner(
            created.id,
            UpdateBanner {
                title_ru: Some("Осень".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_uuid_eq(updated.id, created.id, "banner id");
    assert_eq!(updated.title_ru, "Осень");
    assert_eq!(updated.title_en, "Autumn");
    assert_eq!(updated.description_en, "Seasonal discount");
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_delete_then_get_is_not_found() {
    let db = TestDatabase::new().await;
    let service = BannerService::new(PgBannerRepository::new(db.connection()));

    let created = service.create_banner(create_input("Winter")).await.unwrap();
    let listed = service.list_banners().await.unwrap();
    assert!(listed.iter().any(|b| b.id == created.id));

    service.delete_banner(created.id).await.unwrap();

    assert!(matches!(
        service.get_banner(created.id).await,
        Err(BannerError::NotFound(_))
    ));
    assert!(matches!(
        service.delete_banner(created.id).await,
        Err(BannerError::NotFound(_))
    ));
}
