use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Promotional slide on the storefront home page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Banner {
    pub id: Uuid,
    pub image: String,
    pub title_uz: String,
    pub title_ru: String,
    pub title_en: String,
    pub description_uz: String,
    pub description_ru: String,
    pub description_en: String,
    pub created_at: DateTime<Utc>,
}

impl Banner {
    pub fn apply_update(&mut self, update: UpdateBanner) {
        if let Some(image) = update.image {
            self.image = image;
        }
        if let Some(title) = update.title_uz {
            self.title_uz = title;
        }
        if let Some(title) = update.title_ru {
            self.title_ru = title;
        }
        if let Some(title) = update.title_en {
            self.title_en = title;
        }
        if let Some(description) = update.description_uz {
            self.description_uz = description;
        }
        if let Some(description) = update.description_ru {
            self.description_ru = description;
        }
        if let Some(description) = update.description_en {
            self.description_en = description;
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBanner {
    #[validate(url)]
    pub image: String,
    #[validate(length(min = 1, max = 100))]
    pub title_uz: String,
    #[validate(length(min = 1, max = 100))]
    pub title_ru: String,
    #[validate(length(min = 1, max = 100))]
    pub title_en: String,
    #[serde(default)]
    pub description_uz: String,
    #[serde(default)]
    pub description_ru: String,
    #[serde(default)]
    pub description_en: String,
}

/// Partial update; absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBanner {
    #[validate(url)]
    pub image: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub title_uz: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub title_ru: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub title_en: Option<String>,
    pub description_uz: Option<String>,
    pub description_ru: Option<String>,
    pub description_en: Option<String>,
}
