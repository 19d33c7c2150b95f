use chrono::{DateTime, Utc};
use domain_catalog::ProductSummary;
use regex::Regex;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use strum::Display;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Optional leading `+`, optional `1`, then 9 to 15 digits.
pub static PHONE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?1?\d{9,15}$").unwrap_or_else(|e| unreachable!("phone regex: {e}"))
});

const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
pub enum UserRole {
    #[default]
    #[sea_orm(string_value = "user")]
    User,
    #[sea_orm(string_value = "specialist")]
    Specialist,
}

/// A stored account. Never serialized directly; see [`UserResponse`].
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub surname: String,
    pub phone_number: String,
    pub avatar: Option<String>,
    pub role: UserRole,
    pub password_hash: String,
    pub otp_code: Option<String>,
    pub otp_created_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// True when `code` matches the stored OTP and was issued less than `ttl` ago.
    pub fn otp_matches(&self, code: &str, ttl: chrono::Duration, now: DateTime<Utc>) -> bool {
        match (&self.otp_code, self.otp_created_at) {
            (Some(stored), Some(issued)) => stored == code && now - issued <= ttl,
            _ => false,
        }
    }
}

/// Public view of an account. Specialists do not expose phone or avatar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub surname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let (phone_number, avatar) = match user.role {
            UserRole::Specialist => (None, None),
            UserRole::User => (Some(user.phone_number), user.avatar),
        };
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            surname: user.surname,
            phone_number,
            avatar,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// The caller's own account with favorites.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub surname: String,
    pub phone_number: String,
    pub avatar: Option<String>,
    pub role: UserRole,
    pub favorites: Vec<ProductSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileResponse {
    pub fn new(user: User, favorites: Vec<ProductSummary>) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            surname: user.surname,
            phone_number: user.phone_number,
            avatar: user.avatar,
            role: user.role,
            favorites,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub surname: String,
    #[validate(regex(path = *PHONE_NUMBER, message = "Phone number must be 9 to 15 digits"))]
    pub phone_number: String,
    pub password: String,
    #[validate(url)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub role: UserRole,
}

/// Fields the service needs to insert an account.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub surname: String,
    pub phone_number: String,
    pub avatar: Option<String>,
    pub role: UserRole,
    pub password_hash: String,
    pub otp_code: String,
    pub otp_created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SigninRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct VerifyOtpRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(equal = 6))]
    pub otp_code: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RefreshRequest {
    #[validate(length(min = 1))]
    pub refresh: String,
}

/// Partial profile update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfile {
    #[validate(email, length(max = 255))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub surname: Option<String>,
    #[validate(regex(path = *PHONE_NUMBER, message = "Phone number must be 9 to 15 digits"))]
    pub phone_number: Option<String>,
    #[validate(url)]
    pub avatar: Option<String>,
    pub password: Option<String>,
}

/// Column changes after hashing and normalisation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    pub email: Option<String>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub phone_number: Option<String>,
    pub avatar: Option<String>,
    pub password_hash: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ToggleFavoriteRequest {
    pub product_id: Uuid,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignupResponse {
    pub user: UserResponse,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccessResponse {
    pub access: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ToggleFavoriteResponse {
    pub message: String,
    pub added: bool,
}

/// Length, case, digit and special-character rules for new passwords.
pub fn check_password_strength(password: &str) -> Result<(), String> {
    let length = password.chars().count();
    if length < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }
    if length > 128 {
        return Err("Password cannot exceed 128 characters".to_string());
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        return Err("Password must contain at least one uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        return Err("Password must contain at least one lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain at least one digit".to_string());
    }
    if !password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c)) {
        return Err(format!(
            "Password must contain at least one special character ({})",
            PASSWORD_SPECIAL_CHARS
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user(role: UserRole) -> User {
        User {
            id: Uuid::now_v7(),
            email: "dilnoza@example.com".to_string(),
            name: "Dilnoza".to_string(),
            surname: "Karimova".to_string(),
            phone_number: "+998901234567".to_string(),
            avatar: Some("https://cdn.example.com/a.png".to_string()),
            role,
            password_hash: "hash".to_string(),
            otp_code: Some("123456".to_string()),
            otp_created_at: Some(Utc::now()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_specialist_response_hides_contact_details() {
        let response = UserResponse::from(user(UserRole::Specialist));
        assert_eq!(response.phone_number, None);
        assert_eq!(response.avatar, None);

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("phone_number").is_none());
        assert_eq!(json["role"], "specialist");
    }

    #[test]
    fn test_user_response_keeps_contact_details() {
        let response = UserResponse::from(user(UserRole::User));
        assert_eq!(response.phone_number.as_deref(), Some("+998901234567"));
        assert!(response.avatar.is_some());
    }

    #[test]
    fn test_otp_expires_after_ttl() {
        let mut account = user(UserRole::User);
        let issued = Utc::now();
        account.otp_created_at = Some(issued);
        let ttl = Duration::seconds(300);

        assert!(account.otp_matches("123456", ttl, issued + Duration::seconds(299)));
        assert!(!account.otp_matches("123456", ttl, issued + Duration::seconds(301)));
        assert!(!account.otp_matches("654321", ttl, issued));

        account.otp_code = None;
        assert!(!account.otp_matches("123456", ttl, issued));
    }

    #[test]
    fn test_phone_number_pattern() {
        assert!(PHONE_NUMBER.is_match("+998901234567"));
        assert!(PHONE_NUMBER.is_match("901234567"));
        assert!(!PHONE_NUMBER.is_match("12345"));
        assert!(!PHONE_NUMBER.is_match("+99890-123-45-67"));
    }

    #[test]
    fn test_password_strength_rules() {
        assert!(check_password_strength("Secret#123").is_ok());
        assert!(check_password_strength("Sh#1").is_err());
        assert!(check_password_strength("secret#123").is_err());
        assert!(check_password_strength("SECRET#123").is_err());
        assert!(check_password_strength("Secret#abc").is_err());
        assert!(check_password_strength("Secret1234").is_err());
    }

    #[test]
    fn test_signup_role_defaults_to_user() {
        let request: SignupRequest = serde_json::from_value(serde_json::json!({
            "email": "a@example.com",
            "name": "A",
            "surname": "B",
            "phone_number": "+998901234567",
            "password": "Secret#123",
        }))
        .unwrap();
        assert_eq!(request.role, UserRole::User);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_signup_rejects_bad_phone() {
        let request: SignupRequest = serde_json::from_value(serde_json::json!({
            "email": "a@example.com",
            "name": "A",
            "surname": "B",
            "phone_number": "call me",
            "password": "Secret#123",
        }))
        .unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("phone_number"));
    }
}
