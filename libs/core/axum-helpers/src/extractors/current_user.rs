//! The authenticated caller, built from the claims `jwt_auth_middleware` stored.

use crate::auth::JwtClaims;
use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::request::Parts,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
}

impl CurrentUser {
    pub fn new(
        id: Uuid,
        email: impl Into<String>,
        name: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            name: name.into(),
            role: role.into(),
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.role == role
    }

    /// 403 unless the caller carries `role`.
    pub fn require_role(&self, role: &str) -> Result<(), AppError> {
        if self.has_role(role) {
            Ok(())
        } else {
            tracing::debug!(user_id = %self.id, required = role, "Role check failed");
            Err(AppError::Forbidden(format!("Only {} accounts can do this", role)))
        }
    }
}

impl TryFrom<&JwtClaims> for CurrentUser {
    type Error = AppError;

    fn try_from(claims: &JwtClaims) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))?;
        let role = claims
            .roles
            .first()
            .cloned()
            .unwrap_or_else(|| "user".to_string());

        Ok(Self {
            id,
            email: claims.email.clone(),
            name: claims.name.clone(),
            role,
        })
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<JwtClaims>()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;
        CurrentUser::try_from(claims)
    }
}

impl<S> OptionalFromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        parts
            .extensions
            .get::<JwtClaims>()
            .map(CurrentUser::try_from)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenType;

    fn claims(sub: &str, roles: Vec<String>) -> JwtClaims {
        JwtClaims {
            sub: sub.to_string(),
            email: "aziz@example.com".to_string(),
            name: "Aziz".to_string(),
            roles,
            token_type: TokenType::Access,
            exp: 0,
            iat: 0,
            jti: "jti".to_string(),
        }
    }

    #[test]
    fn test_from_claims_takes_first_role() {
        let id = Uuid::now_v7();
        let user = CurrentUser::try_from(&claims(&id.to_string(), vec!["specialist".into()]))
            .unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.role, "specialist");
        assert!(user.require_role("specialist").is_ok());
    }

    #[test]
    fn test_missing_role_defaults_to_user() {
        let user = CurrentUser::try_from(&claims(&Uuid::now_v7().to_string(), vec![])).unwrap();
        assert_eq!(user.role, "user");
        assert!(matches!(
            user.require_role("specialist"),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_bad_subject_is_unauthorized() {
        let result = CurrentUser::try_from(&claims("not-a-uuid", vec![]));
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
