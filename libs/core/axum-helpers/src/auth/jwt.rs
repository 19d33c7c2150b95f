use super::config::JwtConfig;
use super::store::TokenStore;
use crate::errors::AppError;
use crate::extractors::CurrentUser;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

pub const ACCESS_TOKEN_TTL: i64 = 900; // 15 minutes
pub const REFRESH_TOKEN_TTL: i64 = 604800; // 7 days

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    fn ttl(self) -> i64 {
        match self {
            TokenType::Access => ACCESS_TOKEN_TTL,
            TokenType::Refresh => REFRESH_TOKEN_TTL,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,        // user id
    pub email: String,
    pub name: String,
    pub roles: Vec<String>,
    pub token_type: TokenType,
    pub exp: i64,
    pub iat: i64,
    pub jti: String, // whitelist/blacklist key
}

impl JwtClaims {
    /// Seconds until expiry, never below one so a revoked entry always lands in the store.
    pub fn remaining_ttl(&self) -> u64 {
        (self.exp - Utc::now().timestamp()).max(1) as u64
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Expected a {expected:?} token")]
    WrongTokenType { expected: TokenType },

    #[error("Token has been revoked")]
    Revoked,

    #[error("Token not found")]
    NotWhitelisted,

    #[error("Token store error: {0}")]
    Store(#[from] redis::RedisError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Store(e) => {
                tracing::error!("Token store unavailable: {}", e);
                AppError::ServiceUnavailable("Service temporarily unavailable".to_string())
            }
            other => AppError::Unauthorized(other.to_string()),
        }
    }
}

/// Stateless HS256 tokens backed by a whitelist/blacklist [`TokenStore`].
#[derive(Clone)]
pub struct JwtAuth {
    secret: String,
    store: Arc<dyn TokenStore>,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig, store: Arc<dyn TokenStore>) -> Self {
        tracing::info!("JWT auth initialized");
        Self {
            secret: config.secret.clone(),
            store,
        }
    }

    /// Issues and whitelists an access/refresh pair for a verified user.
    pub async fn issue_pair(&self, user: &CurrentUser) -> Result<TokenPair, AuthError> {
        let roles = vec![user.role.clone()];
        let sub = user.id.to_string();

        let access = self
            .sign(&sub, &user.email, &user.name, &roles, TokenType::Access)
            .await?;
        let refresh = self
            .sign(&sub, &user.email, &user.name, &roles, TokenType::Refresh)
            .await?;

        Ok(TokenPair { access, refresh })
    }

    /// Trades a live refresh token for a new access token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        let claims = self.authenticate(refresh_token, TokenType::Refresh).await?;
        self.sign(
            &claims.sub,
            &claims.email,
            &claims.name,
            &claims.roles,
            TokenType::Access,
        )
        .await
    }

    /// Signature and expiry check only.
    pub fn verify(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let data = decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;
        Ok(data.claims)
    }

    /// Full check: signature, expiry, token type, blacklist and whitelist.
    pub async fn authenticate(
        &self,
        token: &str,
        expected: TokenType,
    ) -> Result<JwtClaims, AuthError> {
        let claims = self.verify(token)?;

        if claims.token_type != expected {
            return Err(AuthError::WrongTokenType { expected });
        }
        if self.store.is_blacklisted(&claims.jti).await? {
            return Err(AuthError::Revoked);
        }
        if !self.store.is_whitelisted(&claims.jti).await? {
            return Err(AuthError::NotWhitelisted);
        }

        Ok(claims)
    }

    /// Blacklists the token for the rest of its lifetime and drops its whitelist entry.
    pub async fn revoke(&self, claims: &JwtClaims) -> Result<(), AuthError> {
        self.store
            .blacklist(&claims.jti, claims.remaining_ttl())
            .await?;
        self.store.revoke(&claims.jti).await?;
        tracing::debug!(jti = %claims.jti, "Token revoked");
        Ok(())
    }

    async fn sign(
        &self,
        sub: &str,
        email: &str,
        name: &str,
        roles: &[String],
        token_type: TokenType,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let ttl = token_type.ttl();
        let claims = JwtClaims {
            sub: sub.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            roles: roles.to_vec(),
            token_type,
            exp: (now + Duration::seconds(ttl)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        self.store.whitelist(&claims.jti, sub, ttl as u64).await?;
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::InMemoryTokenStore;

    fn auth() -> JwtAuth {
        let config = JwtConfig::new("test-secret-that-is-long-enough-for-hs256").unwrap();
        JwtAuth::new(&config, Arc::new(InMemoryTokenStore::new()))
    }

    fn user() -> CurrentUser {
        CurrentUser::new(Uuid::now_v7(), "dilnoza@example.com", "Dilnoza", "user")
    }

    #[tokio::test]
    async fn test_issue_pair_produces_whitelisted_tokens() {
        let auth = auth();
        let user = user();
        let pair = auth.issue_pair(&user).await.unwrap();

        let access = auth.authenticate(&pair.access, TokenType::Access).await.unwrap();
        assert_eq!(access.sub, user.id.to_string());
        assert_eq!(access.roles, vec!["user".to_string()]);
        assert_eq!(access.exp - access.iat, ACCESS_TOKEN_TTL);

        let refresh = auth.authenticate(&pair.refresh, TokenType::Refresh).await.unwrap();
        assert_eq!(refresh.exp - refresh.iat, REFRESH_TOKEN_TTL);
    }

    #[tokio::test]
    async fn test_refresh_token_is_not_an_access_token() {
        let auth = auth();
        let pair = auth.issue_pair(&user()).await.unwrap();
        let result = auth.authenticate(&pair.refresh, TokenType::Access).await;
        assert!(matches!(result, Err(AuthError::WrongTokenType { .. })));
    }

    #[tokio::test]
    async fn test_refresh_issues_new_access_token() {
        let auth = auth();
        let pair = auth.issue_pair(&user()).await.unwrap();
        let access = auth.refresh(&pair.refresh).await.unwrap();
        assert!(auth.authenticate(&access, TokenType::Access).await.is_ok());
        assert!(auth.refresh(&pair.access).await.is_err());
    }

    #[tokio::test]
    async fn test_revoked_token_is_rejected() {
        let auth = auth();
        let pair = auth.issue_pair(&user()).await.unwrap();
        let claims = auth.verify(&pair.refresh).unwrap();

        auth.revoke(&claims).await.unwrap();

        let result = auth.authenticate(&pair.refresh, TokenType::Refresh).await;
        assert!(matches!(result, Err(AuthError::Revoked)));
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_fails() {
        let other = JwtAuth::new(
            &JwtConfig::new("another-secret-that-is-long-enough-too").unwrap(),
            Arc::new(InMemoryTokenStore::new()),
        );
        let pair = other.issue_pair(&user()).await.unwrap();
        assert!(matches!(
            auth().verify(&pair.access),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_store_errors_become_service_unavailable() {
        let err = AuthError::Store(redis::RedisError::from(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        )));
        assert!(matches!(AppError::from(err), AppError::ServiceUnavailable(_)));
        assert!(matches!(
            AppError::from(AuthError::Revoked),
            AppError::Unauthorized(_)
        ));
    }
}
