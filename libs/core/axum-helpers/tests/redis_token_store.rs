//! Token lifecycle against a real Redis.

use axum_helpers::{CurrentUser, JwtAuth, JwtConfig, RedisTokenStore, TokenStore, TokenType};
use std::sync::Arc;
use test_utils::TestRedis;
use uuid::Uuid;

fn auth_for(redis: &TestRedis) -> JwtAuth {
    let config = JwtConfig::new("redis-store-integration-secret-0123456789").unwrap();
    JwtAuth::new(
        &config,
        Arc::new(RedisTokenStore::new(redis.connection_manager())),
    )
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_issued_tokens_are_whitelisted_until_revoked() {
    let redis = TestRedis::new().await;
    let auth = auth_for(&redis);
    let user = CurrentUser::new(Uuid::now_v7(), "client@example.com", "Client", "user");

    let pair = auth.issue_pair(&user).await.unwrap();
    let claims = auth
        .authenticate(&pair.access, TokenType::Access)
        .await
        .unwrap();

    auth.revoke(&claims).await.unwrap();

    assert!(
        auth.authenticate(&pair.access, TokenType::Access)
            .await
            .is_err()
    );
    // The refresh token is untouched by revoking the access token.
    auth.refresh(&pair.refresh).await.unwrap();
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_store_keys_expire() {
    let redis = TestRedis::new().await;
    let store = RedisTokenStore::new(redis.connection_manager());

    store.blacklist("short-lived", 1).await.unwrap();
    assert!(store.is_blacklisted("short-lived").await.unwrap());

    tokio::time::sleep(std::time::Duration::from_secs(2)).await;
    assert!(!store.is_blacklisted("short-lived").await.unwrap());
}
