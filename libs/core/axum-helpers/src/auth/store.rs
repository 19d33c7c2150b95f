//! Token whitelist/blacklist storage.
//!
//! A token is usable only while its `jti` is whitelisted and not blacklisted.

use async_trait::async_trait;
use redis::{AsyncCommands, RedisResult, aio::ConnectionManager};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn whitelist(&self, jti: &str, user_id: &str, ttl_seconds: u64) -> RedisResult<()>;

    async fn is_whitelisted(&self, jti: &str) -> RedisResult<bool>;

    async fn blacklist(&self, jti: &str, ttl_seconds: u64) -> RedisResult<()>;

    async fn is_blacklisted(&self, jti: &str) -> RedisResult<bool>;

    /// Drops the whitelist entry, used on logout.
    async fn revoke(&self, jti: &str) -> RedisResult<()>;
}

fn whitelist_key(jti: &str) -> String {
    format!("jwt:whitelist:{}", jti)
}

fn blacklist_key(jti: &str) -> String {
    format!("jwt:blacklist:{}", jti)
}

/// Redis-backed store. Entries expire with the token they describe.
#[derive(Clone)]
pub struct RedisTokenStore {
    client: ConnectionManager,
}

impl RedisTokenStore {
    pub fn new(manager: ConnectionManager) -> Self {
        tracing::info!("Redis token store initialized");
        Self { client: manager }
    }
}

#[async_trait]
impl TokenStore for RedisTokenStore {
    async fn whitelist(&self, jti: &str, user_id: &str, ttl_seconds: u64) -> RedisResult<()> {
        let mut client = self.client.clone();
        client
            .set_ex::<_, _, ()>(whitelist_key(jti), user_id, ttl_seconds)
            .await
    }

    async fn is_whitelisted(&self, jti: &str) -> RedisResult<bool> {
        let mut client = self.client.clone();
        client.exists(whitelist_key(jti)).await
    }

    async fn blacklist(&self, jti: &str, ttl_seconds: u64) -> RedisResult<()> {
        let mut client = self.client.clone();
        client
            .set_ex::<_, _, ()>(blacklist_key(jti), "1", ttl_seconds)
            .await
    }

    async fn is_blacklisted(&self, jti: &str) -> RedisResult<bool> {
        let mut client = self.client.clone();
        client.exists(blacklist_key(jti)).await
    }

    async fn revoke(&self, jti: &str) -> RedisResult<()> {
        let mut client = self.client.clone();
        client.del::<_, ()>(whitelist_key(jti)).await
    }
}

/// Process-local store for tests and single-node development.
#[derive(Default)]
pub struct InMemoryTokenStore {
    entries: Mutex<HashMap<String, Instant>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn put(&self, key: String, ttl_seconds: u64) {
        let expires = Instant::now() + Duration::from_secs(ttl_seconds);
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key, expires);
    }

    fn live(&self, key: &str) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(key) {
            Some(expires) if *expires > Instant::now() => true,
            Some(_) => {
                entries.remove(key);
                false
            }
            None => false,
        }
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn whitelist(&self, jti: &str, _user_id: &str, ttl_seconds: u64) -> RedisResult<()> {
        self.put(whitelist_key(jti), ttl_seconds);
        Ok(())
    }

    async fn is_whitelisted(&self, jti: &str) -> RedisResult<bool> {
        Ok(self.live(&whitelist_key(jti)))
    }

    async fn blacklist(&self, jti: &str, ttl_seconds: u64) -> RedisResult<()> {
        self.put(blacklist_key(jti), ttl_seconds);
        Ok(())
    }

    async fn is_blacklisted(&self, jti: &str) -> RedisResult<bool> {
        Ok(self.live(&blacklist_key(jti)))
    }

    async fn revoke(&self, jti: &str) -> RedisResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(&whitelist_key(jti));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_whitelist_and_revoke() {
        let store = InMemoryTokenStore::new();
        assert!(!store.is_whitelisted("a").await.unwrap());

        store.whitelist("a", "user-1", 60).await.unwrap();
        assert!(store.is_whitelisted("a").await.unwrap());

        store.revoke("a").await.unwrap();
        assert!(!store.is_whitelisted("a").await.unwrap());
    }

    #[tokio::test]
    async fn test_in_memory_blacklist_is_separate() {
        let store = InMemoryTokenStore::new();
        store.blacklist("b", 60).await.unwrap();
        assert!(store.is_blacklisted("b").await.unwrap());
        assert!(!store.is_whitelisted("b").await.unwrap());
    }

    #[tokio::test]
    async fn test_in_memory_entries_expire() {
        let store = InMemoryTokenStore::new();
        store.whitelist("c", "user-1", 0).await.unwrap();
        assert!(!store.is_whitelisted("c").await.unwrap());
    }

    #[test]
    fn test_key_layout() {
        assert_eq!(whitelist_key("x"), "jwt:whitelist:x");
        assert_eq!(blacklist_key("x"), "jwt:blacklist:x");
    }
}
