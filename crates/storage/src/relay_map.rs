//! SQLite relay-map store.
//!
//! Write-once provenance rows: forwarded-message id (in the staff group) →
//! originating user. INSERT OR IGNORE makes duplicate puts under one key
//! idempotent; rows are never updated or deleted.

use {async_trait::async_trait, sqlx::SqlitePool, tracing::debug};

use {
    relaygram_common::{MessageKey, UserId},
    relaygram_relay::{RelayMapStore, StoreError},
};

use crate::now_ms;

pub struct SqliteRelayMap {
    pool: SqlitePool,
}

impl SqliteRelayMap {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the relay_map table if it does not exist.
    pub async fn init(pool: &SqlitePool) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS relay_map (
                forwarded_id INTEGER PRIMARY KEY,
                user_id      INTEGER NOT NULL,
                origin_id    INTEGER NOT NULL,
                created_at   INTEGER NOT NULL
            )"#,
        )
        .execute(pool)
        .await?;
        debug!("relay_map table ready");
        Ok(())
    }
}

#[async_trait]
impl RelayMapStore for SqliteRelayMap {
    async fn put(
        &self,
        forwarded: MessageKey,
        origin: MessageKey,
        user_id: UserId,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT OR IGNORE INTO relay_map (forwarded_id, user_id, origin_id, created_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(i64::from(forwarded.0))
        .bind(user_id.0)
        .bind(i64::from(origin.0))
        .bind(now_ms())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::new("put relay mapping", e))?;
        Ok(())
    }

    async fn get(&self, forwarded: MessageKey) -> Result<Option<UserId>, StoreError> {
        let row = sqlx::query_scalar::<_, i64>(
            "SELECT user_id FROM relay_map WHERE forwarded_id = ?",
        )
        .bind(i64::from(forwarded.0))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::new("get relay mapping", e))?;
        Ok(row.map(UserId))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> SqliteRelayMap {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        SqliteRelayMap::init(&pool).await.unwrap();
        SqliteRelayMap::new(pool)
    }

    #[tokio::test]
    async fn put_and_get() {
        let store = test_store().await;
        store
            .put(MessageKey(1000), MessageKey(10), UserId(5))
            .await
            .unwrap();
        assert_eq!(store.get(MessageKey(1000)).await.unwrap(), Some(UserId(5)));
    }

    #[tokio::test]
    async fn get_missing() {
        let store = test_store().await;
        assert_eq!(store.get(MessageKey(999)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn duplicate_put_is_idempotent() {
        let store = test_store().await;
        store
            .put(MessageKey(1000), MessageKey(10), UserId(5))
            .await
            .unwrap();
        // A second put under the same key neither errors nor rebinds.
        store
            .put(MessageKey(1000), MessageKey(11), UserId(6))
            .await
            .unwrap();
        assert_eq!(store.get(MessageKey(1000)).await.unwrap(), Some(UserId(5)));
    }

    #[tokio::test]
    async fn distinct_keys_map_independently() {
        let store = test_store().await;
        store
            .put(MessageKey(1000), MessageKey(10), UserId(5))
            .await
            .unwrap();
        store
            .put(MessageKey(1001), MessageKey(12), UserId(6))
            .await
            .unwrap();
        assert_eq!(store.get(MessageKey(1000)).await.unwrap(), Some(UserId(5)));
        assert_eq!(store.get(MessageKey(1001)).await.unwrap(), Some(UserId(6)));
    }
}
