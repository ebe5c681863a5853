//! SQLite session store.

use {async_trait::async_trait, sqlx::SqlitePool, tracing::debug};

use {
    relaygram_common::UserId,
    relaygram_relay::{Session, SessionStore, StoreError, Topic},
};

use crate::now_ms;

/// Sessions keyed by user id. Rows are upserted on registration and topic
/// selection and never deleted.
pub struct SqliteSessionStore {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    user_id: i64,
    name: String,
    topic: Option<String>,
}

impl From<SessionRow> for Session {
    fn from(r: SessionRow) -> Self {
        Self {
            user_id: UserId(r.user_id),
            name: r.name,
            // Unknown topic strings (from a schema change) read as "none".
            topic: r.topic.as_deref().and_then(Topic::parse),
        }
    }
}

impl SqliteSessionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the sessions table if it does not exist.
    pub async fn init(pool: &SqlitePool) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS sessions (
                user_id    INTEGER PRIMARY KEY,
                name       TEXT NOT NULL,
                topic      TEXT,
                updated_at INTEGER NOT NULL
            )"#,
        )
        .execute(pool)
        .await?;
        debug!("sessions table ready");
        Ok(())
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn upsert(&self, session: Session) -> Result<(), StoreError> {
        sqlx::query(
            r#"INSERT INTO sessions (user_id, name, topic, updated_at)
               VALUES (?, ?, ?, ?)
               ON CONFLICT(user_id) DO UPDATE SET
                 name = excluded.name,
                 topic = excluded.topic,
                 updated_at = excluded.updated_at"#,
        )
        .bind(session.user_id.0)
        .bind(&session.name)
        .bind(session.topic.map(Topic::as_str))
        .bind(now_ms())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::new("upsert session", e))?;
        Ok(())
    }

    async fn get(&self, user_id: UserId) -> Result<Option<Session>, StoreError> {
        let row = sqlx::query_as::<_, SessionRow>(
            "SELECT user_id, name, topic FROM sessions WHERE user_id = ?",
        )
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::new("get session", e))?;
        Ok(row.map(Into::into))
    }

    async fn list_all(&self) -> Result<Vec<Session>, StoreError> {
        let rows = sqlx::query_as::<_, SessionRow>(
            "SELECT user_id, name, topic FROM sessions ORDER BY user_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::new("list sessions", e))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> SqliteSessionStore {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        SqliteSessionStore::init(&pool).await.unwrap();
        SqliteSessionStore::new(pool)
    }

    #[tokio::test]
    async fn upsert_and_get() {
        let store = test_store().await;
        store
            .upsert(Session::new(UserId(5), Some("Alice")))
            .await
            .unwrap();

        let session = store.get(UserId(5)).await.unwrap().unwrap();
        assert_eq!(session.name, "Alice");
        assert_eq!(session.topic, None);
    }

    #[tokio::test]
    async fn get_missing() {
        let store = test_store().await;
        assert!(store.get(UserId(5)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn upsert_overwrites_in_place() {
        let store = test_store().await;
        let mut session = Session::new(UserId(5), Some("Alice"));
        session.topic = Some(Topic::Sponsorship);
        store.upsert(session).await.unwrap();

        // Re-registration writes topic None over the same key.
        store
            .upsert(Session::new(UserId(5), Some("Alice")))
            .await
            .unwrap();

        let rows = store.list_all().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].topic, None);
    }

    #[tokio::test]
    async fn topic_roundtrips_through_storage() {
        let store = test_store().await;
        for (i, topic) in Topic::ALL.into_iter().enumerate() {
            let mut session = Session::new(UserId(i as i64 + 1), Some("u"));
            session.topic = Some(topic);
            store.upsert(session.clone()).await.unwrap();
            let back = store.get(session.user_id).await.unwrap().unwrap();
            assert_eq!(back.topic, Some(topic));
        }
    }

    #[tokio::test]
    async fn list_all_ordered_by_user_id() {
        let store = test_store().await;
        for id in [7, 5, 6] {
            store
                .upsert(Session::new(UserId(id), Some("u")))
                .await
                .unwrap();
        }
        let ids: Vec<i64> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.user_id.0)
            .collect();
        assert_eq!(ids, vec![5, 6, 7]);
    }
}
