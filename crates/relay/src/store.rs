//! Persistence contracts consumed by the router.
//!
//! Concrete SQLite implementations live in `relaygram-storage`; router tests
//! substitute in-memory fakes.

use async_trait::async_trait;

use relaygram_common::{MessageKey, UserId};

use crate::{error::StoreError, topic::Topic};

/// Per-user session state.
///
/// A session exists iff the user has registered at least once. Only the
/// `topic` field changes after creation; re-registration overwrites the row
/// in place with `topic: None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
    pub name: String,
    pub topic: Option<Topic>,
}

impl Session {
    /// Display-name placeholder when the platform supplies none.
    pub const UNKNOWN_NAME: &'static str = "Unknown";

    #[must_use]
    pub fn new(user_id: UserId, name: Option<&str>) -> Self {
        Self {
            user_id,
            name: name
                .filter(|n| !n.is_empty())
                .unwrap_or(Self::UNKNOWN_NAME)
                .to_string(),
            topic: None,
        }
    }
}

/// Session persistence.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert or overwrite the session keyed by its user id.
    async fn upsert(&self, session: Session) -> Result<(), StoreError>;
    async fn get(&self, user_id: UserId) -> Result<Option<Session>, StoreError>;
    /// Every registered user, for broadcast fan-out.
    async fn list_all(&self) -> Result<Vec<Session>, StoreError>;
}

/// Forwarded-message provenance persistence.
///
/// Keys are destination-side message ids, which the platform guarantees
/// unique per chat; entries are write-once/read-many and never removed.
#[async_trait]
pub trait RelayMapStore: Send + Sync {
    /// Record that `forwarded` (in the destination group) originated from
    /// `user_id`'s message `origin`. Re-putting an existing key is a no-op.
    async fn put(
        &self,
        forwarded: MessageKey,
        origin: MessageKey,
        user_id: UserId,
    ) -> Result<(), StoreError>;

    /// Resolve a destination-side message id back to its originating user.
    async fn get(&self, forwarded: MessageKey) -> Result<Option<UserId>, StoreError>;
}
