use crate::dispatch::DeliveryError;

/// Crate-wide result type for routing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed routing errors. None of these are fatal: each maps to either a
/// user-visible prompt or a log line at the front-end.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The user has never registered; the caller should prompt `/start`.
    #[error("no session for user {user_id}")]
    SessionNotFound { user_id: i64 },

    /// The administrator tried a user-only operation; informative no-op.
    #[error("operation does not apply to the administrator")]
    NotApplicableForAdmin,

    /// Broadcast was requested without replying to the message to broadcast.
    #[error("broadcast requires replying to the message to broadcast")]
    MissingReplyTarget,

    /// The dispatcher failed to forward a user message; no mapping was
    /// written. Not retried here.
    #[error("forward to destination failed")]
    ForwardFailed {
        #[source]
        source: DeliveryError,
    },

    /// A session or relay-map store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Error surfaced by the persistence collaborators.
#[derive(Debug, thiserror::Error)]
#[error("store operation failed: {context}: {source}")]
pub struct StoreError {
    context: String,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl StoreError {
    #[must_use]
    pub fn new(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            context: context.into(),
            source: Box::new(source),
        }
    }
}
