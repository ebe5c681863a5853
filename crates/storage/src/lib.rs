//! SQLite-backed implementations of the relay store contracts.
//!
//! One shared pool; each store owns its table and creates it via `init`.

pub mod relay_map;
pub mod sessions;

pub use {relay_map::SqliteRelayMap, sessions::SqliteSessionStore};

use std::{path::Path, time::{SystemTime, UNIX_EPOCH}};

use tracing::debug;

/// Open (creating if missing) the SQLite database at `path`.
pub async fn open_pool(path: &Path) -> Result<sqlx::SqlitePool, sqlx::Error> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).ok();
    }
    let url = format!("sqlite:{}?mode=rwc", path.display());
    debug!(path = %path.display(), "opening sqlite database");
    sqlx::SqlitePool::connect(&url).await
}

pub(crate) fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
