//! Portal sessions kept in the key-value store.
//!
//! Sessions are issued by the login service; this API looks them up by
//! token and never mints them outside of tests and local tooling.

use serde::{Deserialize, Serialize};

use crate::db::kv::KeyValueStore;
use crate::error::ApiError;

/// Default session lifetime in seconds (12 hours).
pub const SESSION_TTL_SECS: u64 = 12 * 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform staff; every event.
    Admin,
    /// Partner executive; the partner's events.
    Executive,
    /// Event staff invited by a partner.
    Collaborator,
    /// An attendee; read-only access to their own event.
    Member,
}

/// Data stored alongside a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub user_id: String,
    pub role: Role,
    /// Events the session may act on. Ignored for admins.
    #[serde(default)]
    pub event_ids: Vec<String>,
}

fn session_key(token: &str) -> String {
    format!("portal:session:{}", token)
}

pub async fn store_session(
    kv: &dyn KeyValueStore,
    token: &str,
    data: &SessionData,
    ttl_secs: u64,
) -> Result<(), ApiError> {
    let value = serde_json::to_string(data).map_err(|_| ApiError::internal("serialization"))?;
    kv.set_ex(&session_key(token), &value, ttl_secs).await
}

pub async fn lookup_session(
    kv: &dyn KeyValueStore,
    token: &str,
) -> Result<Option<SessionData>, ApiError> {
    match kv.get(&session_key(token)).await? {
        Some(v) => {
            let data: SessionData = serde_json::from_str(&v).map_err(|err| {
                tracing::error!(?err, "corrupt session data");
                ApiError::internal("corrupt session data")
            })?;
            Ok(Some(data))
        }
        None => Ok(None),
    }
}

pub async fn revoke_session(kv: &dyn KeyValueStore, token: &str) -> Result<(), ApiError> {
    kv.del(&session_key(token)).await
}
