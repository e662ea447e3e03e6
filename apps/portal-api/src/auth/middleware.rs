//! Session extraction for route handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::auth::sessions::{self, Role};
use crate::error::ApiError;
use crate::AppState;

/// Caller identity and scope, resolved from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: String,
    pub role: Role,
    pub event_ids: Vec<String>,
}

impl AuthContext {
    pub fn is_member(&self) -> bool {
        self.role == Role::Member
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let value = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;
    value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::unauthorized("Invalid Authorization header format"))
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let session = sessions::lookup_session(state.kv.as_ref(), token)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Invalid or expired session"))?;

        Ok(AuthContext {
            user_id: session.user_id,
            role: session.role,
            event_ids: session.event_ids,
        })
    }
}
