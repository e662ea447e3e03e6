//! Member arrival tracking.

use axum::extract::{Path, State};
use axum::routing::put;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::middleware::AuthContext;
use crate::error::{ApiError, ApiErrorBody};
use crate::permissions;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/events/{event_id}/check-ins/{member_id}", put(set_check_in))
}

// ---------------------------------------------------------------------------
// PUT /api/v1/events/{event_id}/check-ins/{member_id}
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CheckInPath {
    pub event_id: String,
    pub member_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetCheckInRequest {
    pub checked_in: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckInResponse {
    pub member_id: String,
    pub checked_in: bool,
    pub checked_in_at: Option<DateTime<Utc>>,
}

/// `PUT /api/v1/events/{event_id}/check-ins/{member_id}`: Mark a member as
/// arrived, or undo it.
#[utoipa::path(
    put,
    path = "/api/v1/events/{event_id}/check-ins/{member_id}",
    tag = "Check-ins",
    security(("bearer" = [])),
    params(
        ("event_id" = String, Path, description = "Event ID"),
        ("member_id" = String, Path, description = "Member ID"),
    ),
    request_body = SetCheckInRequest,
    responses(
        (status = 200, description = "Current check-in state", body = CheckInResponse),
        (status = 401, description = "Unauthorized", body = ApiErrorBody),
        (status = 403, description = "No access to the event", body = ApiErrorBody),
        (status = 404, description = "Member not in event", body = ApiErrorBody),
    ),
)]
pub async fn set_check_in(
    auth: AuthContext,
    State(state): State<AppState>,
    Path(path): Path<CheckInPath>,
    Json(body): Json<SetCheckInRequest>,
) -> Result<Json<CheckInResponse>, ApiError> {
    permissions::check_event_staff(&auth, &path.event_id)?;

    let checked_in_at = if body.checked_in {
        let check_in = state
            .store
            .check_in(&path.event_id, &path.member_id, Utc::now())
            .await?;
        Some(check_in.checked_in_at)
    } else {
        let members = state.store.list_members(&path.event_id).await?;
        if !members.iter().any(|m| m.id == path.member_id) {
            return Err(ApiError::not_found("Member not found"));
        }
        state
            .store
            .clear_check_in(&path.event_id, &path.member_id)
            .await?;
        None
    };

    tracing::info!(
        event_id = %path.event_id,
        member_id = %path.member_id,
        checked_in = body.checked_in,
        user_id = %auth.user_id,
        "check-in updated"
    );

    Ok(Json(CheckInResponse {
        member_id: path.member_id,
        checked_in: body.checked_in,
        checked_in_at,
    }))
}
