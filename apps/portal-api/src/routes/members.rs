//! Member listing.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::middleware::AuthContext;
use crate::error::{ApiError, ApiErrorBody};
use crate::models::member::Member;
use crate::permissions;
use crate::routes::{require_event, EventQuery};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/members", get(list_members))
}

// ---------------------------------------------------------------------------
// GET /api/v1/members?event_id=
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, ToSchema)]
pub struct ListMembersResponse {
    pub members: Vec<Member>,
}

/// `GET /api/v1/members`: Members of an event in registration order.
#[utoipa::path(
    get,
    path = "/api/v1/members",
    tag = "Members",
    security(("bearer" = [])),
    params(EventQuery),
    responses(
        (status = 200, description = "Event members", body = ListMembersResponse),
        (status = 401, description = "Unauthorized", body = ApiErrorBody),
        (status = 403, description = "No access to the event", body = ApiErrorBody),
        (status = 404, description = "Event not found", body = ApiErrorBody),
    ),
)]
pub async fn list_members(
    auth: AuthContext,
    State(state): State<AppState>,
    Query(query): Query<EventQuery>,
) -> Result<Json<ListMembersResponse>, ApiError> {
    permissions::check_event_staff(&auth, &query.event_id)?;
    require_event(&state, &query.event_id).await?;

    let members = state.store.list_members(&query.event_id).await?;

    Ok(Json(ListMembersResponse { members }))
}
