//! Single room assignment reads and writes.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::middleware::AuthContext;
use crate::error::{ApiError, ApiErrorBody, FieldError};
use crate::models::room_assignment::{
    room_number_fits, RoomAssignment, RoomType, UpsertRoomAssignment, MAX_ROOM_NUMBER_LEN,
};
use crate::permissions;
use crate::routes::{require_event, EventQuery};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/room-assignments",
        get(list_room_assignments).post(upsert_room_assignment),
    )
}

// ---------------------------------------------------------------------------
// GET /api/v1/room-assignments?event_id=
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, ToSchema)]
pub struct ListRoomAssignmentsResponse {
    pub assignments: Vec<RoomAssignment>,
}

/// `GET /api/v1/room-assignments`: Raw assignment rows for an event.
#[utoipa::path(
    get,
    path = "/api/v1/room-assignments",
    tag = "Room Assignments",
    security(("bearer" = [])),
    params(EventQuery),
    responses(
        (status = 200, description = "Assignments", body = ListRoomAssignmentsResponse),
        (status = 401, description = "Unauthorized", body = ApiErrorBody),
        (status = 403, description = "No access to the event", body = ApiErrorBody),
        (status = 404, description = "Event not found", body = ApiErrorBody),
    ),
)]
pub async fn list_room_assignments(
    auth: AuthContext,
    State(state): State<AppState>,
    Query(query): Query<EventQuery>,
) -> Result<Json<ListRoomAssignmentsResponse>, ApiError> {
    permissions::check_event_staff(&auth, &query.event_id)?;
    require_event(&state, &query.event_id).await?;

    let assignments = state.store.list_room_assignments(&query.event_id).await?;

    Ok(Json(ListRoomAssignmentsResponse { assignments }))
}

// ---------------------------------------------------------------------------
// POST /api/v1/room-assignments
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpsertRoomAssignmentRequest {
    pub event_id: String,
    pub member_id: String,
    /// Empty or absent leaves the member unassigned.
    pub room_number: Option<String>,
    pub room_type: RoomType,
    pub check_in_date: Option<NaiveDate>,
    pub check_out_date: Option<NaiveDate>,
    pub special_requests: Option<String>,
}

impl UpsertRoomAssignmentRequest {
    fn validate(self) -> Result<UpsertRoomAssignment, ApiError> {
        let mut errors = Vec::new();

        let room_number = self
            .room_number
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        if room_number
            .as_ref()
            .is_some_and(|r| !room_number_fits(r))
        {
            errors.push(FieldError::new(
                "room_number",
                format!("Room number must be {MAX_ROOM_NUMBER_LEN} characters or fewer"),
            ));
        }

        if let (Some(check_in), Some(check_out)) = (self.check_in_date, self.check_out_date) {
            if check_out < check_in {
                errors.push(FieldError::new(
                    "check_out_date",
                    "Check-out date cannot be before check-in date",
                ));
            }
        }

        if !errors.is_empty() {
            return Err(ApiError::validation(errors));
        }

        Ok(UpsertRoomAssignment {
            event_id: self.event_id,
            member_id: self.member_id,
            room_number,
            room_type: self.room_type,
            check_in_date: self.check_in_date,
            check_out_date: self.check_out_date,
            special_requests: self.special_requests.filter(|s| !s.trim().is_empty()),
        })
    }
}

/// `POST /api/v1/room-assignments`: Create or replace a member's assignment.
#[utoipa::path(
    post,
    path = "/api/v1/room-assignments",
    tag = "Room Assignments",
    security(("bearer" = [])),
    request_body = UpsertRoomAssignmentRequest,
    responses(
        (status = 200, description = "Stored assignment", body = RoomAssignment),
        (status = 400, description = "Validation error", body = ApiErrorBody),
        (status = 401, description = "Unauthorized", body = ApiErrorBody),
        (status = 403, description = "No access to the event", body = ApiErrorBody),
        (status = 404, description = "Member not in event", body = ApiErrorBody),
    ),
)]
pub async fn upsert_room_assignment(
    auth: AuthContext,
    State(state): State<AppState>,
    Json(body): Json<UpsertRoomAssignmentRequest>,
) -> Result<Json<RoomAssignment>, ApiError> {
    permissions::check_event_staff(&auth, &body.event_id)?;
    let upsert = body.validate()?;

    let assignment = state.store.upsert_room_assignment(&upsert).await?;

    tracing::info!(
        event_id = %assignment.event_id,
        member_id = %assignment.member_id,
        room_number = ?assignment.room_number,
        user_id = %auth.user_id,
        "room assignment saved"
    );

    Ok(Json(assignment))
}
