//! Stay management: the occupancy view, its CSV export and bulk import.

use std::collections::HashMap;

use axum::body::{to_bytes, Body};
use axum::extract::{DefaultBodyLimit, Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use http_body_util::LengthLimitError;
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::middleware::AuthContext;
use crate::error::{ApiError, ApiErrorBody};
use crate::models::check_in::CheckIn;
use crate::models::event::Event;
use crate::models::hotel::Hotel;
use crate::models::member::Member;
use crate::models::room_assignment::RoomAssignment;
use crate::permissions;
use crate::stay::export;
use crate::stay::filter::{apply_filters, sharing_options, StayFilterParams, StayFilters};
use crate::stay::import::{apply_csv_upload, summarize_errors};
use crate::stay::occupancy::{derive_occupancy, MemberOccupancyView};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events/{event_id}/stay", get(get_stay))
        .route("/events/{event_id}/stay/export", get(export_stay))
        .route(
            "/events/{event_id}/stay/import",
            // The handler enforces MAX_UPLOAD_BYTES itself.
            post(import_stay).layer(DefaultBodyLimit::disable()),
        )
}

/// Everything the stay screens are built from, fetched in one go.
struct StaySnapshot {
    event: Event,
    members: Vec<Member>,
    assignments: Vec<RoomAssignment>,
    hotel: Option<Hotel>,
    check_ins: Vec<CheckIn>,
}

async fn load_snapshot(state: &AppState, event_id: &str) -> Result<StaySnapshot, ApiError> {
    let store = state.store.as_ref();
    let (event, members, assignments, hotel, check_ins) = tokio::try_join!(
        store.get_event(event_id),
        store.list_members(event_id),
        store.list_room_assignments(event_id),
        store.get_hotel(event_id),
        store.list_check_ins(event_id),
    )?;

    let event = event.ok_or_else(|| ApiError::not_found("Event not found"))?;

    Ok(StaySnapshot {
        event,
        members,
        assignments,
        hotel,
        check_ins,
    })
}

impl StaySnapshot {
    fn views(&self) -> Vec<MemberOccupancyView> {
        derive_occupancy(&self.members, &self.assignments, self.event.stay_window())
    }

    fn check_in_times(&self) -> HashMap<String, DateTime<Utc>> {
        self.check_ins
            .iter()
            .map(|c| (c.member_id.clone(), c.checked_in_at))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// GET /api/v1/events/{event_id}/stay
// ---------------------------------------------------------------------------

/// One row of the stay screen.
#[derive(Debug, Serialize, ToSchema)]
pub struct StayMember {
    #[serde(flatten)]
    pub view: MemberOccupancyView,
    pub checked_in: bool,
    pub checked_in_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StayResponse {
    pub event_id: String,
    pub hotel: Option<Hotel>,
    pub members: Vec<StayMember>,
    /// Distinct sharing counts across all members, before filtering.
    pub sharing_options: Vec<u32>,
    pub total: usize,
    pub filtered: usize,
}

/// `GET /api/v1/events/{event_id}/stay`: Occupancy view with filters applied.
#[utoipa::path(
    get,
    path = "/api/v1/events/{event_id}/stay",
    tag = "Stay",
    security(("bearer" = [])),
    params(
        ("event_id" = String, Path, description = "Event ID"),
        StayFilterParams,
    ),
    responses(
        (status = 200, description = "Occupancy view", body = StayResponse),
        (status = 400, description = "Invalid filter", body = ApiErrorBody),
        (status = 401, description = "Unauthorized", body = ApiErrorBody),
        (status = 403, description = "No access to the event", body = ApiErrorBody),
        (status = 404, description = "Event not found", body = ApiErrorBody),
    ),
)]
pub async fn get_stay(
    auth: AuthContext,
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Query(params): Query<StayFilterParams>,
) -> Result<Json<StayResponse>, ApiError> {
    permissions::check_event_staff(&auth, &event_id)?;
    let filters = StayFilters::try_from(params)?;

    let snapshot = load_snapshot(&state, &event_id).await?;
    let views = snapshot.views();
    let total = views.len();
    let sharing_options = sharing_options(&views);
    let check_ins = snapshot.check_in_times();

    let members: Vec<StayMember> = apply_filters(views, &filters)
        .into_iter()
        .map(|view| {
            let checked_in_at = check_ins.get(&view.member.id).copied();
            StayMember {
                view,
                checked_in: checked_in_at.is_some(),
                checked_in_at,
            }
        })
        .collect();

    Ok(Json(StayResponse {
        event_id,
        hotel: snapshot.hotel,
        filtered: members.len(),
        members,
        sharing_options,
        total,
    }))
}

// ---------------------------------------------------------------------------
// GET /api/v1/events/{event_id}/stay/export
// ---------------------------------------------------------------------------

/// `GET /api/v1/events/{event_id}/stay/export`: Filtered stay sheet as CSV.
#[utoipa::path(
    get,
    path = "/api/v1/events/{event_id}/stay/export",
    tag = "Stay",
    security(("bearer" = [])),
    params(
        ("event_id" = String, Path, description = "Event ID"),
        StayFilterParams,
    ),
    responses(
        (status = 200, description = "CSV attachment", content_type = "text/csv", body = String),
        (status = 400, description = "Invalid filter", body = ApiErrorBody),
        (status = 401, description = "Unauthorized", body = ApiErrorBody),
        (status = 403, description = "No access to the event", body = ApiErrorBody),
        (status = 404, description = "Event not found", body = ApiErrorBody),
    ),
)]
pub async fn export_stay(
    auth: AuthContext,
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Query(params): Query<StayFilterParams>,
) -> Result<impl IntoResponse, ApiError> {
    permissions::check_event_staff(&auth, &event_id)?;
    let filters = StayFilters::try_from(params)?;

    let snapshot = load_snapshot(&state, &event_id).await?;
    let views = apply_filters(snapshot.views(), &filters);
    let sheet = export::export_csv(&views, &snapshot.check_in_times());

    tracing::info!(%event_id, rows = views.len(), "stay sheet exported");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export::file_name(&event_id)),
            ),
        ],
        sheet,
    ))
}

// ---------------------------------------------------------------------------
// POST /api/v1/events/{event_id}/stay/import
// ---------------------------------------------------------------------------

/// Collect the upload as text, allowing at most `limit` bytes.
async fn read_upload(body: Body, limit: usize) -> Result<String, ApiError> {
    let bytes = to_bytes(body, limit).await.map_err(|err| {
        let over_limit = std::error::Error::source(&err)
            .is_some_and(|source| source.is::<LengthLimitError>());
        if over_limit {
            ApiError::payload_too_large(format!("CSV upload exceeds {limit} bytes"))
        } else {
            tracing::warn!(%err, "failed to read CSV upload");
            ApiError::bad_request("Could not read the CSV upload")
        }
    })?;
    String::from_utf8(bytes.to_vec())
        .map_err(|_| ApiError::bad_request("CSV upload must be UTF-8 text"))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImportResponse {
    pub updated_count: usize,
    pub checked_in_count: usize,
    /// `Row <n>: ...` messages in row order.
    pub errors: Vec<String>,
    /// The first few errors plus a `+N more` tail, when there are errors.
    pub summary: Option<String>,
}

/// `POST /api/v1/events/{event_id}/stay/import`: Apply an uploaded stay sheet.
///
/// The body is the raw CSV text. Rows are applied independently; problems
/// with individual rows are reported in `errors` and do not fail the request.
#[utoipa::path(
    post,
    path = "/api/v1/events/{event_id}/stay/import",
    tag = "Stay",
    security(("bearer" = [])),
    params(("event_id" = String, Path, description = "Event ID")),
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "Import result", body = ImportResponse),
        (status = 400, description = "Unreadable sheet", body = ApiErrorBody),
        (status = 401, description = "Unauthorized", body = ApiErrorBody),
        (status = 403, description = "No access to the event", body = ApiErrorBody),
        (status = 404, description = "Event not found", body = ApiErrorBody),
        (status = 413, description = "Upload too large", body = ApiErrorBody),
    ),
)]
pub async fn import_stay(
    auth: AuthContext,
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    body: Body,
) -> Result<Json<ImportResponse>, ApiError> {
    permissions::check_event_staff(&auth, &event_id)?;

    let text = read_upload(body, state.config.max_upload_bytes).await?;

    let store = state.store.as_ref();
    let (event, members, assignments) = tokio::try_join!(
        store.get_event(&event_id),
        store.list_members(&event_id),
        store.list_room_assignments(&event_id),
    )?;
    event.ok_or_else(|| ApiError::not_found("Event not found"))?;

    let outcome = apply_csv_upload(store, &event_id, &text, &members, &assignments).await?;
    let summary = summarize_errors(&outcome.errors, state.config.import_error_preview);

    tracing::info!(
        %event_id,
        user_id = %auth.user_id,
        updated_count = outcome.updated_count,
        error_count = outcome.errors.len(),
        "stay import finished"
    );

    Ok(Json(ImportResponse {
        updated_count: outcome.updated_count,
        checked_in_count: outcome.checked_in_count,
        errors: outcome.errors,
        summary,
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use futures_util::stream;

    use super::*;

    #[tokio::test]
    async fn upload_within_limit_is_read() {
        let text = read_upload(Body::from("Employee ID\nEMP001\n"), 64).await.unwrap();
        assert_eq!(text, "Employee ID\nEMP001\n");
    }

    #[tokio::test]
    async fn upload_over_limit_is_too_large() {
        let err = read_upload(Body::from("x".repeat(65)), 64).await.unwrap_err();
        assert_eq!(err.status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn broken_upload_stream_is_a_bad_request() {
        let chunks: Vec<Result<&'static str, std::io::Error>> = vec![
            Ok("Employee ID\n"),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
        ];
        let err = read_upload(Body::from_stream(stream::iter(chunks)), 1024)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Could not read the CSV upload");
    }

    #[tokio::test]
    async fn non_utf8_upload_is_a_bad_request() {
        let err = read_upload(Body::from(vec![0xff, 0xfe]), 64).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "CSV upload must be UTF-8 text");
    }
}
