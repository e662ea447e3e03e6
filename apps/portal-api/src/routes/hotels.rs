//! Hotel lookup.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::middleware::AuthContext;
use crate::error::{ApiError, ApiErrorBody};
use crate::models::hotel::Hotel;
use crate::permissions;
use crate::routes::EventQuery;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/hotels", get(get_hotel))
}

// ---------------------------------------------------------------------------
// GET /api/v1/hotels?event_id=
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, ToSchema)]
pub struct HotelResponse {
    pub hotel: Option<Hotel>,
}

/// `GET /api/v1/hotels`: The event's hotel, if one is set up.
///
/// Attendee sessions only see contacts marked for display to members.
#[utoipa::path(
    get,
    path = "/api/v1/hotels",
    tag = "Hotels",
    security(("bearer" = [])),
    params(EventQuery),
    responses(
        (status = 200, description = "Hotel or null", body = HotelResponse),
        (status = 401, description = "Unauthorized", body = ApiErrorBody),
        (status = 403, description = "No access to the event", body = ApiErrorBody),
    ),
)]
pub async fn get_hotel(
    auth: AuthContext,
    State(state): State<AppState>,
    Query(query): Query<EventQuery>,
) -> Result<Json<HotelResponse>, ApiError> {
    permissions::check_event_read(&auth, &query.event_id)?;

    let mut hotel = state.store.get_hotel(&query.event_id).await?;
    if auth.is_member() {
        hotel = hotel.map(Hotel::for_members);
    }

    Ok(Json(HotelResponse { hotel }))
}
