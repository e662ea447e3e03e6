pub mod check_ins;
pub mod health;
pub mod hotels;
pub mod members;
pub mod room_assignments;
pub mod stay;

use axum::Router;
use serde::Deserialize;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{IntoParams, Modify, OpenApi};

use crate::error::ApiError;
use crate::models::event::Event;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().merge(health::router()).nest(
        "/api/v1",
        members::router()
            .merge(room_assignments::router())
            .merge(hotels::router())
            .merge(stay::router())
            .merge(check_ins::router()),
    )
}

/// `?event_id=` selector shared by the event-scoped list endpoints.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventQuery {
    /// Event ID.
    pub event_id: String,
}

/// Load an event or fail with 404.
pub(crate) async fn require_event(state: &AppState, event_id: &str) -> Result<Event, ApiError> {
    state
        .store
        .get_event(event_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Event not found"))
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health,
        // Members
        members::list_members,
        // Room assignments
        room_assignments::list_room_assignments,
        room_assignments::upsert_room_assignment,
        // Hotels
        hotels::get_hotel,
        // Stay
        stay::get_stay,
        stay::export_stay,
        stay::import_stay,
        // Check-ins
        check_ins::set_check_in,
    ),
    components(
        schemas(
            // Error types
            crate::error::ApiErrorBody,
            crate::error::ApiErrorDetail,
            crate::error::FieldError,
            // Models
            crate::models::member::Member,
            crate::models::room_assignment::RoomAssignment,
            crate::models::room_assignment::RoomType,
            crate::models::hotel::Hotel,
            crate::models::hotel::HotelPoc,
            crate::stay::occupancy::MemberOccupancyView,
            // Route request/response types
            health::HealthResponse,
            members::ListMembersResponse,
            room_assignments::ListRoomAssignmentsResponse,
            room_assignments::UpsertRoomAssignmentRequest,
            hotels::HotelResponse,
            stay::StayMember,
            stay::StayResponse,
            stay::ImportResponse,
            check_ins::SetCheckInRequest,
            check_ins::CheckInResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check"),
        (name = "Members", description = "Event members"),
        (name = "Room Assignments", description = "Per-member room assignments"),
        (name = "Hotels", description = "Event hotel details"),
        (name = "Stay", description = "Occupancy view, CSV export and import"),
        (name = "Check-ins", description = "Member arrivals"),
    )
)]
pub struct ApiDoc;
