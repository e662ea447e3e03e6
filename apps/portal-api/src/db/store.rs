use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::ApiError;
use crate::models::check_in::CheckIn;
use crate::models::event::Event;
use crate::models::hotel::Hotel;
use crate::models::member::Member;
use crate::models::room_assignment::{RoomAssignment, UpsertRoomAssignment};

/// Event-scoped reads and writes the portal needs from persistent storage.
///
/// Backed by Postgres in production ([`crate::db::pg::PgPortalStore`]) and an
/// in-memory map in tests ([`crate::db::memory::MemoryPortalStore`]).
#[async_trait]
pub trait PortalStore: Send + Sync {
    async fn get_event(&self, event_id: &str) -> Result<Option<Event>, ApiError>;

    /// Members of an event in registration order.
    async fn list_members(&self, event_id: &str) -> Result<Vec<Member>, ApiError>;

    async fn list_room_assignments(&self, event_id: &str)
        -> Result<Vec<RoomAssignment>, ApiError>;

    /// Insert or replace the assignment for `(event_id, member_id)`.
    ///
    /// Last write wins; there is no version check.
    async fn upsert_room_assignment(
        &self,
        upsert: &UpsertRoomAssignment,
    ) -> Result<RoomAssignment, ApiError>;

    async fn get_hotel(&self, event_id: &str) -> Result<Option<Hotel>, ApiError>;

    async fn list_check_ins(&self, event_id: &str) -> Result<Vec<CheckIn>, ApiError>;

    /// Record an arrival, overwriting the time of an earlier one.
    async fn check_in(
        &self,
        event_id: &str,
        member_id: &str,
        at: DateTime<Utc>,
    ) -> Result<CheckIn, ApiError>;

    /// Undo an arrival. Returns false when the member was not checked in.
    async fn clear_check_in(&self, event_id: &str, member_id: &str) -> Result<bool, ApiError>;
}
