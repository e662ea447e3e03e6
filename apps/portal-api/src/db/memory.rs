//! In-memory [`PortalStore`] used by tests and local demos.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::db::store::PortalStore;
use crate::error::ApiError;
use crate::models::check_in::CheckIn;
use crate::models::event::Event;
use crate::models::hotel::Hotel;
use crate::models::member::Member;
use crate::models::room_assignment::{RoomAssignment, UpsertRoomAssignment};

#[derive(Default)]
struct Tables {
    events: HashMap<String, Event>,
    /// Insertion order doubles as registration order.
    members: Vec<Member>,
    /// Keyed by `(event_id, member_id)`; the `Vec` keeps first-write order
    /// so listings are stable across replacements.
    assignments: Vec<RoomAssignment>,
    hotels: HashMap<String, Hotel>,
    check_ins: Vec<CheckIn>,
}

#[derive(Default)]
pub struct MemoryPortalStore {
    tables: Mutex<Tables>,
}

impl MemoryPortalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_event(&self, event: Event) {
        self.tables.lock().events.insert(event.id.clone(), event);
    }

    pub fn insert_member(&self, member: Member) {
        self.tables.lock().members.push(member);
    }

    pub fn insert_hotel(&self, hotel: Hotel) {
        self.tables.lock().hotels.insert(hotel.event_id.clone(), hotel);
    }

    /// Append a raw assignment row without upsert semantics, e.g. one that
    /// references a member that no longer exists.
    pub fn insert_raw_assignment(&self, assignment: RoomAssignment) {
        self.tables.lock().assignments.push(assignment);
    }
}

#[async_trait]
impl PortalStore for MemoryPortalStore {
    async fn get_event(&self, event_id: &str) -> Result<Option<Event>, ApiError> {
        Ok(self.tables.lock().events.get(event_id).cloned())
    }

    async fn list_members(&self, event_id: &str) -> Result<Vec<Member>, ApiError> {
        Ok(self
            .tables
            .lock()
            .members
            .iter()
            .filter(|m| m.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn list_room_assignments(
        &self,
        event_id: &str,
    ) -> Result<Vec<RoomAssignment>, ApiError> {
        Ok(self
            .tables
            .lock()
            .assignments
            .iter()
            .filter(|a| a.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn upsert_room_assignment(
        &self,
        upsert: &UpsertRoomAssignment,
    ) -> Result<RoomAssignment, ApiError> {
        let mut tables = self.tables.lock();

        let known = tables
            .members
            .iter()
            .any(|m| m.id == upsert.member_id && m.event_id == upsert.event_id);
        if !known {
            return Err(ApiError::not_found("Member not found"));
        }

        let assignment = RoomAssignment {
            event_id: upsert.event_id.clone(),
            member_id: upsert.member_id.clone(),
            room_number: upsert.room_number.clone(),
            room_type: upsert.room_type,
            check_in_date: upsert.check_in_date,
            check_out_date: upsert.check_out_date,
            special_requests: upsert.special_requests.clone(),
            updated_at: Utc::now(),
        };

        match tables
            .assignments
            .iter_mut()
            .find(|a| a.event_id == upsert.event_id && a.member_id == upsert.member_id)
        {
            Some(existing) => *existing = assignment.clone(),
            None => tables.assignments.push(assignment.clone()),
        }

        Ok(assignment)
    }

    async fn get_hotel(&self, event_id: &str) -> Result<Option<Hotel>, ApiError> {
        Ok(self.tables.lock().hotels.get(event_id).cloned())
    }

    async fn list_check_ins(&self, event_id: &str) -> Result<Vec<CheckIn>, ApiError> {
        Ok(self
            .tables
            .lock()
            .check_ins
            .iter()
            .filter(|c| c.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn check_in(
        &self,
        event_id: &str,
        member_id: &str,
        at: DateTime<Utc>,
    ) -> Result<CheckIn, ApiError> {
        let mut tables = self.tables.lock();

        let known = tables
            .members
            .iter()
            .any(|m| m.id == member_id && m.event_id == event_id);
        if !known {
            return Err(ApiError::not_found("Member not found"));
        }

        let check_in = CheckIn {
            event_id: event_id.to_string(),
            member_id: member_id.to_string(),
            checked_in_at: at,
        };

        match tables
            .check_ins
            .iter_mut()
            .find(|c| c.event_id == event_id && c.member_id == member_id)
        {
            Some(existing) => *existing = check_in.clone(),
            None => tables.check_ins.push(check_in.clone()),
        }

        Ok(check_in)
    }

    async fn clear_check_in(&self, event_id: &str, member_id: &str) -> Result<bool, ApiError> {
        let mut tables = self.tables.lock();
        let before = tables.check_ins.len();
        tables
            .check_ins
            .retain(|c| !(c.event_id == event_id && c.member_id == member_id));
        Ok(tables.check_ins.len() != before)
    }
}
