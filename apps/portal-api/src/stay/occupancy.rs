//! Occupancy derivation: who sleeps where, and with whom.
//!
//! Joins an event's member list with its flat list of room assignments into
//! one [`MemberOccupancyView`] per member. Roommates are inferred purely from
//! equal `room_number` strings; nothing about sharing is stored.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::member::Member;
use crate::models::room_assignment::{RoomAssignment, RoomType};

/// Label used for members without roommates.
pub const SOLO: &str = "Solo";

/// Event dates used for any assignment that has none of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// A member enriched with its room, roommates and stay dates.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MemberOccupancyView {
    #[serde(flatten)]
    pub member: Member,
    pub room_number: Option<String>,
    pub room_type: Option<RoomType>,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    /// Roommate names joined with `", "`, or `"Solo"`.
    pub sharing_with: String,
    /// Occupants of the room including the member; 1 when unassigned.
    pub sharing_count: u32,
    pub special_requests: Option<String>,
    pub is_assigned: bool,
}

/// Derive the occupancy view for every member, in input order.
///
/// When the store hands back more than one assignment for a member the first
/// one wins. Assignments whose member is not in `members` still occupy their
/// room in the store but are left out of every roommate list.
pub fn derive_occupancy(
    members: &[Member],
    assignments: &[RoomAssignment],
    window: StayWindow,
) -> Vec<MemberOccupancyView> {
    let names: HashMap<&str, &str> = members
        .iter()
        .map(|m| (m.id.as_str(), m.name.as_str()))
        .collect();

    let mut by_member: HashMap<&str, &RoomAssignment> = HashMap::new();
    let mut by_room: HashMap<&str, Vec<&RoomAssignment>> = HashMap::new();
    for assignment in assignments {
        by_member
            .entry(assignment.member_id.as_str())
            .or_insert(assignment);
        if let Some(room) = assignment.room() {
            by_room.entry(room).or_default().push(assignment);
        }
    }

    members
        .iter()
        .map(|member| {
            let assignment = by_member.get(member.id.as_str()).copied();
            let room = assignment.and_then(RoomAssignment::room);

            let roommates: Vec<&str> = room
                .and_then(|room| by_room.get(room))
                .map(|occupants| {
                    occupants
                        .iter()
                        .filter(|a| a.member_id != member.id)
                        .filter_map(|a| names.get(a.member_id.as_str()).copied())
                        .collect()
                })
                .unwrap_or_default();

            let (sharing_with, sharing_count) = if roommates.is_empty() {
                (SOLO.to_string(), 1)
            } else {
                (roommates.join(", "), roommates.len() as u32 + 1)
            };

            MemberOccupancyView {
                member: member.clone(),
                room_number: room.map(str::to_string),
                room_type: assignment.map(|a| a.room_type),
                check_in_date: room
                    .and(assignment)
                    .and_then(|a| a.check_in_date)
                    .unwrap_or(window.start),
                check_out_date: room
                    .and(assignment)
                    .and_then(|a| a.check_out_date)
                    .unwrap_or(window.end),
                sharing_with,
                sharing_count,
                special_requests: assignment.and_then(|a| a.special_requests.clone()),
                is_assigned: room.is_some(),
            }
        })
        .collect()
}
