use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::prelude::*;
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::Text;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::schema::room_assignments;

/// Kind of hotel room a member is placed in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    AsExpression,
    FromSqlRow,
)]
#[diesel(sql_type = Text)]
pub enum RoomType {
    Single,
    Double,
    Triple,
    Suite,
    Other,
}

impl RoomType {
    pub const ALL: [RoomType; 5] = [
        RoomType::Single,
        RoomType::Double,
        RoomType::Triple,
        RoomType::Suite,
        RoomType::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RoomType::Single => "Single",
            RoomType::Double => "Double",
            RoomType::Triple => "Triple",
            RoomType::Suite => "Suite",
            RoomType::Other => "Other",
        }
    }

    /// Lenient parse used for spreadsheet input: case-insensitive, and any
    /// unrecognized name lands in `Other`.
    pub fn from_loose(value: &str) -> Self {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(value))
            .unwrap_or(RoomType::Other)
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRoomType(pub String);

impl fmt::Display for UnknownRoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown room type: {}", self.0)
    }
}

impl std::error::Error for UnknownRoomType {}

/// Strict, case-sensitive parse matching the serialized names.
impl FromStr for RoomType {
    type Err = UnknownRoomType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownRoomType(s.to_string()))
    }
}

impl ToSql<Text, Pg> for RoomType {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        <str as ToSql<Text, Pg>>::to_sql(self.as_str(), out)
    }
}

impl FromSql<Text, Pg> for RoomType {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        let raw = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        raw.parse().map_err(|e: UnknownRoomType| e.to_string().into())
    }
}

/// Binding of a member to a room for an event's stay.
#[derive(Debug, Clone, Queryable, Selectable, Serialize, ToSchema)]
#[diesel(table_name = room_assignments)]
pub struct RoomAssignment {
    pub event_id: String,
    pub member_id: String,
    pub room_number: Option<String>,
    pub room_type: RoomType,
    pub check_in_date: Option<NaiveDate>,
    pub check_out_date: Option<NaiveDate>,
    pub special_requests: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl RoomAssignment {
    /// The room number when the member actually holds a room. An empty
    /// number is the same as no number.
    pub fn room(&self) -> Option<&str> {
        self.room_number.as_deref().filter(|r| !r.is_empty())
    }
}

/// Longest room number accepted.
pub const MAX_ROOM_NUMBER_LEN: usize = 32;

/// Whether `room_number` fits in [`MAX_ROOM_NUMBER_LEN`] characters.
pub fn room_number_fits(room_number: &str) -> bool {
    room_number.chars().count() <= MAX_ROOM_NUMBER_LEN
}

/// Replacement values for the assignment of one `(event_id, member_id)`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertRoomAssignment {
    pub event_id: String,
    pub member_id: String,
    pub room_number: Option<String>,
    pub room_type: RoomType,
    pub check_in_date: Option<NaiveDate>,
    pub check_out_date: Option<NaiveDate>,
    pub special_requests: Option<String>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = room_assignments)]
pub struct NewRoomAssignment<'a> {
    pub event_id: &'a str,
    pub member_id: &'a str,
    pub room_number: Option<&'a str>,
    pub room_type: RoomType,
    pub check_in_date: Option<NaiveDate>,
    pub check_out_date: Option<NaiveDate>,
    pub special_requests: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> NewRoomAssignment<'a> {
    pub fn from_upsert(upsert: &'a UpsertRoomAssignment, updated_at: DateTime<Utc>) -> Self {
        Self {
            event_id: &upsert.event_id,
            member_id: &upsert.member_id,
            room_number: upsert.room_number.as_deref(),
            room_type: upsert.room_type,
            check_in_date: upsert.check_in_date,
            check_out_date: upsert.check_out_date,
            special_requests: upsert.special_requests.as_deref(),
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_parse_is_case_sensitive() {
        assert_eq!("Suite".parse::<RoomType>(), Ok(RoomType::Suite));
        assert!("suite".parse::<RoomType>().is_err());
    }

    #[test]
    fn loose_parse_falls_back_to_other() {
        assert_eq!(RoomType::from_loose(" double "), RoomType::Double);
        assert_eq!(RoomType::from_loose("TRIPLE"), RoomType::Triple);
        assert_eq!(RoomType::from_loose("Penthouse"), RoomType::Other);
    }

    #[test]
    fn empty_room_number_is_not_a_room() {
        let assignment = RoomAssignment {
            event_id: "evt_1".to_string(),
            member_id: "mem_1".to_string(),
            room_number: Some(String::new()),
            room_type: RoomType::Double,
            check_in_date: None,
            check_out_date: None,
            special_requests: None,
            updated_at: Utc::now(),
        };
        assert_eq!(assignment.room(), None);
    }
}
