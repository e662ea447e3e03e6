use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::schema::check_ins;

/// Arrival of a member at the event venue. A row exists only while the
/// member is checked in.
#[derive(Debug, Clone, Queryable, Selectable, Serialize, ToSchema)]
#[diesel(table_name = check_ins)]
pub struct CheckIn {
    pub event_id: String,
    pub member_id: String,
    pub checked_in_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = check_ins)]
pub struct NewCheckIn<'a> {
    pub event_id: &'a str,
    pub member_id: &'a str,
    pub checked_in_at: DateTime<Utc>,
}
