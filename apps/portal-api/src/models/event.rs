use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use portal_common::id::{prefix, PrefixedId};
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::schema::events;
use crate::stay::occupancy::StayWindow;

/// A time-boxed gathering owned by a partner.
#[derive(Debug, Clone, Queryable, Selectable, Serialize, ToSchema)]
#[diesel(table_name = events)]
pub struct Event {
    pub id: String,
    pub partner_id: String,
    pub name: String,
    pub location: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Stay dates used when an assignment carries none of its own.
    pub fn stay_window(&self) -> StayWindow {
        StayWindow {
            start: self.start_date,
            end: self.end_date,
        }
    }
}

impl PrefixedId for Event {
    const PREFIX: &'static str = prefix::EVENT;
}
