use chrono::{DateTime, Utc};
use diesel::prelude::*;
use portal_common::id::{prefix, PrefixedId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::schema::hotels;
use crate::error::ApiError;

/// Point of contact at the hotel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HotelPoc {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Whether attendees may see this contact.
    #[serde(default)]
    pub display_for_members: bool,
}

/// The hotel an event's members stay at.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Hotel {
    pub id: String,
    pub event_id: String,
    pub name: String,
    pub address: String,
    pub star_rating: Option<i16>,
    pub amenities: Vec<String>,
    pub pocs: Vec<HotelPoc>,
    pub updated_at: DateTime<Utc>,
}

impl Hotel {
    /// The hotel as an attendee sees it: only member-facing contacts.
    pub fn for_members(mut self) -> Self {
        self.pocs.retain(|poc| poc.display_for_members);
        self
    }
}

impl PrefixedId for Hotel {
    const PREFIX: &'static str = prefix::HOTEL;
}

/// Database row for `hotels`; POCs live in a JSONB column.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = hotels)]
pub struct HotelRow {
    pub id: String,
    pub event_id: String,
    pub name: String,
    pub address: String,
    pub star_rating: Option<i16>,
    pub amenities: Vec<String>,
    pub pocs: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<HotelRow> for Hotel {
    type Error = ApiError;

    fn try_from(row: HotelRow) -> Result<Self, Self::Error> {
        let pocs: Vec<HotelPoc> = serde_json::from_value(row.pocs).map_err(|err| {
            tracing::error!(hotel_id = %row.id, ?err, "corrupt hotel POC data");
            ApiError::internal("corrupt hotel data")
        })?;

        Ok(Hotel {
            id: row.id,
            event_id: row.event_id,
            name: row.name,
            address: row.address,
            star_rating: row.star_rating,
            amenities: row.amenities,
            pocs,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_with_pocs_converts() {
        let row = HotelRow {
            id: "htl_1".to_string(),
            event_id: "evt_1".to_string(),
            name: "Harbour View".to_string(),
            address: "1 Marine Drive".to_string(),
            star_rating: Some(5),
            amenities: vec!["Pool".to_string()],
            pocs: serde_json::json!([
                { "name": "Front Desk", "phone": "+91 22 0000", "display_for_members": true },
                { "name": "Sales Manager", "email": "sales@hv.example" }
            ]),
            updated_at: Utc::now(),
        };

        let hotel = Hotel::try_from(row).unwrap();
        assert_eq!(hotel.pocs.len(), 2);
        assert!(!hotel.pocs[1].display_for_members);

        let public = hotel.for_members();
        assert_eq!(public.pocs.len(), 1);
        assert_eq!(public.pocs[0].name, "Front Desk");
    }

    #[test]
    fn malformed_pocs_are_rejected() {
        let row = HotelRow {
            id: "htl_2".to_string(),
            event_id: "evt_1".to_string(),
            name: "Broken".to_string(),
            address: "-".to_string(),
            star_rating: None,
            amenities: vec![],
            pocs: serde_json::json!({ "not": "a list" }),
            updated_at: Utc::now(),
        };

        assert!(Hotel::try_from(row).is_err());
    }
}
