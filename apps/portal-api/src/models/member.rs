use chrono::{DateTime, Utc};
use diesel::prelude::*;
use portal_common::id::{prefix, PrefixedId};
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::schema::members;

/// An attendee of an event.
#[derive(Debug, Clone, Queryable, Selectable, Serialize, ToSchema)]
#[diesel(table_name = members)]
pub struct Member {
    pub id: String,
    pub event_id: String,
    pub employee_id: String,
    pub name: String,
    pub email: String,
    pub country_code: String,
    pub phone: String,
    pub kyc_document_type: Option<String>,
    pub kyc_document_number: Option<String>,
    pub kyc_document_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Member {
    /// KYC is complete only when document type, number and uploaded file
    /// reference are all present and non-blank.
    pub fn kyc_complete(&self) -> bool {
        [
            &self.kyc_document_type,
            &self.kyc_document_number,
            &self.kyc_document_url,
        ]
        .iter()
        .all(|field| field.as_deref().is_some_and(|v| !v.trim().is_empty()))
    }
}

impl PrefixedId for Member {
    const PREFIX: &'static str = prefix::MEMBER;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member_with_kyc(kind: Option<&str>, number: Option<&str>, url: Option<&str>) -> Member {
        Member {
            id: Member::generate(),
            event_id: "evt_1".to_string(),
            employee_id: "EMP001".to_string(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            country_code: "+91".to_string(),
            phone: "9000000001".to_string(),
            kyc_document_type: kind.map(str::to_string),
            kyc_document_number: number.map(str::to_string),
            kyc_document_url: url.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn kyc_complete_requires_all_three_fields() {
        let m = member_with_kyc(Some("Passport"), Some("P1234567"), Some("https://blob/p.pdf"));
        assert!(m.kyc_complete());

        let m = member_with_kyc(Some("Passport"), None, Some("https://blob/p.pdf"));
        assert!(!m.kyc_complete());
    }

    #[test]
    fn blank_kyc_field_is_pending() {
        let m = member_with_kyc(Some("Passport"), Some("   "), Some("https://blob/p.pdf"));
        assert!(!m.kyc_complete());
    }
}
