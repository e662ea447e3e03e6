//! Stay sheet export. The output is accepted back by [`crate::stay::import`].

use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::stay::csv::{self, LINE_ENDING};
use crate::stay::import::{
    COL_CHECK_IN, COL_EMPLOYEE_ID, COL_MEMBER, COL_ROOM_NUMBER, COL_ROOM_TYPE, COL_TIME,
};
use crate::stay::occupancy::MemberOccupancyView;

pub const HEADER: [&str; 10] = [
    COL_CHECK_IN,
    COL_TIME,
    COL_MEMBER,
    COL_EMPLOYEE_ID,
    "KYC Status",
    "KYC Type",
    "KYC Number",
    "KYC Document Link",
    COL_ROOM_NUMBER,
    COL_ROOM_TYPE,
];

/// Render `views` as a stay sheet. `check_ins` maps member ID to arrival
/// time.
pub fn export_csv(
    views: &[MemberOccupancyView],
    check_ins: &HashMap<String, DateTime<Utc>>,
) -> String {
    let mut lines = Vec::with_capacity(views.len() + 1);
    lines.push(csv::write_row(&HEADER));

    for view in views {
        let member = &view.member;
        let checked_in_at = check_ins.get(&member.id);

        lines.push(csv::write_row(&[
            if checked_in_at.is_some() { "Yes" } else { "No" }.to_string(),
            checked_in_at
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
                .unwrap_or_default(),
            member.name.clone(),
            member.employee_id.clone(),
            if member.kyc_complete() {
                "Completed"
            } else {
                "Pending"
            }
            .to_string(),
            member.kyc_document_type.clone().unwrap_or_default(),
            member.kyc_document_number.clone().unwrap_or_default(),
            member.kyc_document_url.clone().unwrap_or_default(),
            view.room_number.clone().unwrap_or_default(),
            view.room_type.map(|t| t.to_string()).unwrap_or_default(),
        ]));
    }

    lines.join(LINE_ENDING)
}

/// `Content-Disposition` file name for an event's export.
pub fn file_name(event_id: &str) -> String {
    format!("stay-{event_id}.csv")
}
