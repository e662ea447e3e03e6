//! Bulk room updates from an uploaded stay sheet.
//!
//! Import is best-effort: every row is judged on its own, problems are
//! collected as `Row <n>: ...` messages and the rest of the sheet still
//! applies. Only an empty sheet or a missing `Employee ID` column rejects
//! the upload outright.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::store::PortalStore;
use crate::models::member::Member;
use crate::models::room_assignment::{
    room_number_fits, RoomAssignment, RoomType, UpsertRoomAssignment, MAX_ROOM_NUMBER_LEN,
};
use crate::stay::csv::{self, CsvError, CsvRow, CsvTable};

pub const COL_CHECK_IN: &str = "Check-in";
pub const COL_TIME: &str = "Time";
pub const COL_MEMBER: &str = "Member";
pub const COL_EMPLOYEE_ID: &str = "Employee ID";
pub const COL_ROOM_NUMBER: &str = "Room Number";
pub const COL_ROOM_TYPE: &str = "Room Type";

/// Room type given to a brand-new assignment whose row names none.
pub const DEFAULT_ROOM_TYPE: RoomType = RoomType::Double;

/// Positions of the columns the importer reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ImportColumns {
    check_in: Option<usize>,
    time: Option<usize>,
    member: Option<usize>,
    employee_id: usize,
    room_number: Option<usize>,
    room_type: Option<usize>,
}

impl ImportColumns {
    fn locate(table: &CsvTable) -> Result<Self, CsvError> {
        Ok(Self {
            check_in: table.column(COL_CHECK_IN),
            time: table.column(COL_TIME),
            member: table.column(COL_MEMBER),
            employee_id: table
                .column(COL_EMPLOYEE_ID)
                .ok_or(CsvError::MissingColumn(COL_EMPLOYEE_ID))?,
            room_number: table.column(COL_ROOM_NUMBER),
            room_type: table.column(COL_ROOM_TYPE),
        })
    }
}

/// A problem with one data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub row: usize,
    pub message: String,
}

impl RowError {
    fn new(row: usize, message: impl Into<String>) -> Self {
        Self {
            row,
            message: message.into(),
        }
    }
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}: {}", self.row, self.message)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedUpsert {
    pub row: usize,
    pub member_name: String,
    pub upsert: UpsertRoomAssignment,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedCheckIn {
    pub row: usize,
    pub member_id: String,
    pub at: DateTime<Utc>,
}

/// What a sheet asks for, before anything is written.
#[derive(Debug, Default)]
pub struct ImportPlan {
    pub upserts: Vec<PlannedUpsert>,
    pub check_ins: Vec<PlannedCheckIn>,
    pub errors: Vec<RowError>,
}

/// Result of an upload, as reported to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ImportOutcome {
    /// Rows whose room update was stored.
    pub updated_count: usize,
    /// Rows whose check-in was stored.
    pub checked_in_count: usize,
    /// `Row <n>: ...` messages in row order.
    pub errors: Vec<String>,
}

/// Work out the upserts and check-ins a sheet describes.
///
/// Values present in a row replace the member's current assignment values;
/// anything the row leaves out is carried over, including what an earlier
/// row of the same sheet set.
pub fn plan_import(
    csv_text: &str,
    event_id: &str,
    members: &[Member],
    assignments: &[RoomAssignment],
    now: DateTime<Utc>,
) -> Result<ImportPlan, CsvError> {
    let table = csv::parse(csv_text)?;
    let columns = ImportColumns::locate(&table)?;

    let by_employee: HashMap<&str, &Member> = members
        .iter()
        .rev()
        .map(|m| (m.employee_id.as_str(), m))
        .collect();

    let mut current: HashMap<&str, UpsertRoomAssignment> = HashMap::new();
    for assignment in assignments.iter().rev() {
        current.insert(
            assignment.member_id.as_str(),
            UpsertRoomAssignment {
                event_id: event_id.to_string(),
                member_id: assignment.member_id.clone(),
                room_number: assignment.room_number.clone(),
                room_type: assignment.room_type,
                check_in_date: assignment.check_in_date,
                check_out_date: assignment.check_out_date,
                special_requests: assignment.special_requests.clone(),
            },
        );
    }

    let mut plan = ImportPlan::default();

    for row in &table.rows {
        if row.fields.len() < table.headers.len() {
            plan.errors.push(RowError::new(row.number, "Not enough columns"));
            continue;
        }

        let employee_id = cell(row, Some(columns.employee_id));
        if employee_id.is_empty() {
            plan.errors.push(RowError::new(row.number, "Missing Employee ID"));
            continue;
        }

        let Some(member) = by_employee.get(employee_id).copied() else {
            plan.errors.push(RowError::new(
                row.number,
                format!("Member with Employee ID \"{employee_id}\" not found"),
            ));
            continue;
        };

        let room_number = cell(row, columns.room_number);
        let room_type = cell(row, columns.room_type);
        if !room_fits(room_number) {
            plan.errors.push(RowError::new(
                row.number,
                format!("Room number must be {MAX_ROOM_NUMBER_LEN} characters or fewer"),
            ));
        } else if !room_number.is_empty() || !room_type.is_empty() {
            let next = match current.get(member.id.as_str()) {
                Some(existing) => existing.clone(),
                None => UpsertRoomAssignment {
                    event_id: event_id.to_string(),
                    member_id: member.id.clone(),
                    room_number: None,
                    room_type: DEFAULT_ROOM_TYPE,
                    check_in_date: None,
                    check_out_date: None,
                    special_requests: None,
                },
            };
            let next = UpsertRoomAssignment {
                room_number: if room_number.is_empty() {
                    next.room_number
                } else {
                    Some(room_number.to_string())
                },
                room_type: if room_type.is_empty() {
                    next.room_type
                } else {
                    RoomType::from_loose(room_type)
                },
                ..next
            };

            current.insert(member.id.as_str(), next.clone());
            plan.upserts.push(PlannedUpsert {
                row: row.number,
                member_name: display_name(member, cell(row, columns.member)),
                upsert: next,
            });
        }

        if cell(row, columns.check_in).eq_ignore_ascii_case("yes") {
            let at = DateTime::parse_from_rfc3339(cell(row, columns.time))
                .map(|t| t.with_timezone(&Utc))
                .unwrap_or(now);
            plan.check_ins.push(PlannedCheckIn {
                row: row.number,
                member_id: member.id.clone(),
                at,
            });
        }
    }

    Ok(plan)
}

fn room_fits(room_number: &str) -> bool {
    room_number.is_empty() || room_number_fits(room_number)
}

/// Parse `csv_text` and replay it against the store.
///
/// Upserts for different members run concurrently; rows that touch the same
/// member are applied one after another in sheet order so the last row wins.
pub async fn apply_csv_upload(
    store: &dyn PortalStore,
    event_id: &str,
    csv_text: &str,
    members: &[Member],
    assignments: &[RoomAssignment],
) -> Result<ImportOutcome, CsvError> {
    let plan = plan_import(csv_text, event_id, members, assignments, Utc::now())?;
    let mut errors = plan.errors;

    let mut per_member: Vec<Vec<&PlannedUpsert>> = Vec::new();
    let mut slot: HashMap<&str, usize> = HashMap::new();
    for planned in &plan.upserts {
        let idx = *slot
            .entry(planned.upsert.member_id.as_str())
            .or_insert_with(|| {
                per_member.push(Vec::new());
                per_member.len() - 1
            });
        per_member[idx].push(planned);
    }

    let upsert_results = join_all(per_member.into_iter().map(|queue| async move {
        let mut results = Vec::with_capacity(queue.len());
        for planned in queue {
            let result = store.upsert_room_assignment(&planned.upsert).await;
            results.push((planned, result));
        }
        results
    }))
    .await;

    let mut updated_count = 0;
    for (planned, result) in upsert_results.into_iter().flatten() {
        match result {
            Ok(_) => updated_count += 1,
            Err(err) => {
                tracing::warn!(
                    event_id,
                    row = planned.row,
                    member_id = %planned.upsert.member_id,
                    error = %err,
                    "room update from import failed"
                );
                errors.push(RowError::new(
                    planned.row,
                    format!("Failed to update room for {}: {}", planned.member_name, err),
                ));
            }
        }
    }

    let check_in_results = join_all(plan.check_ins.iter().map(|planned| async move {
        let result = store
            .check_in(event_id, &planned.member_id, planned.at)
            .await;
        (planned, result)
    }))
    .await;

    let mut checked_in_count = 0;
    for (planned, result) in check_in_results {
        match result {
            Ok(_) => checked_in_count += 1,
            Err(err) => {
                tracing::warn!(
                    event_id,
                    row = planned.row,
                    member_id = %planned.member_id,
                    error = %err,
                    "check-in from import failed"
                );
                errors.push(RowError::new(
                    planned.row,
                    format!("Failed to record check-in: {err}"),
                ));
            }
        }
    }

    errors.sort_by_key(|e| e.row);

    tracing::info!(
        event_id,
        updated_count,
        checked_in_count,
        error_count = errors.len(),
        "stay sheet imported"
    );

    Ok(ImportOutcome {
        updated_count,
        checked_in_count,
        errors: errors.iter().map(ToString::to_string).collect(),
    })
}

/// Human summary of import errors: the first `preview` messages, then a
/// `+N more` line for the rest.
pub fn summarize_errors(errors: &[String], preview: usize) -> Option<String> {
    if errors.is_empty() {
        return None;
    }

    let mut lines: Vec<String> = errors.iter().take(preview).cloned().collect();
    let hidden = errors.len().saturating_sub(preview);
    if hidden > 0 {
        lines.push(format!("+{hidden} more"));
    }
    Some(lines.join("\n"))
}

fn cell(row: &CsvRow, column: Option<usize>) -> &str {
    column
        .and_then(|i| row.fields.get(i))
        .map(String::as_str)
        .unwrap_or("")
}

fn display_name(member: &Member, sheet_name: &str) -> String {
    if sheet_name.is_empty() {
        member.name.clone()
    } else {
        sheet_name.to_string()
    }
}
