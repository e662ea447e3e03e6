//! Conjunctive filtering over the occupancy view.

use std::collections::BTreeSet;

use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::{ApiError, FieldError};
use crate::stay::occupancy::MemberOccupancyView;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KycFilter {
    #[default]
    All,
    Completed,
    Pending,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Assigned,
    Unassigned,
}

/// Active predicates; every `None`/`All` is a pass-through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StayFilters {
    pub search: Option<String>,
    pub kyc: KycFilter,
    pub status: StatusFilter,
    /// Exact, case-sensitive room type name.
    pub room_type: Option<String>,
    pub sharing: Option<u32>,
}

impl StayFilters {
    pub fn matches(&self, view: &MemberOccupancyView) -> bool {
        self.matches_search(view)
            && self.matches_kyc(view)
            && self.matches_status(view)
            && self.matches_room_type(view)
            && self.matches_sharing(view)
    }

    fn matches_search(&self, view: &MemberOccupancyView) -> bool {
        let Some(query) = self.search.as_deref().filter(|q| !q.is_empty()) else {
            return true;
        };
        let query = query.to_lowercase();

        view.member.name.to_lowercase().contains(&query)
            || view.member.employee_id.to_lowercase().contains(&query)
            || view
                .room_number
                .as_deref()
                .is_some_and(|room| room.to_lowercase().contains(&query))
    }

    fn matches_kyc(&self, view: &MemberOccupancyView) -> bool {
        match self.kyc {
            KycFilter::All => true,
            KycFilter::Completed => view.member.kyc_complete(),
            KycFilter::Pending => !view.member.kyc_complete(),
        }
    }

    fn matches_status(&self, view: &MemberOccupancyView) -> bool {
        match self.status {
            StatusFilter::All => true,
            StatusFilter::Assigned => view.is_assigned,
            StatusFilter::Unassigned => !view.is_assigned,
        }
    }

    fn matches_room_type(&self, view: &MemberOccupancyView) -> bool {
        match &self.room_type {
            None => true,
            Some(wanted) => view.room_type.is_some_and(|t| t.as_str() == wanted.as_str()),
        }
    }

    fn matches_sharing(&self, view: &MemberOccupancyView) -> bool {
        self.sharing.map_or(true, |count| view.sharing_count == count)
    }
}

/// Keep the views every active filter accepts, preserving order.
pub fn apply_filters(
    views: Vec<MemberOccupancyView>,
    filters: &StayFilters,
) -> Vec<MemberOccupancyView> {
    views.into_iter().filter(|v| filters.matches(v)).collect()
}

/// Distinct sharing counts present in the full view set, ascending.
pub fn sharing_options(views: &[MemberOccupancyView]) -> Vec<u32> {
    views
        .iter()
        .map(|v| v.sharing_count)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

// ---------------------------------------------------------------------------
// Query-string form
// ---------------------------------------------------------------------------

/// Filters as they arrive on the query string. `"all"` (or absence) turns a
/// filter off.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StayFilterParams {
    /// Case-insensitive match on name, employee ID or room number.
    pub search: Option<String>,
    /// `all`, `completed` or `pending`.
    pub kyc: Option<String>,
    /// `all`, `assigned` or `unassigned`.
    pub status: Option<String>,
    /// `all` or a room type name (`Single`, `Double`, `Triple`, `Suite`, `Other`).
    pub room_type: Option<String>,
    /// `all` or an occupant count.
    pub sharing: Option<String>,
}

impl TryFrom<StayFilterParams> for StayFilters {
    type Error = ApiError;

    fn try_from(params: StayFilterParams) -> Result<Self, Self::Error> {
        let mut errors = Vec::new();

        let kyc = match active(params.kyc.as_deref()) {
            None => KycFilter::All,
            Some("completed") => KycFilter::Completed,
            Some("pending") => KycFilter::Pending,
            Some(_) => {
                errors.push(FieldError::new("kyc", "Expected all, completed or pending"));
                KycFilter::All
            }
        };

        let status = match active(params.status.as_deref()) {
            None => StatusFilter::All,
            Some("assigned") => StatusFilter::Assigned,
            Some("unassigned") => StatusFilter::Unassigned,
            Some(_) => {
                errors.push(FieldError::new(
                    "status",
                    "Expected all, assigned or unassigned",
                ));
                StatusFilter::All
            }
        };

        let sharing = match active(params.sharing.as_deref()) {
            None => None,
            Some(raw) => match raw.parse::<u32>() {
                Ok(count) => Some(count),
                Err(_) => {
                    errors.push(FieldError::new("sharing", "Expected all or a number"));
                    None
                }
            },
        };

        if !errors.is_empty() {
            return Err(ApiError::validation(errors));
        }

        Ok(StayFilters {
            search: params.search,
            kyc,
            status,
            room_type: active(params.room_type.as_deref()).map(str::to_string),
            sharing,
        })
    }
}

fn active(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty() && *v != "all")
}
