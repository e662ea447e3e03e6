//! Role-scoped event access.

use crate::auth::middleware::AuthContext;
use crate::auth::sessions::Role;
use crate::error::ApiError;

fn in_scope(auth: &AuthContext, event_id: &str) -> bool {
    auth.role == Role::Admin || auth.event_ids.iter().any(|id| id == event_id)
}

/// Staff access to an event: read and write its stay data.
pub fn check_event_staff(auth: &AuthContext, event_id: &str) -> Result<(), ApiError> {
    if auth.role == Role::Member {
        return Err(ApiError::forbidden("Members cannot manage stay data"));
    }
    if !in_scope(auth, event_id) {
        return Err(ApiError::forbidden("You do not have access to this event"));
    }
    Ok(())
}

/// Read access to an event's public stay information. Attendees may read
/// their own event.
pub fn check_event_read(auth: &AuthContext, event_id: &str) -> Result<(), ApiError> {
    if !in_scope(auth, event_id) {
        return Err(ApiError::forbidden("You do not have access to this event"));
    }
    Ok(())
}
