//! Forward-only assignment lifecycle

use crate::store::{Assignment, AssignmentStatus};

use super::error::{EngineError, Result};

/// Every allowed (from, to) pair. Anything not listed is rejected.
pub const TRANSITIONS: &[(AssignmentStatus, AssignmentStatus)] = &[
    (AssignmentStatus::Assigned, AssignmentStatus::Accepted),
    (AssignmentStatus::Accepted, AssignmentStatus::InProgress),
    (AssignmentStatus::InProgress, AssignmentStatus::Completed),
];

pub fn is_allowed(from: AssignmentStatus, to: AssignmentStatus) -> bool {
    TRANSITIONS.iter().any(|&(f, t)| f == from && t == to)
}

pub fn check_transition(assignment: &Assignment, to: AssignmentStatus) -> Result<()> {
    if is_allowed(assignment.status, to) {
        Ok(())
    } else {
        Err(EngineError::InvalidTransition {
            assignment_id: assignment.id,
            from: assignment.status,
            to,
        })
    }
}
