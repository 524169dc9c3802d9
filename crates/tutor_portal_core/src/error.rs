//! crates/tutor_portal_core/src/error.rs
//!
//! The user-facing error taxonomy of the dashboard.

use crate::attendance::AttendanceError;
use crate::availability::AvailabilityError;
use crate::ports::PortError;

/// Errors surfaced to the tutor. Validation messages are shown verbatim.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PortalError {
    #[error("Teacher not found. Please check your contact number.")]
    NotFound,

    #[error("Invalid password")]
    InvalidCredential,

    #[error("{0}")]
    NetworkOrRemoteFailure(String),

    #[error("{0}")]
    ValidationFailure(String),
}

impl From<PortError> for PortalError {
    fn from(e: PortError) -> Self {
        PortalError::NetworkOrRemoteFailure(e.to_string())
    }
}

impl From<AvailabilityError> for PortalError {
    fn from(e: AvailabilityError) -> Self {
        PortalError::ValidationFailure(e.to_string())
    }
}

impl From<AttendanceError> for PortalError {
    fn from(e: AttendanceError) -> Self {
        PortalError::ValidationFailure(e.to_string())
    }
}
