//! services/portal/src/error.rs
//!
//! Defines the primary error type for the portal service.

use crate::config::ConfigError;
use tutor_portal_core::ports::PortError;
use tutor_portal_core::PortalError;

/// The primary error type for the `portal` service.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A user-facing dashboard error, shown verbatim.
    #[error("{0}")]
    Portal(#[from] PortalError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Represents a standard Input/Output error (e.g., reading from the terminal).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
