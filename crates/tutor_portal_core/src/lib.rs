//! crates/tutor_portal_core/src/lib.rs
//!
//! Core of the tutor portal: domain types, remote record shapes, the ports
//! the dashboard talks through, and the pure logic (time normalisation,
//! session assembly, availability diffing, attendance recording, views).

pub mod assembler;
pub mod attendance;
pub mod availability;
pub mod domain;
pub mod error;
pub mod placeholder;
pub mod ports;
pub mod records;
pub mod sync;
pub mod time;
pub mod views;

pub use error::PortalError;
pub use ports::{PortError, PortResult};
pub use sync::{RemoteFailurePolicy, SyncOutcome};
