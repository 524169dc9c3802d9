//! services/portal/src/lib.rs
//!
//! Remote sheet adapters, configuration and the dashboard state container
//! for the tutor portal.

pub mod adapters;
pub mod config;
pub mod dashboard;
pub mod error;
