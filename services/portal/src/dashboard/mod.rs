//! services/portal/src/dashboard/mod.rs
//!
//! The dashboard state container and its operations, one file per area.

mod auth;
mod availability;
mod profile;
mod sessions;
mod state;

pub use state::{Collaborators, Dashboard, Tab, AUTH_KEY, PROFILE_KEY, TAB_KEY};
