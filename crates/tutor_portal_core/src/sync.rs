//! crates/tutor_portal_core/src/sync.rs
//!
//! What happens to an optimistic local change when the remote write behind
//! it fails.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemoteFailurePolicy {
    /// Keep the local change; the failure is only logged.
    #[default]
    KeepLocal,
    /// Undo the local change.
    RevertLocal,
}

impl FromStr for RemoteFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keep" | "keep_local" => Ok(RemoteFailurePolicy::KeepLocal),
            "revert" | "revert_local" => Ok(RemoteFailurePolicy::RevertLocal),
            other => Err(format!("unknown remote failure policy '{}'", other)),
        }
    }
}

impl fmt::Display for RemoteFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RemoteFailurePolicy::KeepLocal => "keep",
            RemoteFailurePolicy::RevertLocal => "revert",
        })
    }
}

/// Result of a local-then-remote mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Synced,
    /// Nothing needed to be written.
    Skipped,
    KeptLocal { error: String },
    Reverted { error: String },
}

impl SyncOutcome {
    pub fn is_synced(&self) -> bool {
        matches!(self, SyncOutcome::Synced | SyncOutcome::Skipped)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SyncOutcome::KeptLocal { error } | SyncOutcome::Reverted { error } => Some(error),
            _ => None,
        }
    }
}

impl RemoteFailurePolicy {
    /// The outcome of a failed remote write under this policy.
    pub fn on_failure(self, error: impl fmt::Display) -> SyncOutcome {
        let error = error.to_string();
        match self {
            RemoteFailurePolicy::KeepLocal => SyncOutcome::KeptLocal { error },
            RemoteFailurePolicy::RevertLocal => SyncOutcome::Reverted { error },
        }
    }
}
