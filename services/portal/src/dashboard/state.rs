//! services/portal/src/dashboard/state.rs
//!
//! The dashboard state container: it exclusively owns the signed-in
//! profile, the session and allocation lists and the navigation tab, and it
//! is the only thing that talks to the remote collaborators.

use crate::adapters::{
    AllocationSheetAdapter, AvailabilitySheetAdapter, RemoteEndpoint, SessionSheetAdapter,
    StudentLogSheetAdapter, StudentSheetAdapter, SubjectSheetAdapter, TeacherSheetAdapter,
};
use crate::config::Endpoints;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info};
use tutor_portal_core::assembler::SessionAssembler;
use tutor_portal_core::domain::{Allocation, Session, TeacherProfile};
use tutor_portal_core::ports::{
    AllocationService, AvailabilityService, LocalStore, SessionService, StudentLogService,
    StudentService, SubjectService, TeacherService,
};
use tutor_portal_core::RemoteFailurePolicy;

//=========================================================================================
// Durable State Keys
//=========================================================================================

pub const AUTH_KEY: &str = "isAuthenticated";
pub const PROFILE_KEY: &str = "teacherProfile";
pub const TAB_KEY: &str = "activeTab";

//=========================================================================================
// Navigation
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Dashboard,
    Upcoming,
    History,
    Allocation,
    Availability,
}

impl Tab {
    pub fn as_str(self) -> &'static str {
        match self {
            Tab::Dashboard => "dashboard",
            Tab::Upcoming => "upcoming",
            Tab::History => "history",
            Tab::Allocation => "allocation",
            Tab::Availability => "availability",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dashboard" => Ok(Tab::Dashboard),
            "upcoming" => Ok(Tab::Upcoming),
            "history" => Ok(Tab::History),
            "allocation" => Ok(Tab::Allocation),
            "availability" => Ok(Tab::Availability),
            other => Err(format!("unknown tab '{}'", other)),
        }
    }
}

//=========================================================================================
// Remote Collaborators
//=========================================================================================

/// Every remote collaborator, behind its port.
#[derive(Clone)]
pub struct Collaborators {
    pub teachers: Arc<dyn TeacherService>,
    pub subjects: Arc<dyn SubjectService>,
    pub availability: Arc<dyn AvailabilityService>,
    pub allocations: Arc<dyn AllocationService>,
    pub sessions: Arc<dyn SessionService>,
    pub student_logs: Arc<dyn StudentLogService>,
    pub students: Arc<dyn StudentService>,
}

impl Collaborators {
    /// Wires the sheet adapters for every endpoint onto one shared client.
    pub fn from_endpoints(endpoints: &Endpoints, client: reqwest::Client) -> Self {
        let endpoint = |url: &str| RemoteEndpoint::new(client.clone(), url);
        Self {
            teachers: Arc::new(TeacherSheetAdapter::new(endpoint(&endpoints.teacher))),
            subjects: Arc::new(SubjectSheetAdapter::new(endpoint(&endpoints.subject))),
            availability: Arc::new(AvailabilitySheetAdapter::new(endpoint(&endpoints.availability))),
            allocations: Arc::new(AllocationSheetAdapter::new(endpoint(&endpoints.allocation))),
            sessions: Arc::new(SessionSheetAdapter::new(endpoint(&endpoints.session))),
            student_logs: Arc::new(StudentLogSheetAdapter::new(endpoint(&endpoints.student_log))),
            students: Arc::new(StudentSheetAdapter::new(endpoint(&endpoints.student))),
        }
    }
}

//=========================================================================================
// Dashboard
//=========================================================================================

pub struct Dashboard {
    pub(crate) remote: Collaborators,
    pub(crate) store: Arc<dyn LocalStore>,
    pub(crate) assembler: SessionAssembler,
    pub(crate) policy: RemoteFailurePolicy,
    pub(crate) authenticated: bool,
    pub(crate) profile: TeacherProfile,
    pub(crate) active_tab: Tab,
    pub(crate) sessions: Vec<Session>,
    pub(crate) allocations: Vec<Allocation>,
}

impl Dashboard {
    /// A signed-out dashboard. Nothing is read from the store.
    pub fn new(remote: Collaborators, store: Arc<dyn LocalStore>, policy: RemoteFailurePolicy) -> Self {
        let assembler = SessionAssembler::new(remote.students.clone());
        Self {
            remote,
            store,
            assembler,
            policy,
            authenticated: false,
            profile: TeacherProfile::default(),
            active_tab: Tab::default(),
            sessions: Vec::new(),
            allocations: Vec::new(),
        }
    }

    /// Rehydrates the sign-in flag, profile and tab from the store. A stored
    /// profile that cannot be parsed is replaced by the empty profile.
    pub fn restore(remote: Collaborators, store: Arc<dyn LocalStore>, policy: RemoteFailurePolicy) -> Self {
        let mut dashboard = Self::new(remote, store, policy);

        dashboard.authenticated = dashboard.store.get(AUTH_KEY).as_deref() == Some("true");
        if let Some(saved) = dashboard.store.get(PROFILE_KEY) {
            dashboard.profile = serde_json::from_str(&saved).unwrap_or_else(|e| {
                error!("Failed to parse saved teacher profile: {}", e);
                TeacherProfile::default()
            });
        }
        dashboard.active_tab = dashboard
            .store
            .get(TAB_KEY)
            .and_then(|tab| tab.parse().ok())
            .unwrap_or_default();

        dashboard
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn profile(&self) -> &TeacherProfile {
        &self.profile
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn allocations(&self) -> &[Allocation] {
        &self.allocations
    }

    pub fn policy(&self) -> RemoteFailurePolicy {
        self.policy
    }

    pub fn session(&self, session_id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == session_id)
    }

    pub fn set_active_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
        self.persist();
    }

    /// Mirrors the sign-in flag, profile and tab to the store. Store failures
    /// are logged; the in-memory state stays authoritative.
    pub(crate) fn persist(&self) {
        let profile = match serde_json::to_string(&self.profile) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialise teacher profile: {}", e);
                return;
            }
        };
        let writes = [
            (AUTH_KEY, self.authenticated.to_string()),
            (PROFILE_KEY, profile),
            (TAB_KEY, self.active_tab.to_string()),
        ];
        for (key, value) in writes {
            if let Err(e) = self.store.set(key, &value) {
                error!("Failed to persist {}: {}", key, e);
            }
        }
    }

    /// Clears all durable and in-memory state.
    pub fn logout(&mut self) {
        for key in [AUTH_KEY, PROFILE_KEY, TAB_KEY] {
            if let Err(e) = self.store.remove(key) {
                error!("Failed to clear {}: {}", key, e);
            }
        }
        self.authenticated = false;
        self.profile = TeacherProfile::default();
        self.active_tab = Tab::Dashboard;
        self.sessions.clear();
        self.allocations.clear();
        info!("Signed out");
    }
}
