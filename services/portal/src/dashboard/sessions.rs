//! services/portal/src/dashboard/sessions.rs
//!
//! Loading the tutor's sessions and allocations, and the attendance flow
//! that completes a session.

use super::state::Dashboard;
use chrono::Local;
use tracing::{error, info, warn};
use tutor_portal_core::attendance::AttendanceSheet;
use tutor_portal_core::domain::{Session, SessionStatus};
use tutor_portal_core::placeholder::placeholder_sessions;
use tutor_portal_core::records::SessionUpdate;
use tutor_portal_core::{PortalError, SyncOutcome};

impl Dashboard {
    /// Fetches sessions and allocations concurrently. Returns `false` without
    /// touching anything when nobody is signed in.
    ///
    /// When the sheet holds no sessions for the tutor, demonstration
    /// placeholders are shown instead.
    pub async fn bootstrap(&mut self) -> bool {
        if !self.authenticated || self.profile.id.is_empty() {
            return false;
        }

        let teacher_id = self.profile.id.clone();
        let sessions_port = self.remote.sessions.clone();
        let (sessions, allocations) = tokio::join!(
            self.assembler.fetch_for_teacher(sessions_port.as_ref(), &teacher_id),
            self.remote.allocations.fetch_by_teacher_id(&teacher_id),
        );

        self.allocations = match allocations {
            Ok(records) => records.into_iter().map(|r| r.to_domain()).collect(),
            Err(e) => {
                error!("Error fetching allocations for teacher {}: {}", teacher_id, e);
                Vec::new()
            }
        };

        let mut sessions = if sessions.is_empty() {
            info!("No sessions on record for {}; showing placeholders", teacher_id);
            placeholder_sessions(Local::now().naive_local())
        } else {
            sessions
        };
        sessions.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        self.sessions = sessions;

        info!(
            "Loaded {} sessions and {} allocations",
            self.sessions.len(),
            self.allocations.len()
        );
        true
    }

    /// Replaces the session locally, marks it completed, then tells the sheet.
    pub async fn complete_session(&mut self, updated: Session) -> SyncOutcome {
        let Some(index) = self.sessions.iter().position(|s| s.id == updated.id) else {
            warn!("Ignoring completion of unknown session {}", updated.id);
            return SyncOutcome::Skipped;
        };

        let session_id = updated.id.clone();
        let previous = std::mem::replace(
            &mut self.sessions[index],
            Session {
                status: SessionStatus::Completed,
                ..updated
            },
        );

        match self
            .remote
            .sessions
            .update_session(&session_id, &SessionUpdate::completed())
            .await
        {
            Ok(()) => SyncOutcome::Synced,
            Err(e) => {
                error!("Failed to mark session {} completed: {}", session_id, e);
                let outcome = self.policy.on_failure(&e);
                if matches!(outcome, SyncOutcome::Reverted { .. }) {
                    self.sessions[index] = previous;
                }
                outcome
            }
        }
    }

    /// Opens an attendance sheet with any previously saved logs merged in.
    pub async fn open_attendance(&self, session_id: &str) -> Result<AttendanceSheet, PortalError> {
        let session = self
            .session(session_id)
            .cloned()
            .ok_or_else(|| PortalError::ValidationFailure(format!("Unknown session {}", session_id)))?;

        let mut sheet = AttendanceSheet::new(session);
        match self.remote.student_logs.fetch_by_session_id(session_id).await {
            Ok(logs) => sheet.merge_logs(&logs),
            Err(e) => error!("Error fetching saved logs for session {}: {}", session_id, e),
        }
        Ok(sheet)
    }

    /// Validates the sheet, writes the student logs, writes any edited
    /// record-of-session fields, then completes the session.
    ///
    /// A completed sheet is read-only and saving it is a no-op.
    pub async fn save_attendance(&mut self, sheet: &AttendanceSheet) -> Result<SyncOutcome, PortalError> {
        if sheet.is_locked() {
            return Ok(SyncOutcome::Skipped);
        }
        sheet.validate()?;

        let session_id = sheet.session().id.clone();
        self.remote
            .student_logs
            .bulk_add(&sheet.log_entries())
            .await
            .map_err(|e| {
                error!("Failed to save student logs for session {}: {}", session_id, e);
                PortalError::NetworkOrRemoteFailure(
                    "Failed to save session records. Please try again.".to_string(),
                )
            })?;

        if let Some(update) = sheet.session_update() {
            if let Err(e) = self.remote.sessions.update_session(&session_id, &update).await {
                error!("Failed to save record of session {}: {}", session_id, e);
            }
        }

        Ok(self.complete_session(sheet.to_session()).await)
    }

    /// Re-reads the tutor's sessions and refreshes the files of the sheet's
    /// session, both on the sheet and in the session list.
    pub async fn refresh_session_files(&mut self, sheet: &mut AttendanceSheet) -> Result<(), PortalError> {
        let session_id = sheet.session().id.clone();
        let records = self
            .remote
            .sessions
            .fetch_by_teacher_id(&self.profile.id)
            .await
            .map_err(|e| {
                error!("Error refreshing files for session {}: {}", session_id, e);
                PortalError::from(e)
            })?;

        let Some(record) = records.into_iter().find(|r| r.session_id == session_id) else {
            warn!("Session {} no longer listed; files left unchanged", session_id);
            return Ok(());
        };
        let files: Vec<_> = record.files.into_iter().map(|f| f.to_domain()).collect();

        if let Some(session) = self.sessions.iter_mut().find(|s| s.id == session_id) {
            session.files = files.clone();
        }
        sheet.set_files(files);
        Ok(())
    }
}
