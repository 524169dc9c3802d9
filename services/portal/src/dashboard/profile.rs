//! services/portal/src/dashboard/profile.rs
//!
//! Subject selection and the tutor's own status.

use super::state::Dashboard;
use tracing::{error, info};
use tutor_portal_core::domain::{SubjectCatalogItem, TeacherProfile, TeacherStatus};
use tutor_portal_core::records::TeacherUpdate;
use tutor_portal_core::SyncOutcome;

impl Dashboard {
    /// Sets the tutor's subjects locally, then writes them to the teacher sheet.
    pub async fn update_subjects(&mut self, subject_ids: Vec<String>) -> SyncOutcome {
        let previous = std::mem::replace(&mut self.profile.subjects, subject_ids);
        self.persist();

        let update = TeacherUpdate::subjects(&self.profile.subjects);
        match self.remote.teachers.update_teacher(&self.profile.mobile, &update).await {
            Ok(()) => {
                info!("Saved {} subjects", self.profile.subjects.len());
                SyncOutcome::Synced
            }
            Err(e) => {
                error!("Error updating subjects: {}", e);
                let outcome = self.policy.on_failure(&e);
                if matches!(outcome, SyncOutcome::Reverted { .. }) {
                    self.profile.subjects = previous;
                    self.persist();
                }
                outcome
            }
        }
    }

    /// Applies an edited profile. Only a subject change is written remotely.
    pub async fn update_profile(&mut self, updated: TeacherProfile) -> SyncOutcome {
        let subjects = updated.subjects.clone();
        let changed = subjects != self.profile.subjects;
        self.profile = TeacherProfile {
            subjects: std::mem::take(&mut self.profile.subjects),
            ..updated
        };
        if changed {
            self.update_subjects(subjects).await
        } else {
            self.persist();
            SyncOutcome::Skipped
        }
    }

    /// Flips Active/Inactive. Local only; the sheet is not told.
    pub fn toggle_status(&mut self) -> TeacherStatus {
        let status = self.profile.status.unwrap_or(TeacherStatus::Active).toggled();
        self.profile.status = Some(status);
        self.persist();
        status
    }

    /// Catalog entries for the tutor's selected subjects.
    pub async fn subject_details(&self) -> Vec<SubjectCatalogItem> {
        match self.remote.subjects.get_subjects_by_ids(&self.profile.subjects).await {
            Ok(records) => records
                .into_iter()
                .map(|r| r.to_domain())
                .filter(|item| !item.id.is_empty())
                .collect(),
            Err(e) => {
                error!("Error fetching subject details: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn subject_catalog(&self) -> Vec<SubjectCatalogItem> {
        match self.remote.subjects.get_all_subjects().await {
            Ok(records) => records.into_iter().map(|r| r.to_domain()).collect(),
            Err(e) => {
                error!("Error fetching the subject catalog: {}", e);
                Vec::new()
            }
        }
    }
}
