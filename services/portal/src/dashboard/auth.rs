//! services/portal/src/dashboard/auth.rs
//!
//! Contact-and-password sign-in and the change-password flow.

use super::state::Dashboard;
use tracing::{error, info, warn};
use tutor_portal_core::domain::{TeacherProfile, TeacherStatus};
use tutor_portal_core::records::{split_ids, TeacherUpdate};
use tutor_portal_core::PortalError;

const MIN_PASSWORD_LEN: usize = 6;

fn validation(message: &str) -> PortalError {
    PortalError::ValidationFailure(message.to_string())
}

impl Dashboard {
    /// Looks the teacher up by contact number and compares the stored password.
    ///
    /// A teacher row without a password column is let in with a warning; the
    /// sheet predates passwords for some tutors.
    pub async fn login(&mut self, contact: &str, password: &str) -> Result<(), PortalError> {
        let contact = contact.trim();
        if contact.is_empty() || password.is_empty() {
            return Err(validation("Please enter both contact number and password"));
        }

        let teacher = self
            .remote
            .teachers
            .get_teacher_by_contact(contact)
            .await
            .map_err(|e| {
                error!("Login lookup failed for {}: {}", contact, e);
                PortalError::NetworkOrRemoteFailure("An error occurred. Please try again.".to_string())
            })?
            .ok_or(PortalError::NotFound)?;

        match teacher.password.as_deref() {
            Some(stored) if stored != password => return Err(PortalError::InvalidCredential),
            Some(_) => {}
            None => warn!("Teacher {} has no password on record; signing in without a check", teacher.teacher_id),
        }

        self.profile = TeacherProfile {
            id: teacher.teacher_id,
            name: teacher.name,
            email: teacher.mail,
            mobile: teacher.contact,
            subjects: split_ids(&teacher.subject_ids),
            availability: Vec::new(),
            status: TeacherStatus::from_remote(&teacher.status),
        };
        self.authenticated = true;
        self.persist();
        info!("Teacher {} signed in", self.profile.id);
        Ok(())
    }

    /// Verifies the current password against the sheet before writing the new one.
    pub async fn change_password(
        &self,
        current: &str,
        new: &str,
        confirm: &str,
    ) -> Result<(), PortalError> {
        if current.is_empty() || new.is_empty() || confirm.is_empty() {
            return Err(validation("All fields are required"));
        }
        if new != confirm {
            return Err(validation("New passwords do not match"));
        }
        if new.chars().count() < MIN_PASSWORD_LEN {
            return Err(validation("Password must be at least 6 characters long"));
        }

        let mobile = &self.profile.mobile;
        let teacher = match self.remote.teachers.get_teacher_by_contact(mobile).await {
            Ok(Some(teacher)) => teacher,
            Ok(None) => return Err(validation("Failed to verify account details")),
            Err(e) => {
                error!("Password check lookup failed: {}", e);
                return Err(validation("Failed to verify account details"));
            }
        };
        if teacher.password.as_deref() != Some(current) {
            return Err(validation("Current password is incorrect"));
        }

        self.remote
            .teachers
            .update_teacher(mobile, &TeacherUpdate::password(new))
            .await
            .map_err(|e| {
                error!("Password update failed: {}", e);
                PortalError::NetworkOrRemoteFailure(
                    "Failed to update password. Please try again.".to_string(),
                )
            })?;
        info!("Password changed for teacher {}", self.profile.id);
        Ok(())
    }
}
