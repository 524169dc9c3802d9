//! crates/tutor_portal_core/src/attendance.rs
//!
//! Editing state for recording one session's attendance. A sheet is
//! editable until its session is completed; after that every mutation is
//! refused with `AttendanceError::Locked`.

use crate::domain::{AttendanceMark, Session, SessionFile, Student};
use crate::records::{SessionUpdate, StudentLogEntry, StudentLogRecord};

pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttendanceError {
    #[error("This session is completed and can no longer be edited.")]
    Locked,

    #[error("Please enter both Started Time and Ended Time.")]
    MissingTimes,

    #[error("Please enter the Topic Covered.")]
    MissingTopic,

    #[error("Please mark at least one student as present.")]
    NoStudentPresent,

    #[error("Please provide a rating for all present students. Missing ratings for: {}", .0.join(", "))]
    MissingRatings(Vec<String>),

    #[error("Please upload a Session Proof before saving the record.")]
    MissingSessionProof,

    #[error("Rating must be between 0 and 5, got {0}.")]
    RatingOutOfRange(u8),

    #[error("Student {0} is not on this session's roster.")]
    UnknownStudent(String),
}

/// A working copy of a session's roster and record-of-session fields.
#[derive(Debug, Clone)]
pub struct AttendanceSheet {
    original: Session,
    pub students: Vec<Student>,
    pub topic_covered: String,
    pub started_time: String,
    pub ended_time: String,
}

impl AttendanceSheet {
    pub fn new(session: Session) -> Self {
        Self {
            students: session.students.clone(),
            topic_covered: session.topic_covered.clone(),
            started_time: session.started_time.clone(),
            ended_time: session.ended_time.clone(),
            original: session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.original
    }

    pub fn is_locked(&self) -> bool {
        self.original.is_completed()
    }

    fn ensure_editable(&self) -> Result<(), AttendanceError> {
        if self.is_locked() {
            Err(AttendanceError::Locked)
        } else {
            Ok(())
        }
    }

    fn student_mut(&mut self, student_id: &str) -> Result<&mut Student, AttendanceError> {
        self.students
            .iter_mut()
            .find(|s| s.id == student_id)
            .ok_or_else(|| AttendanceError::UnknownStudent(student_id.to_string()))
    }

    /// Overlays previously saved logs onto the roster. Students without a
    /// log keep their current state.
    pub fn merge_logs(&mut self, logs: &[StudentLogRecord]) {
        for student in &mut self.students {
            let Some(log) = logs.iter().find(|l| l.student_id == student.id) else {
                continue;
            };
            if let Some(name) = log.student_name.as_deref().filter(|n| !n.is_empty()) {
                student.name = name.to_string();
            }
            student.attended = log.is_present();
            student.rating = log.rating();
            student.review = log.comment.clone();
        }
    }

    /// Replaces the attached files, e.g. after the tutor uploaded a proof.
    pub fn set_files(&mut self, files: Vec<SessionFile>) {
        self.original.files = files;
    }

    pub fn toggle_attendance(&mut self, student_id: &str) -> Result<(), AttendanceError> {
        self.ensure_editable()?;
        let student = self.student_mut(student_id)?;
        student.attended = !student.attended;
        Ok(())
    }

    /// Marks one student present or absent. Repeating a call changes nothing.
    pub fn set_attendance(&mut self, student_id: &str, attended: bool) -> Result<(), AttendanceError> {
        self.ensure_editable()?;
        self.student_mut(student_id)?.attended = attended;
        Ok(())
    }

    pub fn set_all_attendance(&mut self, attended: bool) -> Result<(), AttendanceError> {
        self.ensure_editable()?;
        for student in &mut self.students {
            student.attended = attended;
        }
        Ok(())
    }

    /// Sets a rating; 0 clears it.
    pub fn set_rating(&mut self, student_id: &str, rating: u8) -> Result<(), AttendanceError> {
        self.ensure_editable()?;
        if rating > MAX_RATING {
            return Err(AttendanceError::RatingOutOfRange(rating));
        }
        self.student_mut(student_id)?.rating = rating;
        Ok(())
    }

    pub fn set_review(&mut self, student_id: &str, review: &str) -> Result<(), AttendanceError> {
        self.ensure_editable()?;
        self.student_mut(student_id)?.review = review.to_string();
        Ok(())
    }

    pub fn set_topic(&mut self, topic: &str) -> Result<(), AttendanceError> {
        self.ensure_editable()?;
        self.topic_covered = topic.to_string();
        Ok(())
    }

    pub fn set_times(&mut self, started: &str, ended: &str) -> Result<(), AttendanceError> {
        self.ensure_editable()?;
        self.started_time = started.to_string();
        self.ended_time = ended.to_string();
        Ok(())
    }

    /// Applies a rating and review to every present student. A zero rating
    /// or a blank review leaves that field as it was.
    pub fn apply_bulk(&mut self, rating: u8, review: &str) -> Result<(), AttendanceError> {
        self.ensure_editable()?;
        if rating > MAX_RATING {
            return Err(AttendanceError::RatingOutOfRange(rating));
        }
        for student in self.students.iter_mut().filter(|s| s.attended) {
            if rating > 0 {
                student.rating = rating;
            }
            if !review.trim().is_empty() {
                student.review = review.to_string();
            }
        }
        Ok(())
    }

    /// Checks the save preconditions in the order the tutor is asked to fix them.
    pub fn validate(&self) -> Result<(), AttendanceError> {
        self.ensure_editable()?;
        if self.started_time.is_empty() || self.ended_time.is_empty() {
            return Err(AttendanceError::MissingTimes);
        }
        if self.topic_covered.trim().is_empty() {
            return Err(AttendanceError::MissingTopic);
        }

        let present: Vec<&Student> = self.students.iter().filter(|s| s.attended).collect();
        if present.is_empty() {
            return Err(AttendanceError::NoStudentPresent);
        }
        let unrated: Vec<String> = present
            .iter()
            .filter(|s| s.rating == 0)
            .map(|s| s.name.clone())
            .collect();
        if !unrated.is_empty() {
            return Err(AttendanceError::MissingRatings(unrated));
        }

        if !self.original.has_session_proof() {
            return Err(AttendanceError::MissingSessionProof);
        }
        Ok(())
    }

    /// One log row per rostered student; absent students are logged with rating 0.
    pub fn log_entries(&self) -> Vec<StudentLogEntry> {
        self.students
            .iter()
            .map(|s| {
                let (mark, rating) = if s.attended {
                    (AttendanceMark::Present, s.rating)
                } else {
                    (AttendanceMark::Absent, 0)
                };
                StudentLogEntry::new(&self.original.id, &s.id, mark, rating, &s.review)
            })
            .collect()
    }

    /// Record-of-session fields that differ from the fetched session, or
    /// `None` when nothing changed.
    pub fn session_update(&self) -> Option<SessionUpdate> {
        let changed = |edited: &String, before: &String| (edited != before).then(|| edited.clone());
        let update = SessionUpdate {
            status: None,
            topic_covered: changed(&self.topic_covered, &self.original.topic_covered),
            started_time: changed(&self.started_time, &self.original.started_time),
            ended_time: changed(&self.ended_time, &self.original.ended_time),
        };
        (!update.is_empty()).then_some(update)
    }

    /// The session with the edited roster and record fields applied. Status is untouched.
    pub fn to_session(&self) -> Session {
        Session {
            students: self.students.clone(),
            topic_covered: self.topic_covered.clone(),
            started_time: self.started_time.clone(),
            ended_time: self.ended_time.clone(),
            ..self.original.clone()
        }
    }
}
