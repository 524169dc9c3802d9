//! crates/tutor_portal_core/src/domain.rs
//!
//! Defines the core data structures the dashboard works with.
//! These are the UI-facing shapes; the remote sheet rows live in `records`.

use crate::time::StartInstant;
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;

//=========================================================================================
// Sessions
//=========================================================================================

/// Lifecycle of a teaching session. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    Upcoming,
    InProgress,
    Completed,
}

impl SessionStatus {
    /// Maps the remote status vocabulary. Anything that is neither completed
    /// nor recognisably scheduled is taken to be in progress.
    pub fn from_remote(status: &str) -> Self {
        match status.to_uppercase().as_str() {
            "COMPLETED" => SessionStatus::Completed,
            "SCHEDULED" | "UPCOMING" | "" => SessionStatus::Upcoming,
            _ => SessionStatus::InProgress,
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionStatus::Upcoming => "UPCOMING",
            SessionStatus::InProgress => "IN_PROGRESS",
            SessionStatus::Completed => "COMPLETED",
        })
    }
}

/// One student's attendance record, scoped to a single session's roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub attended: bool,
    /// 1-5 once set, 0 while unset.
    pub rating: u8,
    pub review: String,
}

impl Student {
    pub fn unmarked(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            attended: false,
            rating: 0,
            review: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FileCategory {
    #[serde(rename = "Learn Docs")]
    LearnDocs,
    #[serde(rename = "Session Proof")]
    SessionProof,
    #[serde(other)]
    #[default]
    Other,
}

/// A file attached to a session through the upload form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFile {
    pub timestamp: String,
    pub email: String,
    pub session_id: String,
    pub file_name: String,
    /// External link to the uploaded file.
    pub link: String,
    pub category: FileCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub allocation_id: Option<String>,
    pub subject: String,
    pub class_name: String,
    pub start_time: StartInstant,
    pub duration_minutes: u32,
    pub status: SessionStatus,
    pub students: Vec<Student>,
    pub files: Vec<SessionFile>,
    /// Empty until the tutor records it.
    pub topic_covered: String,
    pub started_time: String,
    pub ended_time: String,
}

impl Session {
    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed
    }

    pub fn has_session_proof(&self) -> bool {
        self.files.iter().any(|f| f.category == FileCategory::SessionProof)
    }

    pub fn files_of(&self, category: FileCategory) -> impl Iterator<Item = &SessionFile> {
        self.files.iter().filter(move |f| f.category == category)
    }
}

//=========================================================================================
// Allocations
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AllocationStatus {
    Active,
    Hold,
    Closed,
    Other(String),
}

impl From<&str> for AllocationStatus {
    fn from(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_lowercase().as_str() {
            "" | "active" => AllocationStatus::Active,
            "hold" => AllocationStatus::Hold,
            "closed" => AllocationStatus::Closed,
            _ => AllocationStatus::Other(trimmed.to_string()),
        }
    }
}

impl fmt::Display for AllocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationStatus::Active => f.write_str("Active"),
            AllocationStatus::Hold => f.write_str("Hold"),
            AllocationStatus::Closed => f.write_str("Closed"),
            AllocationStatus::Other(other) => f.write_str(other),
        }
    }
}

/// A teacher's standing assignment to one class room and subject.
/// Read-only from the dashboard's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub assign_id: String,
    pub class_room_id: String,
    pub meet_link: String,
    pub subject_id: String,
    pub subject_label: Option<String>,
    pub student_ids: Vec<String>,
    pub student_names: Vec<String>,
    pub teacher_id: String,
    pub start_date: String,
    pub sessions_per_day: u32,
    pub start_time: String,
    pub end_time: String,
    pub days: String,
    pub status: AllocationStatus,
    pub week_cycle: u32,
    pub is_interactive: bool,
    pub end_date_req: Option<String>,
    pub class_count_req: Option<String>,
}

impl Allocation {
    /// Names to show for the allocation's students, falling back to ids.
    pub fn student_display_names(&self) -> Vec<String> {
        if !self.student_names.is_empty() {
            return self.student_names.clone();
        }
        self.student_ids.iter().map(|id| fallback_student_name(id)).collect()
    }
}

/// Name shown for a student whose real name could not be resolved.
pub fn fallback_student_name(id: &str) -> String {
    format!("Student {}", id)
}

//=========================================================================================
// Availability
//=========================================================================================

/// One bookable range on a weekday. `id` is `None` until the slot has been
/// persisted remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: Option<String>,
    pub start: String,
    pub end: String,
}

impl Slot {
    pub fn unsaved(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            id: None,
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn saved(id: impl Into<String>, start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            start: start.into(),
            end: end.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAvailability {
    pub day: Weekday,
    pub slots: Vec<Slot>,
}

/// Full English weekday name, the form the availability sheet stores.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

//=========================================================================================
// Teacher Profile
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeacherStatus {
    Active,
    #[serde(rename = "In-Active")]
    Inactive,
}

impl TeacherStatus {
    pub fn from_remote(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "active" => Some(TeacherStatus::Active),
            "in-active" | "inactive" => Some(TeacherStatus::Inactive),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            TeacherStatus::Active => TeacherStatus::Inactive,
            TeacherStatus::Inactive => TeacherStatus::Active,
        }
    }
}

/// The authenticated teacher. Root aggregate of the dashboard, mirrored to
/// the local store between runs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TeacherProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub subjects: Vec<String>,
    #[serde(default)]
    pub availability: Vec<DayAvailability>,
    #[serde(default)]
    pub status: Option<TeacherStatus>,
}

//=========================================================================================
// Subject Catalog
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectCatalogItem {
    pub id: String,
    pub name: String,
    pub category: String,
    pub board: String,
    pub level: String,
    pub department: String,
    pub stage: String,
    pub description: String,
    pub code: String,
    pub tags: Vec<String>,
    pub status: String,
    pub label: String,
}

//=========================================================================================
// Student Logs
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceMark {
    Present,
    Absent,
}

impl fmt::Display for AttendanceMark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AttendanceMark::Present => "Present",
            AttendanceMark::Absent => "Absent",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_status_vocabulary() {
        assert_eq!(SessionStatus::from_remote("Completed"), SessionStatus::Completed);
        assert_eq!(SessionStatus::from_remote("COMPLETED"), SessionStatus::Completed);
        assert_eq!(SessionStatus::from_remote("Scheduled"), SessionStatus::Upcoming);
        assert_eq!(SessionStatus::from_remote("upcoming"), SessionStatus::Upcoming);
        assert_eq!(SessionStatus::from_remote(""), SessionStatus::Upcoming);
        assert_eq!(SessionStatus::from_remote("Started"), SessionStatus::InProgress);
        assert_eq!(SessionStatus::from_remote("Cancelled"), SessionStatus::InProgress);
    }

    #[test]
    fn allocation_status_keeps_unknown_labels() {
        assert_eq!(AllocationStatus::from("active"), AllocationStatus::Active);
        assert_eq!(AllocationStatus::from(""), AllocationStatus::Active);
        assert_eq!(AllocationStatus::from("HOLD"), AllocationStatus::Hold);
        assert_eq!(
            AllocationStatus::from("Paused"),
            AllocationStatus::Other("Paused".into())
        );
        assert_eq!(AllocationStatus::from("Paused").to_string(), "Paused");
    }

    #[test]
    fn file_categories_round_trip_through_their_labels() {
        let proof: FileCategory = serde_json::from_str("\"Session Proof\"").unwrap();
        assert_eq!(proof, FileCategory::SessionProof);
        let unknown: FileCategory = serde_json::from_str("\"Homework\"").unwrap();
        assert_eq!(unknown, FileCategory::Other);
    }

    #[test]
    fn profile_json_without_optional_fields_still_loads() {
        let json = r#"{"id":"TCH108","name":"Asha","email":"","mobile":"9999999999","subjects":["SUB1"]}"#;
        let profile: TeacherProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.id, "TCH108");
        assert!(profile.availability.is_empty());
        assert_eq!(profile.status, None);
    }
}
