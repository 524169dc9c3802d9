//! crates/tutor_portal_core/src/records.rs
//!
//! Row shapes exchanged with the remote sheet endpoints, keyed by the sheet's
//! column headers, plus the conversions from rows into domain types.
//!
//! Sheets are loosely typed: an id column may come back as a number, a time
//! column as a fraction of a day. Everything here deserialises leniently.

use crate::domain::{
    AllocationStatus, Allocation, AttendanceMark, FileCategory, SessionFile, SubjectCatalogItem,
};
use crate::time::{format_api_date, format_api_time, TimeValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

//=========================================================================================
// Lenient Field Helpers
//=========================================================================================

/// Renders a loosely typed cell as text: `null` is empty, numbers and
/// booleans use their JSON spelling.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn cell_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn cell_strings(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(cell_text).collect(),
        _ => Vec::new(),
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(cell_text(&Value::deserialize(deserializer)?))
}

fn lenient_optional_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        other => Some(cell_text(&other)),
    })
}

/// A list column. Null or non-array cells read as empty; entries that do not
/// fit `T` are skipped.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_category<'de, D: Deserializer<'de>>(deserializer: D) -> Result<FileCategory, D::Error> {
    Ok(serde_json::from_value(Value::deserialize(deserializer)?).unwrap_or_default())
}

/// Splits a comma-joined id column, dropping blanks.
pub fn split_ids(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

//=========================================================================================
// Teacher
//=========================================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeacherRecord {
    #[serde(rename = "Teacher ID", default, deserialize_with = "lenient_string")]
    pub teacher_id: String,
    #[serde(rename = "Name", default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(rename = "Contact", default, deserialize_with = "lenient_string")]
    pub contact: String,
    /// `None` when the sheet has no password for this teacher.
    #[serde(rename = "Password", default, deserialize_with = "lenient_optional_string")]
    pub password: Option<String>,
    #[serde(rename = "Subjects ID(s)", default, deserialize_with = "lenient_string")]
    pub subject_ids: String,
    #[serde(rename = "Mail", default, deserialize_with = "lenient_string")]
    pub mail: String,
    #[serde(rename = "Status", default, deserialize_with = "lenient_string")]
    pub status: String,
}

/// Partial update pushed with `updateByContact`. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeacherUpdate {
    #[serde(rename = "Subjects ID(s)", skip_serializing_if = "Option::is_none")]
    pub subject_ids: Option<String>,
    #[serde(rename = "Password", skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl TeacherUpdate {
    pub fn subjects(ids: &[String]) -> Self {
        Self {
            subject_ids: Some(ids.join(", ")),
            ..Default::default()
        }
    }

    pub fn password(password: impl Into<String>) -> Self {
        Self {
            password: Some(password.into()),
            ..Default::default()
        }
    }
}

//=========================================================================================
// Subject
//=========================================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubjectRecord {
    #[serde(rename = "Subject ID", default, deserialize_with = "lenient_string")]
    pub subject_id: String,
    #[serde(rename = "Category", default, deserialize_with = "lenient_string")]
    pub category: String,
    #[serde(rename = "Board", default, deserialize_with = "lenient_string")]
    pub board: String,
    #[serde(rename = "Level", default, deserialize_with = "lenient_string")]
    pub level: String,
    #[serde(rename = "Subject Name", default, deserialize_with = "lenient_string")]
    pub subject_name: String,
    #[serde(rename = "Structure", default, deserialize_with = "lenient_string")]
    pub structure: String,
    #[serde(rename = "Department", default, deserialize_with = "lenient_string")]
    pub department: String,
    #[serde(rename = "Status", default, deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(rename = "Label", default, deserialize_with = "lenient_string")]
    pub label: String,
    #[serde(rename = "Subject Description", default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(rename = "Stage", default, deserialize_with = "lenient_string")]
    pub stage: String,
    #[serde(rename = "Tags", default)]
    pub tags: Value,
    #[serde(rename = "Subject Code", default, deserialize_with = "lenient_string")]
    pub code: String,
}

fn first_non_empty<'a>(candidates: &[&'a str]) -> Option<&'a str> {
    candidates.iter().copied().find(|c| !c.is_empty())
}

impl SubjectRecord {
    pub fn to_domain(self) -> SubjectCatalogItem {
        let name = first_non_empty(&[self.label.as_str(), self.subject_name.as_str()])
            .unwrap_or("Unnamed Subject")
            .to_string();
        let label = first_non_empty(&[self.label.as_str(), self.subject_name.as_str()])
            .unwrap_or_default()
            .to_string();
        let description = first_non_empty(&[self.description.as_str(), self.structure.as_str()])
            .unwrap_or_default()
            .to_string();
        let tags = match &self.tags {
            Value::String(joined) if !joined.is_empty() => {
                joined.split(',').map(|t| t.trim().to_string()).collect()
            }
            _ => Vec::new(),
        };
        let status = if self.status.is_empty() {
            "Active".to_string()
        } else {
            self.status
        };

        SubjectCatalogItem {
            id: self.subject_id,
            name,
            category: self.category,
            board: self.board,
            level: self.level,
            department: self.department,
            stage: self.stage,
            description,
            code: self.code,
            tags,
            status,
            label,
        }
    }
}

//=========================================================================================
// Availability
//=========================================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AvailabilityRecord {
    #[serde(
        rename = "Available ID",
        alias = "AvailableID",
        alias = "available_id",
        default,
        deserialize_with = "lenient_string"
    )]
    pub available_id: String,
    #[serde(rename = "Teacher ID", default, deserialize_with = "lenient_string")]
    pub teacher_id: String,
    #[serde(rename = "Weekday", alias = "weekday", default, deserialize_with = "lenient_string")]
    pub weekday: String,
    #[serde(rename = "Start Time", alias = "StartTime", alias = "start_time", default)]
    pub start_time: TimeValue,
    #[serde(rename = "End Time", alias = "EndTime", alias = "end_time", default)]
    pub end_time: TimeValue,
}

/// Body of the availability `add` action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAvailability {
    #[serde(rename = "Teacher ID")]
    pub teacher_id: String,
    #[serde(rename = "Weekday")]
    pub weekday: String,
    #[serde(rename = "Start Time")]
    pub start_time: String,
    #[serde(rename = "End Time")]
    pub end_time: String,
}

/// Body of the availability `update` action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AvailabilityUpdate {
    #[serde(rename = "Start Time", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(rename = "End Time", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(rename = "Weekday", skip_serializing_if = "Option::is_none")]
    pub weekday: Option<String>,
}

//=========================================================================================
// Allocation
//=========================================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AllocationRecord {
    #[serde(rename = "Teacher Assign ID", default, deserialize_with = "lenient_string")]
    pub assign_id: String,
    #[serde(rename = "Class Room ID", default, deserialize_with = "lenient_string")]
    pub class_room_id: String,
    #[serde(rename = "Meet Link", default, deserialize_with = "lenient_string")]
    pub meet_link: String,
    #[serde(rename = "Subject ID", default, deserialize_with = "lenient_string")]
    pub subject_id: String,
    #[serde(rename = "Subject Label", default, deserialize_with = "lenient_optional_string")]
    pub subject_label: Option<String>,
    #[serde(rename = "Teacher ID", default, deserialize_with = "lenient_string")]
    pub teacher_id: String,
    #[serde(rename = "Start Date", default, deserialize_with = "lenient_string")]
    pub start_date: String,
    #[serde(rename = "Sessions per day", default)]
    pub sessions_per_day: Value,
    #[serde(rename = "Start Time", default, deserialize_with = "lenient_string")]
    pub start_time: String,
    #[serde(rename = "End Time", default, deserialize_with = "lenient_string")]
    pub end_time: String,
    #[serde(rename = "Days", default, deserialize_with = "lenient_string")]
    pub days: String,
    #[serde(rename = "Status", default, deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(rename = "Week Cycle", default)]
    pub week_cycle: Value,
    #[serde(rename = "End Date Req", default)]
    pub end_date_req: Value,
    #[serde(rename = "Class Count Req", default)]
    pub class_count_req: Value,
    #[serde(rename = "Interactive Session", default)]
    pub interactive: Value,
    #[serde(rename = "Student IDs", default)]
    pub student_ids: Value,
    #[serde(rename = "Student Names", default)]
    pub student_names: Value,
}

impl AllocationRecord {
    pub fn to_domain(self) -> Allocation {
        let meet_link = if self.meet_link.is_empty() {
            "#".to_string()
        } else {
            self.meet_link
        };
        let sessions_per_day = cell_number(&self.sessions_per_day)
            .filter(|n| *n > 0.0)
            .map_or(0, |n| n as u32);
        let week_cycle = cell_number(&self.week_cycle)
            .filter(|n| *n > 0.0)
            .map_or(1, |n| n as u32);
        let is_interactive = match &self.interactive {
            Value::Bool(b) => *b,
            Value::String(s) => s == "true" || s == "TRUE",
            _ => false,
        };
        let end_date_req = is_truthy(&self.end_date_req).then(|| cell_text(&self.end_date_req));
        let class_count_req = Some(cell_text(&self.class_count_req)).filter(|s| !s.is_empty());

        Allocation {
            assign_id: self.assign_id,
            class_room_id: self.class_room_id,
            meet_link,
            subject_id: self.subject_id,
            subject_label: self.subject_label,
            student_ids: cell_strings(&self.student_ids),
            student_names: cell_strings(&self.student_names),
            teacher_id: self.teacher_id,
            start_date: format_api_date(&self.start_date),
            sessions_per_day,
            start_time: format_api_time(&self.start_time),
            end_time: format_api_time(&self.end_time),
            days: self.days,
            status: AllocationStatus::from(self.status.as_str()),
            week_cycle,
            is_interactive,
            end_date_req,
            class_count_req,
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

//=========================================================================================
// Session
//=========================================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SessionFileRecord {
    #[serde(rename = "Timestamp", default, deserialize_with = "lenient_string")]
    pub timestamp: String,
    #[serde(rename = "Email address", default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(rename = "Session ID", default, deserialize_with = "lenient_string")]
    pub session_id: String,
    #[serde(rename = "File Name", default, deserialize_with = "lenient_string")]
    pub file_name: String,
    #[serde(rename = "Upload File", default, deserialize_with = "lenient_string")]
    pub upload_file: String,
    #[serde(rename = "Type", default, deserialize_with = "lenient_category")]
    pub category: FileCategory,
}

impl SessionFileRecord {
    pub fn to_domain(self) -> SessionFile {
        SessionFile {
            timestamp: self.timestamp,
            email: self.email,
            session_id: self.session_id,
            file_name: self.file_name,
            link: self.upload_file,
            category: self.category,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionRecord {
    #[serde(rename = "Session ID", default, deserialize_with = "lenient_string")]
    pub session_id: String,
    #[serde(rename = "Class Room ID", default, deserialize_with = "lenient_string")]
    pub class_room_id: String,
    #[serde(rename = "Teacher Assign ID", default, deserialize_with = "lenient_optional_string")]
    pub teacher_assign_id: Option<String>,
    /// Comma-joined roster.
    #[serde(rename = "Student ID", default, deserialize_with = "lenient_string")]
    pub student_ids: String,
    #[serde(rename = "Subject ID", default, deserialize_with = "lenient_string")]
    pub subject_id: String,
    #[serde(rename = "Teacher ID", default, deserialize_with = "lenient_string")]
    pub teacher_id: String,
    #[serde(rename = "Date", default, deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(rename = "Start Time", default)]
    pub start_time: TimeValue,
    #[serde(rename = "End Time", default)]
    pub end_time: TimeValue,
    #[serde(rename = "Status", default, deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(rename = "Subject label", default, deserialize_with = "lenient_string")]
    pub subject_label: String,
    #[serde(rename = "Subject name", default, deserialize_with = "lenient_string")]
    pub subject_name: String,
    #[serde(rename = "Topic covered", default, deserialize_with = "lenient_string")]
    pub topic_covered: String,
    #[serde(rename = "Started Time", default)]
    pub started_time: TimeValue,
    #[serde(rename = "Ended Time", default)]
    pub ended_time: TimeValue,
    #[serde(rename = "Files", default, deserialize_with = "lenient_list")]
    pub files: Vec<SessionFileRecord>,
}

/// Partial update pushed with `updateBySessionId`. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionUpdate {
    #[serde(rename = "Status", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "Topic covered", skip_serializing_if = "Option::is_none")]
    pub topic_covered: Option<String>,
    #[serde(rename = "Started Time", skip_serializing_if = "Option::is_none")]
    pub started_time: Option<String>,
    #[serde(rename = "Ended Time", skip_serializing_if = "Option::is_none")]
    pub ended_time: Option<String>,
}

impl SessionUpdate {
    pub fn completed() -> Self {
        Self {
            status: Some("Completed".to_string()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.topic_covered.is_none()
            && self.started_time.is_none()
            && self.ended_time.is_none()
    }
}

//=========================================================================================
// Student and Student Log
//=========================================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentRecord {
    #[serde(rename = "Student ID", default, deserialize_with = "lenient_string")]
    pub student_id: String,
    #[serde(rename = "Student Name", default, deserialize_with = "lenient_string")]
    pub student_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentLogRecord {
    #[serde(rename = "Session ID", default, deserialize_with = "lenient_string")]
    pub session_id: String,
    #[serde(rename = "Student ID", default, deserialize_with = "lenient_string")]
    pub student_id: String,
    #[serde(rename = "Student Name", default, deserialize_with = "lenient_optional_string")]
    pub student_name: Option<String>,
    #[serde(rename = "Status", default, deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(rename = "Rating", default)]
    pub rating: Value,
    #[serde(rename = "Comment", default, deserialize_with = "lenient_string")]
    pub comment: String,
}

impl StudentLogRecord {
    pub fn is_present(&self) -> bool {
        self.status == "Present"
    }

    /// Rating as stored, 0 when blank or unreadable.
    pub fn rating(&self) -> u8 {
        cell_number(&self.rating)
            .filter(|n| n.is_finite() && *n > 0.0)
            .map_or(0, |n| n.min(5.0) as u8)
    }
}

/// One row of a `bulkAdd` request to the student log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentLogEntry {
    pub session_id: String,
    pub student_id: String,
    pub status: String,
    pub rating: u8,
    pub comment: String,
}

impl StudentLogEntry {
    pub fn new(session_id: &str, student_id: &str, mark: AttendanceMark, rating: u8, comment: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            student_id: student_id.to_string(),
            status: mark.to_string(),
            rating,
            comment: comment.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn allocation_rows_fill_in_defaults() {
        let record: AllocationRecord = serde_json::from_value(json!({
            "Teacher Assign ID": "TAS114",
            "Class Room ID": "Edstaq c3 aria (maths)",
            "Meet Link": "",
            "Subject ID": "SUB159",
            "Teacher ID": "TCH103",
            "Start Date": "-",
            "Sessions per day": "",
            "Start Time": "07:30pm",
            "End Time": "-",
            "Days": "Monday",
            "Status": "",
            "Week Cycle": "2",
            "Interactive Session": "TRUE",
            "Class Count Req": 24,
            "Student IDs": ["STD111"],
            "Student Names": "not a list"
        }))
        .unwrap();

        let allocation = record.to_domain();
        assert_eq!(allocation.meet_link, "#");
        assert_eq!(allocation.sessions_per_day, 0);
        assert_eq!(allocation.week_cycle, 2);
        assert_eq!(allocation.status, AllocationStatus::Active);
        assert!(allocation.is_interactive);
        assert_eq!(allocation.start_date, "-");
        assert_eq!(allocation.start_time, "07:30pm");
        assert_eq!(allocation.end_time, "-");
        assert_eq!(allocation.class_count_req.as_deref(), Some("24"));
        assert_eq!(allocation.end_date_req, None);
        assert_eq!(allocation.student_ids, vec!["STD111"]);
        assert!(allocation.student_names.is_empty());
        assert_eq!(allocation.student_display_names(), vec!["Student STD111"]);
    }

    #[test]
    fn subject_rows_prefer_labels_and_split_tags() {
        let record: SubjectRecord = serde_json::from_value(json!({
            "Subject ID": 227,
            "Subject Name": "Mathematics",
            "Label": "CBSE Mathematics - Grade 6",
            "Structure": "Algebra, Geometry",
            "Tags": "cbse, grade6 ,maths"
        }))
        .unwrap();

        let item = record.to_domain();
        assert_eq!(item.id, "227");
        assert_eq!(item.name, "CBSE Mathematics - Grade 6");
        assert_eq!(item.description, "Algebra, Geometry");
        assert_eq!(item.tags, vec!["cbse", "grade6", "maths"]);
        assert_eq!(item.status, "Active");
    }

    #[test]
    fn unnamed_subjects_get_a_placeholder_name() {
        let item = SubjectRecord::default().to_domain();
        assert_eq!(item.name, "Unnamed Subject");
        assert_eq!(item.label, "");
    }

    #[test]
    fn teacher_password_absent_vs_numeric() {
        let open: TeacherRecord =
            serde_json::from_value(json!({"Teacher ID": "TCH1", "Contact": 9999999999u64})).unwrap();
        assert_eq!(open.password, None);
        assert_eq!(open.contact, "9999999999");

        let numeric: TeacherRecord =
            serde_json::from_value(json!({"Teacher ID": "TCH1", "Password": 1234})).unwrap();
        assert_eq!(numeric.password.as_deref(), Some("1234"));

        let null: TeacherRecord =
            serde_json::from_value(json!({"Teacher ID": "TCH1", "Password": null})).unwrap();
        assert_eq!(null.password, None);
    }

    #[test]
    fn availability_rows_accept_alternate_headers() {
        let record: AvailabilityRecord = serde_json::from_value(json!({
            "available_id": "AV9",
            "weekday": "tuesday",
            "StartTime": 0.375,
            "end_time": "11:00 am"
        }))
        .unwrap();
        assert_eq!(record.available_id, "AV9");
        assert_eq!(record.weekday, "tuesday");
        assert_eq!(record.start_time, TimeValue::Fraction(0.375));
        assert_eq!(record.end_time, TimeValue::Text("11:00 am".into()));
    }

    #[test]
    fn partial_updates_only_carry_set_fields() {
        let body = serde_json::to_value(SessionUpdate {
            topic_covered: Some("Fractions".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(body, json!({"Topic covered": "Fractions"}));

        let subjects = serde_json::to_value(TeacherUpdate::subjects(&["A".into(), "B".into()])).unwrap();
        assert_eq!(subjects, json!({"Subjects ID(s)": "A, B"}));
    }

    #[test]
    fn log_ratings_are_clamped_and_defaulted() {
        let mut log = StudentLogRecord {
            rating: json!("4"),
            ..Default::default()
        };
        assert_eq!(log.rating(), 4);
        log.rating = json!("");
        assert_eq!(log.rating(), 0);
        log.rating = json!(9);
        assert_eq!(log.rating(), 5);
    }

    #[test]
    fn split_ids_drops_blanks() {
        assert_eq!(split_ids(" STD1, ,STD2,"), vec!["STD1", "STD2"]);
        assert!(split_ids("").is_empty());
    }

    #[test]
    fn malformed_file_columns_do_not_sink_the_row() {
        let nulled: SessionRecord =
            serde_json::from_value(json!({"Session ID": "A", "Files": null})).unwrap();
        assert!(nulled.files.is_empty());

        let scalar: SessionRecord =
            serde_json::from_value(json!({"Session ID": "A", "Files": "none"})).unwrap();
        assert!(scalar.files.is_empty());

        let mixed: SessionRecord = serde_json::from_value(json!({
            "Session ID": "A",
            "Files": [
                {"File Name": "notes.pdf", "Type": null},
                {"File Name": "board.jpg", "Type": "Session Proof"},
                {"File Name": "quiz.pdf", "Type": 3},
                "stray"
            ]
        }))
        .unwrap();
        let categories: Vec<FileCategory> = mixed.files.iter().map(|f| f.category).collect();
        assert_eq!(
            categories,
            [FileCategory::Other, FileCategory::SessionProof, FileCategory::Other]
        );
    }
}
