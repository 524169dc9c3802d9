//! In-memory stand-ins for the remote sheets, shared by the dashboard tests.

#![allow(dead_code)]

use async_trait::async_trait;
use portal_lib::adapters::MemoryStore;
use portal_lib::dashboard::{Collaborators, Dashboard};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tutor_portal_core::ports::*;
use tutor_portal_core::records::*;
use tutor_portal_core::time::TimeValue;
use tutor_portal_core::RemoteFailurePolicy;

pub const CONTACT: &str = "9876543210";
pub const PASSWORD: &str = "secret1";
pub const TEACHER_ID: &str = "T001";

/// Every remote sheet in one place. Reads and writes can be made to fail
/// independently.
#[derive(Default)]
pub struct FakeSheets {
    pub teachers: Mutex<Vec<TeacherRecord>>,
    pub subjects: Mutex<Vec<SubjectRecord>>,
    pub availability: Mutex<Vec<AvailabilityRecord>>,
    pub allocations: Mutex<Vec<AllocationRecord>>,
    pub sessions: Mutex<Vec<SessionRecord>>,
    pub logs: Mutex<Vec<StudentLogRecord>>,
    pub students: Mutex<HashMap<String, String>>,

    pub saved_logs: Mutex<Vec<StudentLogEntry>>,
    pub session_updates: Mutex<Vec<(String, SessionUpdate)>>,
    pub teacher_updates: Mutex<Vec<(String, TeacherUpdate)>>,
    pub availability_writes: AtomicUsize,

    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    next_id: AtomicUsize,
}

impl FakeSheets {
    pub fn new() -> Arc<Self> {
        let sheets = Self::default();
        sheets.teachers.lock().unwrap().push(teacher_row(Some(PASSWORD)));
        Arc::new(sheets)
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn read(&self) -> PortResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            Err(PortError::Unexpected("sheet unavailable".into()))
        } else {
            Ok(())
        }
    }

    fn write(&self) -> PortResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(PortError::Unexpected("sheet is read-only".into()))
        } else {
            Ok(())
        }
    }

    pub fn collaborators(self: &Arc<Self>) -> Collaborators {
        Collaborators {
            teachers: self.clone(),
            subjects: self.clone(),
            availability: self.clone(),
            allocations: self.clone(),
            sessions: self.clone(),
            student_logs: self.clone(),
            students: self.clone(),
        }
    }
}

#[async_trait]
impl TeacherService for FakeSheets {
    async fn get_teacher_by_contact(&self, contact: &str) -> PortResult<Option<TeacherRecord>> {
        self.read()?;
        Ok(self.teachers.lock().unwrap().iter().find(|t| t.contact == contact).cloned())
    }

    async fn update_teacher(&self, contact: &str, update: &TeacherUpdate) -> PortResult<()> {
        self.write()?;
        let mut teachers = self.teachers.lock().unwrap();
        if let Some(teacher) = teachers.iter_mut().find(|t| t.contact == contact) {
            if let Some(ids) = &update.subject_ids {
                teacher.subject_ids = ids.clone();
            }
            if let Some(password) = &update.password {
                teacher.password = Some(password.clone());
            }
        }
        self.teacher_updates.lock().unwrap().push((contact.to_string(), update.clone()));
        Ok(())
    }
}

#[async_trait]
impl SubjectService for FakeSheets {
    async fn get_all_subjects(&self) -> PortResult<Vec<SubjectRecord>> {
        self.read()?;
        Ok(self.subjects.lock().unwrap().clone())
    }

    async fn get_subjects_by_ids(&self, ids: &[String]) -> PortResult<Vec<SubjectRecord>> {
        self.read()?;
        Ok(self
            .subjects
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.subject_id.is_empty() || ids.contains(&s.subject_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AvailabilityService for FakeSheets {
    async fn get_availability(&self, teacher_id: &str) -> PortResult<Vec<AvailabilityRecord>> {
        self.read()?;
        Ok(self
            .availability
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.teacher_id == teacher_id)
            .cloned()
            .collect())
    }

    async fn add_availability(&self, slot: &NewAvailability) -> PortResult<Option<String>> {
        self.write()?;
        self.availability_writes.fetch_add(1, Ordering::SeqCst);
        let id = format!("AV{}", 100 + self.next_id.fetch_add(1, Ordering::SeqCst));
        self.availability.lock().unwrap().push(AvailabilityRecord {
            available_id: id.clone(),
            teacher_id: slot.teacher_id.clone(),
            weekday: slot.weekday.clone(),
            start_time: TimeValue::from(slot.start_time.as_str()),
            end_time: TimeValue::from(slot.end_time.as_str()),
        });
        Ok(Some(id))
    }

    async fn update_availability(&self, available_id: &str, update: &AvailabilityUpdate) -> PortResult<()> {
        self.write()?;
        self.availability_writes.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.availability.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|a| a.available_id == available_id)
            .ok_or_else(|| PortError::NotFound(available_id.to_string()))?;
        if let Some(start) = &update.start_time {
            row.start_time = TimeValue::from(start.as_str());
        }
        if let Some(end) = &update.end_time {
            row.end_time = TimeValue::from(end.as_str());
        }
        if let Some(weekday) = &update.weekday {
            row.weekday = weekday.clone();
        }
        Ok(())
    }

    async fn delete_availability(&self, available_id: &str) -> PortResult<()> {
        self.write()?;
        self.availability_writes.fetch_add(1, Ordering::SeqCst);
        self.availability.lock().unwrap().retain(|a| a.available_id != available_id);
        Ok(())
    }
}

#[async_trait]
impl AllocationService for FakeSheets {
    async fn fetch_by_teacher_id(&self, teacher_id: &str) -> PortResult<Vec<AllocationRecord>> {
        self.read()?;
        Ok(self
            .allocations
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.teacher_id == teacher_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SessionService for FakeSheets {
    async fn fetch_by_teacher_id(&self, teacher_id: &str) -> PortResult<Vec<SessionRecord>> {
        self.read()?;
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.teacher_id == teacher_id)
            .cloned()
            .collect())
    }

    async fn update_session(&self, session_id: &str, update: &SessionUpdate) -> PortResult<()> {
        self.write()?;
        self.session_updates
            .lock()
            .unwrap()
            .push((session_id.to_string(), update.clone()));
        Ok(())
    }
}

#[async_trait]
impl StudentLogService for FakeSheets {
    async fn fetch_by_session_id(&self, session_id: &str) -> PortResult<Vec<StudentLogRecord>> {
        self.read()?;
        Ok(self
            .logs
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.session_id == session_id)
            .cloned()
            .collect())
    }

    async fn bulk_add(&self, logs: &[StudentLogEntry]) -> PortResult<()> {
        self.write()?;
        self.saved_logs.lock().unwrap().extend_from_slice(logs);
        Ok(())
    }
}

#[async_trait]
impl StudentService for FakeSheets {
    async fn get_student_by_id(&self, student_id: &str) -> PortResult<Option<StudentRecord>> {
        self.read()?;
        Ok(self.students.lock().unwrap().get(student_id).map(|name| StudentRecord {
            student_id: student_id.to_string(),
            student_name: name.clone(),
        }))
    }
}

//=========================================================================================
// Sheet Rows
//=========================================================================================

fn row<T: serde::de::DeserializeOwned>(value: Value) -> T {
    serde_json::from_value(value).expect("fixture row deserialises")
}

pub fn teacher_row(password: Option<&str>) -> TeacherRecord {
    let mut value = json!({
        "Teacher ID": TEACHER_ID,
        "Name": "Asha Rao",
        "Contact": 9876543210u64,
        "Subjects ID(s)": "SUB1, SUB2",
        "Mail": "asha@example.com",
        "Status": "Active",
    });
    if let Some(password) = password {
        value["Password"] = json!(password);
    }
    row(value)
}

pub fn session_row(id: &str, date: &str, start: &str, end: &str, status: &str, students: &str) -> SessionRecord {
    row(json!({
        "Session ID": id,
        "Class Room ID": "CR-7",
        "Teacher Assign ID": "TAS1",
        "Student ID": students,
        "Subject ID": "SUB1",
        "Teacher ID": TEACHER_ID,
        "Date": date,
        "Start Time": start,
        "End Time": end,
        "Status": status,
        "Subject label": "Algebra I",
    }))
}

pub fn proof_file(session_id: &str) -> SessionFileRecord {
    row(json!({
        "Timestamp": "2026-10-19T08:00:00.000Z",
        "Email address": "asha@example.com",
        "Session ID": session_id,
        "File Name": "board.jpg",
        "Upload File": "https://drive.example.com/board.jpg",
        "Type": "Session Proof",
    }))
}

pub fn log_row(session_id: &str, student_id: &str, status: &str, rating: u8, comment: &str) -> StudentLogRecord {
    row(json!({
        "Session ID": session_id,
        "Student ID": student_id,
        "Status": status,
        "Rating": rating,
        "Comment": comment,
    }))
}

pub fn allocation_row(id: &str, status: &str, students: &[&str]) -> AllocationRecord {
    row(json!({
        "Teacher Assign ID": id,
        "Class Room ID": "CR-7",
        "Subject ID": "SUB1",
        "Teacher ID": TEACHER_ID,
        "Start Date": "2026-09-01",
        "Start Time": "04:00pm",
        "End Time": "05:00pm",
        "Days": "Mon, Wed",
        "Status": status,
        "Student IDs": students,
    }))
}

pub fn availability_row(id: &str, weekday: &str, start: &str, end: &str) -> AvailabilityRecord {
    row(json!({
        "Available ID": id,
        "Teacher ID": TEACHER_ID,
        "Weekday": weekday,
        "Start Time": start,
        "End Time": end,
    }))
}

pub fn subject_row(id: &str, name: &str) -> SubjectRecord {
    row(json!({
        "Subject ID": id,
        "Subject Name": name,
        "Category": "Mathematics",
        "Board": "CBSE",
        "Level": "Grade 10",
    }))
}

//=========================================================================================
// Dashboards
//=========================================================================================

pub fn dashboard(sheets: &Arc<FakeSheets>, store: &Arc<MemoryStore>, policy: RemoteFailurePolicy) -> Dashboard {
    Dashboard::restore(sheets.collaborators(), store.clone(), policy)
}

/// A dashboard that has already signed in as the fixture teacher.
pub async fn signed_in(sheets: &Arc<FakeSheets>, policy: RemoteFailurePolicy) -> (Dashboard, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let mut dashboard = dashboard(sheets, &store, policy);
    dashboard
        .login(CONTACT, PASSWORD)
        .await
        .expect("fixture teacher signs in");
    (dashboard, store)
}
