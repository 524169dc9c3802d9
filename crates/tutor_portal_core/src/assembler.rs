//! crates/tutor_portal_core/src/assembler.rs
//!
//! Turns raw session rows into `Session` view-models: resolves student names
//! through a cache, combines date and time columns, derives duration and
//! status, and attaches files and an unmarked roster.

use crate::domain::{fallback_student_name, Session, SessionStatus, Student};
use crate::ports::{SessionService, StudentService};
use crate::records::{split_ids, SessionRecord};
use crate::time::{combine_date_time, duration_minutes, to_24h, DEFAULT_DURATION_MINUTES, TimeValue};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, error};

//=========================================================================================
// Name Cache
//=========================================================================================

/// Student names resolved so far, keyed by student id. Entries are never
/// evicted; the cache lives as long as the dashboard that owns it.
#[derive(Debug, Clone, Default)]
pub struct NameCache {
    names: HashMap<String, String>,
}

impl NameCache {
    pub fn get(&self, student_id: &str) -> Option<&str> {
        self.names.get(student_id).map(String::as_str)
    }

    pub fn contains(&self, student_id: &str) -> bool {
        self.names.contains_key(student_id)
    }

    pub fn extend(&mut self, resolved: HashMap<String, String>) {
        self.names.extend(resolved);
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Display name for `student_id`, or the `Student <id>` fallback.
    pub fn display_name(&self, student_id: &str) -> String {
        self.get(student_id)
            .map(str::to_string)
            .unwrap_or_else(|| fallback_student_name(student_id))
    }
}

//=========================================================================================
// Session Assembler
//=========================================================================================

pub struct SessionAssembler {
    students: Arc<dyn StudentService>,
    cache: NameCache,
}

impl SessionAssembler {
    pub fn new(students: Arc<dyn StudentService>) -> Self {
        Self {
            students,
            cache: NameCache::default(),
        }
    }

    pub fn cache(&self) -> &NameCache {
        &self.cache
    }

    /// Fetches and assembles every session of a teacher. A failed fetch is
    /// logged and yields an empty list; callers decide on any fallback.
    pub async fn fetch_for_teacher(
        &mut self,
        sessions: &dyn SessionService,
        teacher_id: &str,
    ) -> Vec<Session> {
        match sessions.fetch_by_teacher_id(teacher_id).await {
            Ok(records) => self.assemble(records).await,
            Err(e) => {
                error!("Error fetching sessions for teacher {}: {}", teacher_id, e);
                Vec::new()
            }
        }
    }

    /// Assembles a batch of session rows, resolving any student names the
    /// cache does not hold yet in one bulk call.
    pub async fn assemble(&mut self, records: Vec<SessionRecord>) -> Vec<Session> {
        let missing: BTreeSet<String> = records
            .iter()
            .flat_map(|record| split_ids(&record.student_ids))
            .filter(|id| !self.cache.contains(id))
            .collect();

        if !missing.is_empty() {
            let ids: Vec<String> = missing.into_iter().collect();
            debug!("Resolving {} uncached student names", ids.len());
            let resolved = self.students.get_student_names(&ids).await;
            self.cache.extend(resolved);
        }

        records
            .into_iter()
            .map(|record| assemble_one(record, &self.cache))
            .collect()
    }
}

fn assemble_one(record: SessionRecord, cache: &NameCache) -> Session {
    let start_time = combine_date_time(&record.date, &record.start_time);
    let duration = duration_minutes(&record.start_time, &record.end_time);
    let subject = if record.subject_label.is_empty() {
        record.subject_name
    } else {
        record.subject_label
    };
    let students = split_ids(&record.student_ids)
        .into_iter()
        .map(|id| {
            let name = cache.display_name(&id);
            Student::unmarked(id, name)
        })
        .collect();

    Session {
        id: record.session_id,
        allocation_id: record.teacher_assign_id.filter(|id| !id.is_empty()),
        subject,
        class_name: record.class_room_id,
        start_time,
        duration_minutes: if duration > 0 {
            duration
        } else {
            DEFAULT_DURATION_MINUTES
        },
        status: SessionStatus::from_remote(&record.status),
        students,
        files: record.files.into_iter().map(|f| f.to_domain()).collect(),
        topic_covered: record.topic_covered,
        started_time: recorded_time(&record.started_time),
        ended_time: recorded_time(&record.ended_time),
    }
}

/// Times the tutor recorded are kept as the sheet holds them; blank stays
/// blank. Only day fractions, which have no text form, are rendered.
fn recorded_time(value: &TimeValue) -> String {
    match value {
        TimeValue::Missing => String::new(),
        TimeValue::Fraction(_) => to_24h(value),
        TimeValue::Text(text) => text.clone(),
    }
}
