//! crates/tutor_portal_core/src/placeholder.rs
//!
//! Sessions shown when the remote session list comes back empty, so a new
//! tutor sees what the dashboard looks like. Start times are relative to `now`.

use crate::domain::{FileCategory, Session, SessionFile, SessionStatus, Student};
use crate::time::StartInstant;
use chrono::{Duration, NaiveDateTime};

fn student(id: &str, name: &str) -> Student {
    Student::unmarked(id, name)
}

fn rated(id: &str, name: &str, rating: u8, review: &str) -> Student {
    Student {
        attended: true,
        rating,
        review: review.to_string(),
        ..Student::unmarked(id, name)
    }
}

pub fn placeholder_sessions(now: NaiveDateTime) -> Vec<Session> {
    vec![
        Session {
            id: "SESS-2024-001".into(),
            allocation_id: Some("TAS102".into()),
            subject: "Mathematics".into(),
            class_name: "Grade 10-A".into(),
            start_time: StartInstant::At(now + Duration::minutes(10)),
            duration_minutes: 60,
            status: SessionStatus::Upcoming,
            students: vec![
                student("s1", "Alice Johnson"),
                student("s2", "Bob Smith"),
                student("s3", "Charlie Davis"),
            ],
            files: Vec::new(),
            topic_covered: String::new(),
            started_time: String::new(),
            ended_time: String::new(),
        },
        Session {
            id: "SESS-2024-002".into(),
            allocation_id: Some("TAS103".into()),
            subject: "Physics".into(),
            class_name: "Grade 11-B".into(),
            start_time: StartInstant::At(now + Duration::minutes(120)),
            duration_minutes: 45,
            status: SessionStatus::Upcoming,
            students: vec![student("s4", "Diana Prince"), student("s5", "Ethan Hunt")],
            files: Vec::new(),
            topic_covered: String::new(),
            started_time: String::new(),
            ended_time: String::new(),
        },
        Session {
            id: "SESS-2024-003".into(),
            allocation_id: Some("TAS101".into()),
            subject: "Chemistry".into(),
            class_name: "Grade 12-C".into(),
            start_time: StartInstant::At(now - Duration::days(1)),
            duration_minutes: 90,
            status: SessionStatus::Completed,
            students: vec![
                rated("s1", "Alice Johnson", 4, "Good participation"),
                rated("s6", "Frank Castle", 3, "Distracted at times"),
            ],
            files: vec![SessionFile {
                timestamp: String::new(),
                email: String::new(),
                session_id: "SESS-2024-003".into(),
                file_name: "OrganicChemistry_Intro.pdf".into(),
                link: "#".into(),
                category: FileCategory::Other,
            }],
            topic_covered: String::new(),
            started_time: String::new(),
            ended_time: String::new(),
        },
    ]
}
