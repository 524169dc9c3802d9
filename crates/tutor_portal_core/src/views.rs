//! crates/tutor_portal_core/src/views.rs
//!
//! Read-only view models computed from the dashboard's state: the overview
//! counters, session lists, the per-card id badge, the allocation board and
//! the subject catalog filter.

use crate::domain::{Allocation, AllocationStatus, Session, SubjectCatalogItem};
use chrono::{Duration, NaiveDateTime, NaiveTime};
use std::collections::HashSet;

/// Minutes before the start at which a session's id is revealed.
pub const ID_REVEAL_MINUTES: i64 = 15;

//=========================================================================================
// Overview
//=========================================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct SessionOverview<'a> {
    /// Not completed and starting before the end of today, overdue ones included.
    pub pending: usize,
    pub completed_today: usize,
    /// Starting within the seven days after today.
    pub next_week: usize,
    /// Distinct students across active allocations.
    pub active_students: usize,
    pub next_session: Option<&'a Session>,
}

impl<'a> SessionOverview<'a> {
    pub fn compute(sessions: &'a [Session], allocations: &[Allocation], now: NaiveDateTime) -> Self {
        let today = now.date().and_time(NaiveTime::MIN);
        let tomorrow = today + Duration::days(1);
        let week_end = tomorrow + Duration::days(7);

        let pending = count_starting(sessions, |at, s| at < tomorrow && !s.is_completed());
        let completed_today =
            count_starting(sessions, |at, s| at >= today && at < tomorrow && s.is_completed());
        let next_week = count_starting(sessions, |at, _| at >= tomorrow && at <= week_end);

        let active_students = allocations
            .iter()
            .filter(|a| a.status == AllocationStatus::Active)
            .flat_map(|a| a.student_ids.iter())
            .collect::<HashSet<_>>()
            .len();

        Self {
            pending,
            completed_today,
            next_week,
            active_students,
            next_session: sessions.iter().find(|s| !s.is_completed()),
        }
    }
}

/// Sessions with a readable start satisfying `pred`.
fn count_starting(sessions: &[Session], pred: impl Fn(NaiveDateTime, &Session) -> bool) -> usize {
    sessions
        .iter()
        .filter(|s| s.start_time.at().is_some_and(|at| pred(at, s)))
        .count()
}

/// Sessions still to be recorded, in start order.
pub fn upcoming(sessions: &[Session]) -> Vec<&Session> {
    let mut list: Vec<&Session> = sessions.iter().filter(|s| !s.is_completed()).collect();
    list.sort_by(|a, b| a.start_time.cmp(&b.start_time));
    list
}

/// Completed sessions, newest first.
pub fn history(sessions: &[Session]) -> Vec<&Session> {
    let mut list: Vec<&Session> = sessions.iter().filter(|s| s.is_completed()).collect();
    list.sort_by(|a, b| match (a.start_time.at(), b.start_time.at()) {
        (Some(a), Some(b)) => b.cmp(&a),
        _ => a.start_time.cmp(&b.start_time),
    });
    list
}

//=========================================================================================
// Session Card Badge
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    /// Minutes left before the id is revealed.
    UntilReveal(i64),
    ActiveNow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardBadge {
    pub id_visible: bool,
    pub countdown: Option<Countdown>,
}

/// The session id stays hidden until shortly before the start so tutors
/// share it only with the class that is about to begin.
pub fn card_badge(session: &Session, now: NaiveDateTime) -> CardBadge {
    if session.is_completed() {
        return CardBadge {
            id_visible: true,
            countdown: None,
        };
    }
    let Some(start) = session.start_time.at() else {
        return CardBadge {
            id_visible: false,
            countdown: None,
        };
    };

    let minutes = (start - now).num_seconds().div_euclid(60);
    let countdown = if minutes > ID_REVEAL_MINUTES {
        Some(Countdown::UntilReveal(minutes))
    } else if minutes <= 0 && minutes > -i64::from(session.duration_minutes) {
        Some(Countdown::ActiveNow)
    } else {
        None
    };

    CardBadge {
        id_visible: minutes <= ID_REVEAL_MINUTES,
        countdown,
    }
}

//=========================================================================================
// Allocation Board
//=========================================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct AllocationGroup<'a> {
    pub status: AllocationStatus,
    pub allocations: Vec<&'a Allocation>,
}

/// Filters allocations by `search` and groups them by status: Active, Hold
/// and Closed first, then any other status in the order it first appears.
pub fn allocation_board<'a>(allocations: &'a [Allocation], search: &str) -> Vec<AllocationGroup<'a>> {
    let needle = search.to_lowercase();
    let matching = allocations.iter().filter(|a| {
        [&a.class_room_id, &a.assign_id, &a.subject_id, &a.teacher_id]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    });

    let mut groups: Vec<AllocationGroup<'a>> = Vec::new();
    for allocation in matching {
        match groups.iter_mut().find(|g| g.status == allocation.status) {
            Some(group) => group.allocations.push(allocation),
            None => groups.push(AllocationGroup {
                status: allocation.status.clone(),
                allocations: vec![allocation],
            }),
        }
    }

    groups.sort_by_key(|g| match g.status {
        AllocationStatus::Active => 0,
        AllocationStatus::Hold => 1,
        AllocationStatus::Closed => 2,
        AllocationStatus::Other(_) => 3,
    });
    groups
}

//=========================================================================================
// Subject Catalog
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet {
    Category,
    Board,
    Level,
    Department,
    Stage,
}

impl Facet {
    pub const ALL: [Facet; 5] = [
        Facet::Category,
        Facet::Board,
        Facet::Level,
        Facet::Department,
        Facet::Stage,
    ];

    fn value_of(self, item: &SubjectCatalogItem) -> &str {
        match self {
            Facet::Category => &item.category,
            Facet::Board => &item.board,
            Facet::Level => &item.level,
            Facet::Department => &item.department,
            Facet::Stage => &item.stage,
        }
    }
}

/// Distinct non-empty values of `facet`, in catalog order.
pub fn facet_options(catalog: &[SubjectCatalogItem], facet: Facet) -> Vec<String> {
    let mut seen = HashSet::new();
    catalog
        .iter()
        .map(|item| facet.value_of(item))
        .filter(|value| !value.is_empty() && seen.insert(*value))
        .map(str::to_string)
        .collect()
}

/// Search text plus exact-match facets; a `None` facet matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    pub search: String,
    pub category: Option<String>,
    pub board: Option<String>,
    pub level: Option<String>,
    pub department: Option<String>,
    pub stage: Option<String>,
}

impl CatalogFilter {
    pub fn searching(search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ..Default::default()
        }
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Category => self.category.as_deref(),
            Facet::Board => self.board.as_deref(),
            Facet::Level => self.level.as_deref(),
            Facet::Department => self.department.as_deref(),
            Facet::Stage => self.stage.as_deref(),
        }
    }

    pub fn matches(&self, item: &SubjectCatalogItem) -> bool {
        let needle = self.search.to_lowercase();
        let found = [&item.name, &item.code, &item.description, &item.id, &item.label]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle));

        found
            && Facet::ALL.iter().all(|facet| {
                self.facet(*facet)
                    .map_or(true, |wanted| facet.value_of(item) == wanted)
            })
    }

    pub fn apply<'a>(&self, catalog: &'a [SubjectCatalogItem]) -> Vec<&'a SubjectCatalogItem> {
        catalog.iter().filter(|item| self.matches(item)).collect()
    }
}

/// Adds `id` to the selection, or removes it when already selected.
pub fn toggle_subject(selection: &mut Vec<String>, id: &str) {
    if let Some(pos) = selection.iter().position(|s| s == id) {
        selection.remove(pos);
    } else {
        selection.push(id.to_string());
    }
}

/// Deselects every filtered subject when all of them are selected,
/// otherwise selects the ones missing.
pub fn toggle_select_all(selection: &mut Vec<String>, filtered: &[&SubjectCatalogItem]) {
    if filtered.is_empty() {
        return;
    }
    let all_selected = filtered.iter().all(|item| selection.contains(&item.id));
    if all_selected {
        selection.retain(|id| !filtered.iter().any(|item| &item.id == id));
    } else {
        for item in filtered {
            if !selection.contains(&item.id) {
                selection.push(item.id.clone());
            }
        }
    }
}
