//! crates/tutor_portal_core/src/availability.rs
//!
//! The weekly availability editor: groups remote rows into a Monday..Sunday
//! schedule, validates edits, and diffs an edited schedule against the one
//! that was fetched to produce the remote calls needed to persist it.

use crate::domain::{weekday_name, DayAvailability, Slot};
use crate::records::{AvailabilityRecord, AvailabilityUpdate, NewAvailability};
use crate::time::{parse_clock, to_24h, to_api_time, ClockTime, TimeValue};
use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Display order of the schedule.
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

const NEW_SLOT_START: &str = "09:00";
const NEW_SLOT_END: &str = "10:00";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AvailabilityError {
    #[error("Validation Error on {day}: Start time ({start}) must be before end time ({end}).")]
    InvertedSlot {
        day: &'static str,
        start: String,
        end: String,
    },

    #[error(
        "Validation Error on {day}: Slots overlap detected between {first_start}-{first_end} and {second_start}-{second_end}."
    )]
    Overlap {
        day: &'static str,
        first_start: String,
        first_end: String,
        second_start: String,
        second_end: String,
    },

    #[error("Validation Error on {day}: '{value}' is not a valid time of day.")]
    UnreadableTime { day: &'static str, value: String },
}

//=========================================================================================
// Weekly Schedule
//=========================================================================================

/// A teacher's availability for all seven weekdays, always in week order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    pub days: Vec<DayAvailability>,
}

impl Default for WeeklySchedule {
    fn default() -> Self {
        Self {
            days: WEEK
                .iter()
                .map(|day| DayAvailability {
                    day: *day,
                    slots: Vec::new(),
                })
                .collect(),
        }
    }
}

impl WeeklySchedule {
    /// Groups remote rows by weekday. Rows naming no recognisable weekday are
    /// dropped; times are normalised to 24-hour form.
    pub fn from_records(records: &[AvailabilityRecord]) -> Self {
        let mut schedule = Self::default();
        for record in records {
            let Some(day) = schedule
                .days
                .iter_mut()
                .find(|d| weekday_name(d.day).eq_ignore_ascii_case(record.weekday.trim()))
            else {
                continue;
            };
            let id = Some(record.available_id.clone()).filter(|id| !id.is_empty());
            day.slots.push(Slot {
                id,
                start: to_24h(&record.start_time),
                end: to_24h(&record.end_time),
            });
        }
        schedule
    }

    /// Rebuilds a schedule from a stored profile, filling in missing days.
    pub fn from_days(days: &[DayAvailability]) -> Self {
        let mut schedule = Self::default();
        for stored in days {
            if let Some(day) = schedule.days.iter_mut().find(|d| d.day == stored.day) {
                day.slots.extend(stored.slots.iter().cloned());
            }
        }
        schedule
    }

    pub fn day(&self, day: Weekday) -> &[Slot] {
        self.days
            .iter()
            .find(|d| d.day == day)
            .map(|d| d.slots.as_slice())
            .unwrap_or(&[])
    }

    fn day_mut(&mut self, day: Weekday) -> Option<&mut Vec<Slot>> {
        self.days.iter_mut().find(|d| d.day == day).map(|d| &mut d.slots)
    }

    pub fn total_slots(&self) -> usize {
        self.days.iter().map(|d| d.slots.len()).sum()
    }

    /// Appends an unsaved 09:00-10:00 slot to `day`.
    pub fn add_slot(&mut self, day: Weekday) {
        if let Some(slots) = self.day_mut(day) {
            slots.push(Slot::unsaved(NEW_SLOT_START, NEW_SLOT_END));
        }
    }

    /// Replaces the times of the slot at `index`, stored as 24-hour `HH:MM`.
    /// Any clock form is accepted (`9:00`, `7:00pm`); text that is not a time
    /// of day is refused. Out-of-range indices are ignored.
    pub fn update_slot(
        &mut self,
        day: Weekday,
        index: usize,
        start: &str,
        end: &str,
    ) -> Result<(), AvailabilityError> {
        let name = weekday_name(day);
        let start = read_clock(name, start)?.to_string();
        let end = read_clock(name, end)?.to_string();
        if let Some(slot) = self.day_mut(day).and_then(|slots| slots.get_mut(index)) {
            slot.start = start;
            slot.end = end;
        }
        Ok(())
    }

    pub fn remove_slot(&mut self, day: Weekday, index: usize) {
        if let Some(slots) = self.day_mut(day) {
            if index < slots.len() {
                slots.remove(index);
            }
        }
    }

    /// Checks every day for unreadable, inverted and overlapping slots, comparing
    /// times of day rather than text. The first violation found, in week order,
    /// is reported.
    pub fn validate(&self) -> Result<(), AvailabilityError> {
        for day in &self.days {
            let name = weekday_name(day.day);
            let mut sorted = Vec::with_capacity(day.slots.len());
            for slot in &day.slots {
                let start = read_clock(name, &slot.start)?.minutes_since_midnight();
                let end = read_clock(name, &slot.end)?.minutes_since_midnight();
                sorted.push((start, end, slot));
            }
            sorted.sort_by_key(|(start, _, _)| *start);

            for (i, (start, end, slot)) in sorted.iter().enumerate() {
                if start >= end {
                    return Err(AvailabilityError::InvertedSlot {
                        day: name,
                        start: slot.start.clone(),
                        end: slot.end.clone(),
                    });
                }
                if let Some((next_start, _, next)) = sorted.get(i + 1) {
                    if end > next_start {
                        return Err(AvailabilityError::Overlap {
                            day: name,
                            first_start: slot.start.clone(),
                            first_end: slot.end.clone(),
                            second_start: next.start.clone(),
                            second_end: next.end.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    pub fn into_days(self) -> Vec<DayAvailability> {
        self.days
    }
}

/// A slot time as a 24-hour clock within one day.
fn read_clock(day: &'static str, text: &str) -> Result<ClockTime, AvailabilityError> {
    parse_clock(&TimeValue::from(text))
        .filter(|clock| clock.hour < 24 && clock.minute < 60)
        .ok_or_else(|| AvailabilityError::UnreadableTime {
            day,
            value: text.to_string(),
        })
}

//=========================================================================================
// Diffing
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotUpdate {
    pub id: String,
    pub day: Weekday,
    pub start: String,
    pub end: String,
}

impl SlotUpdate {
    pub fn to_remote(&self) -> AvailabilityUpdate {
        AvailabilityUpdate {
            start_time: Some(to_api_time(&self.start)),
            end_time: Some(to_api_time(&self.end)),
            weekday: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotAddition {
    pub day: Weekday,
    pub start: String,
    pub end: String,
}

impl SlotAddition {
    pub fn to_remote(&self, teacher_id: &str) -> NewAvailability {
        NewAvailability {
            teacher_id: teacher_id.to_string(),
            weekday: weekday_name(self.day).to_string(),
            start_time: to_api_time(&self.start),
            end_time: to_api_time(&self.end),
        }
    }
}

/// The remote calls that turn an original schedule into an edited one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityDiff {
    pub deletions: Vec<String>,
    pub updates: Vec<SlotUpdate>,
    pub additions: Vec<SlotAddition>,
}

impl AvailabilityDiff {
    pub fn is_empty(&self) -> bool {
        self.deletions.is_empty() && self.updates.is_empty() && self.additions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.deletions.len() + self.updates.len() + self.additions.len()
    }
}

/// Persisted slots are matched by id within their day. A persisted slot
/// that is gone becomes a deletion, one whose times changed becomes an
/// update, and every slot without an id becomes an addition.
pub fn diff(original: &WeeklySchedule, current: &WeeklySchedule) -> AvailabilityDiff {
    let mut result = AvailabilityDiff::default();

    for day in &original.days {
        let edited = current.day(day.day);
        for before in &day.slots {
            let Some(id) = before.id.as_deref() else {
                continue;
            };
            match edited.iter().find(|s| s.id.as_deref() == Some(id)) {
                None => result.deletions.push(id.to_string()),
                Some(after) if after.start != before.start || after.end != before.end => {
                    result.updates.push(SlotUpdate {
                        id: id.to_string(),
                        day: day.day,
                        start: after.start.clone(),
                        end: after.end.clone(),
                    });
                }
                Some(_) => {}
            }
        }
    }

    for day in &current.days {
        for slot in day.slots.iter().filter(|s| s.id.is_none()) {
            result.additions.push(SlotAddition {
                day: day.day,
                start: slot.start.clone(),
                end: slot.end.clone(),
            });
        }
    }

    result
}
