//! Feasibility checks for a proposed calendar slot.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::text::{ClockTime, same_name};

use super::parser::{CalendarSlot, Interval};

/// Start and end of a working day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct WorkHours {
    pub start: ClockTime,
    pub end: ClockTime,
}

impl WorkHours {
    pub fn interval(&self) -> Interval {
        Interval::new(self.start, self.end)
    }
}

/// A busy block in someone's calendar.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BusyInterval {
    pub day: String,
    pub start: ClockTime,
    pub end: ClockTime,
}

impl BusyInterval {
    pub fn interval(&self) -> Interval {
        Interval::new(self.start, self.end)
    }
}

/// Structured scheduling constraints.
///
/// ```json
/// {
///   "work_hours": {"start": "9:00", "end": "17:00"},
///   "days": ["Monday", "Tuesday"],
///   "duration_minutes": 30,
///   "busy": {"Alice": [{"day": "Monday", "start": "9:00", "end": "10:00"}]},
///   "person_hours": {"Bob": {"start": "10:00", "end": "16:00"}}
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CalendarConstraints {
    pub work_hours: WorkHours,
    pub days: Vec<String>,
    pub duration_minutes: u32,
    #[serde(default)]
    pub busy: BTreeMap<String, Vec<BusyInterval>>,
    /// Narrower working hours for individual participants.
    #[serde(default)]
    pub person_hours: BTreeMap<String, WorkHours>,
}

/// Check `slot` against `constraints`. Reasons name the first violated rule.
pub fn check_slot(slot: &CalendarSlot, constraints: &CalendarConstraints) -> Result<(), String> {
    if !constraints.days.iter().any(|d| same_name(d, &slot.day)) {
        return Err(format!(
            "{} is not one of the allowed days ({})",
            slot.day,
            constraints.days.join(", ")
        ));
    }

    let Some(length) = slot.time.minutes().filter(|m| *m > 0) else {
        return Err(format!("slot {} ends before it starts", slot.time));
    };

    if !constraints.work_hours.interval().contains(&slot.time) {
        return Err(format!(
            "slot {} is outside working hours {}",
            slot.time,
            constraints.work_hours.interval()
        ));
    }
    for (person, hours) in &constraints.person_hours {
        if !hours.interval().contains(&slot.time) {
            return Err(format!(
                "slot {} is outside {person}'s working hours {}",
                slot.time,
                hours.interval()
            ));
        }
    }

    if length != constraints.duration_minutes {
        return Err(format!(
            "slot lasts {length} minutes, expected {}",
            constraints.duration_minutes
        ));
    }

    for (person, blocks) in &constraints.busy {
        let conflict = blocks
            .iter()
            .filter(|b| same_name(&b.day, &slot.day))
            .find(|b| b.interval().overlaps(&slot.time));
        if let Some(block) = conflict {
            return Err(format!(
                "slot conflicts with {person}'s busy time {} {}",
                block.day,
                block.interval()
            ));
        }
    }

    Ok(())
}
