//! Extracts the proposed slot from a calendar answer such as
//! `Here is the proposed time: Monday, 14:30 - 15:30`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::text::{ClockTime, same_name};

static SLOT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([a-z]+),\s*(\d{1,2}:\d{2})\s*(?:-|–|to)\s*(\d{1,2}:\d{2})")
        .expect("valid calendar slot regex")
});

/// A half-open time range `[start, end)` within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: ClockTime,
    pub end: ClockTime,
}

impl Interval {
    pub fn new(start: ClockTime, end: ClockTime) -> Self {
        Self { start, end }
    }

    /// Touching ranges (`[9:00,10:00)` and `[10:00,11:00)`) do not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// `other` lies entirely inside `self`.
    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn minutes(&self) -> Option<u32> {
        self.end.minutes_since(self.start)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

/// A proposed meeting slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarSlot {
    pub day: String,
    pub time: Interval,
}

impl CalendarSlot {
    pub fn new(day: impl Into<String>, start: ClockTime, end: ClockTime) -> Self {
        Self {
            day: day.into(),
            time: Interval::new(start, end),
        }
    }

    /// Same day (ignoring case) and same times.
    pub fn matches(&self, other: &CalendarSlot) -> bool {
        same_name(&self.day, &other.day) && self.time == other.time
    }
}

impl fmt::Display for CalendarSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.day, self.time)
    }
}

/// The first `DAY, HH:MM - HH:MM` in `text`. Later proposals are ignored.
pub fn parse_calendar_slot(text: &str) -> Option<CalendarSlot> {
    let caps = SLOT_RE.captures(text)?;
    let start = ClockTime::parse_24h(&caps[2])?;
    let end = ClockTime::parse_24h(&caps[3])?;
    Some(CalendarSlot::new(&caps[1], start, end))
}
