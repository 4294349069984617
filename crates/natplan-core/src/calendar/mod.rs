//! Calendar scheduling: find one slot that suits every participant.
//!
//! Two scoring modes are available. `exact` compares the proposed slot with
//! the reference slot. `feasible` checks the slot against the record's
//! structured constraints, so any valid slot counts; records without
//! constraints fall back to `exact`.

pub mod parser;
pub mod validator;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dataset::Example;
use crate::domain::{Difficulty, Domain};
use crate::verdict::{Outcome, Verdict};

pub use parser::{CalendarSlot, Interval, parse_calendar_slot};
pub use validator::{BusyInterval, CalendarConstraints, WorkHours, check_slot};

/// A calendar scheduling record.
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarRecord {
    #[serde(default)]
    pub num_people: u32,
    #[serde(default)]
    pub num_days: u32,
    pub golden_plan: String,
    #[serde(default)]
    pub constraints: Option<CalendarConstraints>,
}

/// How calendar answers are scored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarMode {
    /// The proposed slot must equal the reference slot.
    #[default]
    Exact,
    /// Any slot satisfying the structured constraints is correct.
    Feasible,
}

impl fmt::Display for CalendarMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Exact => "exact",
            Self::Feasible => "feasible",
        };
        f.write_str(s)
    }
}

impl FromStr for CalendarMode {
    type Err = CalendarModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(Self::Exact),
            "feasible" => Ok(Self::Feasible),
            other => Err(CalendarModeParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`CalendarMode`] string.
#[derive(Debug, Clone)]
pub struct CalendarModeParseError(pub String);

impl fmt::Display for CalendarModeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid calendar mode: {:?} (expected exact or feasible)", self.0)
    }
}

impl std::error::Error for CalendarModeParseError {}

/// The calendar scheduling family.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarDomain {
    pub mode: CalendarMode,
}

impl CalendarDomain {
    pub fn new(mode: CalendarMode) -> Self {
        Self { mode }
    }

    /// Score candidate text against a record.
    pub fn score_text(&self, record: &CalendarRecord, text: &str) -> Verdict {
        match (self.mode, &record.constraints) {
            (CalendarMode::Feasible, Some(constraints)) => {
                score_feasible(record, constraints, text)
            }
            _ => score_exact(record, text),
        }
    }
}

fn score_exact(record: &CalendarRecord, text: &str) -> Verdict {
    let Some(golden) = parse_calendar_slot(&record.golden_plan) else {
        return Verdict::bad_reference("reference slot could not be parsed");
    };
    let Some(slot) = parse_calendar_slot(text) else {
        return Verdict::unparseable();
    };
    if slot.matches(&golden) {
        Verdict::correct()
    } else {
        Verdict::mismatch(format!("proposed {slot}, expected {golden}"))
    }
}

fn score_feasible(record: &CalendarRecord, constraints: &CalendarConstraints, text: &str) -> Verdict {
    if let Some(golden) = parse_calendar_slot(&record.golden_plan) {
        if let Err(reason) = check_slot(&golden, constraints) {
            return Verdict::bad_reference(format!("reference slot is infeasible: {reason}"));
        }
    }
    let Some(slot) = parse_calendar_slot(text) else {
        return Verdict::unparseable();
    };
    match check_slot(&slot, constraints) {
        Ok(()) => Verdict::correct(),
        Err(reason) => Verdict::infeasible(reason),
    }
}

impl Domain for CalendarDomain {
    type Record = CalendarRecord;

    fn name(&self) -> &'static str {
        "calendar"
    }

    fn score(&self, example: &Example<CalendarRecord>) -> Verdict {
        let verdict = self.score_text(&example.record, &example.candidate);
        if let Outcome::BadReference(reason) = &verdict.outcome {
            warn!(id = %example.id, reason, "calendar example has an unusable reference slot");
        }
        debug!(id = %example.id, mode = %self.mode, %verdict, "scored calendar example");
        verdict
    }

    fn difficulty(&self, record: &CalendarRecord) -> Difficulty {
        Difficulty::people_and_days(record.num_people, record.num_days)
    }
}
