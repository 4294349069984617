//! Meeting planning: visit people around a city within their availability,
//! scored by constraint satisfaction.
//!
//! Both the candidate and the reference plan are simulated against the
//! record's constraints. The reference plan's count of people met is the
//! achievable target; a candidate is correct when its simulation completes
//! without breaking a constraint and meets at least that many people.

pub mod parser;
pub mod validator;

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::dataset::Example;
use crate::domain::{Difficulty, Domain};
use crate::text::{ClockTime, Vocabulary, same_name};
use crate::verdict::Verdict;

pub use parser::{MeetingPlan, MeetingStep, parse_meeting_plan};
pub use validator::{Simulation, Visit, simulate};

/// One person to meet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub name: String,
    pub location: String,
    /// Earliest time the person is available.
    pub available_from: ClockTime,
    /// Time the person leaves.
    pub available_until: ClockTime,
    /// Minimum meeting length in minutes.
    pub min_minutes: u32,
}

/// Everything a meeting plan is checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingConstraints {
    pub start_location: String,
    pub start_time: ClockTime,
    pub people: Vec<Person>,
    /// Travel minutes, `dist[from][to]`.
    pub dist_matrix: BTreeMap<String, BTreeMap<String, u32>>,
}

impl MeetingConstraints {
    pub fn person(&self, name: &str) -> Option<&Person> {
        self.people.iter().find(|p| same_name(&p.name, name))
    }

    /// Travel time between two locations. Staying put is free.
    pub fn travel_minutes(&self, from: &str, to: &str) -> Option<u32> {
        if same_name(from, to) {
            return Some(0);
        }
        self.dist_matrix
            .iter()
            .find(|(k, _)| same_name(k, from))
            .and_then(|(_, row)| row.iter().find(|(k, _)| same_name(k, to)))
            .map(|(_, minutes)| *minutes)
    }

    pub fn people_vocabulary(&self) -> Vocabulary {
        Vocabulary::new(self.people.iter().map(|p| p.name.as_str()))
    }

    /// Every location named in the matrix, the start point and the people.
    pub fn location_vocabulary(&self) -> Vocabulary {
        let mut names: Vec<&str> = vec![self.start_location.as_str()];
        for (from, row) in &self.dist_matrix {
            names.push(from);
            names.extend(row.keys().map(String::as_str));
        }
        names.extend(self.people.iter().map(|p| p.location.as_str()));
        Vocabulary::new(names)
    }
}

/// A reference plan stored as one block of text or as a list of sentences.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum GoldenText {
    Text(String),
    Steps(Vec<String>),
}

impl GoldenText {
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Steps(steps) => steps.join("\n"),
        }
    }
}

/// A meeting planning record, validated at load time.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawMeetingRecord")]
pub struct MeetingRecord {
    pub num_people: u32,
    pub constraints: MeetingConstraints,
    pub golden_plan: GoldenText,
}

#[derive(Deserialize)]
struct RawMeetingRecord {
    #[serde(default)]
    num_people: Option<u32>,
    constraints: Vec<Vec<Value>>,
    dist_matrix: BTreeMap<String, BTreeMap<String, u32>>,
    golden_plan: GoldenText,
}

impl TryFrom<RawMeetingRecord> for MeetingRecord {
    type Error = String;

    fn try_from(raw: RawMeetingRecord) -> Result<Self, Self::Error> {
        let mut entries = raw.constraints.iter();
        let start = entries
            .next()
            .ok_or_else(|| "constraints list is empty".to_owned())?;
        let (start_location, start_time) = match start.as_slice() {
            [location, time] => (text_field(location, "start location")?, time_field(time)?),
            _ => return Err(format!("start constraint must be [location, time], got {start:?}")),
        };

        let people = entries
            .map(|entry| parse_person(entry))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            num_people: raw.num_people.unwrap_or(people.len() as u32),
            constraints: MeetingConstraints {
                start_location,
                start_time,
                people,
                dist_matrix: raw.dist_matrix,
            },
            golden_plan: raw.golden_plan,
        })
    }
}

/// `[name, location, "9:00AM to 11:00AM", minutes]`
fn parse_person(entry: &[Value]) -> Result<Person, String> {
    let [name, location, window, minutes] = entry else {
        return Err(format!(
            "person constraint must be [name, location, window, minutes], got {entry:?}"
        ));
    };
    let name = text_field(name, "person name")?;
    let location = text_field(location, "person location")?;
    let window = text_field(window, "availability window")?;
    let (from, until) = window
        .split_once(" to ")
        .ok_or_else(|| format!("availability window {window:?} is not \"A to B\""))?;
    let min_minutes = minutes
        .as_u64()
        .and_then(|m| u32::try_from(m).ok())
        .ok_or_else(|| format!("meeting minutes for {name} must be a whole number"))?;

    Ok(Person {
        available_from: parse_time(from)?,
        available_until: parse_time(until)?,
        name,
        location,
        min_minutes,
    })
}

fn text_field(value: &Value, what: &str) -> Result<String, String> {
    value
        .as_str()
        .map(|s| s.trim().to_owned())
        .ok_or_else(|| format!("{what} must be a string, got {value}"))
}

fn time_field(value: &Value) -> Result<ClockTime, String> {
    parse_time(&text_field(value, "start time")?)
}

fn parse_time(s: &str) -> Result<ClockTime, String> {
    ClockTime::parse(s).ok_or_else(|| format!("invalid time of day: {:?}", s.trim()))
}

/// The meeting planning family.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeetingDomain;

impl MeetingDomain {
    /// Score candidate text against a record.
    pub fn score_text(&self, record: &MeetingRecord, text: &str) -> Verdict {
        let constraints = &record.constraints;
        let people = constraints.people_vocabulary();
        let locations = constraints.location_vocabulary();

        let golden_plan = parse_meeting_plan(&record.golden_plan.to_text(), &people, &locations);
        if golden_plan.is_empty() {
            return Verdict::bad_reference("reference plan could not be parsed");
        }
        let golden = simulate(&golden_plan, constraints);
        if let Some(reason) = &golden.failure {
            return Verdict::bad_reference(format!("reference plan is infeasible: {reason}"));
        }

        let plan = parse_meeting_plan(text, &people, &locations);
        if plan.is_empty() {
            return Verdict::unparseable().with_met(0, golden.met());
        }
        let sim = simulate(&plan, constraints);
        let verdict = match &sim.failure {
            Some(reason) => Verdict::infeasible(reason.clone()),
            None if sim.met() < golden.met() => Verdict::mismatch(format!(
                "meets {} people, {} can be met",
                sim.met(),
                golden.met()
            )),
            None => Verdict::correct(),
        };
        verdict.with_met(sim.met(), golden.met())
    }
}

impl Domain for MeetingDomain {
    type Record = MeetingRecord;

    fn name(&self) -> &'static str {
        "meeting"
    }

    fn score(&self, example: &Example<MeetingRecord>) -> Verdict {
        let verdict = self.score_text(&example.record, &example.candidate);
        if let crate::verdict::Outcome::BadReference(reason) = &verdict.outcome {
            warn!(id = %example.id, reason, "meeting example has an unusable reference plan");
        }
        debug!(id = %example.id, %verdict, "scored meeting example");
        verdict
    }

    fn difficulty(&self, record: &MeetingRecord) -> Difficulty {
        Difficulty::people(record.num_people)
    }
}
