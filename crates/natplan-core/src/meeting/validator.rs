//! Step-by-step simulation of a meeting plan.
//!
//! The simulation tracks the current location and time, starting from the
//! constraints' start point. Each step is checked as it is applied; the first
//! violation ends the simulation and is reported as the failure. Visits
//! completed before that point are kept for partial-credit diagnostics.

use crate::text::{ClockTime, same_name};

use super::MeetingConstraints;
use super::parser::{MeetingPlan, MeetingStep};

/// A completed meeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    pub person: String,
    pub location: String,
    pub start: ClockTime,
    pub end: ClockTime,
}

/// Result of simulating a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Simulation {
    /// Meetings completed, in order.
    pub visits: Vec<Visit>,
    /// The first violated constraint, if any.
    pub failure: Option<String>,
}

impl Simulation {
    /// Number of people met before any failure.
    pub fn met(&self) -> usize {
        self.visits.len()
    }

    pub fn is_feasible(&self) -> bool {
        self.failure.is_none()
    }
}

struct State<'a> {
    constraints: &'a MeetingConstraints,
    location: String,
    time: ClockTime,
    visits: Vec<Visit>,
}

/// Simulate `plan` against `constraints`.
pub fn simulate(plan: &MeetingPlan, constraints: &MeetingConstraints) -> Simulation {
    let mut state = State {
        constraints,
        location: constraints.start_location.clone(),
        time: constraints.start_time,
        visits: Vec::new(),
    };

    let failure = plan.steps.iter().find_map(|step| state.apply(step).err());
    Simulation {
        visits: state.visits,
        failure,
    }
}

impl State<'_> {
    fn apply(&mut self, step: &MeetingStep) -> Result<(), String> {
        match step {
            MeetingStep::Start { location, time } => self.start(location, *time),
            MeetingStep::Travel {
                destination,
                arrival,
                ..
            } => self.travel(destination, *arrival),
            MeetingStep::Wait { until } => self.wait(*until),
            MeetingStep::Meet {
                person,
                minutes,
                start,
                end,
            } => self.meet(person, *minutes, *start, *end),
        }
    }

    fn start(&mut self, location: &str, time: ClockTime) -> Result<(), String> {
        if !same_name(location, &self.constraints.start_location) {
            return Err(format!(
                "plan starts at {location}, expected {}",
                self.constraints.start_location
            ));
        }
        if time != self.constraints.start_time {
            return Err(format!(
                "plan starts at {}, expected {}",
                time.to_12h(),
                self.constraints.start_time.to_12h()
            ));
        }
        Ok(())
    }

    fn travel(&mut self, destination: &str, arrival: Option<ClockTime>) -> Result<(), String> {
        let minutes = self
            .constraints
            .travel_minutes(&self.location, destination)
            .ok_or_else(|| format!("no route from {} to {destination}", self.location))?;
        let earliest = self.time.plus_minutes(minutes).ok_or_else(|| {
            format!("travel to {destination} takes {minutes} minutes and runs past any day")
        })?;
        if let Some(claimed) = arrival {
            if claimed < earliest {
                return Err(format!(
                    "claims arrival at {destination} at {} but the earliest arrival is {}",
                    claimed.to_12h(),
                    earliest.to_12h()
                ));
            }
        }
        self.location = destination.to_owned();
        self.time = arrival.unwrap_or(earliest).max(earliest);
        Ok(())
    }

    fn wait(&mut self, until: ClockTime) -> Result<(), String> {
        if until <= self.time {
            return Err(format!(
                "cannot wait until {}, it is already {}",
                until.to_12h(),
                self.time.to_12h()
            ));
        }
        self.time = until;
        Ok(())
    }

    fn meet(
        &mut self,
        name: &str,
        minutes: Option<u32>,
        start: Option<ClockTime>,
        end: Option<ClockTime>,
    ) -> Result<(), String> {
        let person = self
            .constraints
            .person(name)
            .ok_or_else(|| format!("unknown person {name}"))?;
        if self.visits.iter().any(|v| same_name(&v.person, &person.name)) {
            return Err(format!("{} is met more than once", person.name));
        }
        if !same_name(&self.location, &person.location) {
            return Err(format!(
                "{} is at {}, not {}",
                person.name, person.location, self.location
            ));
        }

        let begin = match start {
            Some(claimed) if claimed < self.time => {
                return Err(format!(
                    "meeting with {} starts at {} but the plan only reaches {} at {}",
                    person.name,
                    claimed.to_12h(),
                    self.location,
                    self.time.to_12h()
                ));
            }
            Some(claimed) => claimed,
            None => self.time,
        };
        if begin < person.available_from {
            return Err(format!(
                "{} is not available until {}, meeting starts at {}",
                person.name,
                person.available_from.to_12h(),
                begin.to_12h()
            ));
        }

        let stated = match (start, end) {
            (Some(s), Some(e)) => Some(e.minutes_since(s).ok_or_else(|| {
                format!("meeting with {} ends before it starts", person.name)
            })?),
            _ => minutes,
        };
        if let Some(len) = stated {
            if len < person.min_minutes {
                return Err(format!(
                    "meeting with {} lasts {len} minutes, needs at least {}",
                    person.name, person.min_minutes
                ));
            }
        }

        let length = stated.unwrap_or(0).max(person.min_minutes);
        let finish = begin.plus_minutes(length).ok_or_else(|| {
            format!("meeting with {} lasts {length} minutes and runs past any day", person.name)
        })?;
        if finish > person.available_until {
            return Err(format!(
                "meeting with {} runs until {} but they leave at {}",
                person.name,
                finish.to_12h(),
                person.available_until.to_12h()
            ));
        }

        self.visits.push(Visit {
            person: person.name.clone(),
            location: self.location.clone(),
            start: begin,
            end: finish,
        });
        self.time = finish;
        Ok(())
    }
}
