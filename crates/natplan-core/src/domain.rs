//! The `Domain` trait -- the seam between the generic driver and the three
//! planning families.
//!
//! Each family (trip, meeting, calendar) provides a typed record, a scorer
//! and a difficulty key. The driver only ever talks to this trait.

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::dataset::Example;
use crate::verdict::Verdict;

/// A planning family that can score its own examples.
pub trait Domain {
    /// The typed dataset record: constraints plus the reference plan.
    type Record: DeserializeOwned;

    /// Short name used in reports and result files (e.g. "trip").
    fn name(&self) -> &'static str;

    /// Score one example. Must be pure: the same example always yields the
    /// same verdict, and infeasible plans are verdicts, not errors.
    fn score(&self, example: &Example<Self::Record>) -> Verdict;

    /// The attribute used to stratify accuracy.
    fn difficulty(&self, record: &Self::Record) -> Difficulty;
}

/// Difficulty bucket of an example.
///
/// Only the attributes meaningful for a domain are set: trip uses `cities`,
/// meeting uses `people`, calendar uses `people` and `days`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Difficulty {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cities: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub people: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
}

impl Difficulty {
    pub fn cities(n: u32) -> Self {
        Self {
            cities: Some(n),
            ..Self::default()
        }
    }

    pub fn people(n: u32) -> Self {
        Self {
            people: Some(n),
            ..Self::default()
        }
    }

    pub fn people_and_days(people: u32, days: u32) -> Self {
        Self {
            people: Some(people),
            days: Some(days),
            ..Self::default()
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(n) = self.cities {
            parts.push(format!("{n} cities"));
        }
        if let Some(n) = self.people {
            parts.push(format!("{n} people"));
        }
        if let Some(n) = self.days {
            parts.push(format!("{n} days"));
        }
        if parts.is_empty() {
            f.write_str("all")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}
