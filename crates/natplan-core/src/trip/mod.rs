//! Trip planning: multi-city itineraries scored by exact match.
//!
//! The reference itinerary comes from the record's `cities` / `durations`
//! fields (`"Venice**Mykonos**Vienna"`, `"5**5**6"`). A candidate is correct
//! only when it visits the same cities in the same order with the same day
//! boundaries.

pub mod parser;
pub mod validator;

use serde::Deserialize;
use tracing::debug;

use crate::dataset::Example;
use crate::domain::{Difficulty, Domain};
use crate::text::Vocabulary;
use crate::verdict::Verdict;

pub use parser::{TripPlan, TripSegment, parse_trip_plan};
pub use validator::{check_itinerary, compare_with_golden};

/// A trip planning record, validated at load time.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawTripRecord")]
pub struct TripRecord {
    /// Cities in the required visiting order.
    pub cities: Vec<String>,
    /// Days spent in each city, transition days counted in both cities.
    pub durations: Vec<u32>,
    pub num_cities: u32,
}

#[derive(Deserialize)]
struct RawTripRecord {
    cities: String,
    durations: String,
    #[serde(default)]
    num_cities: Option<u32>,
}

impl TryFrom<RawTripRecord> for TripRecord {
    type Error = String;

    fn try_from(raw: RawTripRecord) -> Result<Self, Self::Error> {
        let cities: Vec<String> = split_stars(&raw.cities).map(str::to_owned).collect();
        let durations = split_stars(&raw.durations)
            .map(|d| {
                d.parse::<u32>()
                    .map_err(|_| format!("invalid duration {d:?} in {:?}", raw.durations))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if cities.is_empty() {
            return Err("record lists no cities".to_owned());
        }
        if cities.len() != durations.len() {
            return Err(format!(
                "{} cities but {} durations",
                cities.len(),
                durations.len()
            ));
        }
        if let Some(zero) = cities.iter().zip(&durations).find(|(_, d)| **d == 0) {
            return Err(format!("city {} has a zero-day stay", zero.0));
        }
        if durations.iter().try_fold(0u32, |acc, d| acc.checked_add(*d)).is_none() {
            return Err(format!("durations {:?} add up to more days than fit", raw.durations));
        }

        Ok(Self {
            num_cities: raw.num_cities.unwrap_or(cities.len() as u32),
            cities,
            durations,
        })
    }
}

fn split_stars(s: &str) -> impl Iterator<Item = &str> {
    s.split("**").map(str::trim).filter(|x| !x.is_empty())
}

impl TripRecord {
    /// Total trip length: consecutive cities share their transition day.
    pub fn total_days(&self) -> u32 {
        let sum: u32 = self.durations.iter().sum();
        sum - self.cities.len() as u32 + 1
    }

    /// The reference itinerary as day-range segments.
    pub fn golden_segments(&self) -> Vec<TripSegment> {
        let mut arrival = 1;
        self.cities
            .iter()
            .zip(&self.durations)
            .map(|(city, days)| {
                let departure = arrival + days - 1;
                let seg = TripSegment::new(city.clone(), arrival, departure);
                arrival = departure;
                seg
            })
            .collect()
    }

    pub fn vocabulary(&self) -> Vocabulary {
        Vocabulary::new(&self.cities)
    }
}

/// The trip planning family.
#[derive(Debug, Clone, Copy, Default)]
pub struct TripDomain;

impl TripDomain {
    /// Score candidate text against a record.
    pub fn score_text(&self, record: &TripRecord, text: &str) -> Verdict {
        let plan = parse_trip_plan(text, &record.vocabulary());
        if plan.is_empty() {
            return Verdict::unparseable();
        }
        if let Err(reason) = check_itinerary(&plan, record) {
            return Verdict::infeasible(reason);
        }
        match compare_with_golden(&plan, &record.golden_segments()) {
            Ok(()) => Verdict::correct(),
            Err(reason) => Verdict::mismatch(reason),
        }
    }
}

impl Domain for TripDomain {
    type Record = TripRecord;

    fn name(&self) -> &'static str {
        "trip"
    }

    fn score(&self, example: &Example<TripRecord>) -> Verdict {
        let verdict = self.score_text(&example.record, &example.candidate);
        debug!(id = %example.id, %verdict, "scored trip example");
        verdict
    }

    fn difficulty(&self, record: &TripRecord) -> Difficulty {
        Difficulty::cities(record.num_cities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(cities: &str, durations: &str) -> TripRecord {
        serde_json::from_value(serde_json::json!({
            "cities": cities,
            "durations": durations,
        }))
        .unwrap()
    }

    #[test]
    fn record_splits_star_fields() {
        let r = record("Venice**Mykonos**Vienna", "5**5**6");
        assert_eq!(r.cities, vec!["Venice", "Mykonos", "Vienna"]);
        assert_eq!(r.durations, vec![5, 5, 6]);
        assert_eq!(r.num_cities, 3);
        assert_eq!(r.total_days(), 14);
    }

    #[test]
    fn golden_segments_share_transition_days() {
        let r = record("Paris**Rome", "3**3");
        let segs = r.golden_segments();
        assert_eq!(segs[0], TripSegment::new("Paris", 1, 3));
        assert_eq!(segs[1], TripSegment::new("Rome", 3, 5));
    }

    #[test]
    fn record_rejects_count_mismatch() {
        let err = serde_json::from_value::<TripRecord>(serde_json::json!({
            "cities": "Paris**Rome",
            "durations": "3",
        }))
        .unwrap_err();
        assert!(err.to_string().contains("2 cities but 1 durations"), "got: {err}");
    }

    #[test]
    fn record_rejects_bad_duration() {
        let err = serde_json::from_value::<TripRecord>(serde_json::json!({
            "cities": "Paris",
            "durations": "three",
        }))
        .unwrap_err();
        assert!(err.to_string().contains("invalid duration"), "got: {err}");
    }

    #[test]
    fn record_rejects_overflowing_durations() {
        let err = serde_json::from_value::<TripRecord>(serde_json::json!({
            "cities": "Paris**Rome",
            "durations": "4294967295**2",
        }))
        .unwrap_err();
        assert!(err.to_string().contains("add up to more days"), "got: {err}");
    }

    #[test]
    fn exact_order_is_required() {
        let r = record("Paris**Rome", "3**3");
        let same = TripDomain.score_text(&r, "Paris: day 1-3\nRome: day 3-5");
        assert!(same.is_correct(), "got: {same}");

        let swapped = TripDomain.score_text(&r, "Rome: day 1-3\nParis: day 3-5");
        assert!(!swapped.is_correct());
        assert_eq!(swapped.outcome.label(), "mismatch");
    }

    #[test]
    fn golden_text_scores_correct() {
        let r = record("Venice**Mykonos**Vienna", "5**5**6");
        let golden = "Here is the trip plan for visiting the 3 European cities for 14 days:\n\n\
            **Day 1-5:** Arriving in Venice and visit Venice for 5 days.\n\
            **Day 5:** Fly from Venice to Mykonos.\n\
            **Day 5-9:** Visit Mykonos for 5 days.\n\
            **Day 9:** Fly from Mykonos to Vienna.\n\
            **Day 9-14:** Visit Vienna for 6 days.";
        let v = TripDomain.score_text(&r, golden);
        assert!(v.is_correct(), "got: {v}");
    }

    #[test]
    fn empty_candidate_is_unparseable() {
        let r = record("Paris**Rome", "3**3");
        assert_eq!(TripDomain.score_text(&r, "").reason(), Some("unparseable"));
    }

    #[test]
    fn wrong_duration_is_infeasible() {
        let r = record("Paris**Rome", "3**3");
        let v = TripDomain.score_text(&r, "Paris: day 1-2\nRome: day 2-5");
        assert_eq!(v.outcome.label(), "infeasible");
        assert_eq!(v.reason(), Some("Paris stays 2 days, expected 3"));
    }
}
