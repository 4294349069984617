//! Line-oriented trip itinerary parser.
//!
//! Recognised lines:
//! - `... European cities for N days` -- total trip length; parsing stops
//!   after the visit range ending on that day.
//! - `Day A-B ...` / `Days A to B` / `City: day A-B` / `City from Day A to
//!   Day B` -- a visit range, optionally naming a city.
//! - `Day N: Fly from X to Y` -- a flight.
//!
//! When both flights and visit ranges are present, segments are derived from
//! the flight chain: cities from the flights, boundaries at day 1, each flight
//! day and the last visit's end. Otherwise visit ranges naming a city are
//! used directly. Anything else is skipped.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::text::{Vocabulary, same_name, strip_decoration};

static TOTAL_DAYS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)cities\s+for\s+(\d+)\s+days").expect("valid total days regex")
});

static VISIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bdays?\s*(\d+)\s*(?:-|–|to)\s*(?:day\s*)?(\d+)").expect("valid visit regex")
});

static FLIGHT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bday\s*(\d+)\b.*?\bfrom\s+(.+?)\s+to\s+(.+)$").expect("valid flight regex")
});

/// City heading used when no vocabulary is available: `Paris: day 1-3`,
/// `Paris from Day 1 to Day 3`.
static HEADING_CITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([a-z][a-z' .]*?)\s*(?::\s*days?\b|\s+from\s+day\b)")
        .expect("valid heading regex")
});

static FIRST_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+").expect("valid word regex"));

/// A stay in one city. `arrival_day` and `departure_day` are inclusive; the
/// departure day of one segment is the arrival day of the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripSegment {
    pub city: String,
    pub arrival_day: u32,
    pub departure_day: u32,
}

impl TripSegment {
    pub fn new(city: impl Into<String>, arrival_day: u32, departure_day: u32) -> Self {
        Self {
            city: city.into(),
            arrival_day,
            departure_day,
        }
    }

    /// Days spent in the city, both ends included. Negative for reversed
    /// ranges, which the validator rejects.
    pub fn stay_days(&self) -> i64 {
        i64::from(self.departure_day) - i64::from(self.arrival_day) + 1
    }

    /// Same city (ignoring case) and same day boundaries.
    pub fn matches(&self, other: &TripSegment) -> bool {
        same_name(&self.city, &other.city)
            && self.arrival_day == other.arrival_day
            && self.departure_day == other.departure_day
    }
}

impl fmt::Display for TripSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: day {}-{}", self.city, self.arrival_day, self.departure_day)
    }
}

/// An ordered itinerary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripPlan {
    pub segments: Vec<TripSegment>,
}

impl TripPlan {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[derive(Debug)]
struct Visit {
    start: u32,
    end: u32,
    city: Option<String>,
}

#[derive(Debug)]
struct Flight {
    day: u32,
    from: String,
    to: String,
}

/// Parse itinerary text. Never fails; an empty plan means nothing matched.
pub fn parse_trip_plan(text: &str, vocab: &Vocabulary) -> TripPlan {
    let mut total_days: Option<u32> = None;
    let mut visits: Vec<Visit> = Vec::new();
    let mut flights: Vec<Flight> = Vec::new();

    for raw_line in text.lines() {
        let line = strip_decoration(raw_line);
        if line.is_empty() {
            continue;
        }

        let mut recognised = false;

        if let Some(caps) = TOTAL_DAYS_RE.captures(line) {
            total_days = caps[1].parse().ok();
            recognised = true;
        }

        if let Some(visit) = parse_visit(line, vocab) {
            let end = visit.end;
            visits.push(visit);
            if Some(end) == total_days {
                // The answer is complete; later lines are alternatives.
                break;
            }
            recognised = true;
        }

        // A line may carry both a range and a flight ("Day 3-5: fly from ...").
        if let Some(flight) = parse_flight(line, vocab) {
            flights.push(flight);
            recognised = true;
        }

        if !recognised {
            trace!(line, "skipping unrecognised itinerary line");
        }
    }

    let segments = if !flights.is_empty() && !visits.is_empty() {
        segments_from_flights(&flights, &visits)
    } else {
        segments_from_visits(visits)
    };
    TripPlan { segments }
}

fn parse_visit(line: &str, vocab: &Vocabulary) -> Option<Visit> {
    let caps = VISIT_RE.captures(line)?;
    let start = caps[1].parse().ok()?;
    let end = caps[2].parse().ok()?;
    let city = if vocab.is_empty() {
        HEADING_CITY_RE
            .captures(line)
            .map(|c| c[1].trim().to_owned())
    } else {
        vocab.find_in(line).map(str::to_owned)
    };
    Some(Visit { start, end, city })
}

fn parse_flight(line: &str, vocab: &Vocabulary) -> Option<Flight> {
    let caps = FLIGHT_RE.captures(line)?;
    let day = caps[1].parse().ok()?;
    let from = resolve_city(&caps[2], vocab)?;
    let to = resolve_city(&caps[3], vocab)?;
    Some(Flight { day, from, to })
}

/// Known city at the start of `fragment`, else its first word.
fn resolve_city(fragment: &str, vocab: &Vocabulary) -> Option<String> {
    if let Some(city) = vocab.match_prefix(fragment) {
        return Some(city.to_owned());
    }
    FIRST_WORD_RE.find(fragment).map(|m| m.as_str().to_owned())
}

fn segments_from_flights(flights: &[Flight], visits: &[Visit]) -> Vec<TripSegment> {
    let mut cities: Vec<&str> = Vec::with_capacity(flights.len() + 1);
    cities.push(&flights[0].from);
    cities.extend(flights.iter().map(|f| f.to.as_str()));

    let last_day = visits.last().map_or(1, |v| v.end);
    let mut boundaries = Vec::with_capacity(flights.len() + 2);
    boundaries.push(1);
    boundaries.extend(flights.iter().map(|f| f.day));
    boundaries.push(last_day);

    cities
        .iter()
        .zip(boundaries.windows(2))
        .map(|(city, days)| TripSegment::new(*city, days[0], days[1]))
        .collect()
}

/// Visit ranges that name a city, in text order. A repeated day range keeps
/// the city from its last mention.
fn segments_from_visits(visits: Vec<Visit>) -> Vec<TripSegment> {
    let mut segments: Vec<TripSegment> = Vec::new();
    for visit in visits {
        let Some(city) = visit.city else {
            continue;
        };
        match segments
            .iter_mut()
            .find(|s| s.arrival_day == visit.start && s.departure_day == visit.end)
        {
            Some(existing) => existing.city = city,
            None => segments.push(TripSegment::new(city, visit.start, visit.end)),
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> Vocabulary {
        Vocabulary::new(["Venice", "Mykonos", "Vienna", "Paris", "Rome"])
    }

    const GOLDEN: &str = "Here is the trip plan for visiting the 3 European cities for 14 days:

**Day 1-5:** Arriving in Venice and visit Venice for 5 days.
**Day 5:** Fly from Venice to Mykonos.
**Day 5-9:** Visit Mykonos for 5 days.
**Day 9:** Fly from Mykonos to Vienna.
**Day 9-14:** Visit Vienna for 6 days.";

    #[test]
    fn parses_flight_format() {
        let plan = parse_trip_plan(GOLDEN, &vocab());
        assert_eq!(
            plan.segments,
            vec![
                TripSegment::new("Venice", 1, 5),
                TripSegment::new("Mykonos", 5, 9),
                TripSegment::new("Vienna", 9, 14),
            ]
        );
    }

    #[test]
    fn stops_at_total_days() {
        let text = format!(
            "{GOLDEN}\n\nAlternatively:\n**Day 1-5:** Visit Vienna.\n**Day 5:** Fly from Vienna to Rome."
        );
        let plan = parse_trip_plan(&text, &vocab());
        assert_eq!(plan.segments.len(), 3);
        assert_eq!(plan.segments[2].city, "Vienna");
    }

    #[test]
    fn parses_segment_format() {
        let plan = parse_trip_plan("Paris: day 1-3\nRome: day 3-5", &vocab());
        assert_eq!(
            plan.segments,
            vec![TripSegment::new("Paris", 1, 3), TripSegment::new("Rome", 3, 5)]
        );
    }

    #[test]
    fn parses_from_day_to_day() {
        let plan = parse_trip_plan("- paris from Day 1 to Day 3\n- ROME from Day 3 to Day 5", &vocab());
        assert_eq!(
            plan.segments,
            vec![TripSegment::new("Paris", 1, 3), TripSegment::new("Rome", 3, 5)]
        );
    }

    #[test]
    fn segment_format_without_vocabulary() {
        let plan = parse_trip_plan("Paris: day 1-3\nRome: day 3-5", &Vocabulary::default());
        assert_eq!(plan.segments[1], TripSegment::new("Rome", 3, 5));
    }

    #[test]
    fn duplicate_range_keeps_last_city() {
        let plan = parse_trip_plan("Paris: day 1-3\nRome: day 1-3", &vocab());
        assert_eq!(plan.segments, vec![TripSegment::new("Rome", 1, 3)]);
    }

    #[test]
    fn multi_word_city_from_vocabulary() {
        let vocab = Vocabulary::new(["San Sebastian", "Porto"]);
        let text = "**Day 1-3:** Visit San Sebastian.\n**Day 3:** Fly from San Sebastian to Porto.\n**Day 3-4:** Visit Porto.";
        let plan = parse_trip_plan(text, &vocab);
        assert_eq!(
            plan.segments,
            vec![
                TripSegment::new("San Sebastian", 1, 3),
                TripSegment::new("Porto", 3, 4),
            ]
        );
    }

    #[test]
    fn garbage_yields_empty_plan() {
        assert!(parse_trip_plan("I cannot help with that.", &vocab()).is_empty());
        assert!(parse_trip_plan("", &vocab()).is_empty());
    }

    #[test]
    fn reversed_range_is_preserved() {
        let plan = parse_trip_plan("Paris: day 5-3", &vocab());
        assert_eq!(plan.segments[0].stay_days(), -1);
    }
}
