//! Itinerary checks: structural feasibility first, then exact comparison
//! against the reference itinerary.

use std::collections::HashSet;

use crate::text::fold;

use super::TripRecord;
use super::parser::{TripPlan, TripSegment};

/// Check that an itinerary is a well-formed answer to `record`.
///
/// - The first segment starts on day 1.
/// - Each segment starts on the day the previous one ends.
/// - Every city is a required city, visited once, for its required stay.
/// - No required city is missing and the trip ends on the last day.
pub fn check_itinerary(plan: &TripPlan, record: &TripRecord) -> Result<(), String> {
    let Some(first) = plan.segments.first() else {
        return Err("itinerary is empty".to_owned());
    };
    if first.arrival_day != 1 {
        return Err(format!(
            "itinerary starts on day {}, expected day 1",
            first.arrival_day
        ));
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut previous: Option<&TripSegment> = None;

    for seg in &plan.segments {
        if let Some(prev) = previous {
            if seg.arrival_day != prev.departure_day {
                return Err(format!(
                    "segment {} starts on day {} but previous segment ends on day {}",
                    seg.city, seg.arrival_day, prev.departure_day
                ));
            }
        }
        previous = Some(seg);

        let key = fold(&seg.city);
        let Some(idx) = record.cities.iter().position(|c| fold(c) == key) else {
            return Err(format!("unexpected city {}", seg.city));
        };
        if !seen.insert(key) {
            return Err(format!("city {} visited more than once", seg.city));
        }

        let expected = i64::from(record.durations[idx]);
        if seg.stay_days() != expected {
            return Err(format!(
                "{} stays {} days, expected {expected}",
                seg.city,
                seg.stay_days()
            ));
        }
    }

    if let Some(missing) = record.cities.iter().find(|c| !seen.contains(&fold(c))) {
        return Err(format!("missing city {missing}"));
    }

    let last_day = plan.segments.last().map_or(0, |s| s.departure_day);
    if last_day != record.total_days() {
        return Err(format!(
            "itinerary ends on day {last_day}, expected day {}",
            record.total_days()
        ));
    }

    Ok(())
}

/// Compare segment by segment: same cities, same order, same boundaries.
pub fn compare_with_golden(plan: &TripPlan, golden: &[TripSegment]) -> Result<(), String> {
    for (idx, (got, want)) in plan.segments.iter().zip(golden).enumerate() {
        if !got.matches(want) {
            return Err(format!("segment {} is {got}, expected {want}", idx + 1));
        }
    }
    if plan.segments.len() != golden.len() {
        return Err(format!(
            "itinerary has {} segments, expected {}",
            plan.segments.len(),
            golden.len()
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> TripRecord {
        serde_json::from_value(serde_json::json!({
            "cities": "Paris**Rome**Berlin",
            "durations": "3**3**2",
        }))
        .unwrap()
    }

    fn plan(segments: &[(&str, u32, u32)]) -> TripPlan {
        TripPlan {
            segments: segments
                .iter()
                .map(|(c, a, d)| TripSegment::new(*c, *a, *d))
                .collect(),
        }
    }

    #[test]
    fn golden_itinerary_is_feasible() {
        let r = record();
        let golden = TripPlan {
            segments: r.golden_segments(),
        };
        assert_eq!(check_itinerary(&golden, &r), Ok(()));
        assert_eq!(compare_with_golden(&golden, &r.golden_segments()), Ok(()));
    }

    #[test]
    fn rejects_late_start() {
        let err = check_itinerary(&plan(&[("Paris", 2, 4)]), &record()).unwrap_err();
        assert_eq!(err, "itinerary starts on day 2, expected day 1");
    }

    #[test]
    fn rejects_broken_transition() {
        let p = plan(&[("Paris", 1, 3), ("Rome", 4, 6), ("Berlin", 6, 7)]);
        let err = check_itinerary(&p, &record()).unwrap_err();
        assert_eq!(err, "segment Rome starts on day 4 but previous segment ends on day 3");
    }

    #[test]
    fn rejects_unknown_and_repeated_cities() {
        let err = check_itinerary(&plan(&[("Madrid", 1, 3)]), &record()).unwrap_err();
        assert_eq!(err, "unexpected city Madrid");

        let p = plan(&[("Paris", 1, 3), ("paris", 3, 5)]);
        let err = check_itinerary(&p, &record()).unwrap_err();
        assert_eq!(err, "city paris visited more than once");
    }

    #[test]
    fn rejects_missing_city() {
        let p = plan(&[("Paris", 1, 3), ("Rome", 3, 5)]);
        assert_eq!(check_itinerary(&p, &record()).unwrap_err(), "missing city Berlin");
    }

    #[test]
    fn compare_reports_first_difference() {
        let r = record();
        let p = plan(&[("Rome", 1, 3), ("Paris", 3, 5), ("Berlin", 5, 6)]);
        assert_eq!(check_itinerary(&p, &r), Ok(()));
        assert_eq!(
            compare_with_golden(&p, &r.golden_segments()).unwrap_err(),
            "segment 1 is Rome: day 1-3, expected Paris: day 1-3"
        );
    }

    #[test]
    fn compare_rejects_extra_segments() {
        let golden = vec![TripSegment::new("Paris", 1, 3)];
        let p = plan(&[("Paris", 1, 3), ("Rome", 3, 5)]);
        assert_eq!(
            compare_with_golden(&p, &golden).unwrap_err(),
            "itinerary has 2 segments, expected 1"
        );
    }
}
