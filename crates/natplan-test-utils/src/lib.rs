//! Shared fixtures for natplan integration tests.
//!
//! Datasets are written to a temporary directory that lives as long as the
//! returned [`TestDataset`]. Record builders produce JSON in the benchmark
//! release layout with the candidate in `pred_5shot_pro`.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value, json};
use tempfile::TempDir;

/// The default candidate column.
pub const PRED_FIELD: &str = "pred_5shot_pro";

/// A dataset file inside its own temporary directory.
pub struct TestDataset {
    dir: TempDir,
    path: PathBuf,
}

impl TestDataset {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A path next to the dataset, for output files.
    pub fn sibling(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

/// Write raw file content as a dataset.
pub fn write_raw(content: &str) -> TestDataset {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("dataset.json");
    std::fs::write(&path, content).expect("failed to write dataset");
    TestDataset { dir, path }
}

/// Write `records` as a JSON object keyed by id.
pub fn write_keyed<I>(records: I) -> TestDataset
where
    I: IntoIterator<Item = (String, Value)>,
{
    let map: Map<String, Value> = records.into_iter().collect();
    write_raw(&Value::Object(map).to_string())
}

/// Set the candidate column of `record`.
pub fn with_candidate(mut record: Value, candidate: &str) -> Value {
    record[PRED_FIELD] = Value::String(candidate.to_owned());
    record
}

/// Copy the record's reference plan into the candidate column.
pub fn with_golden_candidate(record: Value) -> Value {
    let golden = match &record["golden_plan"] {
        Value::String(s) => s.clone(),
        Value::Array(lines) => lines
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join("\n"),
        other => panic!("unexpected golden_plan {other}"),
    };
    with_candidate(record, &golden)
}

// ---------------------------------------------------------------------------
// Record builders
// ---------------------------------------------------------------------------

/// Venice 5 days, Mykonos 5 days, Vienna 6 days: 14 days in all.
pub fn trip_record() -> Value {
    json!({
        "num_cities": 3,
        "cities": "Venice**Mykonos**Vienna",
        "durations": "5**5**6",
        "golden_plan": "Here is the trip plan for visiting the 3 European cities for 14 days:\n\n\
            **Day 1-5:** Arriving in Venice and visit Venice for 5 days.\n\
            **Day 5:** Fly from Venice to Mykonos.\n\
            **Day 5-9:** Visit Mykonos for 5 days.\n\
            **Day 9:** Fly from Mykonos to Vienna.\n\
            **Day 9-14:** Visit Vienna for 6 days."
    })
}

/// Two people: Laura at the start location in the morning, James across
/// town in the afternoon.
pub fn meeting_record() -> Value {
    json!({
        "num_people": 2,
        "constraints": [
            ["Russian Hill", "9:00AM"],
            ["James", "Marina District", "3:45PM to 9:30PM", 75],
            ["Laura", "Russian Hill", "9:30AM to 11:00AM", 30]
        ],
        "dist_matrix": {
            "Russian Hill": {"Marina District": 7},
            "Marina District": {"Russian Hill": 8}
        },
        "golden_plan": [
            "SOLUTION: You start at Russian Hill at 9:00AM.",
            "You wait until 9:30AM.",
            "You meet Laura for 30 minutes from 9:30AM to 10:00AM.",
            "You travel to Marina District in 7 minutes and arrive at 10:07AM.",
            "You wait until 3:45PM.",
            "You meet James for 75 minutes from 3:45PM to 5:00PM."
        ]
    })
}

/// A one-day, `num_people` calendar task with structured constraints.
pub fn calendar_record(num_people: u32) -> Value {
    json!({
        "num_people": num_people,
        "num_days": 1,
        "golden_plan": "Here is the proposed time: Monday, 14:30 - 15:30",
        "constraints": {
            "work_hours": {"start": "9:00", "end": "17:00"},
            "days": ["Monday"],
            "duration_minutes": 60,
            "busy": {
                "Alice": [{"day": "Monday", "start": "9:00", "end": "12:00"}],
                "Bob": [{"day": "Monday", "start": "12:00", "end": "14:30"}]
            }
        }
    })
}
