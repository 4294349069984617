//! Per-example results file, JSON lines.
//!
//! The first line is a header with the run totals and the time of the run;
//! each following line is one [`crate::driver::ExampleResult`]:
//!
//! ```text
//! {"domain":"trip","evaluated_at":"2025-01-01T12:00:00Z","total":2,"correct":1,"accuracy":0.5}
//! {"id":"0","difficulty":{"cities":3},"outcome":"correct"}
//! {"id":"1","difficulty":{"cities":3},"outcome":"mismatch","reason":"segment 1 is ..."}
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::driver::Summary;

#[derive(Serialize)]
struct Header<'a> {
    domain: &'a str,
    evaluated_at: DateTime<Utc>,
    total: usize,
    correct: usize,
    accuracy: Option<f64>,
}

/// Write `summary` to `path`, replacing any existing file.
pub fn write_results(path: &Path, summary: &Summary) -> io::Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    write_results_to(&mut out, summary, Utc::now())?;
    out.flush()
}

/// Write the results document to any writer.
pub fn write_results_to<W: Write>(
    out: &mut W,
    summary: &Summary,
    evaluated_at: DateTime<Utc>,
) -> io::Result<()> {
    let header = Header {
        domain: summary.domain,
        evaluated_at,
        total: summary.total(),
        correct: summary.correct(),
        accuracy: summary.accuracy(),
    };
    write_line(out, &header)?;
    for result in &summary.results {
        write_line(out, result)?;
    }
    Ok(())
}

fn write_line<W: Write, T: Serialize>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    out.write_all(b"\n")
}
