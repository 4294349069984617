//! Console summary of a run.

use std::io::{self, Write};

use crate::driver::{Summary, Tally};

/// Print `summary` to `out`. With `verbose`, every failing example is listed
/// with its reason.
pub fn write_report<W: Write>(out: &mut W, summary: &Summary, verbose: bool) -> io::Result<()> {
    writeln!(out, "Domain:   {}", summary.domain)?;
    writeln!(out, "Examples: {}", summary.total())?;
    writeln!(out, "Accuracy: {}", format_tally(&summary.overall))?;

    if !summary.outcomes.is_empty() {
        writeln!(out)?;
        writeln!(out, "Outcomes:")?;
        for (label, count) in &summary.outcomes {
            writeln!(out, "  {label:<14} {count:>6}")?;
        }
    }

    if !summary.breakdown.is_empty() {
        writeln!(out)?;
        writeln!(out, "{:<24} {:>8} {:>8} {:>9}", "DIFFICULTY", "EXAMPLES", "CORRECT", "ACCURACY")?;
        writeln!(out, "{}", "-".repeat(52))?;
        for (difficulty, tally) in &summary.breakdown {
            writeln!(
                out,
                "{:<24} {:>8} {:>8} {:>9}",
                difficulty.to_string(),
                tally.total,
                tally.correct,
                format_percent(tally)
            )?;
        }
    }

    if verbose {
        let failures: Vec<_> = summary.failures().collect();
        if !failures.is_empty() {
            writeln!(out)?;
            writeln!(out, "Failures:")?;
            for (id, reason) in failures {
                writeln!(out, "  {id}: {reason}")?;
            }
        }
    }

    Ok(())
}

fn format_tally(tally: &Tally) -> String {
    match tally.accuracy() {
        Some(acc) => format!("{}/{} ({:.1}%)", tally.correct, tally.total, acc * 100.0),
        None => "n/a (0 examples)".to_owned(),
    }
}

fn format_percent(tally: &Tally) -> String {
    tally
        .accuracy()
        .map_or_else(|| "n/a".to_owned(), |acc| format!("{:.1}%", acc * 100.0))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::domain::Difficulty;
    use crate::driver::ExampleResult;
    use crate::verdict::Verdict;

    fn render(summary: &Summary, verbose: bool) -> String {
        let mut buf = Vec::new();
        write_report(&mut buf, summary, verbose).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn summary() -> Summary {
        Summary {
            domain: "calendar",
            overall: Tally {
                total: 4,
                correct: 3,
            },
            outcomes: BTreeMap::from([("correct", 3), ("mismatch", 1)]),
            breakdown: BTreeMap::from([
                (
                    Difficulty::people_and_days(2, 1),
                    Tally {
                        total: 2,
                        correct: 2,
                    },
                ),
                (
                    Difficulty::people_and_days(3, 1),
                    Tally {
                        total: 2,
                        correct: 1,
                    },
                ),
            ]),
            results: vec![ExampleResult {
                id: "cal-7".into(),
                difficulty: Difficulty::people_and_days(3, 1),
                verdict: Verdict::mismatch("proposed Monday, 9:00 - 9:30"),
            }],
        }
    }

    #[test]
    fn prints_accuracy_and_breakdown() {
        let text = render(&summary(), false);
        assert!(text.contains("Accuracy: 3/4 (75.0%)"), "{text}");
        assert!(text.contains("2 people, 1 days"), "{text}");
        assert!(text.contains("50.0%"), "{text}");
        assert!(!text.contains("Failures:"), "{text}");
    }

    #[test]
    fn verbose_lists_failures() {
        let text = render(&summary(), true);
        assert!(text.contains("  cal-7: proposed Monday, 9:00 - 9:30"), "{text}");
    }

    #[test]
    fn empty_summary_prints_not_applicable() {
        let empty = Summary {
            domain: "trip",
            overall: Tally::default(),
            outcomes: BTreeMap::new(),
            breakdown: BTreeMap::new(),
            results: Vec::new(),
        };
        let text = render(&empty, true);
        assert!(text.contains("Accuracy: n/a (0 examples)"), "{text}");
    }
}
