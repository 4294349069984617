//! Dataset driver: score every example of a domain and aggregate.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::config::EvalConfig;
use crate::dataset::{DatasetError, Example, load_examples};
use crate::domain::{Difficulty, Domain};
use crate::results::write_results;
use crate::verdict::Verdict;

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("failed to write results to {path}: {source}")]
    Results {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Scored result of one example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExampleResult {
    pub id: String,
    pub difficulty: Difficulty,
    #[serde(flatten)]
    pub verdict: Verdict,
}

/// Correct / total counts for one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub total: usize,
    pub correct: usize,
}

impl Tally {
    fn record(&mut self, correct: bool) {
        self.total += 1;
        if correct {
            self.correct += 1;
        }
    }

    /// `None` when the bucket is empty.
    pub fn accuracy(&self) -> Option<f64> {
        (self.total > 0).then(|| self.correct as f64 / self.total as f64)
    }
}

/// Aggregate of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub domain: &'static str,
    pub overall: Tally,
    /// Count per outcome label (`correct`, `unparseable`, ...).
    pub outcomes: BTreeMap<&'static str, usize>,
    /// Tallies per difficulty bucket, ascending.
    pub breakdown: BTreeMap<Difficulty, Tally>,
    /// Per-example results in load order: sorted by id for keyed files,
    /// file order for arrays and JSON lines.
    pub results: Vec<ExampleResult>,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.overall.total
    }

    pub fn correct(&self) -> usize {
        self.overall.correct
    }

    /// Fraction correct, `None` for an empty dataset.
    pub fn accuracy(&self) -> Option<f64> {
        self.overall.accuracy()
    }

    /// `(id, reason)` for every example not scored correct.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.results.iter().filter_map(|r| {
            r.verdict
                .reason()
                .map(|reason| (r.id.as_str(), reason))
        })
    }
}

/// Score `examples` with `domain`.
pub fn evaluate<D: Domain>(domain: &D, examples: &[Example<D::Record>]) -> Summary {
    let mut summary = Summary {
        domain: domain.name(),
        overall: Tally::default(),
        outcomes: BTreeMap::new(),
        breakdown: BTreeMap::new(),
        results: Vec::with_capacity(examples.len()),
    };

    for example in examples {
        let verdict = domain.score(example);
        let difficulty = domain.difficulty(&example.record);
        let correct = verdict.is_correct();

        summary.overall.record(correct);
        summary.breakdown.entry(difficulty).or_default().record(correct);
        *summary.outcomes.entry(verdict.outcome.label()).or_default() += 1;
        summary.results.push(ExampleResult {
            id: example.id.clone(),
            difficulty,
            verdict,
        });
    }

    summary
}

/// Load the dataset named by `config`, score it, and write the results file
/// if one is configured.
pub fn run<D: Domain>(domain: &D, config: &EvalConfig) -> Result<Summary, EvalError> {
    let examples = load_examples::<D::Record>(&config.data_path, &config.pred_field)?;
    let summary = evaluate(domain, &examples);

    if let Some(path) = &config.output {
        write_results(path, &summary).map_err(|source| EvalError::Results {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "results written");
    }

    info!(
        domain = summary.domain,
        total = summary.total(),
        correct = summary.correct(),
        "evaluation finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    /// Scores "yes" as correct, anything else as a mismatch.
    struct Echo;

    #[derive(Debug, Deserialize)]
    struct Rec {
        level: u32,
    }

    impl Domain for Echo {
        type Record = Rec;

        fn name(&self) -> &'static str {
            "echo"
        }

        fn score(&self, example: &Example<Rec>) -> Verdict {
            match example.candidate.as_str() {
                "yes" => Verdict::correct(),
                "" => Verdict::unparseable(),
                other => Verdict::mismatch(format!("said {other}")),
            }
        }

        fn difficulty(&self, record: &Rec) -> Difficulty {
            Difficulty::people(record.level)
        }
    }

    fn example(id: &str, candidate: &str, level: u32) -> Example<Rec> {
        Example {
            id: id.to_owned(),
            candidate: candidate.to_owned(),
            record: Rec { level },
        }
    }

    #[test]
    fn aggregates_counts_and_buckets() {
        let examples = vec![
            example("a", "yes", 2),
            example("b", "no", 2),
            example("c", "", 3),
            example("d", "yes", 3),
        ];
        let s = evaluate(&Echo, &examples);
        assert_eq!(s.total(), 4);
        assert_eq!(s.correct(), 2);
        assert_eq!(s.accuracy(), Some(0.5));
        assert_eq!(s.outcomes["correct"], 2);
        assert_eq!(s.outcomes["mismatch"], 1);
        assert_eq!(s.outcomes["unparseable"], 1);
        assert_eq!(
            s.breakdown[&Difficulty::people(2)],
            Tally {
                total: 2,
                correct: 1
            }
        );
        let failures: Vec<_> = s.failures().collect();
        assert_eq!(failures, vec![("b", "said no"), ("c", "unparseable")]);
    }

    #[test]
    fn empty_dataset_has_no_accuracy() {
        let s = evaluate(&Echo, &[]);
        assert_eq!(s.total(), 0);
        assert_eq!(s.accuracy(), None);
        assert!(s.breakdown.is_empty());
    }

    #[test]
    fn evaluation_is_repeatable() {
        let examples = vec![example("a", "yes", 1), example("b", "no", 1)];
        assert_eq!(evaluate(&Echo, &examples), evaluate(&Echo, &examples));
    }
}
