//! Per-example verdicts.
//!
//! A [`Verdict`] is the scored outcome of one example. Every failure mode
//! collapses to "incorrect" in the aggregate, but the [`Outcome`] variant keeps
//! "could not parse" apart from "parsed but infeasible" and "feasible but not
//! the expected plan" for failure analysis.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What happened when an example was scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum Outcome {
    /// The candidate plan is accepted.
    Correct,
    /// Nothing recognisable could be extracted from the candidate text.
    Unparseable,
    /// The candidate parsed but breaks a hard constraint.
    Infeasible(String),
    /// The candidate parsed and is well-formed but is not the expected plan.
    Mismatch(String),
    /// The example's own reference plan could not be parsed or is infeasible.
    BadReference(String),
}

impl Outcome {
    pub fn is_correct(&self) -> bool {
        matches!(self, Self::Correct)
    }

    /// Short machine-friendly label for the variant.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::Unparseable => "unparseable",
            Self::Infeasible(_) => "infeasible",
            Self::Mismatch(_) => "mismatch",
            Self::BadReference(_) => "bad_reference",
        }
    }

    /// Diagnostic reason, `None` for correct outcomes.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Correct => None,
            Self::Unparseable => Some("unparseable"),
            Self::Infeasible(r) | Self::Mismatch(r) | Self::BadReference(r) => Some(r),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Correct | Self::Unparseable => f.write_str(self.label()),
            Self::Infeasible(r) | Self::Mismatch(r) | Self::BadReference(r) => {
                write!(f, "{}: {r}", self.label())
            }
        }
    }
}

/// People met by the candidate and by the reference plan (meeting domain).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetCount {
    pub candidate: usize,
    pub golden: usize,
}

/// The scored result of a single example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    #[serde(flatten)]
    pub outcome: Outcome,
    /// Partial-credit diagnostics. Never affects correctness.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub met: Option<MeetCount>,
}

impl Verdict {
    pub fn new(outcome: Outcome) -> Self {
        Self { outcome, met: None }
    }

    pub fn correct() -> Self {
        Self::new(Outcome::Correct)
    }

    pub fn unparseable() -> Self {
        Self::new(Outcome::Unparseable)
    }

    pub fn infeasible(reason: impl Into<String>) -> Self {
        Self::new(Outcome::Infeasible(reason.into()))
    }

    pub fn mismatch(reason: impl Into<String>) -> Self {
        Self::new(Outcome::Mismatch(reason.into()))
    }

    pub fn bad_reference(reason: impl Into<String>) -> Self {
        Self::new(Outcome::BadReference(reason.into()))
    }

    /// Attach meeting counts.
    pub fn with_met(mut self, candidate: usize, golden: usize) -> Self {
        self.met = Some(MeetCount { candidate, golden });
        self
    }

    pub fn is_correct(&self) -> bool {
        self.outcome.is_correct()
    }

    pub fn reason(&self) -> Option<&str> {
        self.outcome.reason()
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.outcome)?;
        if let Some(met) = self.met {
            write!(f, " (met {} of {})", met.candidate, met.golden)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparseable_reason_is_stable() {
        let v = Verdict::unparseable();
        assert!(!v.is_correct());
        assert_eq!(v.reason(), Some("unparseable"));
        assert_eq!(v.to_string(), "unparseable");
    }

    #[test]
    fn correct_has_no_reason() {
        assert_eq!(Verdict::correct().reason(), None);
    }

    #[test]
    fn display_includes_reason_and_counts() {
        let v = Verdict::infeasible("no route from A to B").with_met(1, 3);
        assert_eq!(v.to_string(), "infeasible: no route from A to B (met 1 of 3)");
    }

    #[test]
    fn serializes_flat() {
        let v = Verdict::mismatch("wrong day").with_met(2, 2);
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["outcome"], "mismatch");
        assert_eq!(json["reason"], "wrong day");
        assert_eq!(json["met"]["candidate"], 2);

        let json = serde_json::to_value(Verdict::correct()).unwrap();
        assert_eq!(json["outcome"], "correct");
        assert!(json.get("met").is_none());
    }
}
