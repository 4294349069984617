//! Sentence parser for meeting plans in the few-shot answer format:
//!
//! ```text
//! SOLUTION: You start at Russian Hill at 9:00AM.
//! You travel to Marina District in 7 minutes and arrive at 9:07AM.
//! You wait until 3:45PM.
//! You meet James for 75 minutes from 3:45PM to 5:00PM.
//! ```
//!
//! Only text after `SOLUTION:` is read when the marker is present. Sentences
//! end at `.` or a line break; sentences matching none of the four forms are
//! skipped.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::text::{ClockTime, Vocabulary, strip_decoration};

const TIME: &str = r"\d{1,2}:\d{2}\s*[ap]m";

static START_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)^you start (?:at|in|from) (.+?) at ({TIME})$"))
        .expect("valid start regex")
});

static TRAVEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^you travel to (.+?)(?:,? in (\d+) minutes?)?(?:,? and arrive at ({TIME}))?$"
    ))
    .expect("valid travel regex")
});

static WAIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)^you wait (?:until|till) ({TIME})$")).expect("valid wait regex")
});

static MEET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^you meet (.+?)(?: for (\d+) minutes?)?(?: from ({TIME}) to ({TIME}))?$"
    ))
    .expect("valid meet regex")
});

/// One recognised sentence of a meeting plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeetingStep {
    Start {
        location: String,
        time: ClockTime,
    },
    Travel {
        destination: String,
        minutes: Option<u32>,
        arrival: Option<ClockTime>,
    },
    Wait {
        until: ClockTime,
    },
    Meet {
        person: String,
        minutes: Option<u32>,
        start: Option<ClockTime>,
        end: Option<ClockTime>,
    },
}

/// The recognised steps of a plan, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeetingPlan {
    pub steps: Vec<MeetingStep>,
}

impl MeetingPlan {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Parse plan text. Names are mapped onto the spelling used in the
/// constraints when they match the vocabularies; unknown names are kept as
/// written so the validator can report them.
pub fn parse_meeting_plan(text: &str, people: &Vocabulary, locations: &Vocabulary) -> MeetingPlan {
    let body = match text.find("SOLUTION:") {
        Some(pos) => &text[pos + "SOLUTION:".len()..],
        None => text,
    };

    let steps = body
        .split(['.', '\n'])
        .map(strip_decoration)
        .filter(|s| !s.is_empty())
        .filter_map(|sentence| {
            let step = parse_step(sentence, people, locations);
            if step.is_none() {
                trace!(sentence, "skipping unrecognised plan sentence");
            }
            step
        })
        .collect();

    MeetingPlan { steps }
}

fn parse_step(sentence: &str, people: &Vocabulary, locations: &Vocabulary) -> Option<MeetingStep> {
    if let Some(caps) = START_RE.captures(sentence) {
        return Some(MeetingStep::Start {
            location: resolve(&caps[1], locations),
            time: ClockTime::parse_12h(&caps[2])?,
        });
    }
    if let Some(caps) = TRAVEL_RE.captures(sentence) {
        return Some(MeetingStep::Travel {
            destination: resolve(&caps[1], locations),
            minutes: caps.get(2).and_then(|m| m.as_str().parse().ok()),
            arrival: caps.get(3).and_then(|m| ClockTime::parse_12h(m.as_str())),
        });
    }
    if let Some(caps) = WAIT_RE.captures(sentence) {
        return Some(MeetingStep::Wait {
            until: ClockTime::parse_12h(&caps[1])?,
        });
    }
    if let Some(caps) = MEET_RE.captures(sentence) {
        return Some(MeetingStep::Meet {
            person: resolve(&caps[1], people),
            minutes: caps.get(2).and_then(|m| m.as_str().parse().ok()),
            start: caps.get(3).and_then(|m| ClockTime::parse_12h(m.as_str())),
            end: caps.get(4).and_then(|m| ClockTime::parse_12h(m.as_str())),
        });
    }
    None
}

fn resolve(fragment: &str, vocab: &Vocabulary) -> String {
    vocab
        .resolve(fragment)
        .map_or_else(|| fragment.trim().to_owned(), str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Vocabulary {
        Vocabulary::new(["James", "Mary Ann"])
    }

    fn locations() -> Vocabulary {
        Vocabulary::new(["Russian Hill", "Marina District"])
    }

    #[test]
    fn parses_all_step_forms() {
        let text = "SOLUTION: You start at Russian Hill at 9:00AM. \
            You travel to Marina District in 7 minutes and arrive at 9:07AM. \
            You wait until 3:45PM. \
            You meet James for 75 minutes from 3:45PM to 5:00PM.";
        let plan = parse_meeting_plan(text, &people(), &locations());
        assert_eq!(
            plan.steps,
            vec![
                MeetingStep::Start {
                    location: "Russian Hill".into(),
                    time: ClockTime::from_hm(9, 0),
                },
                MeetingStep::Travel {
                    destination: "Marina District".into(),
                    minutes: Some(7),
                    arrival: Some(ClockTime::from_hm(9, 7)),
                },
                MeetingStep::Wait {
                    until: ClockTime::from_hm(15, 45),
                },
                MeetingStep::Meet {
                    person: "James".into(),
                    minutes: Some(75),
                    start: Some(ClockTime::from_hm(15, 45)),
                    end: Some(ClockTime::from_hm(17, 0)),
                },
            ]
        );
    }

    #[test]
    fn ignores_text_before_solution_marker() {
        let text = "You meet James for 10 minutes. SOLUTION: You wait until 9:30AM.";
        let plan = parse_meeting_plan(text, &people(), &locations());
        assert_eq!(plan.steps.len(), 1);
    }

    #[test]
    fn matches_names_case_insensitively() {
        let text = "you travel to marina district\nYOU MEET mary ann for 30 minutes";
        let plan = parse_meeting_plan(text, &people(), &locations());
        assert_eq!(
            plan.steps,
            vec![
                MeetingStep::Travel {
                    destination: "Marina District".into(),
                    minutes: None,
                    arrival: None,
                },
                MeetingStep::Meet {
                    person: "Mary Ann".into(),
                    minutes: Some(30),
                    start: None,
                    end: None,
                },
            ]
        );
    }

    #[test]
    fn keeps_unknown_names_verbatim() {
        let plan = parse_meeting_plan("You travel to Nob Hill in 5 minutes", &people(), &locations());
        assert!(matches!(
            &plan.steps[0],
            MeetingStep::Travel { destination, .. } if destination == "Nob Hill"
        ));
    }

    #[test]
    fn skips_unrecognised_sentences() {
        let text = "Here is my plan. - You wait until 10:00AM. Have a nice day!";
        let plan = parse_meeting_plan(text, &people(), &locations());
        assert_eq!(
            plan.steps,
            vec![MeetingStep::Wait {
                until: ClockTime::from_hm(10, 0)
            }]
        );
    }

    #[test]
    fn nothing_recognised_is_empty() {
        assert!(parse_meeting_plan("", &people(), &locations()).is_empty());
        assert!(parse_meeting_plan("I am not sure.", &people(), &locations()).is_empty());
    }
}
