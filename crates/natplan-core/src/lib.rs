//! Scoring of natural-language planning answers.
//!
//! Three planning families are supported: multi-city trips, meetings around
//! a city, and calendar scheduling. Each family implements [`Domain`]; the
//! [`driver`] loads a dataset, scores every example and aggregates a
//! [`Summary`].

pub mod calendar;
pub mod config;
pub mod dataset;
pub mod domain;
pub mod driver;
pub mod meeting;
pub mod report;
pub mod results;
pub mod text;
pub mod trip;
pub mod verdict;

pub use calendar::{CalendarDomain, CalendarMode};
pub use config::EvalConfig;
pub use dataset::{DatasetError, Example, load_examples};
pub use domain::{Difficulty, Domain};
pub use driver::{EvalError, ExampleResult, Summary, Tally, evaluate, run};
pub use meeting::MeetingDomain;
pub use report::write_report;
pub use trip::TripDomain;
pub use verdict::{Outcome, Verdict};
