//! Text parsing primitives shared by the domain parsers.
//!
//! - [`ClockTime`]: minutes past midnight, parsed from `14:30` or `2:30PM`.
//! - [`Vocabulary`]: case-insensitive lookup of known names (cities, people,
//!   locations) inside free text.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static CLOCK_24H_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})$").expect("valid 24h clock regex"));

static CLOCK_12H_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d{1,2}):(\d{2})\s*([ap])m$").expect("valid 12h clock regex")
});

// ---------------------------------------------------------------------------
// ClockTime
// ---------------------------------------------------------------------------

/// A time of day in minutes past midnight.
///
/// Values are not range-checked: `25:00` parses to 1500 minutes. Whether a
/// time is acceptable is a question for the validators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u32);

impl ClockTime {
    pub const fn from_hm(hour: u32, minute: u32) -> Self {
        Self(hour * 60 + minute)
    }

    /// Minutes past midnight.
    pub const fn minutes(self) -> u32 {
        self.0
    }

    /// `self` moved forward by `minutes`, or `None` if that overflows.
    pub fn plus_minutes(self, minutes: u32) -> Option<Self> {
        self.0.checked_add(minutes).map(Self)
    }

    /// Minutes from `earlier` to `self`, or `None` if `earlier` is later.
    pub fn minutes_since(self, earlier: ClockTime) -> Option<u32> {
        self.0.checked_sub(earlier.0)
    }

    /// Parse a 24-hour `H:MM` / `HH:MM` time.
    pub fn parse_24h(s: &str) -> Option<Self> {
        let caps = CLOCK_24H_RE.captures(s.trim())?;
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps[2].parse().ok()?;
        Some(Self::from_hm(hour, minute))
    }

    /// Parse a 12-hour `H:MMAM` / `H:MM pm` time.
    pub fn parse_12h(s: &str) -> Option<Self> {
        let caps = CLOCK_12H_RE.captures(s.trim())?;
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps[2].parse().ok()?;
        let pm = caps[3].eq_ignore_ascii_case("p");
        let hour = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, false) => h,
            (h, true) => h + 12,
        };
        Some(Self::from_hm(hour, minute))
    }

    /// Parse either form, trying the 12-hour form first.
    pub fn parse(s: &str) -> Option<Self> {
        Self::parse_12h(s).or_else(|| Self::parse_24h(s))
    }

    /// Render as `H:MMAM` / `H:MMPM`.
    pub fn to_12h(self) -> String {
        let hour = self.0 / 60;
        let minute = self.0 % 60;
        let (display_hour, suffix) = match hour % 24 {
            0 => (12, "AM"),
            h @ 1..=11 => (h, "AM"),
            12 => (12, "PM"),
            h => (h - 12, "PM"),
        };
        format!("{display_hour}:{minute:02}{suffix}")
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid time of day: {value:?}"))
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

/// Lowercase and collapse runs of whitespace.
pub fn fold(s: &str) -> String {
    s.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Compare two names ignoring case and whitespace differences.
pub fn same_name(a: &str, b: &str) -> bool {
    fold(a) == fold(b)
}

/// A set of known names, matched case-insensitively against free text.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    /// `(canonical, folded)` pairs, longest folded form first so that
    /// "San Francisco Airport" wins over "San Francisco".
    entries: Vec<(String, String)>,
}

impl Vocabulary {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries: Vec<(String, String)> = names
            .into_iter()
            .map(|n| (n.as_ref().trim().to_owned(), fold(n.as_ref())))
            .filter(|(_, folded)| !folded.is_empty())
            .collect();
        entries.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.1.cmp(&b.1)));
        entries.dedup_by(|a, b| a.1 == b.1);
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The canonical spelling of `fragment` if it names a known entry exactly.
    pub fn canonical(&self, fragment: &str) -> Option<&str> {
        let folded = fold(fragment);
        self.entries
            .iter()
            .find(|(_, f)| *f == folded)
            .map(|(c, _)| c.as_str())
    }

    /// The longest known entry that `fragment` starts with, ending on a word
    /// boundary.
    pub fn match_prefix(&self, fragment: &str) -> Option<&str> {
        let folded = fold(fragment);
        self.entries
            .iter()
            .find(|(_, f)| folded.starts_with(f.as_str()) && at_boundary(&folded, f.len()))
            .map(|(c, _)| c.as_str())
    }

    /// The earliest known entry mentioned anywhere in `text`, as a whole word.
    pub fn find_in(&self, text: &str) -> Option<&str> {
        let folded = fold(text);
        let mut best: Option<(usize, &str)> = None;
        for (canonical, f) in &self.entries {
            let Some(pos) = find_word(&folded, f) else {
                continue;
            };
            // Entries are sorted longest first, so ties keep the longer name.
            if best.is_none_or(|(best_pos, _)| pos < best_pos) {
                best = Some((pos, canonical.as_str()));
            }
        }
        best.map(|(_, c)| c)
    }

    /// Resolve a name fragment: exact match, then prefix match.
    pub fn resolve(&self, fragment: &str) -> Option<&str> {
        self.canonical(fragment).or_else(|| self.match_prefix(fragment))
    }
}

fn at_boundary(haystack: &str, idx: usize) -> bool {
    haystack[idx..]
        .chars()
        .next()
        .is_none_or(|c| !c.is_alphanumeric())
}

fn find_word(haystack: &str, needle: &str) -> Option<usize> {
    let mut start = 0;
    while let Some(offset) = haystack[start..].find(needle) {
        let pos = start + offset;
        let before_ok = haystack[..pos]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        if before_ok && at_boundary(haystack, pos + needle.len()) {
            return Some(pos);
        }
        start = pos + haystack[pos..].chars().next().map_or(1, char::len_utf8);
        if start >= haystack.len() {
            break;
        }
    }
    None
}

/// Strip list markers and markdown emphasis from the start and end of a
/// line: `- **Day 1-3:** Paris.` becomes `Day 1-3:** Paris`.
pub fn strip_decoration(line: &str) -> &str {
    line.trim()
        .trim_start_matches(|c: char| matches!(c, '-' | '*' | '#' | '>' | '•') || c.is_whitespace())
        .trim_end_matches(|c: char| matches!(c, '.' | '*' | ',' | ';' | '!') || c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_24h_times() {
        assert_eq!(ClockTime::parse_24h("9:00"), Some(ClockTime::from_hm(9, 0)));
        assert_eq!(ClockTime::parse_24h(" 14:30 "), Some(ClockTime::from_hm(14, 30)));
        assert_eq!(ClockTime::parse_24h("9"), None);
    }

    #[test]
    fn out_of_range_times_are_preserved() {
        assert_eq!(ClockTime::parse_24h("25:00").map(ClockTime::minutes), Some(1500));
    }

    #[test]
    fn parses_12h_times() {
        assert_eq!(ClockTime::parse_12h("9:00AM"), Some(ClockTime::from_hm(9, 0)));
        assert_eq!(ClockTime::parse_12h("3:45PM"), Some(ClockTime::from_hm(15, 45)));
        assert_eq!(ClockTime::parse_12h("12:15am"), Some(ClockTime::from_hm(0, 15)));
        assert_eq!(ClockTime::parse_12h("12:00 PM"), Some(ClockTime::from_hm(12, 0)));
        assert_eq!(ClockTime::parse_12h("15:00"), None);
    }

    #[test]
    fn renders_both_forms() {
        let t = ClockTime::from_hm(15, 5);
        assert_eq!(t.to_string(), "15:05");
        assert_eq!(t.to_12h(), "3:05PM");
        assert_eq!(ClockTime::from_hm(0, 30).to_12h(), "12:30AM");
    }

    #[test]
    fn plus_minutes_refuses_overflow() {
        let t = ClockTime::from_hm(9, 30);
        assert_eq!(t.plus_minutes(45), Some(ClockTime::from_hm(10, 15)));
        assert_eq!(t.plus_minutes(u32::MAX), None);
    }

    #[test]
    fn minutes_since_refuses_negative_spans() {
        let a = ClockTime::from_hm(10, 0);
        let b = ClockTime::from_hm(10, 30);
        assert_eq!(b.minutes_since(a), Some(30));
        assert_eq!(a.minutes_since(b), None);
    }

    #[test]
    fn vocabulary_matches_case_insensitively() {
        let vocab = Vocabulary::new(["Marina District", "Russian Hill"]);
        assert_eq!(vocab.canonical("marina  district"), Some("Marina District"));
        assert_eq!(vocab.canonical("Marina"), None);
    }

    #[test]
    fn vocabulary_prefers_longest_prefix() {
        let vocab = Vocabulary::new(["San Francisco", "San Francisco Airport"]);
        assert_eq!(
            vocab.match_prefix("San Francisco Airport in 10 minutes"),
            Some("San Francisco Airport")
        );
        assert_eq!(vocab.match_prefix("San Franciscans"), None);
    }

    #[test]
    fn vocabulary_finds_earliest_whole_word() {
        let vocab = Vocabulary::new(["Rome", "Paris"]);
        assert_eq!(vocab.find_in("Fly from Paris to Rome"), Some("Paris"));
        assert_eq!(vocab.find_in("Romeo and Juliet"), None);
    }

    #[test]
    fn strip_decoration_removes_markdown() {
        assert_eq!(strip_decoration("- **Day 1-3:** Paris."), "Day 1-3:** Paris");
        assert_eq!(strip_decoration("   "), "");
    }
}
