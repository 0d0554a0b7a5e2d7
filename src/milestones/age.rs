//! Age extraction from free-text questions

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// One or two ASCII digits at a word boundary, optional whitespace, then "month"
static AGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b([0-9]{1,2})\s*month").expect("age pattern is valid"));

/// Age in months as used by milestone labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Age(u8);

impl Age {
    pub fn months(months: u8) -> Self {
        Age(months)
    }

    pub fn as_months(self) -> u8 {
        self.0
    }

    /// First age mentioned in `question`, if any.
    ///
    /// Matches "6 months", "4 month old", "12MONTHS"; digits are parsed, so
    /// "06 months" and "6 months" are the same age.
    pub fn extract(question: &str) -> Option<Self> {
        let captures = AGE_PATTERN.captures(question)?;
        captures.get(1)?.as_str().parse().ok().map(Age)
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} months", self.0)
    }
}
