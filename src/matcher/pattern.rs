//! Anchored regular-expression primitive.

use regex::Regex;

use crate::errors::{Result, ToothpickError};
use crate::result::MatchResult;

/// A regular expression that only matches at the start of the subject.
///
/// The pattern is compiled once, at construction, wrapped as `^(?:pattern)` so
/// that alternations are anchored as a whole.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compiles `pattern`, failing fast on malformed syntax.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toothpick::matcher::Pattern;
    /// assert!(Pattern::new(r"\d+").is_ok());
    /// assert!(Pattern::new(r"(\d+").is_err());
    /// ```
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{})", pattern)).map_err(|source| {
            ToothpickError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// The pattern text as supplied by the caller, without the anchor.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Matches the start of `subject`.
    ///
    /// An empty match is reported as a failure: it is indistinguishable from
    /// the failure sentinel.
    pub fn parse(&self, subject: &str) -> Option<MatchResult> {
        let found = self.regex.find(subject)?;
        if found.as_str().is_empty() {
            return None;
        }
        Some(MatchResult::primitive(found.as_str()))
    }
}
