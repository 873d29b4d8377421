//! Match results.
//!
//! A [`MatchResult`] records how much of the subject a matcher consumed and
//! what structure it found. Counts are byte lengths of the UTF-8 subject.
//!
//! The distinguished failure value is the zero-length primitive result over
//! the empty string, see [`MatchResult::failure`]. It is only produced by the
//! sentinel-style entry points ([`Matcher::match_str`](crate::Matcher::match_str),
//! [`Grammar::match_str`](crate::Grammar::match_str)); the engine itself
//! reports failure as `None`.

use crate::repr::Repr;

/// The outcome of a successful match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    /// The exact substring matched by a primitive matcher.
    Primitive(String),
    /// An inner result reporting a caller-supplied consumed length.
    Overridden { inner: Box<MatchResult>, count: usize },
    /// An inner result labelled with a name.
    Annotated { label: String, inner: Box<MatchResult> },
    /// Ordered results of a sequence or repetition.
    Sequence(Vec<MatchResult>),
}

impl MatchResult {
    /// The failure sentinel: a primitive result over the empty string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toothpick::MatchResult;
    /// assert!(MatchResult::failure().is_failure());
    /// assert_eq!(MatchResult::failure(), MatchResult::primitive(""));
    /// assert_eq!(MatchResult::failure().count(), 0);
    /// ```
    pub fn failure() -> Self {
        MatchResult::Primitive(String::new())
    }

    /// Returns true if this result is value-equal to [`MatchResult::failure`].
    pub fn is_failure(&self) -> bool {
        matches!(self, MatchResult::Primitive(s) if s.is_empty())
    }

    pub fn primitive(s: impl Into<String>) -> Self {
        MatchResult::Primitive(s.into())
    }

    pub fn overridden(inner: MatchResult, count: usize) -> Self {
        MatchResult::Overridden {
            inner: Box::new(inner),
            count,
        }
    }

    pub fn annotated(label: impl Into<String>, inner: MatchResult) -> Self {
        MatchResult::Annotated {
            label: label.into(),
            inner: Box::new(inner),
        }
    }

    /// Number of bytes of the subject consumed by this result.
    pub fn count(&self) -> usize {
        match self {
            MatchResult::Primitive(s) => s.len(),
            MatchResult::Overridden { count, .. } => *count,
            MatchResult::Annotated { inner, .. } => inner.count(),
            MatchResult::Sequence(items) => items.iter().map(MatchResult::count).sum(),
        }
    }

    /// Structural representation of this result.
    ///
    /// Overridden lengths are invisible here: the representation of an
    /// `Overridden` result is that of its inner result.
    pub fn repr(&self) -> Repr {
        match self {
            MatchResult::Primitive(s) => Repr::Text(s.clone()),
            MatchResult::Overridden { inner, .. } => inner.repr(),
            MatchResult::Annotated { label, inner } => Repr::labeled(label.clone(), inner.repr()),
            MatchResult::Sequence(items) => Repr::List(items.iter().map(MatchResult::repr).collect()),
        }
    }

    /// Converts a sentinel-style result back into an explicit one.
    pub fn into_option(self) -> Option<MatchResult> {
        if self.is_failure() {
            None
        } else {
            Some(self)
        }
    }
}
