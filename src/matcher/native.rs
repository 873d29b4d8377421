//! Host functions used as matchers.

use std::fmt;
use std::sync::Arc;

use crate::result::MatchResult;

/// Signature of a native matcher body.
pub type NativeFn = dyn Fn(&str) -> Option<MatchResult> + Send + Sync;

/// A named Rust closure participating in a matcher tree.
///
/// The closure must behave like every other matcher: consume a prefix of the
/// subject and return the same outcome for the same subject when it sits under
/// a `Cached` node.
/// A result whose count is past the end of the subject, or not on a char
/// boundary, is treated as a failure.
#[derive(Clone)]
pub struct NativeMatcher {
    name: String,
    func: Arc<NativeFn>,
}

impl NativeMatcher {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&str) -> Option<MatchResult> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parse(&self, subject: &str) -> Option<MatchResult> {
        (self.func)(subject)
            .filter(|m| !m.is_failure() && subject.is_char_boundary(m.count()))
    }
}

impl fmt::Debug for NativeMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeMatcher").field("name", &self.name).finish()
    }
}
