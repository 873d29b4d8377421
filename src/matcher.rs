//! Matchers and combinators.
//!
//! A [`Matcher`] consumes a prefix of a subject string and reports either a
//! [`MatchResult`] or failure. Trees of matchers are built once with the
//! constructors on [`Matcher`] and then matched any number of times.
//!
//! # Variants
//! | Variant        | Succeeds when                          | Result                                   |
//! |----------------|----------------------------------------|------------------------------------------|
//! | `Pattern`      | the anchored regex matches non-empty   | `Primitive` with the matched text        |
//! | `Or`           | any child matches, tried in order      | the first child's result                 |
//! | `Seq`          | every child matches, back to back      | `Sequence` of all child results          |
//! | `Rep`          | always                                 | `Sequence` of consecutive child results  |
//! | `Maybe`        | `always` matches                       | `always`, stretched over `sometimes`     |
//! | `Precondition` | both match, back to back               | the second result, stretched over both   |
//! | `Postcondition`| both match, back to back               | the first result, stretched over both    |
//! | `Cached`       | the inner matcher does                 | the inner result, memoized per subject   |
//! | `Annotate`     | the inner matcher does                 | `Annotated` with the label               |
//! | `Rule`         | the named rule does                    | the rule's result                        |
//! | `Native`       | the closure returns a result           | the closure's result                     |
//!
//! Choice commits: once an `Or` child succeeds, later failures in an enclosing
//! sequence never cause the other children to be retried.
//!
//! # Termination
//! `Rep` stops as soon as its child succeeds without consuming anything. A rule
//! that reaches itself again without consuming input (left recursion) does not
//! terminate.
//!
//! # Example
//! ```rust
//! use toothpick::Matcher;
//! let space = Matcher::pattern(r"\s+").unwrap();
//! let word = Matcher::maybe(Matcher::pattern(r"\w+").unwrap(), space);
//! let words = Matcher::rep(word);
//! let m = words.parse("Hello there\thello").unwrap();
//! assert_eq!(m.repr().to_string(), "[Hello there hello]");
//! assert_eq!(m.count(), 17);
//! ```

pub mod cache;
pub mod native;
pub mod pattern;

use std::sync::Arc;

use crate::errors::Result;
use crate::grammar::RuleRef;
use crate::result::MatchResult;

pub use cache::{CacheStats, MatchCache};
pub use native::{NativeFn, NativeMatcher};
pub use pattern::Pattern;

/// A node of a matcher tree.
///
/// Clones of a `Cached` node share its cache.
#[derive(Debug, Clone)]
pub enum Matcher {
    Pattern(Pattern),
    Or(Vec<Matcher>),
    Seq(Vec<Matcher>),
    Rep(Box<Matcher>),
    Maybe {
        always: Box<Matcher>,
        sometimes: Box<Matcher>,
    },
    /// The first matcher must match; the second matcher's result is returned.
    Precondition(Box<Matcher>, Box<Matcher>),
    /// Both matchers must match; the first matcher's result is returned.
    Postcondition(Box<Matcher>, Box<Matcher>),
    Cached {
        inner: Box<Matcher>,
        cache: Arc<MatchCache>,
    },
    Annotate {
        label: String,
        inner: Box<Matcher>,
    },
    Rule(RuleRef),
    Native(NativeMatcher),
}

// ============================================================================
// CONSTRUCTION API
// ============================================================================

impl Matcher {
    /// Primitive matcher for an anchored regular expression.
    ///
    /// # Errors
    /// Returns [`ToothpickError::InvalidPattern`](crate::ToothpickError::InvalidPattern)
    /// if the pattern does not compile.
    pub fn pattern(pattern: &str) -> Result<Self> {
        Ok(Matcher::Pattern(Pattern::new(pattern)?))
    }

    /// Ordered choice.
    pub fn or(children: impl IntoIterator<Item = Matcher>) -> Self {
        Matcher::Or(children.into_iter().collect())
    }

    pub fn seq(children: impl IntoIterator<Item = Matcher>) -> Self {
        Matcher::Seq(children.into_iter().collect())
    }

    pub fn rep(child: Matcher) -> Self {
        Matcher::Rep(Box::new(child))
    }

    /// `always` followed by optional, discarded `sometimes`.
    pub fn maybe(always: Matcher, sometimes: Matcher) -> Self {
        Matcher::Maybe {
            always: Box::new(always),
            sometimes: Box::new(sometimes),
        }
    }

    /// Requires `a` then `b`, keeping only `b`'s result.
    pub fn pre(a: Matcher, b: Matcher) -> Self {
        Matcher::Precondition(Box::new(a), Box::new(b))
    }

    /// Requires `a` then `b`, keeping only `a`'s result.
    pub fn post(a: Matcher, b: Matcher) -> Self {
        Matcher::Postcondition(Box::new(a), Box::new(b))
    }

    /// Memoizes `inner` with a fresh, empty cache.
    pub fn cached(inner: Matcher) -> Self {
        Matcher::Cached {
            inner: Box::new(inner),
            cache: Arc::new(MatchCache::new()),
        }
    }

    pub fn annotate(label: impl Into<String>, inner: Matcher) -> Self {
        Matcher::Annotate {
            label: label.into(),
            inner: Box::new(inner),
        }
    }

    pub fn native<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&str) -> Option<MatchResult> + Send + Sync + 'static,
    {
        Matcher::Native(NativeMatcher::new(name, func))
    }
}

// ============================================================================
// MATCHING
// ============================================================================

impl Matcher {
    /// Matches a prefix of `subject`, returning `None` on failure.
    pub fn parse(&self, subject: &str) -> Option<MatchResult> {
        match self {
            Matcher::Pattern(pattern) => pattern.parse(subject),
            Matcher::Or(children) => children.iter().find_map(|m| m.parse(subject)),
            Matcher::Seq(children) => parse_seq(children, subject),
            Matcher::Rep(child) => Some(parse_rep(child, subject)),
            Matcher::Maybe { always, sometimes } => {
                let a = always.parse(subject)?;
                let consumed = a.count();
                match remainder(subject, consumed).and_then(|rest| sometimes.parse(rest)) {
                    Some(b) => Some(MatchResult::overridden(a, consumed + b.count())),
                    None => Some(a),
                }
            }
            Matcher::Precondition(a, b) => {
                let consumed = a.parse(subject)?.count();
                let b = b.parse(remainder(subject, consumed)?)?;
                let count = consumed + b.count();
                Some(MatchResult::overridden(b, count))
            }
            Matcher::Postcondition(a, b) => {
                let a = a.parse(subject)?;
                let consumed = a.count();
                let b = b.parse(remainder(subject, consumed)?)?;
                Some(MatchResult::overridden(a, consumed + b.count()))
            }
            Matcher::Cached { inner, cache } => {
                cache.get_or_compute(subject, || inner.parse(subject))
            }
            Matcher::Annotate { label, inner } => inner
                .parse(subject)
                .map(|m| MatchResult::annotated(label.clone(), m)),
            Matcher::Rule(rule) => rule.parse(subject),
            Matcher::Native(native) => native.parse(subject),
        }
    }

    /// Matches a prefix of `subject`, returning [`MatchResult::failure`] on
    /// failure.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toothpick::{Matcher, MatchResult};
    /// let digits = Matcher::pattern(r"\d+").unwrap();
    /// assert_eq!(digits.match_str("12345"), MatchResult::primitive("12345"));
    /// assert_eq!(digits.match_str("hello world"), MatchResult::failure());
    /// ```
    pub fn match_str(&self, subject: &str) -> MatchResult {
        self.parse(subject).unwrap_or_else(MatchResult::failure)
    }

    /// Every rule reference in this tree, without following the references.
    pub fn rule_references(&self) -> Vec<&RuleRef> {
        let mut found = Vec::new();
        self.collect_rule_references(&mut found);
        found
    }

    fn collect_rule_references<'a>(&'a self, found: &mut Vec<&'a RuleRef>) {
        match self {
            Matcher::Pattern(_) | Matcher::Native(_) => {}
            Matcher::Rule(rule) => found.push(rule),
            Matcher::Or(children) | Matcher::Seq(children) => {
                for child in children {
                    child.collect_rule_references(found);
                }
            }
            Matcher::Rep(inner)
            | Matcher::Cached { inner, .. }
            | Matcher::Annotate { inner, .. } => inner.collect_rule_references(found),
            Matcher::Maybe {
                always: a,
                sometimes: b,
            }
            | Matcher::Precondition(a, b)
            | Matcher::Postcondition(a, b) => {
                a.collect_rule_references(found);
                b.collect_rule_references(found);
            }
        }
    }
}

/// The subject left after `consumed` bytes, if that is a valid split point.
fn remainder(subject: &str, consumed: usize) -> Option<&str> {
    subject.get(consumed..)
}

fn parse_seq(children: &[Matcher], subject: &str) -> Option<MatchResult> {
    let mut items = Vec::with_capacity(children.len());
    let mut consumed = 0;
    for child in children {
        let m = child.parse(remainder(subject, consumed)?)?;
        consumed += m.count();
        items.push(m);
    }
    Some(MatchResult::Sequence(items))
}

fn parse_rep(child: &Matcher, subject: &str) -> MatchResult {
    let mut items = Vec::new();
    let mut consumed = 0;
    while let Some(m) = remainder(subject, consumed).and_then(|rest| child.parse(rest)) {
        if m.count() == 0 {
            break;
        }
        consumed += m.count();
        items.push(m);
    }
    MatchResult::Sequence(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repr::Repr;

    fn p(pattern: &str) -> Matcher {
        Matcher::pattern(pattern).unwrap()
    }

    #[test]
    fn or_returns_first_success() {
        let m = Matcher::or([p("a"), p("ab"), p(r"\w+")]);
        assert_eq!(m.parse("abc"), Some(MatchResult::primitive("a")));
        assert_eq!(m.parse("xyz"), Some(MatchResult::primitive("xyz")));
        assert_eq!(m.parse("!"), None);
    }

    #[test]
    fn seq_fails_as_a_whole() {
        let m = Matcher::seq([p(r"\d+"), p(r"\+"), p(r"\d+")]);
        assert_eq!(m.parse("1+2").map(|r| r.count()), Some(3));
        assert_eq!(m.parse("1+x"), None);
    }

    #[test]
    fn empty_seq_succeeds_without_consuming() {
        let m = Matcher::seq([]);
        assert_eq!(m.parse("abc"), Some(MatchResult::Sequence(vec![])));
    }

    #[test]
    fn rep_with_zero_matches_is_empty_sequence() {
        let m = Matcher::rep(p(r"\d"));
        assert_eq!(m.parse("abc"), Some(MatchResult::Sequence(vec![])));
    }

    #[test]
    fn rep_stops_on_zero_progress() {
        let m = Matcher::rep(Matcher::rep(p("a")));
        let r = m.parse("aab").unwrap();
        assert_eq!(r.count(), 2);
        assert_eq!(r.repr(), Repr::List(vec![Repr::List(vec![Repr::text("a"), Repr::text("a")])]));
    }

    #[test]
    fn maybe_without_sometimes_keeps_always() {
        let m = Matcher::maybe(p(r"\d+"), p(r"\s+"));
        assert_eq!(m.parse("194"), Some(MatchResult::primitive("194")));
        assert_eq!(
            m.parse("194   x"),
            Some(MatchResult::overridden(MatchResult::primitive("194"), 6))
        );
        assert_eq!(m.parse("   194"), None);
    }

    #[test]
    fn pre_and_post_discard_one_side() {
        let op = p(r"[\+\*-/]");
        let digits = p(r"\d+");
        let pre = Matcher::pre(op.clone(), digits.clone());
        let post = Matcher::post(op, digits);
        assert_eq!(pre.parse("+194").map(|r| (r.repr(), r.count())), Some((Repr::text("194"), 4)));
        assert_eq!(post.parse("+194").map(|r| (r.repr(), r.count())), Some((Repr::text("+"), 4)));
        assert_eq!(pre.parse("+x"), None);
        assert_eq!(post.parse("+x"), None);
        assert_eq!(post.parse("194"), None);
    }

    #[test]
    fn annotate_labels_success_only() {
        let m = Matcher::annotate("num", p(r"\d+"));
        assert_eq!(m.parse("42").map(|r| r.repr()), Some(Repr::labeled("num", Repr::text("42"))));
        assert_eq!(m.parse("x"), None);
    }

    #[test]
    fn cached_clones_share_one_cache() {
        let m = Matcher::cached(p(r"\d+"));
        let copy = m.clone();
        m.parse("12");
        copy.parse("12");
        match (&m, &copy) {
            (Matcher::Cached { cache: a, .. }, Matcher::Cached { cache: b, .. }) => {
                assert!(Arc::ptr_eq(a, b));
                assert_eq!(a.stats().hits, 1);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn native_overlong_result_is_failure() {
        let m = Matcher::native("liar", |_| Some(MatchResult::primitive("toolong")));
        assert_eq!(m.parse("abc"), None);
        assert!(m.parse("toolong!").is_some());
    }

    #[test]
    fn matchers_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Matcher>();
    }
}
