//! Rule registry, lazy rule references and grammars.
//!
//! [`Rules`] maps names to matchers. [`Rules::use_rule`] hands out a
//! [`Matcher::Rule`] node that looks its name up only when it is matched, so a
//! rule may refer to rules (itself included) that are not defined yet.
//!
//! # Ownership
//! The registry table is owned by `Rules` handles (clones share one table).
//! Rule references hold a weak handle, so a recursive grammar is not an
//! ownership cycle. A reference whose registry has been dropped fails.
//!
//! # Thread Safety
//! The table sits behind an `RwLock`. Lookups clone the rule's `Arc` and
//! release the lock before matching, so rules may be redefined while other
//! threads are matching.
//!
//! # Example
//! ```rust
//! use toothpick::{Grammar, Matcher, Rules};
//! let rules = Rules::new();
//! let space = Matcher::pattern(r"\s+").unwrap();
//! rules.insert("integer", Matcher::maybe(Matcher::pattern(r"\d+").unwrap(), space.clone()));
//! rules.insert("operator", Matcher::maybe(Matcher::pattern(r"[\+\*-/]").unwrap(), space));
//! rules.insert(
//!     "statement",
//!     Matcher::seq([rules.use_rule("integer"), rules.use_rule("operator"), rules.use_rule("expression")]),
//! );
//! rules.insert("expression", Matcher::or([rules.use_rule("statement"), rules.use_rule("integer")]));
//! let grammar = Grammar::new(rules, "expression");
//! grammar.validate().unwrap();
//! assert_eq!(grammar.match_str("2+3*5-14").repr().to_string(), "[2 + [3 * [5 - 14]]]");
//! ```

pub mod config;

use log::{trace, warn};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use crate::errors::{Result, ToothpickError};
use crate::matcher::Matcher;
use crate::result::MatchResult;

type RuleTable = RwLock<HashMap<String, Arc<Matcher>>>;

// ============================================================================
// RULE REFERENCES
// ============================================================================

/// A rule name resolved against its registry at match time.
#[derive(Clone)]
pub struct RuleRef {
    table: Weak<RuleTable>,
    name: String,
}

impl RuleRef {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The matcher currently bound to the name, if any.
    pub fn resolve(&self) -> Option<Arc<Matcher>> {
        let table = self.table.upgrade()?;
        let found = table
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&self.name)
            .cloned();
        found
    }

    /// True if the name is currently bound in a live registry.
    pub fn is_bound(&self) -> bool {
        self.resolve().is_some()
    }

    pub fn parse(&self, subject: &str) -> Option<MatchResult> {
        match self.resolve() {
            Some(matcher) => {
                trace!("resolved rule '{}'", self.name);
                matcher.parse(subject)
            }
            None => {
                warn!("rule '{}' is not bound; matching as failure", self.name);
                None
            }
        }
    }
}

impl fmt::Debug for RuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RuleRef").field(&self.name).finish()
    }
}

// ============================================================================
// RULE REGISTRY
// ============================================================================

/// Registry of named rules.
///
/// Names are case-sensitive. Redefining a name replaces the previous matcher;
/// existing references see the new definition on their next match.
#[derive(Clone, Default)]
pub struct Rules {
    table: Arc<RuleTable>,
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<Matcher>>> {
        self.table.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<Matcher>>> {
        self.table.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns a lazy reference to `name`. The name does not need to be
    /// defined yet.
    pub fn use_rule(&self, name: &str) -> Matcher {
        Matcher::Rule(RuleRef {
            table: Arc::downgrade(&self.table),
            name: name.to_string(),
        })
    }

    /// Binds `matcher` under `name` wrapped in an annotation labelled `name`,
    /// and returns the stored matcher.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toothpick::{Matcher, Repr, Rules};
    /// let rules = Rules::new();
    /// let num = rules.set("num", Matcher::pattern(r"\d+").unwrap());
    /// assert_eq!(num.parse("42").unwrap().repr(), Repr::labeled("num", Repr::text("42")));
    /// ```
    pub fn set(&self, name: &str, matcher: Matcher) -> Matcher {
        let annotated = Matcher::annotate(name, matcher);
        self.insert(name, annotated.clone());
        annotated
    }

    /// Binds `matcher` under `name` as is, returning the previous binding.
    pub fn insert(&self, name: &str, matcher: Matcher) -> Option<Arc<Matcher>> {
        self.write().insert(name.to_string(), Arc::new(matcher))
    }

    pub fn remove(&self, name: &str) -> Option<Arc<Matcher>> {
        self.write().remove(name)
    }

    pub fn get(&self, name: &str) -> Option<Arc<Matcher>> {
        self.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Defined rule names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Checks that every rule reference held by a defined rule is bound.
    /// Rules are visited in name order; the first unbound reference is reported.
    pub fn validate(&self) -> Result<()> {
        let snapshot: Vec<(String, Arc<Matcher>)> = {
            let guard = self.read();
            let mut entries: Vec<_> = guard.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            entries
        };
        for (name, matcher) in &snapshot {
            if let Some(unbound) = matcher.rule_references().into_iter().find(|r| !r.is_bound()) {
                return Err(ToothpickError::undefined_rule(unbound.name(), name, &self.names()));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Rules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rules").field("names", &self.names()).finish()
    }
}

// ============================================================================
// GRAMMAR
// ============================================================================

/// A rule registry together with the name of its root rule.
#[derive(Debug, Clone)]
pub struct Grammar {
    rules: Rules,
    root: String,
}

impl Grammar {
    pub fn new(rules: Rules, root: impl Into<String>) -> Self {
        Self {
            rules,
            root: root.into(),
        }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Checks that the root and every referenced rule are defined.
    ///
    /// # Errors
    /// [`ToothpickError::MissingRoot`] or [`ToothpickError::UndefinedRule`].
    pub fn validate(&self) -> Result<()> {
        if !self.rules.contains(&self.root) {
            return Err(ToothpickError::missing_root(&self.root, &self.rules.names()));
        }
        self.rules.validate()
    }

    /// Matches the root rule against `subject`, returning `None` on failure.
    pub fn parse(&self, subject: &str) -> Option<MatchResult> {
        match self.rules.get(&self.root) {
            Some(root) => root.parse(subject),
            None => {
                warn!("root rule '{}' is not bound; matching as failure", self.root);
                None
            }
        }
    }

    /// Matches the root rule, returning [`MatchResult::failure`] on failure.
    pub fn match_str(&self, subject: &str) -> MatchResult {
        self.parse(subject).unwrap_or_else(MatchResult::failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_before_definition_resolves_later() {
        let rules = Rules::new();
        let r = rules.use_rule("digit");
        assert_eq!(r.parse("1"), None);
        rules.insert("digit", Matcher::pattern(r"\d").unwrap());
        assert_eq!(r.parse("1"), Some(MatchResult::primitive("1")));
    }

    #[test]
    fn dropped_registry_fails_references() {
        let rules = Rules::new();
        rules.insert("x", Matcher::pattern("x").unwrap());
        let r = rules.use_rule("x");
        drop(rules);
        assert_eq!(r.parse("x"), None);
    }

    #[test]
    fn redefinition_is_seen_by_existing_references() {
        let rules = Rules::new();
        let r = rules.use_rule("t");
        rules.insert("t", Matcher::pattern("a").unwrap());
        assert!(rules.insert("t", Matcher::pattern("b").unwrap()).is_some());
        assert_eq!(r.parse("b"), Some(MatchResult::primitive("b")));
        assert_eq!(r.parse("a"), None);
    }

    #[test]
    fn validate_reports_first_unbound_reference() {
        let rules = Rules::new();
        rules.insert("a", Matcher::seq([rules.use_rule("b"), rules.use_rule("c")]));
        rules.insert("b", Matcher::pattern("b").unwrap());
        let err = Grammar::new(rules.clone(), "a").validate().unwrap_err();
        assert!(matches!(
            err,
            ToothpickError::UndefinedRule { ref name, ref referenced_by, .. }
                if name == "c" && referenced_by == "a"
        ));
        rules.insert("c", Matcher::pattern("c").unwrap());
        assert!(Grammar::new(rules, "a").validate().is_ok());
    }

    #[test]
    fn validate_reports_missing_root() {
        let grammar = Grammar::new(Rules::new(), "start");
        assert!(matches!(grammar.validate(), Err(ToothpickError::MissingRoot { .. })));
        assert_eq!(grammar.match_str("anything"), MatchResult::failure());
    }

    #[test]
    fn names_are_sorted() {
        let rules = Rules::new();
        rules.insert("b", Matcher::seq([]));
        rules.insert("a", Matcher::seq([]));
        assert_eq!(rules.names(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(rules.len(), 2);
        assert!(rules.remove("a").is_some());
        assert!(!rules.contains("a"));
    }
}
