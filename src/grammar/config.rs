//! Declarative grammar definitions.
//!
//! A [`GrammarConfig`] describes a grammar as data, loadable from JSON or YAML:
//!
//! ```yaml
//! root: expression
//! memoize: true
//! rules:
//!   integer:
//!     matcher: { maybe: [ { pattern: '\d+' }, { pattern: '\s+' } ] }
//!   operator:
//!     matcher: { maybe: [ { pattern: '[\+\*-/]' }, { pattern: '\s+' } ] }
//!   statement:
//!     matcher: { seq: [ { rule: integer }, { rule: operator }, { rule: expression } ] }
//!   expression:
//!     matcher: { or: [ { rule: statement }, { rule: integer } ] }
//! ```
//!
//! With `memoize` set, every constructed node except rule references is
//! wrapped in its own cache.
//! A rule with `label: true` is registered through [`Rules::set`] and labels
//! its own output.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::{Result, ToothpickError};
use crate::grammar::{Grammar, Rules};
use crate::matcher::Matcher;

static RULE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*$").expect("rule name pattern is valid"));

/// One matcher node of a grammar definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherConfig {
    Pattern(String),
    Or(Vec<MatcherConfig>),
    Seq(Vec<MatcherConfig>),
    Rep(Box<MatcherConfig>),
    Maybe(Box<MatcherConfig>, Box<MatcherConfig>),
    Pre(Box<MatcherConfig>, Box<MatcherConfig>),
    Post(Box<MatcherConfig>, Box<MatcherConfig>),
    Cached(Box<MatcherConfig>),
    Annotate {
        label: String,
        matcher: Box<MatcherConfig>,
    },
    Rule(String),
}

/// A named rule of a grammar definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub matcher: MatcherConfig,
    #[serde(default)]
    pub label: bool,
}

/// A complete grammar definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarConfig {
    pub root: String,
    #[serde(default)]
    pub memoize: bool,
    pub rules: BTreeMap<String, RuleConfig>,
}

impl GrammarConfig {
    pub fn from_json(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_yaml(source: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builds the grammar: validates rule names, compiles every pattern,
    /// registers every rule and validates the result.
    ///
    /// # Errors
    /// Returns the first invalid rule name, malformed pattern, missing root
    /// or unbound rule reference.
    pub fn build(&self) -> Result<Grammar> {
        let rules = Rules::new();
        for (name, rule) in &self.rules {
            check_rule_name(name)?;
            let matcher = self.build_matcher(&rules, &rule.matcher)?;
            if rule.label {
                rules.set(name, matcher);
            } else {
                rules.insert(name, matcher);
            }
        }
        let grammar = Grammar::new(rules, self.root.clone());
        grammar.validate()?;
        debug!(
            "built grammar rooted at '{}' with {} rules (memoize: {})",
            self.root,
            self.rules.len(),
            self.memoize
        );
        Ok(grammar)
    }

    fn build_matcher(&self, rules: &Rules, config: &MatcherConfig) -> Result<Matcher> {
        let build = |c: &MatcherConfig| self.build_matcher(rules, c);
        let build_all = |cs: &[MatcherConfig]| cs.iter().map(build).collect::<Result<Vec<_>>>();
        let matcher = match config {
            MatcherConfig::Pattern(p) => Matcher::pattern(p)?,
            MatcherConfig::Or(children) => Matcher::or(build_all(children)?),
            MatcherConfig::Seq(children) => Matcher::seq(build_all(children)?),
            MatcherConfig::Rep(child) => Matcher::rep(build(child)?),
            MatcherConfig::Maybe(a, b) => Matcher::maybe(build(a)?, build(b)?),
            MatcherConfig::Pre(a, b) => Matcher::pre(build(a)?, build(b)?),
            MatcherConfig::Post(a, b) => Matcher::post(build(a)?, build(b)?),
            // Already memoized when `memoize` is set.
            MatcherConfig::Cached(inner) if self.memoize => return build(inner),
            MatcherConfig::Cached(inner) => Matcher::cached(build(inner)?),
            MatcherConfig::Annotate { label, matcher } => {
                Matcher::annotate(label, build(matcher)?)
            }
            // The referenced rule's own nodes carry the caches, so a redefined
            // rule is picked up on the next match.
            MatcherConfig::Rule(name) => {
                check_rule_name(name)?;
                return Ok(rules.use_rule(name));
            }
        };
        Ok(if self.memoize {
            Matcher::cached(matcher)
        } else {
            matcher
        })
    }
}

fn check_rule_name(name: &str) -> Result<()> {
    if RULE_NAME.is_match(name) {
        Ok(())
    } else {
        Err(ToothpickError::InvalidRuleName {
            name: name.to_string(),
        })
    }
}
