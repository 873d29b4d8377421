//! Toothpick: a small parser-combinator engine.
//!
//! Parsers are trees of [`Matcher`] values, each consuming a prefix of a
//! subject string. Primitive matchers are anchored regular expressions; the
//! combinators compose them; named [`Rules`] let a grammar refer to rules that
//! are defined later, which is how recursive grammars are written.
//!
//! ```rust
//! use toothpick::{Grammar, Matcher, Rules};
//! use serde_json::json;
//!
//! let rules = Rules::new();
//! let lp = Matcher::pattern(r"\(").unwrap();
//! let rp = Matcher::pattern(r"\)").unwrap();
//! let space = Matcher::pattern(r"\s+").unwrap();
//! let word = Matcher::maybe(Matcher::pattern(r"\w+").unwrap(), space);
//! rules.insert("atom", Matcher::or([word, rules.use_rule("list")]));
//! rules.set("list", Matcher::pre(lp, Matcher::post(Matcher::rep(rules.use_rule("atom")), rp)));
//!
//! let grammar = Grammar::new(rules, "atom");
//! let m = grammar.parse("(a (b c))").unwrap();
//! assert_eq!(m.count(), 9);
//! assert_eq!(m.repr().to_json(), json!({"list": ["a", {"list": ["b", "c"]}]}));
//! ```

pub mod errors;
pub mod grammar;
pub mod matcher;
pub mod repr;
pub mod result;

pub use crate::errors::{Result, ToothpickError};
pub use crate::grammar::config::{GrammarConfig, MatcherConfig, RuleConfig};
pub use crate::grammar::{Grammar, RuleRef, Rules};
pub use crate::matcher::{CacheStats, MatchCache, Matcher};
pub use crate::repr::Repr;
pub use crate::result::MatchResult;
