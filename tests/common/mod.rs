//! Shared helpers for the toothpick integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use toothpick::{Grammar, MatchResult, Matcher, Rules};

/// Routes `log` output through the test harness. Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Compiles a pattern that is known to be valid.
pub fn pat(pattern: &str) -> Matcher {
    Matcher::pattern(pattern).expect("test pattern should compile")
}

/// `pattern` followed by optional trailing whitespace.
pub fn token(pattern: &str) -> Matcher {
    Matcher::maybe(pat(pattern), pat(r"\s+"))
}

/// A native matcher delegating to `inner` and counting its invocations.
pub fn counting(inner: Matcher) -> (Matcher, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();
    let m = Matcher::native("counting", move |subject: &str| -> Option<MatchResult> {
        seen.fetch_add(1, Ordering::SeqCst);
        inner.parse(subject)
    });
    (m, calls)
}

/// The arithmetic grammar: `expression = statement | integer`,
/// `statement = integer operator expression`.
pub fn arithmetic_grammar() -> Grammar {
    let rules = Rules::new();
    rules.insert("integer", token(r"\d+"));
    rules.insert("operator", token(r"[\+\*-/]"));
    rules.insert(
        "statement",
        Matcher::seq([
            rules.use_rule("integer"),
            rules.use_rule("operator"),
            rules.use_rule("expression"),
        ]),
    );
    rules.insert(
        "expression",
        Matcher::or([rules.use_rule("statement"), rules.use_rule("integer")]),
    );
    Grammar::new(rules, "expression")
}

/// The s-expression grammar with a self-labelling `list` rule.
pub fn sexpr_grammar() -> Grammar {
    let rules = Rules::new();
    let lp = token(r"'?\(");
    let rp = token(r"\)");
    let word = token(r"'?\w+");
    rules.insert("atom", Matcher::or([word, rules.use_rule("list")]));
    rules.set(
        "list",
        Matcher::pre(
            lp,
            Matcher::post(
                Matcher::seq([rules.use_rule("atom"), Matcher::rep(rules.use_rule("atom"))]),
                rp,
            ),
        ),
    );
    Grammar::new(rules, "atom")
}
