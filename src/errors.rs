//! Toothpick error handling.
//!
//! Matching never produces an error: a matcher either succeeds or fails. The
//! errors here are configuration-time mistakes caught while building matchers
//! and grammars (malformed patterns, unbound rules, unreadable grammar
//! definitions).

use miette::Diagnostic;
use thiserror::Error;

/// Crate-wide result alias for fallible construction.
pub type Result<T> = std::result::Result<T, ToothpickError>;

/// Errors raised while constructing matchers and grammars.
#[derive(Error, Diagnostic, Debug)]
pub enum ToothpickError {
    #[error("Pattern error: invalid regular expression '{pattern}'")]
    #[diagnostic(
        code(toothpick::pattern::invalid),
        help("primitive patterns use the `regex` crate syntax and are anchored at the start of the subject")
    )]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Grammar error: rule '{name}' is referenced by '{referenced_by}' but never defined")]
    #[diagnostic(code(toothpick::grammar::undefined_rule))]
    UndefinedRule {
        name: String,
        referenced_by: String,
        #[help]
        help: Option<String>,
    },

    #[error("Grammar error: root rule '{root}' is not defined")]
    #[diagnostic(code(toothpick::grammar::missing_root))]
    MissingRoot {
        root: String,
        #[help]
        help: Option<String>,
    },

    #[error("Config error: invalid rule name '{name}'")]
    #[diagnostic(
        code(toothpick::config::invalid_rule_name),
        help("rule names start with a letter or underscore, followed by letters, digits, '_' or '-'")
    )]
    InvalidRuleName { name: String },

    #[error("Config error: could not read {format} grammar definition: {message}")]
    #[diagnostic(code(toothpick::config::format))]
    ConfigFormat { format: &'static str, message: String },
}

impl ToothpickError {
    pub(crate) fn undefined_rule(name: &str, referenced_by: &str, known: &[String]) -> Self {
        let help = if known.is_empty() {
            Some("the rule registry is empty".to_string())
        } else {
            Some(format!("defined rules: {}", known.join(", ")))
        };
        ToothpickError::UndefinedRule {
            name: name.to_string(),
            referenced_by: referenced_by.to_string(),
            help,
        }
    }

    pub(crate) fn missing_root(root: &str, known: &[String]) -> Self {
        let help = if known.is_empty() {
            None
        } else {
            Some(format!("defined rules: {}", known.join(", ")))
        };
        ToothpickError::MissingRoot {
            root: root.to_string(),
            help,
        }
    }
}

impl From<serde_json::Error> for ToothpickError {
    fn from(e: serde_json::Error) -> Self {
        ToothpickError::ConfigFormat {
            format: "JSON",
            message: e.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for ToothpickError {
    fn from(e: serde_yaml::Error) -> Self {
        ToothpickError::ConfigFormat {
            format: "YAML",
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_rule_lists_known_rules_in_help() {
        let err = ToothpickError::undefined_rule(
            "expr",
            "statement",
            &["integer".to_string(), "statement".to_string()],
        );
        assert_eq!(
            err.to_string(),
            "Grammar error: rule 'expr' is referenced by 'statement' but never defined"
        );
        let help = err.help().map(|h| h.to_string());
        assert_eq!(help.as_deref(), Some("defined rules: integer, statement"));
    }

    #[test]
    fn report_renders_code_and_help() {
        let err = ToothpickError::missing_root("start", &["atom".to_string()]);
        let rendered = format!("{:?}", miette::Report::new(err));
        assert!(rendered.contains("toothpick::grammar::missing_root"));
        assert!(rendered.contains("root rule 'start' is not defined"));
        assert!(rendered.contains("defined rules: atom"));
    }

    #[test]
    fn diagnostic_codes_are_namespaced() {
        let err = ToothpickError::InvalidRuleName { name: "9x".into() };
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("toothpick::config::invalid_rule_name"));
    }
}
