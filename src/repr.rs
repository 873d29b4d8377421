//! Structural representation of match output.
//!
//! A [`Repr`] is what a [`MatchResult`](crate::MatchResult) looks like once the
//! bookkeeping (consumed lengths) is stripped away: a string, an ordered list of
//! representations, or a single-entry mapping from a label to a representation.
//!
//! # Examples
//!
//! ```rust
//! use toothpick::Repr;
//! let r = Repr::List(vec![Repr::text("2"), Repr::text("+"), Repr::text("3")]);
//! assert_eq!(r.to_string(), "[2 + 3]");
//! assert_eq!(r.to_json(), serde_json::json!(["2", "+", "3"]));
//! ```

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;

/// Structural value produced by [`MatchResult::repr`](crate::MatchResult::repr).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Repr {
    /// The exact text matched by a primitive matcher.
    Text(String),
    /// Ordered member representations of a sequence.
    List(Vec<Repr>),
    /// A label together with the representation it annotates.
    Labeled(String, Box<Repr>),
}

impl Repr {
    pub fn text(s: impl Into<String>) -> Self {
        Repr::Text(s.into())
    }

    pub fn labeled(label: impl Into<String>, inner: Repr) -> Self {
        Repr::Labeled(label.into(), Box::new(inner))
    }

    /// Returns the contained text if this is a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Repr::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the members if this is a `List` value.
    pub fn as_list(&self) -> Option<&[Repr]> {
        match self {
            Repr::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns `(label, inner)` if this is a `Labeled` value.
    pub fn as_labeled(&self) -> Option<(&str, &Repr)> {
        match self {
            Repr::Labeled(label, inner) => Some((label, inner)),
            _ => None,
        }
    }

    /// Converts the representation into JSON: strings, arrays and
    /// single-key objects.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Repr::Text(s) => serde_json::Value::String(s.clone()),
            Repr::List(items) => {
                serde_json::Value::Array(items.iter().map(Repr::to_json).collect())
            }
            Repr::Labeled(label, inner) => {
                let mut map = serde_json::Map::with_capacity(1);
                map.insert(label.clone(), inner.to_json());
                serde_json::Value::Object(map)
            }
        }
    }

    // ------------------------------------------------------------------------
    // Display formatting helpers
    // ------------------------------------------------------------------------

    fn fmt_list(f: &mut fmt::Formatter<'_>, items: &[Repr]) -> fmt::Result {
        write!(f, "[")?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, "]")
    }
}

impl fmt::Display for Repr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Repr::Text(s) => write!(f, "{}", s),
            Repr::List(items) => Repr::fmt_list(f, items),
            Repr::Labeled(label, inner) => write!(f, "{{{}: {}}}", label, inner),
        }
    }
}

impl Serialize for Repr {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Repr::Text(s) => serializer.serialize_str(s),
            Repr::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Repr::Labeled(label, inner) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(label, inner)?;
                map.end()
            }
        }
    }
}

impl From<&str> for Repr {
    fn from(s: &str) -> Self {
        Repr::Text(s.to_string())
    }
}
