//! Typed values produced by bind resolution.
//!
//! A bind resolves to a [`ValueSequence`]: zero, one or many [`Value`]s. Only
//! the first value of a sequence takes part in truthiness and substitution.

use std::fmt;

use chrono::NaiveDate;

/// A single resolved value.
///
/// The variant set is closed: formatting and truthiness are defined
/// exhaustively per variant, and nothing about a value is reachable from
/// template text other than its canonical form.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A string.
    Text(String),
    /// A 64-bit floating point number.
    Number(f64),
    /// A 64-bit integer.
    Integer(i64),
    /// A boolean.
    Boolean(bool),
    /// A calendar date with no time of day.
    Date(NaiveDate),
}

impl Value {
    /// Returns the canonical string form of this value.
    ///
    /// | Variant | Form |
    /// |---|---|
    /// | `Text` | verbatim |
    /// | `Boolean` | `true` / `false` |
    /// | `Integer` | base-10 |
    /// | `Number` | at least one fractional digit (`1.0`) |
    /// | `Date` | `YYYY-MM-DD` |
    pub fn to_canonical_string(&self) -> String {
        self.to_string()
    }

    /// Returns `true` if this value is considered "truthy" as the first item
    /// of a sequence.
    ///
    /// Booleans are their own truth value; everything else is truthy iff its
    /// canonical form is non-empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Boolean(b) => *b,
            Self::Text(s) => !s.is_empty(),
            Self::Number(_) | Self::Integer(_) | Self::Date(_) => !self.to_string().is_empty(),
        }
    }

    /// Returns the string contents if this is `Text`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write_number(f, *n),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        f.write_str("NaN")
    } else if n.is_infinite() {
        f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n.fract() == 0.0 {
        write!(f, "{n:.1}")
    } else {
        write!(f, "{n}")
    }
}

// -- From implementations --

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Number(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

/// An ordered, possibly-empty sequence of values from one bind resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueSequence(Vec<Value>);

impl ValueSequence {
    /// Creates an empty sequence.
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Creates a sequence holding a single value.
    pub fn single(value: impl Into<Value>) -> Self {
        Self(vec![value.into()])
    }

    /// Returns the first value, the only one that takes part in rendering.
    pub fn first(&self) -> Option<&Value> {
        self.0.first()
    }

    /// Returns the number of values.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the sequence holds no values.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends a value.
    pub fn push(&mut self, value: impl Into<Value>) {
        self.0.push(value.into());
    }

    /// Iterates over all values in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    /// Section truthiness: an empty sequence is false, otherwise the first
    /// value decides (see [`Value::is_truthy`]).
    pub fn is_truthy(&self) -> bool {
        self.first().is_some_and(Value::is_truthy)
    }

    /// Returns the canonical form of the first value, or `""` when empty.
    pub fn to_canonical_string(&self) -> String {
        self.first().map(Value::to_canonical_string).unwrap_or_default()
    }
}

impl From<Vec<Value>> for ValueSequence {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl From<Value> for ValueSequence {
    fn from(value: Value) -> Self {
        Self(vec![value])
    }
}

impl FromIterator<Value> for ValueSequence {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ValueSequence {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValueSequence {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
