// Canonical "unavailable" sentinel for optional host facts.

use serde::{Serialize, Serializer};
use std::fmt;

/// Rendered text for an unavailable value, in the report and in JSON.
pub const NOT_AVAILABLE: &str = "N/A";

/// A value that a probe may or may not have been able to determine.
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    Available(T),
    Unavailable,
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Unavailable
    }
}

impl<T> Field<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Field::Available(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Available(v) => Some(v),
            Field::Unavailable => None,
        }
    }

    /// Render with `f`, or `N/A`.
    pub fn render(&self, f: impl FnOnce(&T) -> String) -> String {
        match self {
            Field::Available(v) => f(v),
            Field::Unavailable => NOT_AVAILABLE.to_string(),
        }
    }
}

impl Field<String> {
    /// Empty strings count as unavailable.
    pub fn non_empty(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.trim().is_empty() {
            Field::Unavailable
        } else {
            Field::Available(s)
        }
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => Field::Available(v),
            None => Field::Unavailable,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Available(v) => v.fmt(f),
            Field::Unavailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Field::Available(v) => v.serialize(serializer),
            Field::Unavailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

/// Join a list for display; an empty list is unavailable.
pub fn join_or_na<I, S>(items: I, sep: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = items
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(sep);
    if joined.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        joined
    }
}
