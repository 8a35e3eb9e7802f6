//! Immutable set of values a filter tests membership against.

use std::collections::BTreeSet;

/// Configured match values. Duplicates collapse and order is irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    values: BTreeSet<String>,
}

impl MatchSet {
    /// Build a match set from any sequence of strings, including an empty one.
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.contains(value)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for MatchSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
