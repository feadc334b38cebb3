//! Store locations
//!
//! A [`Location`] is the label of one section of the store. The set of valid
//! locations is fixed by the rows of a [`TransitionTable`](super::TransitionTable).

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Named section of the store a customer can occupy
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location(String);

impl Location {
    /// Create a location from a label, trimming surrounding whitespace
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(label.as_ref().trim().to_string())
    }

    /// The section label
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the label is empty after trimming
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Location {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for Location {
    fn from(label: String) -> Self {
        Self::new(label)
    }
}

impl Borrow<str> for Location {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Location {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Location {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
