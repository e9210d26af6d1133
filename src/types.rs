//! Core types for the roster.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Stable identifier for a record held by the store.
///
/// Ids are assigned in memory when a record is appended or loaded and are
/// never written to the persisted slot.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(pub u64);

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl RecordId {
    pub fn next(self) -> Self {
        RecordId(self.0 + 1)
    }
}

/// Gender recorded for a user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown gender value.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown gender: {0}")]
pub struct UnknownGender(pub String);

impl FromStr for Gender {
    type Err = UnknownGender;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownGender(s.to_string()))
    }
}

/// A single user record.
///
/// This is also the persisted shape: the slot holds a JSON array of these.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub email: String,
    pub password: String,
    pub gender: Gender,
    /// 1..=100, checked by the collaborator.
    pub age: u8,
    /// Each exactly 10 digits, at least one.
    pub phones: Vec<String>,
}

impl Record {
    /// Create a record with the given fields.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        gender: Gender,
        age: u8,
        phones: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            gender,
            age,
            phones,
        }
    }
}

/// One entry of a filtered sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    /// Stable id of the underlying record.
    pub id: RecordId,

    /// Position in the store at derivation time.
    pub original_index: usize,

    pub record: Record,
}

impl Row {
    /// Key identifying this row in mutation commands.
    pub fn key(&self) -> RowKey {
        RowKey {
            id: self.id,
            original_index: self.original_index,
        }
    }
}

/// Reference to a rendered row: its store position plus the id that was
/// there when the row was derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RowKey {
    pub id: RecordId,
    pub original_index: usize,
}

/// Everything a collaborator needs to render the current view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewSnapshot {
    /// Rows on the current page.
    pub rows: Vec<Row>,
    pub page_count: usize,
    pub current_page: usize,
    /// Length of the whole filtered sequence.
    pub total_matches: usize,
}
