//! Column sorting with per-field toggle state.

use crate::types::{Record, Row};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Sortable record fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortField {
    Name,
    Email,
    Age,
    Gender,
}

impl SortField {
    pub const ALL: [SortField; 4] = [
        SortField::Name,
        SortField::Email,
        SortField::Age,
        SortField::Gender,
    ];

    /// Compare two records on this field, ascending.
    ///
    /// Age compares numerically; the others compare lowercased text.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        match self {
            SortField::Age => a.age.cmp(&b.age),
            SortField::Name => cmp_folded(&a.name, &b.name),
            SortField::Email => cmp_folded(&a.email, &b.email),
            SortField::Gender => a.gender.as_str().cmp(b.gender.as_str()),
        }
    }
}

fn cmp_folded(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Sort direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => f.write_str("asc"),
            SortDirection::Desc => f.write_str("desc"),
        }
    }
}

/// A field paired with the direction it was sorted in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Remembers the next direction for every field.
///
/// Each field starts ascending and flips after every sort on it,
/// independently of the other fields.
#[derive(Clone, Debug, Default)]
pub struct SortCoordinator {
    directions: HashMap<SortField, SortDirection>,
}

impl SortCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direction the next sort on `field` will use.
    pub fn direction(&self, field: SortField) -> SortDirection {
        self.directions.get(&field).copied().unwrap_or_default()
    }

    /// Sort `rows` by `field` and flip that field's direction.
    ///
    /// The sort is stable, so rows with equal keys keep their input order.
    pub fn sort(&mut self, mut rows: Vec<Row>, field: SortField) -> (Vec<Row>, SortSpec) {
        let direction = self.direction(field);
        rows.sort_by(|a, b| direction.apply(field.compare(&a.record, &b.record)));
        self.directions.insert(field, direction.flipped());

        debug!(?field, %direction, rows = rows.len(), "sorted view");
        (rows, SortSpec { field, direction })
    }
}
