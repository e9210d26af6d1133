//! Search and gender filtering.

use crate::types::{Gender, Record, RecordId, Row};

/// Predicate applied to every record when deriving a view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterSpec {
    /// Case-insensitive substring searched in name, email and phones.
    pub query: String,

    /// Only keep records with this gender (None = any).
    pub gender: Option<Gender>,
}

impl FilterSpec {
    /// Match everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// Match records containing `query`.
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            gender: None,
        }
    }

    /// Restrict to a gender.
    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    /// Check a single record against this spec.
    pub fn matches(&self, record: &Record) -> bool {
        self.matcher().matches(record)
    }

    fn matcher(&self) -> Matcher {
        Matcher {
            needle: self.query.trim().to_lowercase(),
            gender: self.gender,
        }
    }
}

/// A spec with its query normalized once per pass.
struct Matcher {
    needle: String,
    gender: Option<Gender>,
}

impl Matcher {
    fn matches(&self, record: &Record) -> bool {
        self.matches_query(record) && self.gender.map_or(true, |g| record.gender == g)
    }

    fn matches_query(&self, record: &Record) -> bool {
        if self.needle.is_empty() {
            return true;
        }

        let contains = |value: &str| value.to_lowercase().contains(&self.needle);
        contains(&record.name)
            || contains(&record.email)
            || record.phones.iter().any(|p| contains(p))
    }
}

/// Derive the rows passing `spec`, in input order.
///
/// Each row's `original_index` is the record's position in `records`.
pub fn filter<'a, I>(records: I, spec: &FilterSpec) -> Vec<Row>
where
    I: IntoIterator<Item = (RecordId, &'a Record)>,
{
    let matcher = spec.matcher();
    records
        .into_iter()
        .enumerate()
        .filter(|(_, (_, record))| matcher.matches(record))
        .map(|(original_index, (id, record))| Row {
            id,
            original_index,
            record: record.clone(),
        })
        .collect()
}
