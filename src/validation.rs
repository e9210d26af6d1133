//! Field validation for record forms.
//!
//! The roster itself trusts the records it is given. Front ends collect raw
//! form input into a [`RecordDraft`] and call [`RecordDraft::validate`]
//! before handing the resulting [`Record`] to the roster.

use crate::types::{Gender, Record};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Form fields that can fail validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Password,
    Age,
    Gender,
    /// Phone input at this position.
    Phone(usize),
    /// The phone list as a whole.
    Phones,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Name => f.write_str("name"),
            Field::Email => f.write_str("email"),
            Field::Password => f.write_str("password"),
            Field::Age => f.write_str("age"),
            Field::Gender => f.write_str("gender"),
            Field::Phone(i) => write!(f, "phone[{}]", i),
            Field::Phones => f.write_str("phones"),
        }
    }
}

/// A single field failure with the message shown next to the input.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: Field,
    pub message: &'static str,
}

/// Every failure found in a draft.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{} invalid field(s)", .0.len())]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    /// Whether `field` failed.
    pub fn has(&self, field: Field) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn fields(&self) -> Vec<Field> {
        self.0.iter().map(|e| e.field).collect()
    }
}

/// Raw, untrimmed form input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordDraft {
    pub name: String,
    pub email: String,
    pub password: String,
    pub age: String,
    /// None when no gender option is selected.
    pub gender: Option<String>,
    pub phones: Vec<String>,
}

impl RecordDraft {
    /// Prefill a draft from an existing record, as when editing.
    pub fn from_record(record: &Record) -> Self {
        Self {
            name: record.name.clone(),
            email: record.email.clone(),
            password: record.password.clone(),
            age: record.age.to_string(),
            gender: Some(record.gender.as_str().to_string()),
            phones: record.phones.clone(),
        }
    }

    /// Check every field and build the record.
    ///
    /// Values are trimmed first. All failing fields are reported, not just
    /// the first one.
    pub fn validate(&self) -> Result<Record, ValidationErrors> {
        let mut errors = Vec::new();
        let mut fail = |field, message| errors.push(ValidationError { field, message });

        let name = self.name.trim();
        if !name_regex().is_match(name) {
            fail(Field::Name, "Only letters, min 3 chars");
        }

        let email = self.email.trim();
        if !email_regex().is_match(email) {
            fail(Field::Email, "Invalid email");
        }

        let password = self.password.trim();
        if !is_valid_password(password) {
            fail(Field::Password, "Min 8 chars, 1 uppercase & 1 number");
        }

        let age = parse_age(&self.age);
        if age.is_none() {
            fail(Field::Age, "Age must be 1-100");
        }

        let gender = self.gender.as_deref().and_then(|g| g.parse::<Gender>().ok());
        if gender.is_none() {
            fail(Field::Gender, "Please select gender");
        }

        let phones: Vec<String> = self.phones.iter().map(|p| p.trim().to_string()).collect();
        if phones.is_empty() {
            fail(Field::Phones, "At least one phone is required");
        }
        for (i, phone) in phones.iter().enumerate() {
            if !phone_regex().is_match(phone) {
                fail(Field::Phone(i), "Phone must be 10 digits");
            }
        }

        match (age, gender) {
            (Some(age), Some(gender)) if errors.is_empty() => Ok(Record {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
                gender,
                age,
                phones,
            }),
            _ => Err(ValidationErrors(errors)),
        }
    }
}

/// Whole numbers only, but written any way a number can be: `30`, `30.0`
/// and `3e1` are all 30.
fn parse_age(value: &str) -> Option<u8> {
    let age = value.trim().parse::<f64>().ok()?;
    if age.fract() != 0.0 || !(1.0..=100.0).contains(&age) {
        return None;
    }
    Some(age as u8)
}

fn is_valid_password(password: &str) -> bool {
    static LENGTH: OnceLock<Regex> = OnceLock::new();
    static UPPER: OnceLock<Regex> = OnceLock::new();
    static DIGIT: OnceLock<Regex> = OnceLock::new();

    LENGTH.get_or_init(|| Regex::new(r"^.{8,}$").unwrap()).is_match(password)
        && UPPER.get_or_init(|| Regex::new(r"[A-Z]").unwrap()).is_match(password)
        && DIGIT.get_or_init(|| Regex::new(r"[0-9]").unwrap()).is_match(password)
}

fn name_regex() -> &'static Regex {
    static NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    NAME_REGEX.get_or_init(|| Regex::new(r"^[A-Za-z ]{3,}$").unwrap())
}

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

fn phone_regex() -> &'static Regex {
    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    PHONE_REGEX.get_or_init(|| Regex::new(r"^[0-9]{10}$").unwrap())
}
