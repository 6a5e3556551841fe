use std::collections::HashMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use thiserror::Error;

use crate::models::{Gender, StudentRecord};

/// Raw form input as submitted, keyed by field name.
pub type FieldMap = HashMap<String, String>;

pub const REQUIRED: &str = "required";
pub const GENDER_REASON: &str = "must be M or F";
pub const BIRTHDATE_REASON: &str = "must be YYYY-MM-DD";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    StudentNumber,
    FirstName,
    MiddleName,
    LastName,
    DegreeProgram,
    Gender,
    Birthdate,
    Username,
    Password,
}

impl Field {
    /// Presence checks run in exactly this order.
    pub const ALL: [Field; 9] = [
        Field::StudentNumber,
        Field::FirstName,
        Field::MiddleName,
        Field::LastName,
        Field::DegreeProgram,
        Field::Gender,
        Field::Birthdate,
        Field::Username,
        Field::Password,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Field::StudentNumber => "student_number",
            Field::FirstName => "first_name",
            Field::MiddleName => "middle_name",
            Field::LastName => "last_name",
            Field::DegreeProgram => "degree_program",
            Field::Gender => "gender",
            Field::Birthdate => "birthdate",
            Field::Username => "username",
            Field::Password => "password",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::StudentNumber => "Student Number",
            Field::FirstName => "First Name",
            Field::MiddleName => "Middle Name",
            Field::LastName => "Last Name",
            Field::DegreeProgram => "Degree Program",
            Field::Gender => "Gender",
            Field::Birthdate => "Birthdate",
            Field::Username => "Username",
            Field::Password => "Password",
        }
    }

    /// Label the desktop form used, where it differs from `label`.
    fn form_label(self) -> Option<&'static str> {
        match self {
            Field::Birthdate => Some("Birthdate (YYYY-MM-DD)"),
            _ => None,
        }
    }

    /// Trimmed value for this field; a missing entry reads as empty.
    fn read(self, raw: &FieldMap) -> &str {
        raw.get(self.key())
            .or_else(|| raw.get(self.label()))
            .or_else(|| self.form_label().and_then(|label| raw.get(label)))
            .map(|value| value.trim())
            .unwrap_or_default()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationFailure {
    pub field: Field,
    pub reason: &'static str,
}

impl ValidationFailure {
    fn new(field: Field, reason: &'static str) -> Self {
        Self { field, reason }
    }
}

/// Checks a submitted form and builds the normalized record.
///
/// The first failing check is returned; nothing is accumulated.
pub fn validate(raw: &FieldMap) -> Result<StudentRecord, ValidationFailure> {
    for field in Field::ALL {
        if field.read(raw).is_empty() {
            return Err(ValidationFailure::new(field, REQUIRED));
        }
    }

    let gender = Gender::parse(Field::Gender.read(raw))
        .ok_or_else(|| ValidationFailure::new(Field::Gender, GENDER_REASON))?;

    let birthdate = parse_birthdate(Field::Birthdate.read(raw))
        .ok_or_else(|| ValidationFailure::new(Field::Birthdate, BIRTHDATE_REASON))?;

    Ok(StudentRecord {
        student_number: Field::StudentNumber.read(raw).to_string(),
        first_name: Field::FirstName.read(raw).to_string(),
        middle_name: Field::MiddleName.read(raw).to_string(),
        last_name: Field::LastName.read(raw).to_string(),
        degree_program: Field::DegreeProgram.read(raw).to_string(),
        gender,
        birthdate,
        username: Field::Username.read(raw).to_string(),
        password: Field::Password.read(raw).to_string(),
    })
}

/// Strict `YYYY-MM-DD`. chrono alone would take short years and unpadded parts.
fn parse_birthdate(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !digits_ok {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .filter(|date| date.year() >= 1)
}
