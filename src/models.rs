use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Case-insensitive `M`/`F`.
    pub fn parse(value: &str) -> Option<Gender> {
        match value.trim().to_uppercase().as_str() {
            "M" => Some(Gender::Male),
            "F" => Some(Gender::Female),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }
}

impl Serialize for Gender {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// One row of the `student` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentRecord {
    pub student_number: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub degree_program: String,
    pub gender: Gender,
    pub birthdate: NaiveDate,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl<'r> FromRow<'r, PgRow> for StudentRecord {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let gender: String = row.try_get("gender")?;
        let gender = Gender::parse(&gender).ok_or_else(|| sqlx::Error::ColumnDecode {
            index: "gender".to_string(),
            source: format!("unexpected gender value `{}`", gender).into(),
        })?;

        Ok(StudentRecord {
            student_number: row.try_get("student_number")?,
            first_name: row.try_get("first_name")?,
            middle_name: row.try_get("middle_name")?,
            last_name: row.try_get("last_name")?,
            degree_program: row.try_get("degree_program")?,
            gender,
            birthdate: row.try_get("birthdate")?,
            username: row.try_get("username")?,
            password: row.try_get("password")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_parses_either_case() {
        assert_eq!(Gender::parse("m"), Some(Gender::Male));
        assert_eq!(Gender::parse(" F "), Some(Gender::Female));
        assert_eq!(Gender::parse("x"), None);
        assert_eq!(Gender::parse(""), None);
    }

    #[test]
    fn password_never_serialized() {
        let record = StudentRecord {
            student_number: "2021001".into(),
            first_name: "Juan".into(),
            middle_name: "Dela".into(),
            last_name: "Cruz".into(),
            degree_program: "BSCS".into(),
            gender: Gender::Male,
            birthdate: NaiveDate::from_ymd_opt(2001, 5, 4).unwrap(),
            username: "juan01".into(),
            password: "secret".into(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["gender"], "M");
        assert_eq!(json["birthdate"], "2001-05-04");
        assert!(json.get("password").is_none());
    }
}
