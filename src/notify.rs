use crate::enroll::SubmitError;
use crate::form::{Field, ValidationFailure};
use crate::models::StudentRecord;

/// What the operator is shown after a submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Created { student: StudentRecord },
    InputWarning { field: Field, message: String },
    DatabaseError { message: String },
}

impl Notification {
    pub fn from_submit(result: &Result<StudentRecord, SubmitError>) -> Self {
        match result {
            Ok(record) => Notification::Created {
                student: record.clone(),
            },
            Err(SubmitError::Validation(failure)) => Notification::InputWarning {
                field: failure.field,
                message: warning_text(failure),
            },
            Err(SubmitError::Persistence(message)) => Notification::DatabaseError {
                message: message.clone(),
            },
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Notification::Created { .. } => "Success",
            Notification::InputWarning { .. } => "Input Error",
            Notification::DatabaseError { .. } => "Database Error",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Notification::Created { .. } => "Student record created successfully!".to_string(),
            Notification::InputWarning { message, .. } => message.clone(),
            Notification::DatabaseError { message } => message.clone(),
        }
    }

    /// Only a successful write empties the form; failures keep input for a retry.
    pub fn clears_form(&self) -> bool {
        matches!(self, Notification::Created { .. })
    }
}

fn warning_text(failure: &ValidationFailure) -> String {
    match failure.field {
        Field::Gender if failure.reason == crate::form::GENDER_REASON => {
            "Gender must be 'M' or 'F'.".to_string()
        }
        Field::Birthdate if failure.reason == crate::form::BIRTHDATE_REASON => {
            "Birthdate must be in YYYY-MM-DD format.".to_string()
        }
        field => format!("{} is {}.", field.label(), failure.reason),
    }
}
