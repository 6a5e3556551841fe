use thiserror::Error;

use crate::auth::CredentialPolicy;
use crate::form::{self, FieldMap, ValidationFailure};
use crate::models::StudentRecord;
use crate::store::{StoreError, StudentStore};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationFailure),
    #[error("{0}")]
    Persistence(String),
}

impl From<StoreError> for SubmitError {
    fn from(err: StoreError) -> Self {
        SubmitError::Persistence(err.message)
    }
}

/// Everything a submit needs: the store handle and how to treat passwords.
pub struct Enrollment<S> {
    store: S,
    credentials: CredentialPolicy,
}

impl<S: StudentStore> Enrollment<S> {
    pub fn new(store: S, credentials: CredentialPolicy) -> Self {
        Self { store, credentials }
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates the form and, if it passes, writes exactly one row.
    pub async fn submit(&self, raw: &FieldMap) -> Result<StudentRecord, SubmitError> {
        let record = form::validate(raw).map_err(|failure| {
            log::debug!("Rejected submission: {}", failure);
            failure
        })?;
        self.persist(record).await
    }

    pub async fn persist(&self, mut record: StudentRecord) -> Result<StudentRecord, SubmitError> {
        record.password = self
            .credentials
            .seal(&record.password)
            .map_err(|err| SubmitError::Persistence(err.to_string()))?;

        if let Err(err) = self.store.insert(&record).await {
            log::warn!(
                "Could not save student `{}`: {}",
                record.student_number,
                err
            );
            return Err(err.into());
        }

        log::info!("Created student record `{}`", record.student_number);
        Ok(record)
    }

    pub async fn lookup(&self, student_number: &str) -> Result<Option<StudentRecord>, StoreError> {
        self.store.find(student_number.trim()).await
    }
}
