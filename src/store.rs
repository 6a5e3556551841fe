use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::models::StudentRecord;

const INSERT_STUDENT: &str = "INSERT INTO student (
        student_number, first_name, middle_name, last_name,
        degree_program, gender, birthdate, username, password
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)";

const SELECT_STUDENT: &str = "SELECT * FROM student WHERE student_number = $1 LIMIT 1";

/// Diagnostic from the persistence store, carried as-is to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) => Self::new(db.message()),
            other => Self::new(other.to_string()),
        }
    }
}

#[async_trait]
pub trait StudentStore: Send + Sync + 'static {
    /// Writes one row inside its own unit of work. On failure nothing is kept.
    async fn insert(&self, record: &StudentRecord) -> Result<(), StoreError>;

    async fn find(&self, student_number: &str) -> Result<Option<StudentRecord>, StoreError>;
}

/// A single PostgreSQL connection, opened once and used one call at a time.
pub struct PgStore {
    conn: Mutex<PgConnection>,
}

impl PgStore {
    pub async fn connect(options: &PgConnectOptions) -> Result<Self, sqlx::Error> {
        let conn = PgConnection::connect_with(options).await?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

#[async_trait]
impl StudentStore for PgStore {
    async fn insert(&self, record: &StudentRecord) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().await;
        let mut tx = conn.begin().await?;

        let res = sqlx::query(INSERT_STUDENT)
            .bind(&record.student_number)
            .bind(&record.first_name)
            .bind(&record.middle_name)
            .bind(&record.last_name)
            .bind(&record.degree_program)
            .bind(record.gender.as_str())
            .bind(record.birthdate)
            .bind(&record.username)
            .bind(&record.password)
            .execute(&mut tx)
            .await;

        match res {
            Ok(_) => {
                tx.commit().await?;
                Ok(())
            }
            Err(err) => {
                if let Err(rollback) = tx.rollback().await {
                    log::error!("Rollback after failed insert also failed: {}", rollback);
                }
                Err(StoreError::from(err))
            }
        }
    }

    async fn find(&self, student_number: &str) -> Result<Option<StudentRecord>, StoreError> {
        let mut conn = self.conn.lock().await;
        let student = sqlx::query_as::<_, StudentRecord>(SELECT_STUDENT)
            .bind(student_number)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(student)
    }
}
