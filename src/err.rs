#![allow(non_snake_case)]

use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;

use serde::Serialize;

use crate::form::Field;
use crate::store::StoreError;

pub async fn handler404(path: Uri) -> (StatusCode, Json<Error>) {
    (
        StatusCode::NOT_FOUND,
        Json(Error::NotFound {
            message: format!("Invalid path: {}", path),
        }),
    )
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Maybe<T> {
    Nothing(Error),
    Fine(Success<T>),
}

pub fn Fine<V>(v: V) -> Maybe<V>
where
    V: Serialize,
{
    Maybe::Fine(Success::of(v))
}

pub fn Nothing<V>(err: Error) -> Maybe<V> {
    Maybe::Nothing(err)
}

#[derive(Debug, Clone, Serialize)]
pub struct Success<V> {
    success: bool,
    #[serde(flatten)]
    value: V,
}

impl<V: Serialize> Success<V> {
    pub fn of(value: V) -> Self {
        Self {
            success: true,
            value,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "error")]
pub enum Error {
    NotFound { message: String },
    InvalidField { field: Field, message: String },
    InvalidPayload { message: String },
    DatabaseError { message: String },
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        Json::into_response(Json(self))
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidPayload {
            message: rejection.to_string(),
        }
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Self::DatabaseError {
            message: err.message,
        }
    }
}
