pub mod auth;
pub mod config;
pub mod enroll;
pub mod err;
pub mod form;
pub mod models;
pub mod notify;
pub mod store;

use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::handler::Handler;
use axum::{routing::get, routing::post, Extension, Json, Router};

use std::sync::Arc;
use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use crate::config::Args;
use crate::enroll::Enrollment;
use crate::err::{Error, Fine, Maybe, Nothing};
use crate::form::FieldMap;
use crate::models::StudentRecord;
use crate::notify::Notification;
use crate::store::{PgStore, StudentStore};

pub type Payload<T> = axum::response::Result<Json<Maybe<T>>, Error>;

pub fn proceeds<V>(value: V) -> Payload<V> where V: Serialize {
    Ok(Json(Fine(value)))
}

pub fn breaks<V>(err: Error) -> Payload<V> where V: Serialize {
    Ok(Json(Nothing(err)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let store = PgStore::connect(&args.connect_options())
        .await
        .with_context(|| {
            format!(
                "could not connect to database `{}` at {}:{}",
                args.db_name, args.db_host, args.db_port
            )
        })?;
    let enrollment = Arc::new(Enrollment::new(store, args.credential_policy()));

    log::info!("Starting GoBeSi enrollment server on http://{}", args.bind);
    axum::Server::bind(&args.bind)
        .serve(router(enrollment).into_make_service())
        .await?;
    Ok(())
}

pub fn router<S: StudentStore>(enrollment: Arc<Enrollment<S>>) -> Router {
    Router::new()
        .route("/student/create", post(create_student::<S>))
        .route("/student/read/:number", get(read_student::<S>))
        .fallback(err::handler404.into_service())
        .layer(Extension(enrollment))
}

async fn create_student<S: StudentStore>(
    Extension(enrollment): Extension<Arc<Enrollment<S>>>,
    body: Result<Json<FieldMap>, JsonRejection>,
) -> Payload<CreatedStudent> {
    let Json(fields) = match body {
        Ok(fields) => fields,
        Err(rejection) => return breaks(Error::from(rejection)),
    };

    let note = Notification::from_submit(&enrollment.submit(&fields).await);
    let message = note.message();
    let clear_form = note.clears_form();
    log::debug!("{}: {}", note.title(), message);
    match note {
        Notification::Created { student } => proceeds(CreatedStudent {
            student,
            message,
            clear_form,
        }),
        Notification::InputWarning { field, message } => {
            breaks(Error::InvalidField { field, message })
        }
        Notification::DatabaseError { message } => breaks(Error::DatabaseError { message }),
    }
}

async fn read_student<S: StudentStore>(
    Extension(enrollment): Extension<Arc<Enrollment<S>>>,
    Path(number): Path<String>,
) -> Payload<StudentRecord> {
    match enrollment.lookup(&number).await? {
        Some(student) => proceeds(student),
        None => breaks(Error::NotFound {
            message: format!("Student `{}` does not exist!", number),
        }),
    }
}

#[derive(Debug, Clone, Serialize)]
struct CreatedStudent {
    #[serde(flatten)]
    student: StudentRecord,
    message: String,
    clear_form: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::CredentialPolicy;
    use crate::form::tests::scenario_a;
    use crate::store::memory::MemoryStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> (Arc<Enrollment<MemoryStore>>, Router) {
        let enrollment = Arc::new(Enrollment::new(MemoryStore::default(), CredentialPolicy::Plain));
        (enrollment.clone(), router(enrollment))
    }

    async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn submit(fields: &FieldMap) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/student/create")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(fields).unwrap()))
            .unwrap()
    }

    #[tokio::test]
    async fn create_then_read() {
        let (enrollment, app) = app();
        let (status, body) = call(app.clone(), submit(&scenario_a())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["student_number"], "2021001");
        assert_eq!(body["first_name"], "Juan");
        assert_eq!(body["gender"], "M");
        assert_eq!(body["birthdate"], "2001-05-04");
        assert_eq!(body["message"], "Student record created successfully!");
        assert_eq!(body["clear_form"], true);
        assert!(body.get("password").is_none());
        assert_eq!(enrollment.store().rows().await.len(), 1);

        let read = Request::builder()
            .uri("/student/read/2021001")
            .body(Body::empty())
            .unwrap();
        let (_, body) = call(app, read).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["gender"], "M");
        assert_eq!(body["birthdate"], "2001-05-04");
        assert!(body.get("password").is_none());
    }

    #[tokio::test]
    async fn invalid_field_is_reported() {
        let (enrollment, app) = app();
        let mut fields = scenario_a();
        fields.insert("gender".into(), "X".into());
        let (_, body) = call(app, submit(&fields)).await;
        assert_eq!(
            body,
            json!({
                "error": "InvalidField",
                "field": "gender",
                "message": "Gender must be 'M' or 'F'."
            })
        );
        assert_eq!(enrollment.store().insert_attempts(), 0);
    }

    #[tokio::test]
    async fn malformed_body_is_an_invalid_payload() {
        let (enrollment, app) = app();
        for body in [
            json!({ "student_number": 2021001, "first_name": "Juan" }),
            json!({ "student_number": null }),
            json!(["2021001"]),
        ] {
            let request = Request::builder()
                .method("POST")
                .uri("/student/create")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap();
            let (status, body) = call(app.clone(), request).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["error"], "InvalidPayload");
            assert!(body["message"].is_string());
        }
        assert_eq!(enrollment.store().insert_attempts(), 0);
    }

    #[tokio::test]
    async fn duplicate_is_a_database_error() {
        let (_, app) = app();
        call(app.clone(), submit(&scenario_a())).await;
        let (_, body) = call(app, submit(&scenario_a())).await;
        assert_eq!(body["error"], "DatabaseError");
        assert_eq!(
            body["message"],
            "duplicate key value violates unique constraint \"student_pkey\""
        );
    }

    #[tokio::test]
    async fn unknown_student_and_route() {
        let (_, app) = app();
        let read = Request::builder()
            .uri("/student/read/0000000")
            .body(Body::empty())
            .unwrap();
        let (_, body) = call(app.clone(), read).await;
        assert_eq!(body["error"], "NotFound");

        let stray = Request::builder().uri("/nope").body(Body::empty()).unwrap();
        let (status, body) = call(app, stray).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NotFound");
    }
}
