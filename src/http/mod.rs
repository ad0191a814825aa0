use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, FromRequest, Path, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tokio::sync::Mutex;

use crate::{
    config::Config,
    domain::{DraftField, DraftRecord, FieldValue, StudentRecord, ValidationError},
    state::Directory,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub directory: Arc<Mutex<Directory>>,
}

#[derive(Debug)]
pub struct ApiError {
    code: &'static str,
    message: String,
    status: StatusCode,
    details: Map<String, Value>,
}

impl ApiError {
    fn new(code: &'static str, status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status,
            details: Map::new(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new("invalid_request", StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("not_found", StatusCode::NOT_FOUND, message)
    }
}

impl From<ValidationError> for ApiError {
    fn from(value: ValidationError) -> Self {
        let mut err = ApiError::new(value.code(), StatusCode::BAD_REQUEST, value.to_string());
        if let ValidationError::InvalidGraduationYear { value } = value {
            err.details
                .insert("graduation_year".to_string(), Value::String(value));
        }
        err
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    details: Map<String, Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code.to_string(),
                message: self.message,
                details: self.details,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    axum::Json<T>: FromRequest<S>,
    <axum::Json<T> as FromRequest<S>>::Rejection: std::fmt::Display,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::invalid_request(e.to_string()))?;
        Ok(Self(value))
    }
}

#[derive(Serialize)]
struct Items<T> {
    items: Vec<T>,
}

#[derive(Serialize)]
struct FormResponse {
    draft: DraftRecord,
    graduation_year_options: Vec<i32>,
}

#[derive(Deserialize)]
struct SetFieldRequest {
    value: FieldValue,
}

pub fn build_router(config: Config, directory: Arc<Mutex<Directory>>) -> Router {
    let app_state = AppState {
        config: Arc::new(config),
        directory,
    };

    let api = Router::new()
        .route("/health", get(health))
        .route("/students", get(list_students))
        .route("/form", get(get_form))
        .route("/form/fields/:field", put(set_form_field))
        .route("/form/submit", post(submit_form))
        .fallback(fallback_not_found);

    Router::new()
        .nest("/api", api)
        .fallback(fallback_not_found)
        .layer(Extension(app_state))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": crate::version::VERSION,
    }))
}

async fn list_students(Extension(state): Extension<AppState>) -> Json<Items<StudentRecord>> {
    let directory = state.directory.lock().await;
    Json(Items {
        items: directory.store.list().to_vec(),
    })
}

async fn get_form(Extension(state): Extension<AppState>) -> Json<FormResponse> {
    let directory = state.directory.lock().await;
    Json(FormResponse {
        draft: directory.form.draft().clone(),
        graduation_year_options: state.config.graduation_years.clone(),
    })
}

async fn set_form_field(
    Extension(state): Extension<AppState>,
    Path(field): Path<String>,
    ApiJson(req): ApiJson<SetFieldRequest>,
) -> Result<Json<DraftRecord>, ApiError> {
    let field: DraftField = field
        .parse()
        .map_err(|e: crate::domain::UnknownDraftField| ApiError::invalid_request(e.to_string()))?;
    let mut directory = state.directory.lock().await;
    directory.form.set_field(field, req.value);
    Ok(Json(directory.form.draft().clone()))
}

async fn submit_form(
    Extension(state): Extension<AppState>,
) -> Result<(StatusCode, Json<StudentRecord>), ApiError> {
    let mut directory = state.directory.lock().await;
    let record = directory.submit()?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn fallback_not_found() -> ApiError {
    ApiError::not_found("not found")
}
