//! Mapping from store errors to HTTP responses.

use api_shared::MessageRes;
use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use his_core::StoreError;

/// An error response: a status code and a `{message}` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Convert a store error raised while performing `action`, e.g. "updating the user".
    ///
    /// Infrastructure failures are logged here and reported to the client without details.
    pub fn store(err: StoreError, action: &str) -> Self {
        match &err {
            StoreError::InvalidInput(message) => {
                Self::new(StatusCode::BAD_REQUEST, message.clone())
            }
            StoreError::NotFound { entity, .. } => {
                Self::new(StatusCode::NOT_FOUND, format!("{} not found", entity))
            }
            StoreError::Conflict { entity, .. } => {
                Self::new(StatusCode::BAD_REQUEST, format!("{} already exists", entity))
            }
            StoreError::InvalidReference { entity, .. } => Self::new(
                StatusCode::BAD_REQUEST,
                format!("Invalid {}", entity.noun()),
            ),
            StoreError::InUse {
                entity, dependent, ..
            } => Self::new(
                StatusCode::BAD_REQUEST,
                format!("{} is still referenced by a {}", entity, dependent.noun()),
            ),
            StoreError::Connect(_) | StoreError::Migration(_) | StoreError::Persistence(_) => {
                tracing::error!("Error {}: {:?}", action, err);
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("An error occurred while {}", action),
                )
            }
        }
    }

    /// `map_err` adaptor: `.map_err(ApiError::during("deleting the doctor"))`.
    pub fn during(action: &'static str) -> impl Fn(StoreError) -> Self {
        move |err| Self::store(err, action)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(MessageRes::new(self.message))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("rejected request body: {}", rejection.body_text());
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

/// `Json` extractor whose rejections use the `{message}` envelope with status 400.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
