use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

/// Every way a request can fail, mapped onto the `{success:false, error}`
/// envelope.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Missing required parameter: {0}")]
    MissingParam(&'static str),
    #[error("{}", .0.body_text())]
    BadQuery(#[from] QueryRejection),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("Unauthorized")]
    Unauthorized,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingParam(_) | ApiError::BadQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Store(e) = &self {
            error!(error = %e, "store call failed");
        }
        let body = Json(json!({"success": false, "error": self.to_string()}));
        (self.status(), body).into_response()
    }
}
