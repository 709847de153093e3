//! Extractors whose rejections use the same `{"detail": ...}` body as every
//! other error response.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_macros::{FromRequest, FromRequestParts};

use crate::dto::ErrorResponse;

#[derive(Debug)]
pub struct ApiRejection {
    status: StatusCode,
    detail: String,
}

impl From<JsonRejection> for ApiRejection {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApiRejection {
    fn from(rejection: PathRejection) -> Self {
        Self {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiRejection {
    fn into_response(self) -> Response {
        tracing::debug!("rejected request ({}): {}", self.status, self.detail);
        (self.status, Json(ErrorResponse::new(self.detail))).into_response()
    }
}

/// JSON request body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiRejection))]
pub struct JsonBody<T>(pub T);

/// Path parameters.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiRejection))]
pub struct PathParam<T>(pub T);
