use axum::Json;
use axum::response::{IntoResponse, Response};
use http::{StatusCode, header};
use registry_auth_sdk::RegistryAuthError;
use serde::Serialize;

/// RFC-9457 problem body.
#[derive(Debug, Serialize)]
struct Problem {
    #[serde(rename = "type")]
    type_url: &'static str,
    title: &'static str,
    status: u16,
    detail: String,
}

/// Wraps [`RegistryAuthError`] so handlers can return it with `?`.
#[derive(Debug)]
pub struct ApiError(pub RegistryAuthError);

impl From<RegistryAuthError> for ApiError {
    fn from(e: RegistryAuthError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error_to_response(&self.0)
    }
}

/// Convert an auth error to a problem response carrying its status class.
pub fn error_to_response(err: &RegistryAuthError) -> Response {
    let status = err.status();
    let problem = Problem {
        type_url: "about:blank",
        title: status.canonical_reason().unwrap_or("Error"),
        status: status.as_u16(),
        detail: err.message().to_owned(),
    };
    (
        status,
        [(header::CONTENT_TYPE, "application/problem+json")],
        Json(problem),
    )
        .into_response()
}
