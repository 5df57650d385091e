use axum::{
    extract::OriginalUri,
    http::{Method, StatusCode},
};

use banking_core::AppError;

use crate::app::errors::HandlerError;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Unmatched paths still get a problem document.
pub async fn fallback(OriginalUri(uri): OriginalUri) -> HandlerError {
    AppError::not_found(format!("no route for {}", uri.path())).into()
}

/// Known path, unsupported method.
pub async fn method_not_allowed(method: Method, OriginalUri(uri): OriginalUri) -> HandlerError {
    AppError::method_not_allowed(format!("{method} is not supported on {}", uri.path())).into()
}
