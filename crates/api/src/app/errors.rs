//! Error recording and problem-document rendering.
//!
//! Handlers never write error bodies. They return a [`HandlerError`], which
//! becomes an empty response tagged with a [`RecordedError`] extension; the
//! `error_handler` middleware turns that tag into a [`ProblemDetails`] body.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use banking_core::{AppError, StatusClass};

pub const PROBLEM_JSON: &str = "application/problem+json";

/// RFC 7807 problem document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDetails {
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub type_uri: String,
    pub title: String,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl ProblemDetails {
    /// `type` defaults to a status URI.
    pub fn new(status: u16, title: impl Into<String>) -> Self {
        Self {
            type_uri: format!("https://httpstatuses.com/{status}"),
            title: title.into(),
            status,
            detail: None,
            instance: None,
        }
    }

    pub fn for_class(class: StatusClass) -> Self {
        Self::new(class.status_code(), class.title())
    }

    /// Empty details are dropped.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        self.detail = (!detail.is_empty()).then_some(detail);
        self
    }

    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }
}

impl From<&AppError> for ProblemDetails {
    fn from(err: &AppError) -> Self {
        ProblemDetails::for_class(err.status()).with_detail(err.message())
    }
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            [(header::CONTENT_TYPE, HeaderValue::from_static(PROBLEM_JSON))],
            Json(self),
        )
            .into_response()
    }
}

/// Error marker a handler leaves on its response for the middleware to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedError {
    Classified(AppError),
    /// Anything outside the taxonomy; carries the error's message.
    Unclassified(String),
}

impl RecordedError {
    pub fn status_class(&self) -> StatusClass {
        match self {
            RecordedError::Classified(err) => err.status(),
            RecordedError::Unclassified(_) => StatusClass::InternalServerError,
        }
    }

    pub fn to_problem(&self) -> ProblemDetails {
        match self {
            RecordedError::Classified(err) => ProblemDetails::from(err),
            // TODO: return a generic detail here; the raw message can leak storage internals.
            RecordedError::Unclassified(msg) => {
                ProblemDetails::for_class(StatusClass::InternalServerError).with_detail(msg.clone())
            }
        }
    }
}

/// Error type returned by route handlers.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Classified(#[from] AppError),
    #[error(transparent)]
    Unclassified(#[from] anyhow::Error),
}

impl HandlerError {
    fn into_recorded(self) -> RecordedError {
        match self {
            HandlerError::Classified(err) => RecordedError::Classified(err),
            HandlerError::Unclassified(err) => RecordedError::Unclassified(format!("{err:#}")),
        }
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let recorded = self.into_recorded();
        let status = StatusCode::from_u16(recorded.status_class().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = status.into_response();
        response.extensions_mut().insert(recorded);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn problem_from_app_error_uses_class_title_and_message() {
        let problem = ProblemDetails::from(&AppError::bad_request("invalid email"));

        assert_eq!(problem.status, 400);
        assert_eq!(problem.title, "Bad Request");
        assert_eq!(problem.detail.as_deref(), Some("invalid email"));
        assert_eq!(problem.type_uri, "https://httpstatuses.com/400");
    }

    #[test]
    fn empty_detail_is_omitted() {
        let problem = ProblemDetails::for_class(StatusClass::Conflict).with_detail("");
        let json = serde_json::to_value(&problem).unwrap();

        assert!(!json.as_object().unwrap().contains_key("detail"));
        assert_eq!(json["type"], "https://httpstatuses.com/409");
    }

    #[test]
    fn handler_error_records_marker_without_body() {
        let response = HandlerError::from(AppError::not_found("gone")).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.extensions().get::<RecordedError>(),
            Some(&RecordedError::Classified(AppError::not_found("gone")))
        );
    }

    #[test]
    fn unclassified_errors_are_internal() {
        let response = HandlerError::from(anyhow::anyhow!("socket closed")).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let recorded = response.extensions().get::<RecordedError>().unwrap();
        assert_eq!(recorded.to_problem().detail.as_deref(), Some("socket closed"));
    }
}
