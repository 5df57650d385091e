//! Request pipeline middleware.
//!
//! Layer order (outermost first): `request_logging`, then `error_handler`.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};
use futures_util::FutureExt;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

use banking_core::StatusClass;

use crate::app::errors::{ProblemDetails, RecordedError};
use crate::context::RequestContext;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_REQUEST_ID_LEN: usize = 128;

/// Recovery boundary and single point of error rendering.
///
/// - a panic in any inner layer or handler becomes a 500 problem document;
/// - a response carrying a [`RecordedError`] is replaced by its problem document;
/// - every other response passes through untouched.
pub async fn error_handler(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_owned();
    let request_id = req
        .extensions()
        .get::<RequestContext>()
        .map(|ctx| ctx.request_id().to_owned())
        .unwrap_or_default();

    match AssertUnwindSafe(next.run(req)).catch_unwind().await {
        Ok(mut response) => match response.extensions_mut().remove::<RecordedError>() {
            None => response,
            Some(recorded) => {
                log_recorded(&recorded, &path, &request_id);
                recorded.to_problem().with_instance(path).into_response()
            }
        },
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(%path, %request_id, panic = %message, "recovered from panic while handling request");

            ProblemDetails::for_class(StatusClass::InternalServerError)
                .with_detail(message)
                .with_instance(path)
                .into_response()
        }
    }
}

fn log_recorded(recorded: &RecordedError, path: &str, request_id: &str) {
    match recorded {
        RecordedError::Classified(err) if err.status() != StatusClass::InternalServerError => {
            warn!(%path, %request_id, code = err.code(), error = %err, "request failed");
        }
        RecordedError::Classified(err) => {
            error!(%path, %request_id, code = err.code(), error = %err, "request failed");
        }
        RecordedError::Unclassified(msg) => {
            error!(%path, %request_id, error = %msg, "request failed with unclassified error");
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Per-request span, request id propagation, and request/response logging.
///
/// Reuses a well-formed incoming `x-request-id`, otherwise assigns a UUIDv7.
pub async fn request_logging(mut req: Request, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN)
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::now_v7().to_string());

    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let query = req.uri().query().unwrap_or_default().to_owned();
    req.extensions_mut()
        .insert(RequestContext::new(request_id.clone()));

    let span = info_span!("http_request", %method, %path, %request_id);
    let started = Instant::now();

    async move {
        info!(%query, "incoming request");

        let mut response = next.run(req).await;

        info!(
            status = response.status().as_u16(),
            latency_ms = started.elapsed().as_millis() as u64,
            "outgoing response"
        );

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, routing::get, Router};
    use banking_core::AppError;
    use tower::ServiceExt;

    use crate::app::errors::{HandlerError, PROBLEM_JSON};

    async fn ok() -> &'static str {
        "ok"
    }

    async fn bad_email() -> Result<&'static str, HandlerError> {
        Err(AppError::bad_request("invalid email").into())
    }

    async fn opaque() -> Result<&'static str, HandlerError> {
        Err(anyhow::anyhow!("connection reset by peer").into())
    }

    async fn boom() -> &'static str {
        panic!("nil pointer")
    }

    async fn whoami(axum::Extension(ctx): axum::Extension<RequestContext>) -> String {
        ctx.request_id().to_owned()
    }

    fn app() -> Router {
        Router::new()
            .route("/ok", get(ok))
            .route("/customers/bad", get(bad_email))
            .route("/opaque", get(opaque))
            .route("/boom", get(boom))
            .route("/whoami", get(whoami))
            .layer(axum::middleware::from_fn(error_handler))
            .layer(axum::middleware::from_fn(request_logging))
    }

    async fn send(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn problem(response: Response) -> ProblemDetails {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn success_passes_through() {
        let response = send(app(), "/ok").await;

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn classified_error_renders_problem_document() {
        let response = send(app(), "/customers/bad").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()["content-type"], PROBLEM_JSON);

        let body = problem(response).await;
        assert_eq!(body.status, 400);
        assert_eq!(body.title, "Bad Request");
        assert_eq!(body.detail.as_deref(), Some("invalid email"));
        assert_eq!(body.instance.as_deref(), Some("/customers/bad"));
        assert_eq!(body.type_uri, "https://httpstatuses.com/400");
    }

    #[tokio::test]
    async fn unclassified_error_renders_internal_with_message() {
        let response = send(app(), "/opaque").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = problem(response).await;
        assert_eq!(body.title, "Internal Server Error");
        assert_eq!(body.detail.as_deref(), Some("connection reset by peer"));
    }

    #[tokio::test]
    async fn panic_is_recovered_and_server_keeps_serving() {
        let app = app();

        let response = send(app.clone(), "/boom").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = problem(response).await;
        assert_eq!(body.status, 500);
        assert_eq!(body.detail.as_deref(), Some("nil pointer"));
        assert_eq!(body.instance.as_deref(), Some("/boom"));

        let next = send(app, "/ok").await;
        assert_eq!(next.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn request_id_is_generated_or_echoed() {
        let generated = send(app(), "/ok").await;
        assert!(generated.headers().contains_key(REQUEST_ID_HEADER));

        let echoed = app()
            .oneshot(
                Request::builder()
                    .uri("/ok")
                    .header(REQUEST_ID_HEADER, "req-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(echoed.headers()[REQUEST_ID_HEADER], "req-123");
    }

    #[tokio::test]
    async fn handlers_see_the_request_id_in_context() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header(REQUEST_ID_HEADER, "req-ctx")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"req-ctx");
    }

    #[test]
    fn panic_message_handles_both_payload_kinds() {
        let static_str: Box<dyn Any + Send> = Box::new("static");
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        let other: Box<dyn Any + Send> = Box::new(7_u8);

        assert_eq!(panic_message(static_str.as_ref()), "static");
        assert_eq!(panic_message(owned.as_ref()), "owned");
        assert_eq!(panic_message(other.as_ref()), "unknown panic");
    }
}
