use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Extension, Path},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::debug;

use banking_core::{AppError, CustomerDto, CustomerWithAccounts, Email};

use crate::app::errors::HandlerError;
use crate::app::routes::system;
use crate::app::services::AppServices;

pub const BASE_PATH: &str = "/api/v1/customers";

pub fn router() -> Router {
    let collection = get(list_customers)
        .post(create_customer)
        .fallback(system::method_not_allowed);
    let item = get(get_customer)
        .delete(delete_customer)
        .fallback(system::method_not_allowed);

    Router::new()
        .route(BASE_PATH, collection.clone())
        .route("/api/v1/customers/", collection)
        .route("/api/v1/customers/:email", item)
}

pub async fn list_customers(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<Vec<CustomerDto>>, HandlerError> {
    Ok(Json(services.customers.list_customers().await?))
}

pub async fn get_customer(
    Extension(services): Extension<Arc<AppServices>>,
    email: Result<Path<String>, PathRejection>,
) -> Result<Json<CustomerWithAccounts>, HandlerError> {
    let email = email_param(email)?;
    Ok(Json(services.customers.get_customer_with_accounts(email.as_str()).await?))
}

pub async fn create_customer(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<CustomerDto>, JsonRejection>,
) -> Result<(StatusCode, Json<CustomerDto>), HandlerError> {
    let Json(mut dto) = body.map_err(|rejection| {
        debug!(%rejection, "rejected customer payload");
        AppError::bad_request("invalid input")
    })?;
    dto.validate().map_err(AppError::from)?;
    dto.email = Email::parse(&dto.email).map_err(AppError::from)?.into_inner();

    let created = services.customers.create_customer(dto).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn delete_customer(
    Extension(services): Extension<Arc<AppServices>>,
    email: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, HandlerError> {
    let email = email_param(email)?;
    services.customers.delete_customer_by_email(email.as_str()).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn email_param(param: Result<Path<String>, PathRejection>) -> Result<Email, AppError> {
    let Path(raw) = param.map_err(|rejection| {
        debug!(%rejection, "rejected email path parameter");
        AppError::bad_request("email parameter is required")
    })?;
    Ok(Email::parse(&raw)?)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Method, Request},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::app::build_app;

    use super::*;

    fn app() -> Router {
        build_app(Arc::new(AppServices::in_memory()))
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        app.clone().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn ada() -> Value {
        json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com",
            "phone": "555-0100",
            "accounts": [
                { "account_number": "ACC-1", "balance": 100.5, "account_description": "checking" },
                { "account_number": "ACC-2", "balance": 50 }
            ]
        })
    }

    #[tokio::test]
    async fn create_then_fetch_with_accounts() {
        let app = app();

        let created = call(&app, Method::POST, "/api/v1/customers/", Some(ada())).await;
        assert_eq!(created.status(), StatusCode::CREATED);
        let created = json_body(created).await;
        assert_eq!(created["accounts"].as_array().unwrap().len(), 2);
        assert!(created["id"].is_i64());

        let fetched = call(&app, Method::GET, "/api/v1/customers/ada@example.com", None).await;
        assert_eq!(fetched.status(), StatusCode::OK);
        let fetched = json_body(fetched).await;
        assert_eq!(fetched["email"], "ada@example.com");
        assert_eq!(fetched["accounts"][0]["account_number"], "ACC-1");
        assert_eq!(fetched["accounts"][0]["balance"].as_f64(), Some(100.5));
        assert_eq!(fetched["accounts"][0]["account_description"], "checking");
        assert!(fetched["accounts"][0].get("customer_id").is_none());
    }

    #[tokio::test]
    async fn list_on_empty_store_is_problem_404() {
        let response = call(&app(), Method::GET, "/api/v1/customers/", None).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["title"], "Not Found");
        assert_eq!(body["detail"], "no customers found");
        assert_eq!(body["instance"], "/api/v1/customers/");
    }

    #[tokio::test]
    async fn list_without_trailing_slash_is_routed() {
        let app = app();
        call(&app, Method::POST, "/api/v1/customers", Some(ada())).await;

        let response = call(&app, Method::GET, "/api/v1/customers", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn invalid_email_in_body_is_bad_request() {
        let mut body = ada();
        body["email"] = json!("not-an-email");

        let response = call(&app(), Method::POST, "/api/v1/customers/", Some(body)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["status"], 400);
        assert_eq!(body["title"], "Bad Request");
        assert_eq!(body["detail"], "invalid email");
        assert_eq!(body["instance"], "/api/v1/customers/");
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let app = app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/customers/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"first_name\": "))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["detail"], "invalid input");
    }

    #[tokio::test]
    async fn sub_cent_balance_is_bad_request() {
        let mut body = ada();
        body["accounts"][0]["balance"] = json!(1.005);

        let response = call(&app(), Method::POST, "/api/v1/customers/", Some(body)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["detail"], "invalid input");
    }

    #[tokio::test]
    async fn duplicate_create_is_conflict() {
        let app = app();
        call(&app, Method::POST, "/api/v1/customers/", Some(ada())).await;

        let response = call(&app, Method::POST, "/api/v1/customers/", Some(ada())).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn delete_then_fetch_is_not_found() {
        let app = app();
        call(&app, Method::POST, "/api/v1/customers/", Some(ada())).await;

        let deleted = call(&app, Method::DELETE, "/api/v1/customers/ada@example.com", None).await;
        assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

        let fetched = call(&app, Method::GET, "/api/v1/customers/ada@example.com", None).await;
        assert_eq!(fetched.status(), StatusCode::NOT_FOUND);
        let body = json_body(fetched).await;
        assert!(body["detail"].as_str().unwrap().contains("ada@example.com"));
    }

    #[tokio::test]
    async fn created_email_is_stored_trimmed() {
        let app = app();
        let mut body = ada();
        body["email"] = json!("  ada@example.com ");

        let created = call(&app, Method::POST, "/api/v1/customers/", Some(body)).await;
        assert_eq!(created.status(), StatusCode::CREATED);
        assert_eq!(json_body(created).await["email"], "ada@example.com");

        let fetched = call(&app, Method::GET, "/api/v1/customers/ada@example.com", None).await;
        assert_eq!(fetched.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unsupported_method_is_problem_405() {
        let response = call(&app(), Method::PUT, "/api/v1/customers/a@b.io", None).await;

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::CONTENT_TYPE], crate::app::errors::PROBLEM_JSON);
        let body = json_body(response).await;
        assert_eq!(body["title"], "Method Not Allowed");
        assert_eq!(body["detail"], "PUT is not supported on /api/v1/customers/a@b.io");
        assert_eq!(body["instance"], "/api/v1/customers/a@b.io");
    }

    #[tokio::test]
    async fn malformed_email_path_is_bad_request() {
        let response = call(&app(), Method::GET, "/api/v1/customers/nobody", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
