use axum::Router;

pub mod customers;
pub mod system;

/// Router for all `/api/v1` endpoints.
pub fn router() -> Router {
    Router::new().merge(customers::router())
}
