//! HTTP API for the banking customer service: routing, middleware, and
//! service wiring.

pub mod app;
pub mod context;
pub mod middleware;
