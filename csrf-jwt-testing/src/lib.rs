//! Testing utilities for routers guarded by `csrf-jwt`.
//!
//! ```no_run
//! use csrf_jwt_core::{HttpResponse, Route, Router};
//! use csrf_jwt_testing::*;
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let router = Router::new().route_to(Route::get("/hello", |_req| async {
//!     Ok(HttpResponse::text("Hello!"))
//! }));
//!
//! let client = TestClient::new(Arc::new(router));
//! let response = client.get("/hello").await;
//! assert_status(&response, 200);
//! assert_eq!(response.body_string(), "Hello!");
//! # });
//! ```

pub mod assertions;
pub mod test_client;

pub use assertions::*;
pub use test_client::{TestClient, TestRequestBuilder, TestResponse, parse_set_cookie};
