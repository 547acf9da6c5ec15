//! # CSRF JWT
//!
//! Stateless double-submit CSRF protection using signed, rotating JWT tokens.
//!
//! Every safe request (GET, HEAD, OPTIONS, TRACE) leaves with a freshly signed
//! token in both a response header and a cookie. Any other request must echo
//! the cookie token back in the header. A valid token is rotated; anything
//! else is answered with `400 {"message":"INVALID_JWT"}` before the handler
//! runs. No server-side token storage is involved.
//!
//! ## Quick Start
//!
//! ```rust
//! use csrf_jwt::{CsrfMiddleware, CsrfOptions, RouteRule};
//! use csrf_jwt_core::{HttpResponse, Route, Router};
//!
//! let options = CsrfOptions::new("test").expires_in("2d").unwrap();
//! let csrf = CsrfMiddleware::from_options(options).unwrap();
//!
//! let mut router = Router::new();
//! router.use_middleware(csrf);
//! router.add_route(Route::get("/1", |_req| async { Ok(HttpResponse::ok()) }));
//! router.add_route(
//!     Route::post("/skip", |_req| async { Ok(HttpResponse::ok()) })
//!         .with_metadata(RouteRule::disabled()),
//! );
//! ```
//!
//! ## Configuration
//!
//! A secret is mandatory:
//!
//! ```rust
//! use csrf_jwt::{CsrfOptions, GuardConfig};
//!
//! let err = GuardConfig::from_options(CsrfOptions::default()).unwrap_err();
//! assert_eq!(err.to_string(), "MISSING_SECRET");
//! ```
//!
//! ## Reading the token in a handler
//!
//! ```rust
//! use csrf_jwt::CsrfRequestExt;
//! use csrf_jwt_core::{HttpRequest, HttpResponse};
//!
//! async fn form(req: HttpRequest) -> Result<HttpResponse, csrf_jwt_core::Error> {
//!     let token = req.csrf_token().unwrap_or_default();
//!     Ok(HttpResponse::html(format!(
//!         r#"<input type="hidden" name="csrf" value="{token}">"#
//!     )))
//! }
//! ```

pub mod config;
pub mod cookie;
pub mod error;
pub mod issuer;
pub mod middleware;
pub mod options;
pub mod policy;
pub mod token;
pub mod validator;

pub use config::{GuardConfig, SameSite};
pub use error::{CodecError, ConfigError, CsrfError, INVALID_JWT, RejectReason, Result};
pub use issuer::TokenIssuer;
pub use middleware::{CsrfMiddleware, CsrfRequestExt, RequestContext};
pub use options::CsrfOptions;
pub use policy::{Protection, RoutePolicy, RouteRule};
pub use token::{CsrfClaims, CsrfToken, JwtCodec, TokenCodec};
pub use validator::TokenValidator;
