// Host-side HTTP plumbing for the csrf-jwt guard.
// Request/response types, request extensions, the middleware chain and a
// small router whose routes carry typed metadata.

pub mod cookie;
pub mod error;
pub mod extensions;
pub mod http;
pub mod logging;
pub mod method;
pub mod middleware;
pub mod routing;

pub use cookie::parse_cookie_header;
pub use error::*;
pub use extensions::Extensions;
pub use http::*;
pub use method::HttpMethod;
pub use middleware::*;
pub use routing::{Route, Router};
