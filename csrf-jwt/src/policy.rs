use crate::config::GuardConfig;
use csrf_jwt_core::HttpRequest;

/// Per-route CSRF setting, attached to a route as metadata.
///
/// ```
/// use csrf_jwt::RouteRule;
/// use csrf_jwt_core::{HttpResponse, Route};
///
/// let route = Route::post("/skip", |_req| async { Ok(HttpResponse::ok()) })
///     .with_metadata(RouteRule::disabled());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRule {
    pub enabled: bool,
}

impl RouteRule {
    pub fn disabled() -> Self {
        Self { enabled: false }
    }
}

impl Default for RouteRule {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// What the guard does with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protection {
    /// Leave the request and response untouched
    Exempt,
    /// Attach a fresh token to the response
    IssueOnly,
    /// Check the presented token, then rotate it
    RequireValidation,
}

pub struct RoutePolicy<'a> {
    config: &'a GuardConfig,
}

impl<'a> RoutePolicy<'a> {
    pub fn new(config: &'a GuardConfig) -> Self {
        Self { config }
    }

    /// Classify a request by method, path and the route's rule.
    ///
    /// Exemption wins over everything else. Methods outside the safe set,
    /// including ones the host does not recognize, require validation.
    pub fn classify(&self, method: &str, path: &str, rule: Option<&RouteRule>) -> Protection {
        if rule.is_some_and(|r| !r.enabled) {
            return Protection::Exempt;
        }

        if self
            .config
            .ignored_path_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
        {
            return Protection::Exempt;
        }

        if self
            .config
            .safe_methods
            .iter()
            .any(|m| m.eq_ignore_ascii_case(method))
        {
            Protection::IssueOnly
        } else {
            Protection::RequireValidation
        }
    }

    /// Classify a dispatched request, reading its [`RouteRule`] from extensions.
    pub fn classify_request(&self, req: &HttpRequest) -> Protection {
        self.classify(&req.method, &req.path, req.extensions.get::<RouteRule>())
    }
}
