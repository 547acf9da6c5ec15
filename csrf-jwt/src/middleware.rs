use crate::config::GuardConfig;
use crate::error::{ConfigError, CsrfError};
use crate::issuer::TokenIssuer;
use crate::options::CsrfOptions;
use crate::policy::{Protection, RoutePolicy};
use crate::token::{CsrfToken, JwtCodec, TokenCodec};
use crate::validator::TokenValidator;
use async_trait::async_trait;
use csrf_jwt_core::logging::{debug, error, warn};
use csrf_jwt_core::{Error, HttpRequest, HttpResponse, Middleware, Next};
use std::sync::Arc;

/// Per-request CSRF state, readable by handlers through request extensions.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub protection: Protection,

    /// Token that will be attached to this request's response
    pub token: Option<CsrfToken>,

    /// Token the client presented, once validated
    pub presented: Option<CsrfToken>,
}

/// Access to the CSRF token from inside a handler.
pub trait CsrfRequestExt {
    fn csrf_context(&self) -> Option<&RequestContext>;

    /// The token going out with the response, for embedding in pages
    fn csrf_token(&self) -> Option<&str> {
        self.csrf_context()
            .and_then(|ctx| ctx.token.as_ref())
            .map(CsrfToken::value)
    }
}

impl CsrfRequestExt for HttpRequest {
    fn csrf_context(&self) -> Option<&RequestContext> {
        self.extensions.get::<RequestContext>()
    }
}

/// Double-submit CSRF guard.
///
/// Safe requests get a fresh token in the response header and cookie.
/// Every other request must echo the cookie token in the header; on success
/// the token is rotated, on failure the request is answered with
/// `400 {"message":"INVALID_JWT"}` and the handler never runs.
#[derive(Clone)]
pub struct CsrfMiddleware {
    config: Arc<GuardConfig>,
    issuer: TokenIssuer,
    validator: TokenValidator,
}

impl CsrfMiddleware {
    /// Build the guard with the stock HS256 codec.
    ///
    /// Fails with [`ConfigError::MissingSecret`] if the secret was emptied
    /// after the configuration was built.
    pub fn new(config: GuardConfig) -> Result<Self, ConfigError> {
        let codec = Arc::new(JwtCodec::new(&config.secret, config.leeway));
        Self::with_codec(config, codec)
    }

    /// Build the guard around a custom signing primitive.
    pub fn with_codec(
        config: GuardConfig,
        codec: Arc<dyn TokenCodec>,
    ) -> Result<Self, ConfigError> {
        if config.secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }

        let config = Arc::new(config);
        Ok(Self {
            issuer: TokenIssuer::new(config.clone(), codec.clone()),
            validator: TokenValidator::new(config.clone(), codec),
            config,
        })
    }

    pub fn from_options(options: CsrfOptions) -> Result<Self, ConfigError> {
        Self::new(GuardConfig::from_options(options)?)
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    pub fn validator(&self) -> &TokenValidator {
        &self.validator
    }

    /// Decide what to do with `req` and prepare its outgoing token.
    pub fn prepare(&self, req: &HttpRequest) -> Result<RequestContext, CsrfError> {
        let protection = RoutePolicy::new(&self.config).classify_request(req);
        debug!(method = %req.method, path = %req.path, ?protection, "CSRF classification");

        match protection {
            Protection::Exempt => Ok(RequestContext {
                protection,
                token: None,
                presented: None,
            }),
            Protection::IssueOnly => Ok(RequestContext {
                protection,
                token: Some(self.issuer.issue()?),
                presented: None,
            }),
            Protection::RequireValidation => {
                let cookies = req.cookies();
                let presented = self
                    .validator
                    .validate(req.header(&self.config.header_name), &cookies)
                    .inspect_err(|reason| {
                        warn!(
                            method = %req.method,
                            path = %req.path,
                            reason = reason.code(),
                            "CSRF validation failed"
                        );
                    })?;

                debug!(nonce = presented.nonce(), "CSRF token validated, rotating");

                Ok(RequestContext {
                    protection,
                    token: Some(self.issuer.rotate()?),
                    presented: Some(presented),
                })
            }
        }
    }
}

#[async_trait]
impl Middleware for CsrfMiddleware {
    async fn handle(&self, mut req: HttpRequest, next: Next) -> Result<HttpResponse, Error> {
        let context = self.prepare(&req).map_err(|e| {
            if let CsrfError::Codec(ref codec) = e {
                error!(error = %codec, "CSRF token signing failed");
            }
            Error::from(e)
        })?;

        if context.protection == Protection::Exempt {
            return next(req).await;
        }

        let outgoing = context.token.clone();
        req.extensions.insert(context);

        let mut response = next(req).await?;

        if let Some(token) = outgoing {
            self.issuer.attach(&mut response, &token);
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::INVALID_JWT;
    use crate::policy::RouteRule;
    use csrf_jwt_core::ResponseFuture;

    fn middleware() -> CsrfMiddleware {
        CsrfMiddleware::new(GuardConfig::new("test").unwrap()).unwrap()
    }

    fn echo_token() -> Next {
        Box::new(|req: HttpRequest| -> ResponseFuture {
            Box::pin(async move {
                let token = req.csrf_token().unwrap_or("none").to_string();
                Ok(HttpResponse::text(token))
            })
        })
    }

    #[test]
    fn test_get_issues_token() {
        let csrf = middleware();
        let req = HttpRequest::new("GET".to_string(), "/1".to_string());

        let response = tokio_test::block_on(csrf.handle(req, echo_token())).unwrap();

        let header = response.header("x-csrf-jwt").unwrap().to_string();
        assert_eq!(response.body_string(), header);
        assert!(response.set_cookies()[0].starts_with(&format!("jwt={};", header)));
    }

    #[test]
    fn test_exempt_path_untouched() {
        let csrf = middleware();
        let req = HttpRequest::new("POST".to_string(), "/js/bundle".to_string());

        let response = tokio_test::block_on(csrf.handle(req, echo_token())).unwrap();

        assert_eq!(response.body_string(), "none");
        assert!(response.header("x-csrf-jwt").is_none());
        assert!(response.set_cookies().is_empty());
    }

    #[test]
    fn test_disabled_route_untouched() {
        let csrf = middleware();
        let mut req = HttpRequest::new("POST".to_string(), "/skip".to_string());
        req.extensions.insert(RouteRule::disabled());

        let response = tokio_test::block_on(csrf.handle(req, echo_token())).unwrap();
        assert!(response.header("x-csrf-jwt").is_none());
    }

    #[test]
    fn test_post_without_token_rejected() {
        let csrf = middleware();
        let req = HttpRequest::new("POST".to_string(), "/2".to_string());

        let err = tokio_test::block_on(csrf.handle(req, echo_token())).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.message(), INVALID_JWT);
    }

    #[test]
    fn test_post_with_token_rotates() {
        let csrf = middleware();
        let token = csrf.issuer().issue().unwrap();

        let mut req = HttpRequest::new("POST".to_string(), "/2".to_string());
        req.headers
            .insert("x-csrf-jwt".to_string(), token.value().to_string());
        req.headers
            .insert("Cookie".to_string(), format!("jwt={}", token.value()));

        let response = tokio_test::block_on(csrf.handle(req, echo_token())).unwrap();

        let rotated = response.header("x-csrf-jwt").unwrap();
        assert_ne!(rotated, token.value());
        assert!(response.set_cookies()[0].starts_with(&format!("x-csrf-jwt={};", rotated)));
    }

    #[test]
    fn test_handler_cookie_survives_token_cookie() {
        let csrf = middleware();
        let req = HttpRequest::new("GET".to_string(), "/login".to_string());
        let login: Next = Box::new(|_req: HttpRequest| -> ResponseFuture {
            Box::pin(async {
                let mut res = HttpResponse::ok();
                res.set_cookie("session=42; Path=/".to_string());
                Ok(res)
            })
        });

        let response = tokio_test::block_on(csrf.handle(req, login)).unwrap();

        let cookies = response.set_cookies();
        assert_eq!(cookies.len(), 2);
        assert!(cookies.contains(&"session=42; Path=/"));
        assert!(cookies.iter().any(|c| c.starts_with("jwt=")));
    }

    #[test]
    fn test_emptied_secret_is_refused() {
        let mut config = GuardConfig::new("test").unwrap();
        config.secret.clear();

        assert!(matches!(
            CsrfMiddleware::new(config.clone()),
            Err(ConfigError::MissingSecret)
        ));

        let codec = Arc::new(JwtCodec::new(b"test", 0));
        assert!(matches!(
            CsrfMiddleware::with_codec(config, codec),
            Err(ConfigError::MissingSecret)
        ));
    }

    #[test]
    fn test_handler_error_gets_no_token() {
        let csrf = middleware();
        let req = HttpRequest::new("GET".to_string(), "/1".to_string());
        let failing: Next = Box::new(|_req: HttpRequest| -> ResponseFuture {
            Box::pin(async { Err(Error::Internal("boom".to_string())) })
        });

        let err = tokio_test::block_on(csrf.handle(req, failing)).unwrap_err();
        assert_eq!(err.status_code(), 500);
    }
}
