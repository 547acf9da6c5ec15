use crate::error::ConfigError;
use crate::options::CsrfOptions;
use csrf_jwt_core::HttpMethod;
use csrf_jwt_core::logging::{info, warn};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_HEADER_NAME: &str = "x-csrf-jwt";
pub const DEFAULT_COOKIE_NAME: &str = "jwt";
pub const DEFAULT_ROTATION_COOKIE_NAME: &str = "x-csrf-jwt";
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(3600);

/// CSRF guard configuration.
///
/// Built once at startup and shared read-only (behind an `Arc`) by every
/// request the guard handles.
#[derive(Clone)]
pub struct GuardConfig {
    /// HMAC signing secret
    pub secret: Vec<u8>,

    /// Lifetime of an issued token
    pub token_ttl: Duration,

    /// Header carrying the token, both ways
    pub header_name: String,

    /// Cookie set when a token is issued on a safe request
    pub cookie_name: String,

    /// Cookie set when a token is rotated after a validated request
    pub rotation_cookie_name: String,

    /// Requests whose path starts with one of these are never touched
    pub ignored_path_prefixes: Vec<String>,

    /// Methods that only get a token issued, never checked
    pub safe_methods: Vec<String>,

    /// Clock skew tolerated when checking expiry, in seconds
    pub leeway: u64,

    pub cookie_domain: Option<String>,
    pub cookie_path: String,
    pub cookie_secure: bool,
    pub cookie_http_only: bool,
    pub cookie_same_site: SameSite,
}

/// Cookie SameSite attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum SameSite {
    #[serde(alias = "strict")]
    Strict,
    #[serde(alias = "lax")]
    Lax,
    #[serde(alias = "none")]
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

impl GuardConfig {
    /// Create a configuration around `secret`, with defaults for the rest.
    ///
    /// An empty secret is rejected with [`ConfigError::MissingSecret`].
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }

        if secret.len() < 32 {
            warn!(
                secret_len = secret.len(),
                "CSRF signing secret is shorter than 32 bytes"
            );
        }

        Ok(Self {
            secret,
            token_ttl: DEFAULT_TOKEN_TTL,
            header_name: DEFAULT_HEADER_NAME.to_string(),
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            rotation_cookie_name: DEFAULT_ROTATION_COOKIE_NAME.to_string(),
            ignored_path_prefixes: vec!["/js/".to_string()],
            safe_methods: default_safe_methods(),
            leeway: 0,
            cookie_domain: None,
            cookie_path: "/".to_string(),
            cookie_secure: true,
            cookie_http_only: true,
            cookie_same_site: SameSite::Strict,
        })
    }

    /// Validate plugin options and freeze them into a configuration.
    pub fn from_options(options: CsrfOptions) -> Result<Self, ConfigError> {
        let secret = options.secret_bytes()?.ok_or(ConfigError::MissingSecret)?;
        let mut config = Self::new(secret)?;

        if let Some(ttl) = options.expires_in {
            config.token_ttl = ttl;
        }
        if let Some(name) = options.header_name {
            config.header_name = name;
        }
        if let Some(name) = options.cookie_name {
            config.cookie_name = name;
        }
        if let Some(name) = options.rotation_cookie_name {
            config.rotation_cookie_name = name;
        }
        if let Some(prefixes) = options.ignored_path_prefixes {
            config.ignored_path_prefixes = prefixes;
        }
        if let Some(methods) = options.safe_methods {
            config.safe_methods = methods;
        }
        if let Some(leeway) = options.leeway {
            config.leeway = leeway;
        }
        if options.cookie_domain.is_some() {
            config.cookie_domain = options.cookie_domain;
        }
        if let Some(path) = options.cookie_path {
            config.cookie_path = path;
        }
        if let Some(secure) = options.cookie_secure {
            config.cookie_secure = secure;
        }
        if let Some(http_only) = options.cookie_http_only {
            config.cookie_http_only = http_only;
        }
        if let Some(same_site) = options.cookie_same_site {
            config.cookie_same_site = same_site;
        }

        info!(
            header = %config.header_name,
            cookie = %config.cookie_name,
            rotation_cookie = %config.rotation_cookie_name,
            ttl_secs = config.token_ttl.as_secs(),
            "CSRF guard configured"
        );

        Ok(config)
    }

    /// Generate a random 32-byte secret
    pub fn generate_secret() -> Vec<u8> {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        (0..32).map(|_| rng.r#gen()).collect()
    }

    /// Set token TTL
    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Set header name
    pub fn with_header_name(mut self, name: impl Into<String>) -> Self {
        self.header_name = name.into();
        self
    }

    /// Set issuance cookie name
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    /// Set rotation cookie name
    pub fn with_rotation_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.rotation_cookie_name = name.into();
        self
    }

    /// Replace the ignored path prefixes
    pub fn with_ignored_path_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.ignored_path_prefixes = prefixes;
        self
    }

    /// Replace the safe methods
    pub fn with_safe_methods(mut self, methods: Vec<String>) -> Self {
        self.safe_methods = methods;
        self
    }

    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.leeway = seconds;
        self
    }

    pub fn with_cookie_domain(mut self, domain: impl Into<String>) -> Self {
        self.cookie_domain = Some(domain.into());
        self
    }

    pub fn with_cookie_path(mut self, path: impl Into<String>) -> Self {
        self.cookie_path = path.into();
        self
    }

    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    pub fn with_cookie_http_only(mut self, http_only: bool) -> Self {
        self.cookie_http_only = http_only;
        self
    }

    pub fn with_cookie_same_site(mut self, same_site: SameSite) -> Self {
        self.cookie_same_site = same_site;
        self
    }

    /// Cookie names a token may arrive in, issuance slot first, without duplicates
    pub fn token_cookie_names(&self) -> Vec<&str> {
        let mut names = vec![self.cookie_name.as_str()];
        if self.rotation_cookie_name != self.cookie_name {
            names.push(self.rotation_cookie_name.as_str());
        }
        names
    }
}

/// Every method that does not change server state
fn default_safe_methods() -> Vec<String> {
    [
        HttpMethod::GET,
        HttpMethod::POST,
        HttpMethod::PUT,
        HttpMethod::DELETE,
        HttpMethod::PATCH,
        HttpMethod::HEAD,
        HttpMethod::OPTIONS,
        HttpMethod::TRACE,
    ]
    .iter()
    .filter(|method| method.is_safe())
    .map(|method| method.as_str().to_string())
    .collect()
}

impl fmt::Debug for GuardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardConfig")
            .field("secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("header_name", &self.header_name)
            .field("cookie_name", &self.cookie_name)
            .field("rotation_cookie_name", &self.rotation_cookie_name)
            .field("ignored_path_prefixes", &self.ignored_path_prefixes)
            .field("safe_methods", &self.safe_methods)
            .field("leeway", &self.leeway)
            .field("cookie_domain", &self.cookie_domain)
            .field("cookie_path", &self.cookie_path)
            .field("cookie_secure", &self.cookie_secure)
            .field("cookie_http_only", &self.cookie_http_only)
            .field("cookie_same_site", &self.cookie_same_site)
            .finish()
    }
}
