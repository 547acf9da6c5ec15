//! Plugin options as supplied by the host application.
//!
//! Options are the loose, serde-friendly form of [`GuardConfig`](crate::GuardConfig):
//! every field is optional and nothing is validated until
//! [`GuardConfig::from_options`](crate::GuardConfig::from_options) runs.
//! Keys are accepted in camelCase (`expiresIn`) or snake_case (`expires_in`).
//! Unrecognized keys are ignored.

use crate::config::SameSite;
use crate::error::ConfigError;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use duration_str::deserialize_option_duration;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

const BASE64_PREFIX: &str = "base64:";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrfOptions {
    /// Signing secret. A `base64:` prefix marks an encoded binary secret.
    pub secret: Option<String>,

    /// Token lifetime, e.g. `"2d"`, `"30m"` or `"3600"` (seconds)
    #[serde(default, alias = "expires_in", deserialize_with = "deserialize_option_duration")]
    pub expires_in: Option<Duration>,

    #[serde(alias = "header_name")]
    pub header_name: Option<String>,

    #[serde(alias = "cookie_name")]
    pub cookie_name: Option<String>,

    #[serde(alias = "rotation_cookie_name")]
    pub rotation_cookie_name: Option<String>,

    #[serde(alias = "ignored_path_prefixes")]
    pub ignored_path_prefixes: Option<Vec<String>>,

    #[serde(alias = "safe_methods")]
    pub safe_methods: Option<Vec<String>>,

    pub leeway: Option<u64>,

    #[serde(alias = "cookie_domain")]
    pub cookie_domain: Option<String>,

    #[serde(alias = "cookie_path")]
    pub cookie_path: Option<String>,

    #[serde(alias = "cookie_secure")]
    pub cookie_secure: Option<bool>,

    #[serde(alias = "cookie_http_only")]
    pub cookie_http_only: Option<bool>,

    #[serde(alias = "cookie_same_site")]
    pub cookie_same_site: Option<SameSite>,
}

impl CsrfOptions {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
            ..Default::default()
        }
    }

    /// Set the token lifetime from a human-readable duration.
    pub fn expires_in(mut self, value: &str) -> Result<Self, ConfigError> {
        self.expires_in = Some(parse_duration(value)?);
        Ok(self)
    }

    pub fn header_name(mut self, name: impl Into<String>) -> Self {
        self.header_name = Some(name.into());
        self
    }

    pub fn cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = Some(name.into());
        self
    }

    pub fn rotation_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.rotation_cookie_name = Some(name.into());
        self
    }

    pub fn ignored_path_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.ignored_path_prefixes = Some(prefixes);
        self
    }

    /// Parse options from a JSON string
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("JSON parse error: {}", e)))
    }

    /// Parse options from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))
    }

    /// Load options from a `.json` or `.toml` file, picked by extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ConfigError::LoadError("No file extension found".to_string()))?;

        let content = fs::read_to_string(path)?;

        match ext.to_lowercase().as_str() {
            "json" => Self::from_json(&content),
            "toml" => Self::from_toml(&content),
            other => Err(ConfigError::LoadError(format!(
                "Unsupported format: {}",
                other
            ))),
        }
    }

    /// Load options from process environment variables named `{prefix}SECRET`,
    /// `{prefix}EXPIRES_IN`, `{prefix}HEADER_NAME` and so on.
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        Self::from_vars(prefix, std::env::vars())
    }

    /// Same as [`from_env`](Self::from_env), reading from any key/value source.
    pub fn from_vars<I>(prefix: &str, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut options = Self::default();

        for (key, value) in vars {
            let Some(name) = key.strip_prefix(prefix) else {
                continue;
            };

            match name {
                "SECRET" => options.secret = Some(value),
                "EXPIRES_IN" => options.expires_in = Some(parse_duration(&value)?),
                "HEADER_NAME" => options.header_name = Some(value),
                "COOKIE_NAME" => options.cookie_name = Some(value),
                "ROTATION_COOKIE_NAME" => options.rotation_cookie_name = Some(value),
                "IGNORED_PATH_PREFIXES" => options.ignored_path_prefixes = Some(split_list(&value)),
                "SAFE_METHODS" => options.safe_methods = Some(split_list(&value)),
                "LEEWAY" => {
                    let leeway = value.parse().map_err(|_| {
                        ConfigError::ParseError(format!("Invalid leeway: {}", value))
                    })?;
                    options.leeway = Some(leeway);
                }
                "COOKIE_DOMAIN" => options.cookie_domain = Some(value),
                "COOKIE_PATH" => options.cookie_path = Some(value),
                "COOKIE_SECURE" => options.cookie_secure = Some(parse_bool(&value)?),
                "COOKIE_HTTP_ONLY" => options.cookie_http_only = Some(parse_bool(&value)?),
                "COOKIE_SAME_SITE" => {
                    let same_site = serde_json::from_value(serde_json::Value::String(value))
                        .map_err(|e| ConfigError::ParseError(format!("Invalid SameSite: {}", e)))?;
                    options.cookie_same_site = Some(same_site);
                }
                _ => {}
            }
        }

        Ok(options)
    }

    /// Raw secret bytes, or `None` when no usable secret was supplied.
    pub fn secret_bytes(&self) -> Result<Option<Vec<u8>>, ConfigError> {
        let Some(secret) = self.secret.as_deref() else {
            return Ok(None);
        };

        let bytes = match secret.strip_prefix(BASE64_PREFIX) {
            Some(encoded) => STANDARD
                .decode(encoded.trim())
                .map_err(|e| ConfigError::InvalidSecret(e.to_string()))?,
            None => secret.as_bytes().to_vec(),
        };

        Ok((!bytes.is_empty()).then_some(bytes))
    }
}

/// Parse a human-readable duration such as `"2d"` or `"90s"`.
pub fn parse_duration(value: &str) -> Result<Duration, ConfigError> {
    duration_str::parse(value).map_err(|e| ConfigError::InvalidDuration {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::ParseError(format!("Invalid bool: {}", value))),
    }
}
