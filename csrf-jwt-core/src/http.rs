// HTTP request and response types

use crate::{Extensions, cookie::parse_cookie_header};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// HTTP request wrapper
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
    pub path_params: HashMap<String, String>,
    pub query_params: HashMap<String, String>,
    /// Request-scoped typed data (route metadata, values set by middleware)
    pub extensions: Extensions,
}

impl HttpRequest {
    pub fn new(method: String, path: String) -> Self {
        Self {
            method,
            path,
            headers: HashMap::new(),
            body: Vec::new(),
            path_params: HashMap::new(),
            query_params: HashMap::new(),
            extensions: Extensions::new(),
        }
    }

    /// Parse the request body as JSON
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> Result<T, crate::Error> {
        serde_json::from_slice(&self.body).map_err(|e| crate::Error::Deserialization(e.to_string()))
    }

    /// Get a path parameter by name
    pub fn param(&self, name: &str) -> Option<&String> {
        self.path_params.get(name)
    }

    /// Get a query parameter by name
    pub fn query(&self, name: &str) -> Option<&String> {
        self.query_params.get(name)
    }

    /// Get a header value, ignoring ASCII case in the name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .or_else(|| {
                self.headers
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(name))
                    .map(|(_, value)| value)
            })
            .map(String::as_str)
    }

    /// All cookies sent with the request, in header order
    pub fn cookies(&self) -> Vec<(String, String)> {
        self.header("cookie")
            .map(parse_cookie_header)
            .unwrap_or_default()
    }

    /// First cookie with the given name
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.cookies()
            .into_iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

/// HTTP response wrapper
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    /// Rendered `Set-Cookie` lines, one per cookie
    pub cookies: Vec<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            cookies: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn ok() -> Self {
        Self::new(200)
    }

    pub fn bad_request() -> Self {
        Self::new(400)
    }

    pub fn not_found() -> Self {
        Self::new(404)
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn with_json<T: Serialize>(mut self, value: &T) -> Result<Self, crate::Error> {
        self.body =
            serde_json::to_vec(value).map_err(|e| crate::Error::Serialization(e.to_string()))?;
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        Ok(self)
    }

    pub fn with_header(mut self, key: String, value: String) -> Self {
        self.headers.insert(key, value);
        self
    }

    /// 200 response with a plain-text body
    pub fn text(body: impl Into<String>) -> Self {
        Self::ok()
            .with_header(
                "Content-Type".to_string(),
                "text/plain; charset=utf-8".to_string(),
            )
            .with_body(body.into().into_bytes())
    }

    /// 200 response with an HTML body
    pub fn html(body: impl Into<String>) -> Self {
        Self::ok()
            .with_header(
                "Content-Type".to_string(),
                "text/html; charset=utf-8".to_string(),
            )
            .with_body(body.into().into_bytes())
    }

    /// Add a fully rendered `Set-Cookie` line. Earlier cookies are kept.
    pub fn set_cookie(&mut self, cookie: String) {
        self.cookies.push(cookie);
    }

    pub fn with_cookie(mut self, cookie: String) -> Self {
        self.set_cookie(cookie);
        self
    }

    /// Every `Set-Cookie` line on the response, including any written
    /// directly into `headers`
    pub fn set_cookies(&self) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case("set-cookie"))
            .map(|(_, value)| value.as_str())
            .chain(self.cookies.iter().map(String::as_str))
            .collect()
    }

    /// Get a header value, ignoring ASCII case in the name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .or_else(|| {
                self.headers
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(name))
                    .map(|(_, value)| value)
            })
            .map(String::as_str)
    }

    pub fn body_string(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_ignores_case() {
        let mut req = HttpRequest::new("GET".to_string(), "/".to_string());
        req.headers
            .insert("X-CSRF-JWT".to_string(), "token".to_string());

        assert_eq!(req.header("x-csrf-jwt"), Some("token"));
        assert_eq!(req.header("X-CSRF-JWT"), Some("token"));
        assert_eq!(req.header("x-other"), None);
    }

    #[test]
    fn test_cookie_lookup() {
        let mut req = HttpRequest::new("POST".to_string(), "/".to_string());
        req.headers
            .insert("Cookie".to_string(), "a=1; jwt=abc; a=2".to_string());

        assert_eq!(req.cookie("jwt").as_deref(), Some("abc"));
        assert_eq!(req.cookie("a").as_deref(), Some("1"));
        assert_eq!(req.cookie("missing"), None);
        assert_eq!(req.cookies().len(), 3);
    }

    #[test]
    fn test_set_cookie_keeps_every_cookie() {
        let mut res = HttpResponse::ok()
            .with_header("set-cookie".to_string(), "theme=dark".to_string())
            .with_cookie("session=42; Path=/".to_string());
        res.set_cookie("jwt=abc; Path=/".to_string());

        assert_eq!(
            res.set_cookies(),
            vec!["theme=dark", "session=42; Path=/", "jwt=abc; Path=/"]
        );
    }

    #[test]
    fn test_text_response() {
        let res = HttpResponse::text("valid");
        assert!(res.is_success());
        assert_eq!(res.body_string(), "valid");
        assert_eq!(
            res.header("content-type"),
            Some("text/plain; charset=utf-8")
        );
    }
}
