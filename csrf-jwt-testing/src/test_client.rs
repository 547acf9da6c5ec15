// Test HTTP client

use csrf_jwt_core::{Error, HttpMethod, HttpRequest, HttpResponse, Router, parse_cookie_header};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Test client that drives a [`Router`] in-process.
///
/// Behaves like a browser for cookies: every `Set-Cookie` in a response is
/// stored in the client's jar and sent back on later requests, unless the
/// request sets a cookie of the same name itself.
pub struct TestClient {
    router: Arc<Router>,
    jar: Mutex<Vec<(String, String)>>,
}

impl TestClient {
    pub fn new(router: Arc<Router>) -> Self {
        Self {
            router,
            jar: Mutex::new(Vec::new()),
        }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.send(TestRequestBuilder::new(HttpMethod::GET, path)).await
    }

    pub async fn post(&self, path: &str, body: Vec<u8>) -> TestResponse {
        self.send(TestRequestBuilder::new(HttpMethod::POST, path).body(body))
            .await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        self.send(TestRequestBuilder::new(HttpMethod::DELETE, path))
            .await
    }

    /// Send a built request, merging in the jar and recording new cookies.
    pub async fn send(&self, builder: TestRequestBuilder) -> TestResponse {
        let mut builder = builder;
        for (name, value) in self.cookies() {
            if !builder.cookies.iter().any(|(n, _)| *n == name) {
                builder.cookies.push((name, value));
            }
        }

        let response = self.router.handle(builder.build()).await;

        for (name, value) in response
            .set_cookies()
            .into_iter()
            .filter_map(parse_set_cookie)
        {
            self.store_cookie(name, value);
        }

        TestResponse::new(response)
    }

    /// Cookies currently held in the jar
    pub fn cookies(&self) -> Vec<(String, String)> {
        self.jar.lock().map(|jar| jar.clone()).unwrap_or_default()
    }

    pub fn cookie(&self, name: &str) -> Option<String> {
        self.cookies()
            .into_iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn clear_cookies(&self) {
        if let Ok(mut jar) = self.jar.lock() {
            jar.clear();
        }
    }

    fn store_cookie(&self, name: String, value: String) {
        if let Ok(mut jar) = self.jar.lock() {
            match jar.iter_mut().find(|(n, _)| *n == name) {
                Some(entry) => entry.1 = value,
                None => jar.push((name, value)),
            }
        }
    }
}

/// Name and value of a rendered `Set-Cookie` line
pub fn parse_set_cookie(line: &str) -> Option<(String, String)> {
    let pair = line.split(';').next()?;
    parse_cookie_header(pair).into_iter().next()
}

/// Builder for test requests
pub struct TestRequestBuilder {
    method: HttpMethod,
    path: String,
    headers: HashMap<String, String>,
    cookies: Vec<(String, String)>,
    body: Vec<u8>,
}

impl TestRequestBuilder {
    pub fn new(method: HttpMethod, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            headers: HashMap::new(),
            cookies: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new(HttpMethod::GET, path)
    }

    pub fn post(path: &str) -> Self {
        Self::new(HttpMethod::POST, path)
    }

    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    /// Add a cookie to the `Cookie` header
    pub fn cookie(mut self, name: &str, value: &str) -> Self {
        self.cookies.push((name.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Set JSON body
    pub fn json<T: serde::Serialize>(mut self, data: &T) -> Result<Self, Error> {
        self.body = serde_json::to_vec(data).map_err(|e| Error::Serialization(e.to_string()))?;
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        Ok(self)
    }

    pub fn build(self) -> HttpRequest {
        let mut req = HttpRequest::new(self.method.as_str().to_string(), self.path);
        req.headers = self.headers;
        req.body = self.body;

        if !self.cookies.is_empty() {
            let line = self
                .cookies
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("; ");
            req.headers.insert("Cookie".to_string(), line);
        }

        req
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    inner: HttpResponse,
}

impl TestResponse {
    pub fn new(inner: HttpResponse) -> Self {
        Self { inner }
    }

    pub fn status(&self) -> u16 {
        self.inner.status
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.inner.header(key)
    }

    /// Name and value of every cookie the response sets, in order
    pub fn set_cookies(&self) -> Vec<(String, String)> {
        self.inner
            .set_cookies()
            .into_iter()
            .filter_map(parse_set_cookie)
            .collect()
    }

    /// Value of the cookie `name` set by the response
    pub fn set_cookie(&self, name: &str) -> Option<String> {
        self.set_cookies()
            .into_iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Full `Set-Cookie` line for the cookie `name`, attributes included
    pub fn set_cookie_line(&self, name: &str) -> Option<&str> {
        let prefix = format!("{}=", name);
        self.inner
            .set_cookies()
            .into_iter()
            .find(|line| line.starts_with(&prefix))
    }

    pub fn body_string(&self) -> String {
        self.inner.body_string()
    }

    pub fn body_json<T: serde::de::DeserializeOwned>(&self) -> Result<T, String> {
        serde_json::from_slice(&self.inner.body).map_err(|e| format!("Serialization error: {}", e))
    }

    pub fn into_inner(self) -> HttpResponse {
        self.inner
    }
}
