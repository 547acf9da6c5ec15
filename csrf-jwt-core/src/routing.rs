// Routing system for HTTP requests

use crate::logging::debug;
use crate::{
    Error, Extensions, HandlerFn, HttpMethod, HttpRequest, HttpResponse, Middleware,
    MiddlewareChain, ResponseFuture,
};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

/// Route definition with handler.
///
/// `metadata` holds typed, per-route configuration set at registration time.
/// It is copied into the request extensions when the route is dispatched so
/// middleware can read it without inspecting the route table again.
#[derive(Clone)]
pub struct Route {
    pub method: HttpMethod,
    pub path: String,
    pub handler: HandlerFn,
    pub metadata: Extensions,
}

impl Route {
    pub fn new<F, Fut>(method: HttpMethod, path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse, Error>> + Send + 'static,
    {
        let boxed: HandlerFn =
            Arc::new(move |req: HttpRequest| -> ResponseFuture { Box::pin(handler(req)) });
        Self {
            method,
            path: path.into(),
            handler: boxed,
            metadata: Extensions::new(),
        }
    }

    pub fn get<F, Fut>(path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse, Error>> + Send + 'static,
    {
        Self::new(HttpMethod::GET, path, handler)
    }

    pub fn post<F, Fut>(path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse, Error>> + Send + 'static,
    {
        Self::new(HttpMethod::POST, path, handler)
    }

    pub fn put<F, Fut>(path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse, Error>> + Send + 'static,
    {
        Self::new(HttpMethod::PUT, path, handler)
    }

    pub fn delete<F, Fut>(path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse, Error>> + Send + 'static,
    {
        Self::new(HttpMethod::DELETE, path, handler)
    }

    /// Attach typed metadata to this route
    pub fn with_metadata<T: Send + Sync + 'static>(mut self, value: T) -> Self {
        self.metadata.insert(value);
        self
    }
}

/// Router for managing routes and dispatching requests
pub struct Router {
    pub routes: Vec<Route>,
    middleware: MiddlewareChain,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            middleware: MiddlewareChain::new(),
        }
    }

    /// Add a route to the router
    pub fn add_route(&mut self, route: Route) {
        self.routes.push(route);
    }

    /// Builder form of [`Router::add_route`]
    pub fn route_to(mut self, route: Route) -> Self {
        self.add_route(route);
        self
    }

    /// Run `middleware` around every matched route, in registration order
    pub fn use_middleware<M: Middleware + 'static>(&mut self, middleware: M) {
        self.middleware.use_middleware(middleware);
    }

    /// Find the matching route and run it through the middleware chain
    pub async fn route(&self, mut request: HttpRequest) -> Result<HttpResponse, Error> {
        let (path, query_string) = match request.path.split_once('?') {
            Some((p, q)) => (p.to_string(), Some(q.to_string())),
            None => (request.path.clone(), None),
        };

        if let Some(query) = query_string {
            request.query_params = parse_query_string(&query);
        }

        let mut path_matched = false;
        for route in &self.routes {
            let Some(params) = match_path(&route.path, &path) else {
                continue;
            };
            path_matched = true;

            if !route.method.as_str().eq_ignore_ascii_case(&request.method) {
                continue;
            }

            request.path = path;
            request.path_params = params;
            request.extensions.extend_from(&route.metadata);
            return self.middleware.apply(request, route.handler.clone()).await;
        }

        if path_matched {
            Err(Error::MethodNotAllowed(format!("{} {}", request.method, path)))
        } else {
            Err(Error::RouteNotFound(format!("{} {}", request.method, path)))
        }
    }

    /// Dispatch a request and render any error as a JSON response
    pub async fn handle(&self, request: HttpRequest) -> HttpResponse {
        match self.route(request).await {
            Ok(response) => response,
            Err(err) => {
                debug!(status = err.status_code(), error = %err, "Request failed");
                err.to_response()
            }
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// Match a route path pattern against a request path
/// Returns Some(params) if matched, None otherwise
fn match_path(pattern: &str, path: &str) -> Option<HashMap<String, String>> {
    let pattern_parts: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let path_parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if pattern_parts.len() != path_parts.len() {
        return None;
    }

    let mut params = HashMap::new();

    for (pattern_part, path_part) in pattern_parts.iter().zip(path_parts.iter()) {
        if let Some(param_name) = pattern_part.strip_prefix(':') {
            params.insert(param_name.to_string(), path_part.to_string());
        } else if pattern_part != path_part {
            return None;
        }
    }

    Some(params)
}

/// Parse a query string into a map of parameters
fn parse_query_string(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter_map(|part| {
            let mut split = part.splitn(2, '=');
            let key = split.next()?;
            let value = split.next().unwrap_or("");
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}
