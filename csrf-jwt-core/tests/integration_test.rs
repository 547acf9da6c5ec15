//! Integration tests for csrf-jwt-core

use async_trait::async_trait;
use csrf_jwt_core::*;

struct StampRequest;

#[async_trait]
impl Middleware for StampRequest {
    async fn handle(&self, mut req: HttpRequest, next: Next) -> Result<HttpResponse, Error> {
        req.extensions.insert(String::from("stamped"));
        next(req).await
    }
}

#[test]
fn test_http_request_creation() {
    let req = HttpRequest::new("GET".to_string(), "/test".to_string());
    assert_eq!(req.method, "GET");
    assert_eq!(req.path, "/test");
    assert!(req.headers.is_empty());
    assert!(req.extensions.is_empty());
}

#[test]
fn test_http_response_with_json() {
    let data = serde_json::json!({"message": "Hello"});
    let res = HttpResponse::ok().with_json(&data).unwrap();

    assert_eq!(res.status, 200);
    assert_eq!(res.header("content-type"), Some("application/json"));
}

#[test]
fn test_error_conversion() {
    let err = Error::RouteNotFound("GET /missing".to_string());
    assert_eq!(err.status_code(), 404);
    assert!(err.is_client_error());
    assert!(!err.is_server_error());
}

#[tokio::test]
async fn test_router_runs_middleware_before_handler() {
    let mut router = Router::new();
    router.use_middleware(StampRequest);
    router.add_route(Route::post("/echo", |req: HttpRequest| async move {
        let stamp = req.extensions.get::<String>().cloned().unwrap_or_default();
        Ok(HttpResponse::text(stamp))
    }));

    let response = router
        .handle(HttpRequest::new("POST".to_string(), "/echo".to_string()))
        .await;

    assert_eq!(response.status, 200);
    assert_eq!(response.body_string(), "stamped");
}

#[tokio::test]
async fn test_router_renders_handler_errors() {
    let router = Router::new().route_to(Route::put("/fail", |_req| async {
        Err(Error::BadRequest("bad input".to_string()))
    }));

    let response = router
        .handle(HttpRequest::new("PUT".to_string(), "/fail".to_string()))
        .await;

    assert_eq!(response.status, 400);
    let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(body["message"], "bad input");
}
