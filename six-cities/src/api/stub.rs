//! In-memory transport with canned responses

use super::{ApiError, ApiFuture, ApiRequest, ApiResponse, Method, Transport};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

#[derive(Clone, Debug)]
struct Route {
    reply: Result<Option<serde_json::Value>, ApiError>,
    delay: Option<Duration>,
}

/// Transport that serves canned JSON per `(method, path)`
///
/// Unknown routes answer [`ApiError::NotFound`]. Every request is recorded,
/// in the order it was sent.
#[derive(Clone, Debug, Default)]
pub struct StubTransport {
    routes: Arc<Mutex<HashMap<(Method, String), Route>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl StubTransport {
    /// Create a stub with no routes
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&self, method: Method, path: &str, reply: Result<Option<serde_json::Value>, ApiError>) {
        let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
        let delay = routes
            .get(&(method, path.to_string()))
            .and_then(|route| route.delay);
        routes.insert((method, path.to_string()), Route { reply, delay });
    }

    /// Answer `method path` with a JSON body
    pub fn respond(&self, method: Method, path: &str, body: serde_json::Value) {
        self.set(method, path, Ok(Some(body)));
    }

    /// Answer `method path` with an empty body
    pub fn respond_empty(&self, method: Method, path: &str) {
        self.set(method, path, Ok(None));
    }

    /// Answer `method path` with an error
    pub fn fail(&self, method: Method, path: &str, error: ApiError) {
        self.set(method, path, Err(error));
    }

    /// Hold the reply for `method path` for `delay`
    pub fn delay(&self, method: Method, path: &str, delay: Duration) {
        let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
        routes
            .entry((method, path.to_string()))
            .or_insert(Route {
                reply: Err(ApiError::NotFound),
                delay: None,
            })
            .delay = Some(delay);
    }

    /// Requests received so far
    #[must_use]
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests received for `method path`
    #[must_use]
    pub fn request_count(&self, method: Method, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

impl Transport for StubTransport {
    fn send(&self, request: ApiRequest) -> ApiFuture<ApiResponse> {
        let route = self
            .routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(request.method, request.path.clone()))
            .cloned();

        tracing::debug!(method = %request.method, path = %request.path, "stub request");
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        Box::pin(async move {
            let Some(route) = route else {
                return Err(ApiError::NotFound);
            };
            if let Some(delay) = route.delay {
                tokio::time::sleep(delay).await;
            }
            route.reply.map(|body| ApiResponse {
                status: if body.is_some() { 200 } else { 204 },
                body,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let stub = StubTransport::new();
        let result = stub.send(ApiRequest::get("/offers")).await;
        assert_eq!(result, Err(ApiError::NotFound));
        assert_eq!(stub.request_count(Method::Get, "/offers"), 1);
    }

    #[tokio::test]
    async fn canned_reply_is_served() {
        let stub = StubTransport::new();
        stub.respond(Method::Get, "/favorite", json!([]));
        stub.fail(Method::Delete, "/logout", ApiError::Request("offline".into()));

        let favorites = stub.send(ApiRequest::get("/favorite")).await;
        assert_eq!(
            favorites,
            Ok(ApiResponse {
                status: 200,
                body: Some(json!([]))
            })
        );

        let logout = stub.send(ApiRequest::delete("/logout")).await;
        assert_eq!(logout, Err(ApiError::Request("offline".into())));
    }

    #[tokio::test]
    async fn delay_survives_reply_changes() {
        let stub = StubTransport::new();
        stub.delay(Method::Get, "/login", Duration::from_millis(5));
        stub.respond_empty(Method::Get, "/login");

        let started = std::time::Instant::now();
        let result = stub.send(ApiRequest::get("/login")).await;
        assert!(started.elapsed() >= Duration::from_millis(5));
        assert_eq!(result.map(|r| r.status), Ok(204));
    }
}
