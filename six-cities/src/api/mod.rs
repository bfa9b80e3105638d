//! Listings service API.
//!
//! [`Transport`] is the seam between the state container and the network:
//! [`HttpTransport`] talks to the real service with `reqwest`, [`StubTransport`]
//! serves canned responses for tests and offline runs. [`SixCitiesApi`] wraps
//! a transport with one typed call per resource.

use crate::types::{AuthInfo, CommentDraft, Credentials, FavoriteStatus, Offer, OfferId, Review};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub mod error;
pub mod http;
pub mod stub;

pub use error::ApiError;
pub use http::HttpTransport;
pub use stub::StubTransport;

/// Result of a call to the listings service
pub type ApiResult<T> = Result<T, ApiError>;

/// Boxed future returned by transports and typed calls
pub type ApiFuture<T> = Pin<Box<dyn Future<Output = ApiResult<T>> + Send>>;

/// HTTP method used by the service
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// DELETE
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// A request relative to the service base URL
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Path starting with `/`
    pub path: String,
    /// JSON body, if any
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    /// GET `path`
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    /// POST `path` with an optional JSON body
    #[must_use]
    pub fn post(path: impl Into<String>, body: Option<serde_json::Value>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body,
        }
    }

    /// DELETE `path`
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            body: None,
        }
    }
}

/// Successful response from the service
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Parsed JSON body; `None` for empty responses
    pub body: Option<serde_json::Value>,
}

impl ApiResponse {
    /// Decode the body into `T`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if the body is missing or has the wrong shape.
    pub fn json<T: DeserializeOwned>(self) -> ApiResult<T> {
        let body = self
            .body
            .ok_or_else(|| ApiError::Decode("empty response body".to_string()))?;
        serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Request/response channel to the listings service
///
/// Non-success statuses are reported as [`ApiError`], never as an
/// [`ApiResponse`].
pub trait Transport: Send + Sync {
    /// Send a request
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for network failures and non-success statuses.
    fn send(&self, request: ApiRequest) -> ApiFuture<ApiResponse>;
}

#[derive(Serialize)]
struct CommentBody<'a> {
    comment: &'a str,
    rating: u8,
}

/// Typed client for the listings service
#[derive(Clone)]
pub struct SixCitiesApi {
    transport: Arc<dyn Transport>,
}

impl SixCitiesApi {
    /// Wrap a transport
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    fn call<T>(&self, request: ApiRequest) -> ApiFuture<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let response = self.transport.send(request);
        Box::pin(async move { response.await?.json() })
    }

    fn body<T: Serialize>(value: &T) -> Option<serde_json::Value> {
        // Serializing plain structs of strings and integers cannot fail
        serde_json::to_value(value).ok()
    }

    /// `GET /offers`
    #[must_use]
    pub fn offers(&self) -> ApiFuture<Vec<Offer>> {
        self.call(ApiRequest::get("/offers"))
    }

    /// `GET /offers/{id}`
    #[must_use]
    pub fn offer(&self, offer_id: &OfferId) -> ApiFuture<Offer> {
        self.call(ApiRequest::get(format!("/offers/{offer_id}")))
    }

    /// `GET /offers/{id}/nearby`
    #[must_use]
    pub fn nearby_offers(&self, offer_id: &OfferId) -> ApiFuture<Vec<Offer>> {
        self.call(ApiRequest::get(format!("/offers/{offer_id}/nearby")))
    }

    /// `GET /comments/{id}`
    #[must_use]
    pub fn comments(&self, offer_id: &OfferId) -> ApiFuture<Vec<Review>> {
        self.call(ApiRequest::get(format!("/comments/{offer_id}")))
    }

    /// `POST /comments/{id}`
    #[must_use]
    pub fn post_comment(&self, draft: &CommentDraft) -> ApiFuture<Review> {
        let body = Self::body(&CommentBody {
            comment: &draft.comment,
            rating: draft.rating,
        });
        self.call(ApiRequest::post(format!("/comments/{}", draft.offer_id), body))
    }

    /// `GET /favorite`
    #[must_use]
    pub fn favorites(&self) -> ApiFuture<Vec<Offer>> {
        self.call(ApiRequest::get("/favorite"))
    }

    /// `POST /favorite/{id}/{0|1}`
    #[must_use]
    pub fn set_favorite(&self, offer_id: &OfferId, status: FavoriteStatus) -> ApiFuture<Offer> {
        self.call(ApiRequest::post(
            format!("/favorite/{offer_id}/{}", status.code()),
            None,
        ))
    }

    /// `GET /login`
    #[must_use]
    pub fn check_auth(&self) -> ApiFuture<AuthInfo> {
        self.call(ApiRequest::get("/login"))
    }

    /// `POST /login`
    #[must_use]
    pub fn login(&self, credentials: &Credentials) -> ApiFuture<AuthInfo> {
        self.call(ApiRequest::post("/login", Self::body(credentials)))
    }

    /// `DELETE /logout`
    #[must_use]
    pub fn logout(&self) -> ApiFuture<()> {
        let response = self.transport.send(ApiRequest::delete("/logout"));
        Box::pin(async move { response.await.map(|_| ()) })
    }
}

impl std::fmt::Debug for SixCitiesApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SixCitiesApi").finish_non_exhaustive()
    }
}
