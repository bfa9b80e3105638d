//! `reqwest` transport for the listings service

use super::{ApiError, ApiFuture, ApiRequest, ApiResponse, Method, Transport};
use crate::token::TokenStore;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// HTTP transport
///
/// Attaches `Authorization: Bearer <token>` whenever the token store holds a
/// token. A request timeout surfaces as [`ApiError::Request`].
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl HttpTransport {
    /// Create a transport for `base_url`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Request`] if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        })
    }

    /// Base URL requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: ApiRequest) -> ApiFuture<ApiResponse> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Delete => self.client.delete(&url),
        };

        match self.tokens.read() {
            Ok(Some(token)) => builder = builder.bearer_auth(token),
            Ok(None) => {},
            Err(error) => tracing::warn!(%error, "Could not read session token"),
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let method = request.method;
        let path = request.path;

        Box::pin(async move {
            tracing::debug!(%method, %path, "Sending request");

            let response = builder.send().await.map_err(|e| {
                tracing::warn!(%method, %path, error = %e, "Request failed");
                ApiError::Request(e.to_string())
            })?;

            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|e| ApiError::Request(e.to_string()))?;

            if !status.is_success() {
                tracing::debug!(%method, %path, status = status.as_u16(), "Request rejected");
                return Err(ApiError::from_status(status.as_u16(), text));
            }

            let body = if text.trim().is_empty() {
                None
            } else {
                Some(serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))?)
            };

            Ok(ApiResponse {
                status: status.as_u16(),
                body,
            })
        })
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
