//! Transport error types

use thiserror::Error;

/// Failure of a call to the listings service
///
/// `Clone + PartialEq` so it can travel inside failed terminal actions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (network, timeout, TLS)
    #[error("Request failed: {0}")]
    Request(String),

    /// The service answered with an unexpected status
    #[error("API error {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// 401: missing or expired token
    #[error("Unauthorized")]
    Unauthorized,

    /// 404: unknown resource
    #[error("Not found")]
    NotFound,

    /// The response body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Map a non-success status to an error
    #[must_use]
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => Self::Unauthorized,
            404 => Self::NotFound,
            _ => Self::Status { status, message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(ApiError::from_status(401, String::new()), ApiError::Unauthorized);
        assert_eq!(ApiError::from_status(404, String::new()), ApiError::NotFound);
        assert_eq!(
            ApiError::from_status(400, "bad comment".into()),
            ApiError::Status {
                status: 400,
                message: "bad comment".into()
            }
        );
    }
}
