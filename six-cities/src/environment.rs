//! Injected dependencies of the application reducer.

use crate::api::{SixCitiesApi, Transport};
use crate::token::TokenStore;
use std::sync::Arc;

/// Environment dependencies for the application reducer
#[derive(Clone)]
pub struct AppEnvironment {
    /// Typed client for the listings service
    pub api: SixCitiesApi,
    /// Session token storage
    pub tokens: Arc<dyn TokenStore>,
}

impl AppEnvironment {
    /// Creates a new `AppEnvironment`
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            api: SixCitiesApi::new(transport),
            tokens,
        }
    }
}

impl std::fmt::Debug for AppEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppEnvironment")
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}
