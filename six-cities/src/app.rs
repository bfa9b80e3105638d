//! The `SixCities` facade.
//!
//! Owns one [`Store`] and exposes each operation as an async method that
//! sends the requested action and waits for it to settle. Views and the CLI
//! read results back through [`SixCities::snapshot`] or [`SixCities::select`].

use crate::action::AppAction;
use crate::api::{ApiError, HttpTransport};
use crate::config::Config;
use crate::environment::AppEnvironment;
use crate::forms::{self, FormError};
use crate::guard::{private_route, Guarded};
use crate::reducer::AppReducer;
use crate::state::AppState;
use crate::token::FileTokenStore;
use crate::types::{FavoriteStatus, OfferId};
use futures::future::try_join_all;
use six_cities_runtime::{EffectHandle, Store, StoreConfig, StoreError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

/// Store type of the application
pub type AppStore = Store<AppState, AppAction, AppEnvironment, AppReducer>;

/// Sign-in failure returned to the caller
#[derive(Error, Debug)]
pub enum LoginError {
    /// The service rejected the credentials or could not be reached
    #[error("login rejected: {0}")]
    Rejected(ApiError),

    /// The form input failed validation; nothing was sent
    #[error("invalid credentials: {0}")]
    InvalidCredentials(#[from] FormError),

    /// The store did not deliver a result
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Failure of a facade operation
#[derive(Error, Debug)]
pub enum AppError {
    /// The service call failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Input failed validation; nothing was sent
    #[error(transparent)]
    Form(#[from] FormError),

    /// The operation needs a signed-in user
    #[error("sign in required")]
    SignInRequired,

    /// The store rejected the action or timed out waiting for it
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Client state container with its operations
#[derive(Clone)]
pub struct SixCities {
    store: AppStore,
    wait_timeout: Duration,
    /// Session outcomes carry no request key, so one session operation runs at a time
    session_gate: Arc<Mutex<()>>,
}

impl SixCities {
    /// Create a client over `environment` with default store settings
    #[must_use]
    pub fn new(environment: AppEnvironment) -> Self {
        Self::with_store_config(environment, StoreConfig::default(), Duration::from_secs(10))
    }

    /// Create a client with explicit store settings
    #[must_use]
    pub fn with_store_config(
        environment: AppEnvironment,
        store_config: StoreConfig,
        wait_timeout: Duration,
    ) -> Self {
        let store = Store::with_config(
            AppState::default(),
            AppReducer::new(),
            environment,
            store_config,
        );
        Self {
            store,
            wait_timeout,
            session_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Create a client talking to the configured service
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Request`] if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let tokens = Arc::new(FileTokenStore::new(config.token_path.clone()));
        let transport = HttpTransport::new(
            config.api_url.clone(),
            config.request_timeout(),
            Arc::clone(&tokens) as _,
        )?;

        tracing::info!(api_url = %config.api_url, "Client configured");

        Ok(Self::with_store_config(
            AppEnvironment::new(Arc::new(transport), tokens),
            StoreConfig::default().with_broadcast_capacity(config.broadcast_capacity),
            config.wait_timeout(),
        ))
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &AppStore {
        &self.store
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> AppState {
        self.store.state(Clone::clone).await
    }

    /// Read one projection of the current state
    pub async fn select<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&AppState) -> T,
    {
        self.store.state(f).await
    }

    /// Send actions together and wait until all of them settled
    async fn dispatch_all(&self, actions: Vec<AppAction>) -> Result<(), StoreError> {
        let mut handles: Vec<EffectHandle> = Vec::with_capacity(actions.len());
        for action in actions {
            handles.push(self.store.send(action).await?);
        }

        let timeout = self.wait_timeout;
        try_join_all(handles.iter_mut().map(|h| h.wait_with_timeout(timeout))).await?;
        Ok(())
    }

    /// Send a requested action and return the terminal action that settles it
    async fn settle(&self, action: AppAction) -> Result<AppAction, StoreError> {
        let request = action.clone();

        self.store
            .send_and_wait_for(action, move |a| a.settles(&request), self.wait_timeout)
            .await
    }

    /// Check the stored session and load offers, concurrently
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store rejects the actions or they do not settle in time.
    pub async fn bootstrap(&self) -> Result<(), StoreError> {
        self.dispatch_all(vec![AppAction::CheckAuth, AppAction::FetchOffers])
            .await
    }

    /// Check the stored session
    ///
    /// Never fails: an invalid session is recorded as `NoAuth`.
    pub async fn check_auth(&self) {
        let _session = self.session_gate.lock().await;
        match self.settle(AppAction::CheckAuth).await {
            Ok(AppAction::CheckAuthFailed { error }) => {
                tracing::debug!(%error, "No valid session");
            },
            Ok(_) => {},
            Err(error) => tracing::warn!(%error, "Auth check did not settle"),
        }
    }

    /// Load all offers
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store rejects the action or it does not settle in time.
    pub async fn fetch_offers(&self) -> Result<(), StoreError> {
        self.dispatch_all(vec![AppAction::FetchOffers]).await
    }

    /// Sign in
    ///
    /// # Errors
    ///
    /// Returns [`LoginError`] if the input is invalid or the service rejects it.
    /// A rejected sign-in leaves the session status unchanged.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), LoginError> {
        let credentials = forms::credentials(email, password)?;
        let _session = self.session_gate.lock().await;

        match self.settle(AppAction::Login { credentials }).await? {
            AppAction::LoginFailed { error } => {
                tracing::info!(%error, "Login rejected");
                Err(LoginError::Rejected(error))
            },
            _ => Ok(()),
        }
    }

    /// Sign out
    ///
    /// The local session ends even if the service does not confirm it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store rejects the action or it does not settle in time.
    pub async fn logout(&self) -> Result<(), StoreError> {
        let _session = self.session_gate.lock().await;
        if let AppAction::LogoutFailed { error } = self.settle(AppAction::Logout).await? {
            tracing::warn!(%error, "Logout not confirmed by the service");
        }
        Ok(())
    }

    /// Load an offer page: details, nearby offers and reviews, in flight together
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store rejects the actions or they do not settle in time.
    pub async fn open_offer(&self, offer_id: &OfferId) -> Result<(), StoreError> {
        self.dispatch_all(vec![
            AppAction::FetchOffer {
                offer_id: offer_id.clone(),
            },
            AppAction::FetchNearbyOffers {
                offer_id: offer_id.clone(),
            },
            AppAction::FetchComments {
                offer_id: offer_id.clone(),
            },
        ])
        .await
    }

    /// Load the bookmarked offers
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store rejects the action or it does not settle in time.
    pub async fn fetch_favorites(&self) -> Result<(), StoreError> {
        self.dispatch_all(vec![AppAction::FetchFavorites]).await
    }

    /// Add or remove a bookmark
    ///
    /// # Errors
    ///
    /// Returns [`AppError::SignInRequired`] without sending anything unless
    /// signed in, [`AppError::Api`] if the service rejects the change.
    pub async fn toggle_favorite(
        &self,
        offer_id: &OfferId,
        status: FavoriteStatus,
    ) -> Result<(), AppError> {
        let authorization = self.select(|s| s.authorization_status).await;
        let action = AppAction::ToggleFavoriteStatus {
            offer_id: offer_id.clone(),
            status,
        };

        let Guarded::Render(action) = private_route(authorization, action) else {
            return Err(AppError::SignInRequired);
        };

        match self.settle(action).await? {
            AppAction::ToggleFavoriteStatusFailed { error, .. } => Err(AppError::Api(error)),
            _ => Ok(()),
        }
    }

    /// Validate and post a review
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Form`] if the draft is invalid or a review is
    /// already posting, [`AppError::Api`] if the service rejects it.
    pub async fn post_comment(
        &self,
        offer_id: &OfferId,
        rating: u8,
        comment: &str,
    ) -> Result<(), AppError> {
        let posting = self.select(|s| s.is_review_posting).await;
        let draft = forms::review_draft(offer_id.clone(), rating, comment, posting)?;

        match self.settle(AppAction::PostComment { draft }).await? {
            AppAction::PostCommentFailed { error, .. } => Err(AppError::Api(error)),
            _ => Ok(()),
        }
    }

    /// Select the listed city
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after shutdown.
    pub async fn change_city(&self, city: impl Into<String>) -> Result<(), StoreError> {
        self.store
            .send(AppAction::ChangeCity { city: city.into() })
            .await
            .map(|_| ())
    }

    /// Stop accepting actions and wait for in-flight requests
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if requests are still running after the wait timeout.
    pub async fn shutdown(&self) -> Result<(), StoreError> {
        self.store.shutdown(self.wait_timeout).await
    }
}

impl std::fmt::Debug for SixCities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SixCities")
            .field("wait_timeout", &self.wait_timeout)
            .finish_non_exhaustive()
    }
}
