//! Client state container for the six cities rental listings service.
//!
//! One [`AppState`] snapshot is kept in a [`Store`](six_cities_runtime::Store)
//! and changed only by [`AppReducer`]. Every remote call is an operation
//! with a requested action and exactly one terminal action (fulfilled or
//! rejected); the reducer records both, so views can render loading flags,
//! results and failures from state alone.
//!
//! - [`types`]: domain data (offers, reviews, session)
//! - [`api`]: HTTP resources behind a [`Transport`](api::Transport) seam
//! - [`action`], [`reducer`], [`operations`]: the state machine and its effects
//! - [`selectors`], [`guard`], [`forms`]: read-side helpers for views
//! - [`app`]: the [`SixCities`] facade
//!
//! # Quick Start
//!
//! ```no_run
//! use six_cities::{api::StubTransport, token::InMemoryTokenStore, AppEnvironment, SixCities};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let env = AppEnvironment::new(
//!     Arc::new(StubTransport::new()),
//!     Arc::new(InMemoryTokenStore::new()),
//! );
//! let app = SixCities::new(env);
//!
//! app.bootstrap().await?;
//! let offers = app.select(|s| s.offers.len()).await;
//! println!("{offers} offers");
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod api;
pub mod app;
pub mod config;
pub mod environment;
pub mod forms;
pub mod guard;
pub mod operations;
pub mod reducer;
pub mod selectors;
pub mod state;
pub mod token;
pub mod types;

// Re-export commonly used types
pub use action::{AppAction, OperationKind};
pub use app::{AppError, AppStore, LoginError, SixCities};
pub use config::Config;
pub use environment::AppEnvironment;
pub use reducer::AppReducer;
pub use state::AppState;
