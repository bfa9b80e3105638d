//! Navigation decisions.
//!
//! The access-control gate and the page-level choices the views make from
//! state. Nothing here renders; each function returns what should be shown
//! or where to go instead.

use crate::action::AppAction;
use crate::state::AppState;
use crate::types::{AuthorizationStatus, FavoriteStatus, Offer, OfferId};

/// Application routes
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    /// Offer list
    Main,
    /// Sign-in page
    Login,
    /// Bookmarked offers
    Favorites,
    /// One offer's page
    Offer(OfferId),
    /// Unknown route
    NotFound,
}

impl Route {
    /// URL path of the route
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Main => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Favorites => "/favorites".to_string(),
            Self::Offer(id) => format!("/offer/{id}"),
            Self::NotFound => "/404".to_string(),
        }
    }
}

/// Either the protected content or a redirect
#[derive(Clone, Debug, PartialEq)]
pub enum Guarded<T> {
    /// Show the content
    Render(T),
    /// Go to another route instead
    Redirect(Route),
}

impl<T> Guarded<T> {
    /// Whether the content is shown
    #[must_use]
    pub const fn is_render(&self) -> bool {
        matches!(self, Self::Render(_))
    }
}

/// Gate for pages that need a session
///
/// Only `Auth` renders. `Unknown` redirects as well, so protected content is
/// never shown before the initial auth check resolves.
pub fn private_route<T>(status: AuthorizationStatus, content: T) -> Guarded<T> {
    match status {
        AuthorizationStatus::Auth => Guarded::Render(content),
        AuthorizationStatus::Unknown | AuthorizationStatus::NoAuth => {
            Guarded::Redirect(Route::Login)
        },
    }
}

/// Gate for the sign-in page: signed-in users go back to the list
pub fn login_route<T>(status: AuthorizationStatus, content: T) -> Guarded<T> {
    match status {
        AuthorizationStatus::Auth => Guarded::Redirect(Route::Main),
        AuthorizationStatus::Unknown | AuthorizationStatus::NoAuth => Guarded::Render(content),
    }
}

/// What the offer page shows for `offer_id`
#[derive(Clone, Debug, PartialEq)]
pub enum OfferPage {
    /// Nothing requested for this offer yet
    Empty,
    /// Detail fetch in flight
    Loading,
    /// Detail fetch failed; go to the not-found page
    NotFound,
    /// Offer loaded
    Ready(Offer),
}

/// Decide the offer page from state
#[must_use]
pub fn offer_page(state: &AppState, offer_id: &OfferId) -> OfferPage {
    if state.detail_route.as_ref() != Some(offer_id) {
        return OfferPage::Empty;
    }
    if state.is_current_offer_loading {
        return OfferPage::Loading;
    }
    if state.is_current_offer_not_found {
        return OfferPage::NotFound;
    }
    match &state.current_offer {
        Some(offer) if &offer.id == offer_id => OfferPage::Ready(offer.clone()),
        _ => OfferPage::Empty,
    }
}

/// Result of pressing the bookmark button
///
/// Signed-out users are sent to sign in; otherwise the toggle request with
/// the flipped status.
#[must_use]
pub fn bookmark_intent(status: AuthorizationStatus, offer: &Offer) -> Guarded<AppAction> {
    private_route(
        status,
        AppAction::ToggleFavoriteStatus {
            offer_id: offer.id.clone(),
            status: FavoriteStatus::toggling(offer.is_favorite),
        },
    )
}
