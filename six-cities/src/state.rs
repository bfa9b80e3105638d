//! Application state.

use crate::types::{AuthorizationStatus, Offer, OfferId, Review, DEFAULT_CITY};
use std::sync::Arc;

/// View-state snapshot of the application
///
/// Only the reducer writes it. Collections sit behind `Arc` so memoized
/// selectors can tell "unchanged" apart from "equal" by pointer; the reducer
/// replaces them or copies on write, never mutates a shared list.
#[derive(Clone, Debug, PartialEq)]
pub struct AppState {
    /// City whose offers are listed
    pub city: String,
    /// All offers, server order
    pub offers: Arc<Vec<Offer>>,
    /// `GET /offers` in flight
    pub is_offers_loading: bool,
    /// Session status
    pub authorization_status: AuthorizationStatus,
    /// Signed-in email
    pub user_email: Option<String>,
    /// Offer shown on the detail page
    pub current_offer: Option<Offer>,
    /// `GET /offers/{id}` in flight
    pub is_current_offer_loading: bool,
    /// The last detail fetch failed
    pub is_current_offer_not_found: bool,
    /// Offers near the current offer
    pub nearby_offers: Arc<Vec<Offer>>,
    /// `GET /offers/{id}/nearby` in flight
    pub are_nearby_offers_loading: bool,
    /// Bookmarked offers
    pub favorites: Arc<Vec<Offer>>,
    /// `GET /favorite` in flight
    pub are_favorites_loading: bool,
    /// Reviews of the current offer, newest first
    pub reviews: Arc<Vec<Review>>,
    /// `GET /comments/{id}` in flight
    pub are_reviews_loading: bool,
    /// `POST /comments/{id}` in flight
    pub is_review_posting: bool,
    /// Offer page being shown: the id of the latest detail request of any kind
    pub detail_route: Option<OfferId>,
    /// Offer id of the latest `GET /offers/{id}`
    pub offer_request: Option<OfferId>,
    /// Offer id of the latest `GET /offers/{id}/nearby`
    pub nearby_request: Option<OfferId>,
    /// Offer id of the latest `GET /comments/{id}`
    pub reviews_request: Option<OfferId>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            city: DEFAULT_CITY.to_string(),
            offers: Arc::default(),
            is_offers_loading: false,
            authorization_status: AuthorizationStatus::Unknown,
            user_email: None,
            current_offer: None,
            is_current_offer_loading: false,
            is_current_offer_not_found: false,
            nearby_offers: Arc::default(),
            are_nearby_offers_loading: false,
            favorites: Arc::default(),
            are_favorites_loading: false,
            reviews: Arc::default(),
            are_reviews_loading: false,
            is_review_posting: false,
            detail_route: None,
            offer_request: None,
            nearby_request: None,
            reviews_request: None,
        }
    }
}

impl AppState {
    /// Whether any request is in flight
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_offers_loading
            || self.is_current_offer_loading
            || self.are_nearby_offers_loading
            || self.are_favorites_loading
            || self.are_reviews_loading
            || self.is_review_posting
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_snapshot() {
        let state = AppState::default();
        assert_eq!(state.city, "Paris");
        assert_eq!(state.authorization_status, AuthorizationStatus::Unknown);
        assert!(state.offers.is_empty());
        assert!(state.favorites.is_empty());
        assert!(!state.is_loading());
        assert_eq!(state.detail_route, None);
    }
}
