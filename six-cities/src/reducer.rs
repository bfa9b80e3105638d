//! Reducer logic for the application state.
//!
//! [`transition`] is the whole state machine: a pure function of the state
//! and one action. [`AppReducer`] applies it and asks [`operations`] for the
//! effect of requested actions.
//!
//! Every loading transition eagerly clears the stale data it supersedes, and
//! every terminal event clears its loading flag unless a newer request of the
//! same kind is still in flight. Detail responses for an offer page the user
//! left settle their flag but write no data.

use crate::action::{AppAction, OperationKind};
use crate::environment::AppEnvironment;
use crate::operations;
use crate::state::AppState;
use crate::types::{AuthorizationStatus, Offer, OfferId};
use six_cities_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
use std::sync::Arc;

/// Reducer for the application state
#[derive(Clone, Debug, Default)]
pub struct AppReducer;

impl AppReducer {
    /// Creates a new `AppReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for AppReducer {
    type State = AppState;
    type Action = AppAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match relevance(state, &action) {
            Relevance::Current => {},
            Relevance::OffRoute => tracing::debug!(
                offer_id = ?action.detail_offer_id(),
                route = ?state.detail_route,
                "Settling a request for an offer page the user left"
            ),
            Relevance::Superseded => tracing::debug!(
                offer_id = ?action.detail_offer_id(),
                "Dropping response superseded by a newer request"
            ),
        }

        transition(state, &action);

        match operations::effect_for(&action, env) {
            Some(effect) => smallvec![effect],
            None => smallvec![Effect::None],
        }
    }
}

/// How a terminal detail event relates to the requests behind it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Relevance {
    /// Belongs to the offer page being shown, or is not a detail event
    Current,
    /// Latest request of its kind, but for a page the user left
    OffRoute,
    /// A newer request of the same kind is in flight
    Superseded,
}

fn relevance(state: &AppState, action: &AppAction) -> Relevance {
    let Some(offer_id) = action.detail_offer_id() else {
        return Relevance::Current;
    };
    if !action.is_terminal() {
        return Relevance::Current;
    }

    let latest = match action.lifecycle() {
        Some((OperationKind::FetchOffer, _)) => state.offer_request.as_ref(),
        Some((OperationKind::FetchNearbyOffers, _)) => state.nearby_request.as_ref(),
        Some((OperationKind::FetchComments, _)) => state.reviews_request.as_ref(),
        _ => None,
    };

    if latest.is_some_and(|latest| latest != offer_id) {
        Relevance::Superseded
    } else if state.detail_route.as_ref().is_some_and(|route| route != offer_id) {
        Relevance::OffRoute
    } else {
        Relevance::Current
    }
}

/// Clear the loading flag of a detail operation without touching its data
fn settle_loading_flag(state: &mut AppState, action: &AppAction) {
    match action.lifecycle() {
        Some((OperationKind::FetchOffer, _)) => state.is_current_offer_loading = false,
        Some((OperationKind::FetchNearbyOffers, _)) => state.are_nearby_offers_loading = false,
        Some((OperationKind::FetchComments, _)) => state.are_reviews_loading = false,
        _ => {},
    }
}

/// Apply one action to the state
///
/// Pure: no I/O, no effects. Actions without a transition leave the state
/// equal to its input.
#[allow(clippy::too_many_lines)] // one arm per action
pub fn transition(state: &mut AppState, action: &AppAction) {
    match relevance(state, action) {
        Relevance::Current => {},
        Relevance::OffRoute => {
            settle_loading_flag(state, action);
            return;
        },
        Relevance::Superseded => return,
    }

    match action {
        AppAction::ChangeCity { city } => {
            state.city.clone_from(city);
        },
        AppAction::LoadOffers { offers } => {
            state.offers = Arc::clone(offers);
        },
        AppAction::RequireAuthorization { status } => {
            set_authorization(state, *status);
        },
        AppAction::SetUserEmail { email } => {
            state.user_email.clone_from(email);
        },

        AppAction::FetchOffers => {
            state.is_offers_loading = true;
        },
        AppAction::OffersFetched { offers } => {
            state.offers = Arc::clone(offers);
            state.favorites = Arc::new(offers.iter().filter(|o| o.is_favorite).cloned().collect());
            state.is_offers_loading = false;
        },
        AppAction::FetchOffersFailed { .. } => {
            state.is_offers_loading = false;
        },

        AppAction::AuthChecked { email } | AppAction::LoggedIn { email } => {
            state.user_email = Some(email.clone());
            set_authorization(state, AuthorizationStatus::Auth);
        },
        AppAction::CheckAuthFailed { .. } | AppAction::LoggedOut | AppAction::LogoutFailed { .. } => {
            state.user_email = None;
            set_authorization(state, AuthorizationStatus::NoAuth);
        },

        AppAction::FetchOffer { offer_id } => {
            state.detail_route = Some(offer_id.clone());
            state.offer_request = Some(offer_id.clone());
            state.is_current_offer_loading = true;
            state.is_current_offer_not_found = false;
            state.current_offer = None;
        },
        AppAction::OfferFetched { offer, .. } => {
            state.current_offer = Some(offer.clone());
            state.is_current_offer_loading = false;
            state.is_current_offer_not_found = false;
        },
        AppAction::FetchOfferFailed { .. } => {
            state.current_offer = None;
            state.is_current_offer_loading = false;
            state.is_current_offer_not_found = true;
        },

        AppAction::FetchNearbyOffers { offer_id } => {
            state.detail_route = Some(offer_id.clone());
            state.nearby_request = Some(offer_id.clone());
            state.are_nearby_offers_loading = true;
            clear(&mut state.nearby_offers);
        },
        AppAction::NearbyOffersFetched { offers, .. } => {
            state.nearby_offers = Arc::clone(offers);
            state.are_nearby_offers_loading = false;
        },
        AppAction::FetchNearbyOffersFailed { .. } => {
            state.are_nearby_offers_loading = false;
            clear(&mut state.nearby_offers);
        },

        AppAction::FetchComments { offer_id } => {
            state.detail_route = Some(offer_id.clone());
            state.reviews_request = Some(offer_id.clone());
            state.are_reviews_loading = true;
        },
        AppAction::CommentsFetched { reviews, .. } => {
            state.reviews = Arc::clone(reviews);
            state.are_reviews_loading = false;
        },
        AppAction::FetchCommentsFailed { .. } => {
            state.are_reviews_loading = false;
            clear(&mut state.reviews);
        },

        AppAction::PostComment { .. } => {
            state.is_review_posting = true;
        },
        AppAction::CommentPosted { review } => {
            // A review for a page the user left is not mixed into this page's list
            if state
                .detail_route
                .as_ref()
                .is_none_or(|route| *route == review.offer_id)
            {
                Arc::make_mut(&mut state.reviews).insert(0, review.clone());
            }
            state.is_review_posting = false;
        },
        AppAction::PostCommentFailed { .. } => {
            state.is_review_posting = false;
        },

        AppAction::FetchFavorites => {
            state.are_favorites_loading = true;
        },
        AppAction::FavoritesFetched { offers } => {
            state.favorites = Arc::clone(offers);
            state.are_favorites_loading = false;
        },
        AppAction::FetchFavoritesFailed { .. } => {
            clear(&mut state.favorites);
            state.are_favorites_loading = false;
        },

        AppAction::FavoriteStatusToggled { offer } => {
            apply_favorite_toggle(state, offer);
        },

        // Commands whose outcome is carried entirely by their terminal events
        AppAction::CheckAuth
        | AppAction::Login { .. }
        | AppAction::LoginFailed { .. }
        | AppAction::Logout
        | AppAction::ToggleFavoriteStatus { .. }
        | AppAction::ToggleFavoriteStatusFailed { .. } => {},
    }
}

/// Set the session status; signing out clears the favorites
fn set_authorization(state: &mut AppState, status: AuthorizationStatus) {
    state.authorization_status = status;
    if status == AuthorizationStatus::NoAuth {
        clear(&mut state.favorites);
    }
}

/// Empty a collection, keeping the pointer when it is already empty
fn clear<T>(list: &mut Arc<Vec<T>>) {
    if !list.is_empty() {
        *list = Arc::new(Vec::new());
    }
}

fn position(list: &[Offer], id: &OfferId) -> Option<usize> {
    list.iter().position(|o| &o.id == id)
}

/// Replace the offer with the same id, if present
fn replace(list: &mut Arc<Vec<Offer>>, offer: &Offer) {
    if let Some(index) = position(list, &offer.id) {
        Arc::make_mut(list)[index] = offer.clone();
    }
}

fn apply_favorite_toggle(state: &mut AppState, offer: &Offer) {
    replace(&mut state.offers, offer);
    replace(&mut state.nearby_offers, offer);

    if let Some(current) = state.current_offer.as_mut() {
        if current.id == offer.id {
            *current = offer.clone();
        }
    }

    match (offer.is_favorite, position(&state.favorites, &offer.id)) {
        (true, Some(index)) => Arc::make_mut(&mut state.favorites)[index] = offer.clone(),
        (true, None) => Arc::make_mut(&mut state.favorites).push(offer.clone()),
        (false, Some(index)) => {
            Arc::make_mut(&mut state.favorites).remove(index);
        },
        (false, None) => {},
    }
}
