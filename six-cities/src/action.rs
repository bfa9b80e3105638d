//! Action vocabulary.
//!
//! Every input to the reducer is an [`AppAction`]. Synchronous actions change
//! state directly. Each async operation contributes three variants: the
//! command the caller sends (which is also the operation's *requested*
//! event) and two terminal events produced by the transport call.

use crate::api::ApiError;
use crate::types::{
    AuthorizationStatus, CommentDraft, Credentials, FavoriteStatus, Offer, OfferId, Review,
};
use six_cities_core::operation::Phase;
use std::sync::Arc;

/// Async operations of the state container
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// `GET /offers`
    FetchOffers,
    /// `GET /login`
    CheckAuth,
    /// `POST /login`
    Login,
    /// `DELETE /logout`
    Logout,
    /// `GET /offers/{id}`
    FetchOffer,
    /// `GET /offers/{id}/nearby`
    FetchNearbyOffers,
    /// `GET /comments/{id}`
    FetchComments,
    /// `POST /comments/{id}`
    PostComment,
    /// `GET /favorite`
    FetchFavorites,
    /// `POST /favorite/{id}/{status}`
    ToggleFavoriteStatus,
}

impl OperationKind {
    /// Stable name used in logs
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FetchOffers => "offers/fetchOffers",
            Self::CheckAuth => "user/checkAuth",
            Self::Login => "user/login",
            Self::Logout => "user/logout",
            Self::FetchOffer => "offer/fetchOffer",
            Self::FetchNearbyOffers => "offer/fetchNearbyOffers",
            Self::FetchComments => "offer/fetchComments",
            Self::PostComment => "offer/postComment",
            Self::FetchFavorites => "favorites/fetchFavorites",
            Self::ToggleFavoriteStatus => "favorites/toggleFavoriteStatus",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Every input to the application reducer
#[derive(Clone, Debug, PartialEq)]
pub enum AppAction {
    // Synchronous
    /// Select the city whose offers are listed
    ChangeCity {
        /// City name
        city: String,
    },
    /// Replace the offer list
    LoadOffers {
        /// New offers
        offers: Arc<Vec<Offer>>,
    },
    /// Set the session status
    RequireAuthorization {
        /// New status
        status: AuthorizationStatus,
    },
    /// Set or clear the signed-in email
    SetUserEmail {
        /// Email, `None` when signed out
        email: Option<String>,
    },

    // fetchOffers
    /// Load all offers
    FetchOffers,
    /// Offers loaded
    OffersFetched {
        /// Offers, server order
        offers: Arc<Vec<Offer>>,
    },
    /// Offers could not be loaded
    FetchOffersFailed {
        /// Cause
        error: ApiError,
    },

    // checkAuth
    /// Ask the service whether the stored token is still valid
    CheckAuth,
    /// Stored token is valid
    AuthChecked {
        /// Signed-in email
        email: String,
    },
    /// No valid session
    CheckAuthFailed {
        /// Cause
        error: ApiError,
    },

    // login
    /// Sign in
    Login {
        /// Email and password
        credentials: Credentials,
    },
    /// Signed in
    LoggedIn {
        /// Signed-in email
        email: String,
    },
    /// Sign in rejected
    LoginFailed {
        /// Cause
        error: ApiError,
    },

    // logout
    /// Sign out
    Logout,
    /// Signed out
    LoggedOut,
    /// The service did not confirm the sign out; the session is dropped anyway
    LogoutFailed {
        /// Cause
        error: ApiError,
    },

    // fetchOffer
    /// Load one offer's details
    FetchOffer {
        /// Offer to load
        offer_id: OfferId,
    },
    /// Offer details loaded
    OfferFetched {
        /// Offer that was requested
        offer_id: OfferId,
        /// Offer details
        offer: Offer,
    },
    /// Offer details could not be loaded
    FetchOfferFailed {
        /// Offer that was requested
        offer_id: OfferId,
        /// Cause
        error: ApiError,
    },

    // fetchNearbyOffers
    /// Load offers near one offer
    FetchNearbyOffers {
        /// Offer at the center
        offer_id: OfferId,
    },
    /// Nearby offers loaded
    NearbyOffersFetched {
        /// Offer at the center
        offer_id: OfferId,
        /// Nearby offers
        offers: Arc<Vec<Offer>>,
    },
    /// Nearby offers could not be loaded
    FetchNearbyOffersFailed {
        /// Offer at the center
        offer_id: OfferId,
        /// Cause
        error: ApiError,
    },

    // fetchComments
    /// Load one offer's reviews
    FetchComments {
        /// Offer reviewed
        offer_id: OfferId,
    },
    /// Reviews loaded
    CommentsFetched {
        /// Offer reviewed
        offer_id: OfferId,
        /// Reviews
        reviews: Arc<Vec<Review>>,
    },
    /// Reviews could not be loaded
    FetchCommentsFailed {
        /// Offer reviewed
        offer_id: OfferId,
        /// Cause
        error: ApiError,
    },

    // postComment
    /// Post a review
    PostComment {
        /// Review to post
        draft: CommentDraft,
    },
    /// Review posted
    CommentPosted {
        /// Review as stored by the service
        review: Review,
    },
    /// Review could not be posted
    PostCommentFailed {
        /// Offer reviewed
        offer_id: OfferId,
        /// Cause
        error: ApiError,
    },

    // fetchFavorites
    /// Load the bookmarked offers
    FetchFavorites,
    /// Bookmarked offers loaded
    FavoritesFetched {
        /// Bookmarked offers
        offers: Arc<Vec<Offer>>,
    },
    /// Bookmarked offers could not be loaded
    FetchFavoritesFailed {
        /// Cause
        error: ApiError,
    },

    // toggleFavoriteStatus
    /// Add or remove a bookmark
    ToggleFavoriteStatus {
        /// Offer to bookmark
        offer_id: OfferId,
        /// Target state
        status: FavoriteStatus,
    },
    /// Bookmark changed
    FavoriteStatusToggled {
        /// Offer with its new `is_favorite`
        offer: Offer,
    },
    /// Bookmark could not be changed
    ToggleFavoriteStatusFailed {
        /// Offer to bookmark
        offer_id: OfferId,
        /// Cause
        error: ApiError,
    },
}

impl AppAction {
    /// Which operation this action belongs to, and at which phase
    ///
    /// `None` for synchronous actions.
    #[must_use]
    pub const fn lifecycle(&self) -> Option<(OperationKind, Phase)> {
        use OperationKind as K;
        use Phase::{Failed, Requested, Succeeded};

        let classified = match self {
            Self::ChangeCity { .. }
            | Self::LoadOffers { .. }
            | Self::RequireAuthorization { .. }
            | Self::SetUserEmail { .. } => return None,

            Self::FetchOffers => (K::FetchOffers, Requested),
            Self::OffersFetched { .. } => (K::FetchOffers, Succeeded),
            Self::FetchOffersFailed { .. } => (K::FetchOffers, Failed),

            Self::CheckAuth => (K::CheckAuth, Requested),
            Self::AuthChecked { .. } => (K::CheckAuth, Succeeded),
            Self::CheckAuthFailed { .. } => (K::CheckAuth, Failed),

            Self::Login { .. } => (K::Login, Requested),
            Self::LoggedIn { .. } => (K::Login, Succeeded),
            Self::LoginFailed { .. } => (K::Login, Failed),

            Self::Logout => (K::Logout, Requested),
            Self::LoggedOut => (K::Logout, Succeeded),
            Self::LogoutFailed { .. } => (K::Logout, Failed),

            Self::FetchOffer { .. } => (K::FetchOffer, Requested),
            Self::OfferFetched { .. } => (K::FetchOffer, Succeeded),
            Self::FetchOfferFailed { .. } => (K::FetchOffer, Failed),

            Self::FetchNearbyOffers { .. } => (K::FetchNearbyOffers, Requested),
            Self::NearbyOffersFetched { .. } => (K::FetchNearbyOffers, Succeeded),
            Self::FetchNearbyOffersFailed { .. } => (K::FetchNearbyOffers, Failed),

            Self::FetchComments { .. } => (K::FetchComments, Requested),
            Self::CommentsFetched { .. } => (K::FetchComments, Succeeded),
            Self::FetchCommentsFailed { .. } => (K::FetchComments, Failed),

            Self::PostComment { .. } => (K::PostComment, Requested),
            Self::CommentPosted { .. } => (K::PostComment, Succeeded),
            Self::PostCommentFailed { .. } => (K::PostComment, Failed),

            Self::FetchFavorites => (K::FetchFavorites, Requested),
            Self::FavoritesFetched { .. } => (K::FetchFavorites, Succeeded),
            Self::FetchFavoritesFailed { .. } => (K::FetchFavorites, Failed),

            Self::ToggleFavoriteStatus { .. } => (K::ToggleFavoriteStatus, Requested),
            Self::FavoriteStatusToggled { .. } => (K::ToggleFavoriteStatus, Succeeded),
            Self::ToggleFavoriteStatusFailed { .. } => (K::ToggleFavoriteStatus, Failed),
        };

        Some(classified)
    }

    /// Whether this action ends an async operation
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.lifecycle().is_some_and(|(_, phase)| phase.is_terminal())
    }

    /// Offer id carried by a detail-page event, if any
    #[must_use]
    pub const fn detail_offer_id(&self) -> Option<&OfferId> {
        match self {
            Self::FetchOffer { offer_id }
            | Self::OfferFetched { offer_id, .. }
            | Self::FetchOfferFailed { offer_id, .. }
            | Self::FetchNearbyOffers { offer_id }
            | Self::NearbyOffersFetched { offer_id, .. }
            | Self::FetchNearbyOffersFailed { offer_id, .. }
            | Self::FetchComments { offer_id }
            | Self::CommentsFetched { offer_id, .. }
            | Self::FetchCommentsFailed { offer_id, .. } => Some(offer_id),
            _ => None,
        }
    }

    /// Offer a per-offer request or its outcome is about
    const fn offer_key(&self) -> Option<&OfferId> {
        match self {
            Self::PostComment { draft } => Some(&draft.offer_id),
            Self::CommentPosted { review } => Some(&review.offer_id),
            Self::PostCommentFailed { offer_id, .. }
            | Self::ToggleFavoriteStatus { offer_id, .. }
            | Self::ToggleFavoriteStatusFailed { offer_id, .. } => Some(offer_id),
            Self::FavoriteStatusToggled { offer } => Some(&offer.id),
            _ => self.detail_offer_id(),
        }
    }

    /// Whether this terminal action settles `request`
    ///
    /// Same operation, and for per-offer operations the same offer. Requests
    /// of an operation without an offer key cannot be told apart by their
    /// outcome.
    #[must_use]
    pub fn settles(&self, request: &Self) -> bool {
        let (Some((kind, phase)), Some((requested_kind, Phase::Requested))) =
            (self.lifecycle(), request.lifecycle())
        else {
            return false;
        };
        if kind != requested_kind || !phase.is_terminal() {
            return false;
        }

        match (self.offer_key(), request.offer_key()) {
            (Some(outcome), Some(requested)) => outcome == requested,
            _ => true,
        }
    }
}
