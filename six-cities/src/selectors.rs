//! Read-only projections of [`AppState`].
//!
//! Plain selectors borrow from the state. [`OffersByCity`] and
//! [`FavoriteCount`] remember their last inputs by pointer and hand back the
//! same result while those inputs are unchanged.

use crate::state::AppState;
use crate::types::{AuthorizationStatus, Offer, Review, SortOption};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

/// Most reviews shown on an offer page
pub const MAX_REVIEWS: usize = 10;

/// Most nearby offers shown on the offer page map
pub const MAX_NEARBY_ON_MAP: usize = 3;

/// Selected city
#[must_use]
pub fn city(state: &AppState) -> &str {
    &state.city
}

/// All offers
#[must_use]
pub fn offers(state: &AppState) -> &Arc<Vec<Offer>> {
    &state.offers
}

/// Bookmarked offers
#[must_use]
pub fn favorites(state: &AppState) -> &Arc<Vec<Offer>> {
    &state.favorites
}

/// `GET /offers` in flight
#[must_use]
pub const fn is_offers_loading(state: &AppState) -> bool {
    state.is_offers_loading
}

/// Session status
#[must_use]
pub const fn authorization_status(state: &AppState) -> AuthorizationStatus {
    state.authorization_status
}

/// Signed-in email
#[must_use]
pub fn user_email(state: &AppState) -> Option<&str> {
    state.user_email.as_deref()
}

/// Offer shown on the detail page
#[must_use]
pub const fn current_offer(state: &AppState) -> Option<&Offer> {
    state.current_offer.as_ref()
}

/// `GET /offers/{id}` in flight
#[must_use]
pub const fn is_current_offer_loading(state: &AppState) -> bool {
    state.is_current_offer_loading
}

/// The last detail fetch failed
#[must_use]
pub const fn is_current_offer_not_found(state: &AppState) -> bool {
    state.is_current_offer_not_found
}

/// Offers near the current offer
#[must_use]
pub fn nearby_offers(state: &AppState) -> &Arc<Vec<Offer>> {
    &state.nearby_offers
}

/// `GET /offers/{id}/nearby` in flight
#[must_use]
pub const fn are_nearby_offers_loading(state: &AppState) -> bool {
    state.are_nearby_offers_loading
}

/// Reviews of the current offer
#[must_use]
pub fn reviews(state: &AppState) -> &Arc<Vec<Review>> {
    &state.reviews
}

/// `GET /comments/{id}` in flight
#[must_use]
pub const fn are_reviews_loading(state: &AppState) -> bool {
    state.are_reviews_loading
}

/// `POST /comments/{id}` in flight
#[must_use]
pub const fn is_review_posting(state: &AppState) -> bool {
    state.is_review_posting
}

/// `GET /favorite` in flight
#[must_use]
pub const fn are_favorites_loading(state: &AppState) -> bool {
    state.are_favorites_loading
}

struct OffersByCityCache {
    offers: Arc<Vec<Offer>>,
    city: String,
    result: Arc<Vec<Offer>>,
}

/// Offers in the selected city, memoized
///
/// ```
/// use six_cities::selectors::OffersByCity;
/// use six_cities::state::AppState;
/// use std::sync::Arc;
///
/// let selector = OffersByCity::new();
/// let state = AppState::default();
/// let first = selector.select(&state);
/// let second = selector.select(&state);
/// assert!(Arc::ptr_eq(&first, &second));
/// ```
#[derive(Default)]
pub struct OffersByCity {
    cache: Mutex<Option<OffersByCityCache>>,
}

impl OffersByCity {
    /// Create a selector with an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers whose city is the selected one
    pub fn select(&self, state: &AppState) -> Arc<Vec<Offer>> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(cached) = cache.as_ref() {
            if Arc::ptr_eq(&cached.offers, &state.offers) && cached.city == state.city {
                return Arc::clone(&cached.result);
            }
        }

        let result: Arc<Vec<Offer>> = Arc::new(
            state
                .offers
                .iter()
                .filter(|o| o.city.name == state.city)
                .cloned()
                .collect(),
        );
        *cache = Some(OffersByCityCache {
            offers: Arc::clone(&state.offers),
            city: state.city.clone(),
            result: Arc::clone(&result),
        });
        result
    }
}

/// Number of bookmarked offers, memoized
#[derive(Default)]
pub struct FavoriteCount {
    cache: Mutex<Option<(Arc<Vec<Offer>>, usize)>>,
}

impl FavoriteCount {
    /// Create a selector with an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Length of the favorites list
    pub fn select(&self, state: &AppState) -> usize {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some((favorites, count)) = cache.as_ref() {
            if Arc::ptr_eq(favorites, &state.favorites) {
                return *count;
            }
        }

        let count = state.favorites.len();
        *cache = Some((Arc::clone(&state.favorites), count));
        count
    }

    /// Whether the last call was answered from the cache for `state`
    #[must_use]
    pub fn is_cached_for(&self, state: &AppState) -> bool {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|(favorites, _)| Arc::ptr_eq(favorites, &state.favorites))
    }
}

/// Offers in the requested order
///
/// `Popular` keeps server order. Ties keep their server order too.
#[must_use]
pub fn sort_offers(offers: &[Offer], option: SortOption) -> Vec<Offer> {
    let mut sorted = offers.to_vec();
    match option {
        SortOption::Popular => {},
        SortOption::PriceLowToHigh => sorted.sort_by_key(|o| o.price),
        SortOption::PriceHighToLow => sorted.sort_by(|a, b| b.price.cmp(&a.price)),
        SortOption::TopRatedFirst => {
            sorted.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal));
        },
    }
    sorted
}

/// Newest reviews first, at most [`MAX_REVIEWS`]
#[must_use]
pub fn latest_reviews(state: &AppState) -> Vec<Review> {
    let mut reviews = state.reviews.to_vec();
    reviews.sort_by(|a, b| b.date.cmp(&a.date));
    reviews.truncate(MAX_REVIEWS);
    reviews
}

/// Number of reviews of the current offer, including those not shown
#[must_use]
pub fn review_count(state: &AppState) -> usize {
    state.reviews.len()
}

/// Offers pinned on the offer page map
///
/// The current offer first, then the first [`MAX_NEARBY_ON_MAP`] nearby
/// offers. Each id appears once, so a nearby entry repeating the current
/// offer takes a slot without adding a pin.
#[must_use]
pub fn nearby_for_map(state: &AppState) -> Vec<Offer> {
    let mut seen = HashSet::new();
    let mut pins = Vec::new();

    if let Some(current) = &state.current_offer {
        seen.insert(current.id.clone());
        pins.push(current.clone());
    }

    pins.extend(
        state
            .nearby_offers
            .iter()
            .take(MAX_NEARBY_ON_MAP)
            .filter(|o| seen.insert(o.id.clone()))
            .cloned(),
    );
    pins
}

/// Favorites grouped by city name, cities in order of first appearance
#[must_use]
pub fn favorites_by_city(state: &AppState) -> Vec<(String, Vec<Offer>)> {
    let mut groups: Vec<(String, Vec<Offer>)> = Vec::new();

    for offer in state.favorites.iter() {
        match groups.iter_mut().find(|(city, _)| *city == offer.city.name) {
            Some((_, offers)) => offers.push(offer.clone()),
            None => groups.push((offer.city.name.clone(), vec![offer.clone()])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::types::{City, OfferId, ReviewUser};
    use chrono::{TimeZone, Utc};

    fn offer(id: &str, city: &str, price: u32, rating: f64) -> Offer {
        Offer {
            id: OfferId::new(id),
            price,
            rating,
            city: City {
                name: city.into(),
                ..City::default()
            },
            ..Offer::default()
        }
    }

    fn review(id: &str, day: u32) -> Review {
        Review {
            id: id.into(),
            offer_id: OfferId::new("1"),
            user: ReviewUser::default(),
            rating: 5.0,
            comment: String::new(),
            date: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
        }
    }

    fn ids(offers: &[Offer]) -> Vec<&str> {
        offers.iter().map(|o| o.id.as_str()).collect()
    }

    #[test]
    fn offers_by_city_filters_and_memoizes() {
        let selector = OffersByCity::new();
        let mut state = AppState {
            offers: Arc::new(vec![
                offer("1", "Paris", 10, 1.0),
                offer("2", "Amsterdam", 20, 2.0),
                offer("3", "Paris", 30, 3.0),
            ]),
            ..AppState::default()
        };

        let first = selector.select(&state);
        assert_eq!(ids(&first), ["1", "3"]);
        assert!(Arc::ptr_eq(&first, &selector.select(&state)));

        state.city = "Amsterdam".into();
        let amsterdam = selector.select(&state);
        assert_eq!(ids(&amsterdam), ["2"]);
        assert!(!Arc::ptr_eq(&first, &amsterdam));

        // Equal but freshly allocated offers invalidate the cache
        state.offers = Arc::new(state.offers.to_vec());
        assert!(!Arc::ptr_eq(&amsterdam, &selector.select(&state)));
    }

    #[test]
    fn favorite_count_memoizes_on_list_pointer() {
        let selector = FavoriteCount::new();
        let mut state = AppState {
            favorites: Arc::new(vec![offer("1", "Paris", 10, 1.0)]),
            ..AppState::default()
        };

        assert_eq!(selector.select(&state), 1);
        assert!(selector.is_cached_for(&state));

        state.favorites = Arc::new(Vec::new());
        assert!(!selector.is_cached_for(&state));
        assert_eq!(selector.select(&state), 0);
    }

    #[test]
    fn sorting() {
        let list = vec![
            offer("a", "Paris", 300, 3.5),
            offer("b", "Paris", 100, 4.8),
            offer("c", "Paris", 200, 4.1),
        ];

        assert_eq!(ids(&sort_offers(&list, SortOption::Popular)), ["a", "b", "c"]);
        assert_eq!(ids(&sort_offers(&list, SortOption::PriceLowToHigh)), ["b", "c", "a"]);
        assert_eq!(ids(&sort_offers(&list, SortOption::PriceHighToLow)), ["a", "c", "b"]);
        assert_eq!(ids(&sort_offers(&list, SortOption::TopRatedFirst)), ["b", "c", "a"]);
    }

    #[test]
    fn latest_reviews_newest_first_capped() {
        let state = AppState {
            reviews: Arc::new((1..=12).map(|day| review(&format!("r{day}"), day)).collect()),
            ..AppState::default()
        };

        let latest = latest_reviews(&state);
        assert_eq!(latest.len(), MAX_REVIEWS);
        assert_eq!(latest[0].id, "r12");
        assert_eq!(latest[9].id, "r3");
        assert_eq!(review_count(&state), 12);
    }

    #[test]
    fn map_pins_current_then_three_nearby() {
        let state = AppState {
            current_offer: Some(offer("1", "Paris", 10, 1.0)),
            nearby_offers: Arc::new(vec![
                offer("2", "Paris", 10, 1.0),
                offer("3", "Paris", 10, 1.0),
                offer("4", "Paris", 10, 1.0),
                offer("5", "Paris", 10, 1.0),
            ]),
            ..AppState::default()
        };

        assert_eq!(ids(&nearby_for_map(&state)), ["1", "2", "3", "4"]);
    }

    #[test]
    fn current_offer_in_nearby_window_uses_a_slot() {
        let state = AppState {
            current_offer: Some(offer("1", "Paris", 10, 1.0)),
            nearby_offers: Arc::new(vec![
                offer("1", "Paris", 10, 1.0),
                offer("2", "Paris", 10, 1.0),
                offer("3", "Paris", 10, 1.0),
                offer("4", "Paris", 10, 1.0),
                offer("5", "Paris", 10, 1.0),
            ]),
            ..AppState::default()
        };

        assert_eq!(ids(&nearby_for_map(&state)), ["1", "2", "3"]);
    }

    #[test]
    fn favorites_grouped_in_first_appearance_order() {
        let state = AppState {
            favorites: Arc::new(vec![
                offer("1", "Cologne", 10, 1.0),
                offer("2", "Paris", 10, 1.0),
                offer("3", "Cologne", 10, 1.0),
            ]),
            ..AppState::default()
        };

        let groups = favorites_by_city(&state);
        let cities: Vec<&str> = groups.iter().map(|(city, _)| city.as_str()).collect();
        assert_eq!(cities, ["Cologne", "Paris"]);
        assert_eq!(ids(&groups[0].1), ["1", "3"]);
    }

    #[test]
    fn plain_selectors_project_fields() {
        let state = AppState {
            user_email: Some("a@b.c".into()),
            is_review_posting: true,
            ..AppState::default()
        };
        assert_eq!(city(&state), "Paris");
        assert_eq!(user_email(&state), Some("a@b.c"));
        assert!(is_review_posting(&state));
        assert_eq!(authorization_status(&state), AuthorizationStatus::Unknown);
        assert!(current_offer(&state).is_none());
    }
}
