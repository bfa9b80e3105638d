//! Domain types for the six cities client.
//!
//! Wire types mirror the JSON the listings service returns (camelCase keys).
//! List endpoints return a preview shape of [`Offer`], so every detail-only
//! field falls back to its default when absent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Cities the service lists offers for, in display order
pub const CITIES: [&str; 6] = [
    "Paris",
    "Cologne",
    "Brussels",
    "Amsterdam",
    "Hamburg",
    "Dusseldorf",
];

/// City selected before the user picks one
pub const DEFAULT_CITY: &str = "Paris";

/// Unique identifier for an offer
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfferId(String);

impl OfferId {
    /// Creates an `OfferId` from its string form
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OfferId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OfferId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Map position
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Map zoom level
    pub zoom: u8,
}

/// City an offer belongs to
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct City {
    /// City name, one of [`CITIES`]
    pub name: String,
    /// Map center for the city
    pub location: Location,
}

/// Offer host
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Host {
    /// Display name
    pub name: String,
    /// Avatar image URL
    pub avatar_url: String,
    /// Whether the host has a pro account
    pub is_pro: bool,
}

/// A rentable property listing
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    /// Unique identifier
    pub id: OfferId,
    /// Listing title
    pub title: String,
    /// Property type (apartment, room, house, hotel)
    #[serde(rename = "type")]
    pub kind: String,
    /// Nightly price in euros
    pub price: u32,
    /// City the offer is in
    pub city: City,
    /// Position of the property
    pub location: Location,
    /// Whether the current user bookmarked the offer
    pub is_favorite: bool,
    /// Whether the offer is premium
    pub is_premium: bool,
    /// Rating from 0 to 5
    pub rating: f64,
    /// Card image, present on list responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_image: Option<String>,
    /// Full description, detail responses only
    #[serde(default)]
    pub description: String,
    /// Number of bedrooms, detail responses only
    #[serde(default)]
    pub bedrooms: u32,
    /// Amenities, detail responses only
    #[serde(default)]
    pub goods: Vec<String>,
    /// Host, detail responses only
    #[serde(default)]
    pub host: Host,
    /// Gallery images, detail responses only
    #[serde(default)]
    pub images: Vec<String>,
    /// Maximum number of adults, detail responses only
    #[serde(default)]
    pub max_adults: u32,
}

/// Review author
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewUser {
    /// Display name
    pub name: String,
    /// Avatar image URL
    pub avatar_url: String,
    /// Whether the author has a pro account
    pub is_pro: bool,
}

/// A user-submitted rating and comment tied to one offer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Unique identifier
    pub id: String,
    /// Offer the review belongs to; the service omits it on most responses
    #[serde(default)]
    pub offer_id: OfferId,
    /// Author
    pub user: ReviewUser,
    /// Rating from 0 to 5
    pub rating: f64,
    /// Review text
    pub comment: String,
    /// When the review was posted
    pub date: DateTime<Utc>,
}

/// Tri-state session indicator
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthorizationStatus {
    /// The initial auth check has not resolved yet
    #[default]
    Unknown,
    /// Signed in
    Auth,
    /// Signed out
    NoAuth,
}

impl std::fmt::Display for AuthorizationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Unknown => "Unknown",
            Self::Auth => "Auth",
            Self::NoAuth => "NoAuth",
        };
        f.write_str(name)
    }
}

/// Session info returned by `GET /login` and `POST /login`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthInfo {
    /// Display name
    pub name: String,
    /// Avatar image URL
    pub avatar_url: String,
    /// Whether the user has a pro account
    pub is_pro: bool,
    /// Account email
    pub email: String,
    /// Session token
    pub token: String,
}

/// Login form payload
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

impl Credentials {
    /// Creates credentials from an email and password
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A review waiting to be posted
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommentDraft {
    /// Offer being reviewed
    pub offer_id: OfferId,
    /// Review text
    pub comment: String,
    /// Star rating
    pub rating: u8,
}

/// Target bookmark state for `POST /favorite/{id}/{status}`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FavoriteStatus {
    /// Remove the bookmark
    Remove = 0,
    /// Add the bookmark
    Add = 1,
}

impl FavoriteStatus {
    /// Path segment sent to the service
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Status that flips an offer's current bookmark state
    #[must_use]
    pub const fn toggling(is_favorite: bool) -> Self {
        if is_favorite { Self::Remove } else { Self::Add }
    }
}

/// Parse failure for a CLI-facing enum
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl FromStr for FavoriteStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "on" | "add" | "1" => Ok(Self::Add),
            "off" | "remove" | "0" => Ok(Self::Remove),
            _ => Err(ParseEnumError {
                kind: "favorite status",
                value: s.to_string(),
            }),
        }
    }
}

/// Ordering of the offer list
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortOption {
    /// Server order
    #[default]
    Popular,
    /// Cheapest first
    PriceLowToHigh,
    /// Most expensive first
    PriceHighToLow,
    /// Highest rating first
    TopRatedFirst,
}

impl SortOption {
    /// All options, in menu order
    pub const ALL: [Self; 4] = [
        Self::Popular,
        Self::PriceLowToHigh,
        Self::PriceHighToLow,
        Self::TopRatedFirst,
    ];

    /// Menu label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Popular => "Popular",
            Self::PriceLowToHigh => "Price: low to high",
            Self::PriceHighToLow => "Price: high to low",
            Self::TopRatedFirst => "Top rated first",
        }
    }
}

impl std::fmt::Display for SortOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortOption {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "popular" => Ok(Self::Popular),
            "price-asc" | "price: low to high" => Ok(Self::PriceLowToHigh),
            "price-desc" | "price: high to low" => Ok(Self::PriceHighToLow),
            "top-rated" | "top rated first" => Ok(Self::TopRatedFirst),
            _ => Err(ParseEnumError {
                kind: "sort option",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_offer_deserializes_with_defaults() {
        let json = r#"{
            "id": "6af6f711-c28d-4121-82cd-e0b462a27f00",
            "title": "Beautiful & luxurious studio at great location",
            "type": "apartment",
            "price": 120,
            "city": {
                "name": "Amsterdam",
                "location": { "latitude": 52.35514938496378, "longitude": 4.673877537499948, "zoom": 8 }
            },
            "location": { "latitude": 52.35514938496378, "longitude": 4.673877537499948, "zoom": 8 },
            "isFavorite": false,
            "isPremium": true,
            "rating": 4.2,
            "previewImage": "https://url-to-image/image.png"
        }"#;

        let Ok(offer) = serde_json::from_str::<Offer>(json) else {
            unreachable!("fixture is valid");
        };
        assert_eq!(offer.id.as_str(), "6af6f711-c28d-4121-82cd-e0b462a27f00");
        assert_eq!(offer.kind, "apartment");
        assert_eq!(offer.city.name, "Amsterdam");
        assert!(offer.is_premium);
        assert!(offer.images.is_empty());
        assert_eq!(offer.host, Host::default());
        assert_eq!(offer.preview_image.as_deref(), Some("https://url-to-image/image.png"));
    }

    #[test]
    fn review_date_parses_iso_8601() {
        let json = r#"{
            "id": "b67ddfd5-b953-4a30-8c8d-bd083cd6b62a",
            "date": "2019-05-08T14:13:56.569Z",
            "user": { "name": "Oliver Conner", "avatarUrl": "https://url-to-image/image.png", "isPro": false },
            "comment": "A quiet cozy and picturesque that hides behind a a river by the unique lightness of Amsterdam.",
            "rating": 4
        }"#;

        let Ok(review) = serde_json::from_str::<Review>(json) else {
            unreachable!("fixture is valid");
        };
        assert_eq!(review.user.name, "Oliver Conner");
        assert_eq!(review.date.to_rfc3339(), "2019-05-08T14:13:56.569+00:00");
        assert_eq!(review.offer_id, OfferId::default());
    }

    #[test]
    fn credentials_debug_hides_password() {
        let credentials = Credentials::new("oliver@mail.com", "secret1");
        let debug = format!("{credentials:?}");
        assert!(debug.contains("oliver@mail.com"));
        assert!(!debug.contains("secret1"));
    }

    #[test]
    fn favorite_status_codes() {
        assert_eq!(FavoriteStatus::Add.code(), 1);
        assert_eq!(FavoriteStatus::Remove.code(), 0);
        assert_eq!(FavoriteStatus::toggling(true), FavoriteStatus::Remove);
        assert_eq!(FavoriteStatus::toggling(false), FavoriteStatus::Add);
        assert_eq!("on".parse::<FavoriteStatus>(), Ok(FavoriteStatus::Add));
        assert!("maybe".parse::<FavoriteStatus>().is_err());
    }

    #[test]
    fn sort_option_labels() {
        let labels: Vec<_> = SortOption::ALL.iter().map(|o| o.label()).collect();
        assert_eq!(
            labels,
            ["Popular", "Price: low to high", "Price: high to low", "Top rated first"]
        );
        assert_eq!("price-desc".parse::<SortOption>(), Ok(SortOption::PriceHighToLow));
    }
}
