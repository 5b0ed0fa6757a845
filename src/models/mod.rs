pub mod click;
pub mod hotel;
pub mod listing;
pub mod recommendation;
pub mod restaurant;

pub use click::{ClickEvent, ClickedHotel};
pub use hotel::{Hotel, HotelFilter, HotelListing};
pub use listing::{ListingKind, ScrapedListings};
pub use recommendation::{Recommendation, RecommendationResponse, SessionHighlightProfile};
pub use restaurant::{Restaurant, RestaurantFilter};
