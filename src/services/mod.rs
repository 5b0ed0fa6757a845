pub mod highlights;
pub mod ingestion;
pub mod providers;
pub mod recommendations;
pub mod similarity;

pub use providers::{ListingSource, TripAdvisorSource};
