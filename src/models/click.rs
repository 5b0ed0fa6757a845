use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single (session, hotel) click. Unique per pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClickEvent {
    /// Opaque client-generated identifier, not validated
    pub session_id: String,
    /// Not checked against the hotels table
    pub hotel_id: i64,
}

/// A hotel a session has clicked, joined with its stored highlights.
///
/// `highlights` is `None` both when the hotel has no highlights and when the
/// clicked id has no hotel row at all.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ClickedHotel {
    pub hotel_id: i64,
    pub highlights: Option<Value>,
}
