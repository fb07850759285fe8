//! Vorbis comment `RATING` field (0–100, ten units per half star).

use std::num::ParseIntError;

use super::Rating;

/// Field name used by FLAC, Ogg Vorbis and Opus files.
pub const FIELD: &str = "RATING";

/// Decode a numeric `RATING` value. 0 is unrated; other values are rounded
/// to the nearest canonical step (ties to even) and clamped to 1..=10.
pub fn to_rating(raw: i64) -> Option<Rating> {
    if raw == 0 {
        return None;
    }
    let scaled = (raw as f64 / 10.0).round_ties_even();
    Some(Rating::clamped(scaled as i64))
}

/// Parse the textual field value, tolerating surrounding whitespace.
pub fn parse(text: &str) -> Result<Option<Rating>, ParseIntError> {
    text.trim().parse::<i64>().map(to_rating)
}

/// Encode a rating as field text. Unrated encodes as `"0"`.
pub fn from_rating(rating: Option<Rating>) -> String {
    match rating {
        Some(rating) => (u32::from(rating.get()) * 10).clamp(10, 100).to_string(),
        None => "0".to_string(),
    }
}
