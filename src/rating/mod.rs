pub mod popm;
pub mod vorbis;

use std::fmt;

/// A star rating on the canonical half-star scale (1 = half a star, 10 = five stars).
///
/// "Unrated" is modelled as `Option<Rating>::None`, never as a zero value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    /// Returns `None` for anything outside 1..=10, including 0.
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    /// Clamp an already non-zero value into 1..=10.
    pub(crate) fn clamped(value: i64) -> Self {
        Self(value.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Star value shown to users: 7 → 3.5.
    pub fn stars(self) -> f32 {
        f32::from(self.0) / 2.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} stars)", self.0, self.stars())
    }
}

/// Convert a Plex `userRating` (0–10, half-star units) into a canonical rating.
///
/// The value is truncated toward zero, not rounded, so 7.9 reads as 7.
/// Zero, negative and non-finite values read as unrated.
pub fn from_catalog(raw: Option<f64>) -> Option<Rating> {
    let raw = raw.filter(|r| r.is_finite())?;
    let truncated = raw.trunc() as i64;
    if truncated <= 0 {
        return None;
    }
    Some(Rating::clamped(truncated))
}

/// The value sent to Plex when rating an item. Plex rates on its own 0–10
/// axis, so this is the canonical value unchanged (`stars() * 2`).
pub fn to_catalog(rating: Rating) -> f64 {
    f64::from(rating.get())
}
