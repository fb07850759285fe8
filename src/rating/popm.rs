//! ID3v2 popularimeter (`POPM`) byte values ↔ canonical ratings.
//!
//! Players disagree on which byte means which star count. Tables below map
//! canonical rating → byte; lookups go byte → canonical.

use super::Rating;

/// Identity (email field) written on frames this application owns.
pub const OWN_IDENTITY: &str = "Plex";

/// Identities known to write the half-star capable primary table.
/// `no@email` is what MediaMonkey writes.
pub const PRIMARY_IDENTITIES: &[&str] = &["MusicBee", "no@email", OWN_IDENTITY];

/// MusicBee / MediaMonkey / Plex. Distinct byte for every half star.
const PRIMARY: [(u8, u8); 11] = [
    (0, 0),
    (1, 13),
    (2, 1),
    (3, 54),
    (4, 64),
    (5, 118),
    (6, 128),
    (7, 186),
    (8, 196),
    (9, 242),
    (10, 255),
];

/// Windows Media Player, Winamp, foobar2000. Full stars only.
const ALTERNATIVE: [(u8, u8); 6] = [(0, 0), (2, 1), (4, 64), (6, 128), (8, 196), (10, 255)];

/// MusicBrainz Picard: 51 per star. Full stars only.
const LINEAR: [(u8, u8); 6] = [(0, 0), (2, 51), (4, 102), (6, 153), (8, 204), (10, 255)];

/// One `POPM` frame as found in a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Popularimeter<'a> {
    pub identity: &'a str,
    pub raw: u8,
}

fn lookup(table: &[(u8, u8)], raw: u8) -> Option<u8> {
    table
        .iter()
        .find(|(_, byte)| *byte == raw)
        .map(|(canonical, _)| *canonical)
}

fn interpolate(raw: u8) -> Rating {
    let scaled = (f64::from(raw) / 255.0 * 9.0 + 1.0).round_ties_even();
    Rating::clamped(scaled as i64)
}

/// Decode a `POPM` byte. `identity` selects whether the primary table applies.
///
/// Exact table matches win (primary, then alternative, then linear); anything
/// else is linearly interpolated onto 1..=10.
pub fn to_rating(raw: u8, identity: Option<&str>) -> Option<Rating> {
    if raw == 0 {
        return None;
    }

    let uses_primary = identity.is_some_and(|id| PRIMARY_IDENTITIES.contains(&id));
    let exact = uses_primary
        .then(|| lookup(&PRIMARY, raw))
        .flatten()
        .or_else(|| lookup(&ALTERNATIVE, raw))
        .or_else(|| lookup(&LINEAR, raw));

    match exact {
        Some(canonical) => Rating::new(canonical),
        None => Some(interpolate(raw)),
    }
}

/// Encode a rating with the primary table. Unrated encodes as 0.
pub fn from_rating(rating: Option<Rating>) -> u8 {
    let Some(rating) = rating else {
        return 0;
    };
    PRIMARY
        .iter()
        .find(|(canonical, _)| *canonical == rating.get())
        .map_or(0, |(_, byte)| *byte)
}

/// Pick the frame that decides a file's rating: our own frame when present,
/// otherwise the first one in tag order.
pub fn rating_from_frames<'a, I>(frames: I) -> Option<Rating>
where
    I: IntoIterator<Item = Popularimeter<'a>>,
{
    let mut first = None;
    for frame in frames {
        if frame.identity == OWN_IDENTITY {
            return to_rating(frame.raw, Some(OWN_IDENTITY));
        }
        first.get_or_insert(frame);
    }

    let frame = first?;
    let identity = Some(frame.identity).filter(|id| !id.is_empty());
    to_rating(frame.raw, identity)
}
