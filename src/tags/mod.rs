#[cfg(test)]
mod fixtures;
pub mod id3;
pub mod vorbis;

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;

use thiserror::Error;

use crate::rating::{self, Rating};

#[derive(Error, Debug)]
pub enum TagError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Tag error: {0}")]
    Lofty(#[from] lofty::error::LoftyError),
    #[error("Invalid {field} value {value:?}")]
    InvalidValue { field: &'static str, value: String },
    #[error("Tag library panicked: {0}")]
    Panicked(String),
    #[error("Refusing to write tag: {0}")]
    Unwritable(&'static str),
}

/// Run a lofty operation, turning a panic into [`TagError::Panicked`].
/// lofty can panic on some malformed files instead of returning an error.
fn guarded<T>(op: impl FnOnce() -> Result<T, TagError>) -> Result<T, TagError> {
    catch_unwind(AssertUnwindSafe(op)).unwrap_or_else(|payload| Err(TagError::Panicked(panic_message(payload))))
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

/// Containers that carry Vorbis comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VorbisContainer {
    Flac,
    OggVorbis,
    OggOpus,
}

/// Audio formats whose rating tags we understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    /// ID3v2 `POPM` frames.
    Mp3,
    /// `RATING` Vorbis comment.
    Vorbis(VorbisContainer),
}

impl AudioFormat {
    /// Detect the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "mp3" => Some(Self::Mp3),
            "flac" => Some(Self::Vorbis(VorbisContainer::Flac)),
            "ogg" => Some(Self::Vorbis(VorbisContainer::OggVorbis)),
            "opus" => Some(Self::Vorbis(VorbisContainer::OggOpus)),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Mp3 => "MP3",
            Self::Vorbis(VorbisContainer::Flac) => "FLAC",
            Self::Vorbis(VorbisContainer::OggVorbis) => "OGG",
            Self::Vorbis(VorbisContainer::OggOpus) => "OPUS",
        }
    }

    /// The tag-native value a rating is written as, for reporting.
    pub fn encoded(self, rating: Rating) -> String {
        match self {
            Self::Mp3 => rating::popm::from_rating(Some(rating)).to_string(),
            Self::Vorbis(_) => rating::vorbis::from_rating(Some(rating)),
        }
    }

    /// Read the file's rating. Never fails: problems are logged and come
    /// back as [`RatingRead::Failed`].
    pub fn read_rating(self, path: &Path) -> RatingRead {
        let result = guarded(|| match self {
            Self::Mp3 => id3::read_rating(path),
            Self::Vorbis(container) => vorbis::read_rating(path, container),
        });

        match result {
            Ok(Some(rating)) => {
                log::debug!("        Read {} rating: {rating}", self.name());
                RatingRead::Rated(rating)
            }
            Ok(None) => {
                log::debug!("        No rating found in {} file", self.name());
                RatingRead::Unrated
            }
            Err(e) => {
                log::error!("        Failed to read rating from {} file: {e}", self.name());
                RatingRead::Failed(e.to_string())
            }
        }
    }

    pub fn write_rating(self, path: &Path, rating: Rating) -> Result<(), TagError> {
        guarded(|| match self {
            Self::Mp3 => id3::write_rating(path, rating),
            Self::Vorbis(container) => vorbis::write_rating(path, container, rating),
        })
    }
}

/// Outcome of reading a rating from either store.
#[derive(Debug, Clone, PartialEq)]
pub enum RatingRead {
    Rated(Rating),
    Unrated,
    Failed(String),
}

impl RatingRead {
    /// Failures count as unrated when reconciling.
    pub fn rating(&self) -> Option<Rating> {
        match self {
            Self::Rated(rating) => Some(*rating),
            Self::Unrated | Self::Failed(_) => None,
        }
    }
}

/// Rating access to audio files.
pub trait FileTags {
    fn read_rating(&self, path: &Path, format: AudioFormat) -> RatingRead;
    fn write_rating(&self, path: &Path, format: AudioFormat, rating: Rating) -> Result<(), TagError>;
}

/// [`FileTags`] backed by lofty, reading and writing the files in place.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyTags;

impl FileTags for LoftyTags {
    fn read_rating(&self, path: &Path, format: AudioFormat) -> RatingRead {
        format.read_rating(path)
    }

    fn write_rating(&self, path: &Path, format: AudioFormat, rating: Rating) -> Result<(), TagError> {
        format.write_rating(path, rating)
    }
}
