use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use lofty::config::{ParseOptions, WriteOptions};
use lofty::flac::FlacFile;
use lofty::ogg::{OpusFile, VorbisComments, VorbisFile};
use lofty::prelude::*;

use super::{TagError, VorbisContainer};
use crate::rating::{self, Rating};

const FLAC_BLOCK_PADDING: u8 = 1;

/// Load the comment block. FLAC files may not have one at all; Ogg files
/// always do.
pub(crate) fn read_comments(path: &Path, container: VorbisContainer) -> Result<Option<VorbisComments>, TagError> {
    let mut file = File::open(path)?;
    let options = ParseOptions::new();
    let comments = match container {
        VorbisContainer::Flac => FlacFile::read_from(&mut file, options)?
            .vorbis_comments()
            .cloned(),
        VorbisContainer::OggVorbis => Some(VorbisFile::read_from(&mut file, options)?.vorbis_comments().clone()),
        VorbisContainer::OggOpus => Some(OpusFile::read_from(&mut file, options)?.vorbis_comments().clone()),
    };
    Ok(comments)
}

fn rating_from_comments(comments: &VorbisComments) -> Result<Option<Rating>, TagError> {
    match comments.get(rating::vorbis::FIELD) {
        Some(text) => rating::vorbis::parse(text).map_err(|_| TagError::InvalidValue {
            field: rating::vorbis::FIELD,
            value: text.to_string(),
        }),
        None => Ok(None),
    }
}

/// Read the `RATING` comment. A missing comment block or field is unrated.
pub fn read_rating(path: &Path, container: VorbisContainer) -> Result<Option<Rating>, TagError> {
    match read_comments(path, container)? {
        Some(comments) => rating_from_comments(&comments),
        None => Ok(None),
    }
}

/// lofty rewrites FLAC metadata correctly only when the last metadata block
/// is PADDING. Any other layout is refused before anything is written.
fn check_flac_layout(path: &Path) -> Result<(), TagError> {
    let mut file = File::open(path)?;
    let mut marker = [0u8; 4];
    file.read_exact(&mut marker)?;
    if &marker != b"fLaC" {
        return Err(TagError::Unwritable("FLAC stream marker not at start of file"));
    }

    loop {
        let mut header = [0u8; 4];
        file.read_exact(&mut header)?;
        let last = header[0] & 0x80 != 0;
        let kind = header[0] & 0x7F;
        if last {
            return match kind {
                FLAC_BLOCK_PADDING => Ok(()),
                _ => Err(TagError::Unwritable("FLAC metadata does not end with a PADDING block")),
            };
        }
        let size = u32::from_be_bytes([0, header[1], header[2], header[3]]);
        file.seek(SeekFrom::Current(i64::from(size)))?;
    }
}

/// Set `RATING`, keeping every other comment as it was.
pub fn write_rating(path: &Path, container: VorbisContainer, rating: Rating) -> Result<(), TagError> {
    if container == VorbisContainer::Flac {
        check_flac_layout(path)?;
    }
    let mut comments = read_comments(path, container)?.unwrap_or_default();
    comments.insert(
        rating::vorbis::FIELD.to_string(),
        rating::vorbis::from_rating(Some(rating)),
    );
    comments.save_to_path(path, WriteOptions::default())?;
    Ok(())
}
