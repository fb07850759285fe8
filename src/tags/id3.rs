use std::fs::File;
use std::path::Path;

use lofty::config::{ParseOptions, WriteOptions};
use lofty::id3::v2::{Frame, Id3v2Tag, PopularimeterFrame};
use lofty::mpeg::MpegFile;
use lofty::prelude::*;

use super::TagError;
use crate::rating::Rating;
use crate::rating::popm::{self, Popularimeter};

fn open(path: &Path) -> Result<MpegFile, TagError> {
    let mut file = File::open(path)?;
    Ok(MpegFile::read_from(&mut file, ParseOptions::new())?)
}

fn is_own_frame(frame: &Frame<'_>) -> bool {
    matches!(frame, Frame::Popularimeter(popm) if popm.email == popm::OWN_IDENTITY)
}

/// Collect every `POPM` frame of a tag in tag order.
fn popularimeters(tag: &Id3v2Tag) -> Vec<Popularimeter<'_>> {
    tag.into_iter()
        .filter_map(|frame| match frame {
            Frame::Popularimeter(popm) => Some(Popularimeter {
                identity: &*popm.email,
                raw: popm.rating,
            }),
            _ => None,
        })
        .collect()
}

/// Read the rating from the ID3v2 tag of an MP3 file.
pub fn read_rating(path: &Path) -> Result<Option<Rating>, TagError> {
    let mpeg = open(path)?;
    let Some(tag) = mpeg.id3v2() else {
        return Ok(None);
    };
    Ok(popm::rating_from_frames(popularimeters(tag)))
}

/// Replace (or add) our own `POPM` frame, leaving other players' frames alone.
pub fn write_rating(path: &Path, rating: Rating) -> Result<(), TagError> {
    let mpeg = open(path)?;
    let mut tag = mpeg.id3v2().cloned().unwrap_or_else(Id3v2Tag::new);

    set_own_rating(&mut tag, rating);

    tag.save_to_path(path, WriteOptions::default())?;
    Ok(())
}

fn set_own_rating(tag: &mut Id3v2Tag, rating: Rating) {
    tag.retain(|frame| !is_own_frame(frame));
    tag.insert(Frame::Popularimeter(PopularimeterFrame::new(
        popm::OWN_IDENTITY.to_string(),
        popm::from_rating(Some(rating)),
        0,
    )));
}
