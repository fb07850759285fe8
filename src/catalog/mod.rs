pub mod plex;

use std::path::PathBuf;

use thiserror::Error;

use crate::rating::{self, Rating};
use crate::tags::RatingRead;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] Box<ureq::Error>),
    #[error("Unknown library: {0}")]
    UnknownLibrary(String),
    #[error("Unexpected response from {path}: {message}")]
    Response { path: String, message: String },
}

impl From<ureq::Error> for CatalogError {
    fn from(e: ureq::Error) -> Self {
        Self::Http(Box::new(e))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Artist,
    Album,
}

/// A catalog node that holds other items.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub key: String,
    pub kind: ContainerKind,
    pub title: String,
}

/// A playable track as the catalog knows it.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogTrack {
    pub key: String,
    pub title: String,
    pub index: Option<u32>,
    /// First media part's file, if the catalog reports one.
    pub file: Option<PathBuf>,
    /// Raw rating on the catalog's 0–10 axis.
    pub user_rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogItem {
    Container(Container),
    Track(CatalogTrack),
}

/// The media-server side of a reconciliation.
///
/// Items are returned in catalog order; callers rely on that for a
/// deterministic walk.
pub trait Catalog {
    /// Top-level items of a library section.
    fn library_items(&self, library: &str) -> Result<Vec<CatalogItem>, CatalogError>;

    /// Direct children of a container.
    fn children(&self, container: &Container) -> Result<Vec<CatalogItem>, CatalogError>;

    fn read_rating(&self, track: &CatalogTrack) -> RatingRead {
        match track.user_rating {
            Some(raw) if !raw.is_finite() => RatingRead::Failed(format!("invalid rating {raw}")),
            raw => rating::from_catalog(raw).map_or(RatingRead::Unrated, RatingRead::Rated),
        }
    }

    fn write_rating(&self, track: &CatalogTrack, rating: Rating) -> Result<(), CatalogError>;
}
