//! Plex Media Server catalog over its HTTP/JSON API.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use ureq::Agent;

use super::{Catalog, CatalogError, CatalogItem, CatalogTrack, Container, ContainerKind};
use crate::config::PlexConfig;
use crate::rating::{self, Rating};

/// Plugin identifier Plex expects on `/:/rate` calls for library items.
const LIBRARY_IDENTIFIER: &str = "com.plexapp.plugins.library";

/// Every Plex JSON response is wrapped in a `MediaContainer`.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(rename = "MediaContainer")]
    media_container: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerInfo {
    friendly_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SectionList {
    #[serde(rename = "Directory", default)]
    directories: Vec<Section>,
}

/// A library section ("Music", "Movies", ...).
#[derive(Debug, Clone, Deserialize)]
struct Section {
    key: String,
    title: String,
    /// `artist` for music libraries
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct MetadataList {
    #[serde(rename = "Metadata", default)]
    metadata: Vec<Metadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Metadata {
    rating_key: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    title: String,
    index: Option<u32>,
    user_rating: Option<f64>,
    #[serde(rename = "Media", default)]
    media: Vec<Media>,
}

#[derive(Debug, Deserialize)]
struct Media {
    #[serde(rename = "Part", default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    file: Option<String>,
}

impl Metadata {
    /// Map to a catalog item; anything that is not an artist, album or track
    /// is ignored.
    fn into_item(self) -> Option<CatalogItem> {
        let kind = match self.kind.as_str() {
            "artist" => ContainerKind::Artist,
            "album" => ContainerKind::Album,
            "track" => {
                let file = self
                    .media
                    .into_iter()
                    .flat_map(|m| m.parts)
                    .find_map(|p| p.file)
                    .map(PathBuf::from);
                return Some(CatalogItem::Track(CatalogTrack {
                    key: self.rating_key,
                    title: self.title,
                    index: self.index,
                    file,
                    user_rating: self.user_rating,
                }));
            }
            other => {
                log::debug!("Ignoring Plex item {} of type {other}", self.rating_key);
                return None;
            }
        };
        Some(CatalogItem::Container(Container {
            key: self.rating_key,
            kind,
            title: self.title,
        }))
    }
}

fn into_items(list: MetadataList) -> Vec<CatalogItem> {
    list.metadata.into_iter().filter_map(Metadata::into_item).collect()
}

/// A connected Plex server.
pub struct PlexCatalog {
    agent: Agent,
    base_url: String,
    token: String,
    max_response_bytes: u64,
    friendly_name: String,
    sections: Vec<Section>,
}

impl PlexCatalog {
    /// Connect and load the library sections. Fails if the server cannot be
    /// reached or rejects the token.
    pub fn connect(config: &PlexConfig) -> Result<Self, CatalogError> {
        let agent_config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .build();

        let mut catalog = Self {
            agent: Agent::new_with_config(agent_config),
            base_url: config.url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            max_response_bytes: config.max_response_bytes(),
            friendly_name: String::new(),
            sections: Vec::new(),
        };

        let info: ServerInfo = catalog.get_json("/")?;
        catalog.friendly_name = info.friendly_name.unwrap_or_else(|| catalog.base_url.clone());

        let sections: SectionList = catalog.get_json("/library/sections")?;
        log::debug!("Plex reports {} library sections", sections.directories.len());
        catalog.sections = sections.directories;

        Ok(catalog)
    }

    pub fn friendly_name(&self) -> &str {
        &self.friendly_name
    }

    /// Check that every configured library exists as a music section.
    pub fn ensure_libraries(&self, libraries: &[String]) -> Result<(), CatalogError> {
        for library in libraries {
            self.section(library)?;
        }
        Ok(())
    }

    fn section(&self, title: &str) -> Result<&Section, CatalogError> {
        find_music_section(&self.sections, title)
            .ok_or_else(|| CatalogError::UnknownLibrary(title.to_string()))
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = format!("{}{path}", self.base_url);
        log::trace!("GET {url}");

        let envelope: Envelope<T> = self
            .agent
            .get(&url)
            .header("Accept", "application/json")
            .header("X-Plex-Token", &self.token)
            .call()?
            .body_mut()
            .with_config()
            .limit(self.max_response_bytes)
            .read_json()
            .map_err(|e| CatalogError::Response {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        Ok(envelope.media_container)
    }
}

fn find_music_section<'a>(sections: &'a [Section], title: &str) -> Option<&'a Section> {
    sections.iter().find(|s| s.title == title && s.kind == "artist")
}

impl Catalog for PlexCatalog {
    fn library_items(&self, library: &str) -> Result<Vec<CatalogItem>, CatalogError> {
        let section = self.section(library)?;
        let list: MetadataList = self.get_json(&format!("/library/sections/{}/all", section.key))?;
        Ok(into_items(list))
    }

    fn children(&self, container: &Container) -> Result<Vec<CatalogItem>, CatalogError> {
        let list: MetadataList =
            self.get_json(&format!("/library/metadata/{}/children", container.key))?;
        Ok(into_items(list))
    }

    fn write_rating(&self, track: &CatalogTrack, rating: Rating) -> Result<(), CatalogError> {
        let url = format!("{}/:/rate", self.base_url);
        log::trace!("PUT {url} key={} rating={}", track.key, rating.get());

        self.agent
            .put(&url)
            .query("key", &track.key)
            .query("identifier", LIBRARY_IDENTIFIER)
            .query("rating", rating::to_catalog(rating).to_string())
            .header("X-Plex-Token", &self.token)
            .send_empty()?;
        Ok(())
    }
}
