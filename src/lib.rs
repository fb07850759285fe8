pub mod catalog;
pub mod config;
pub mod lock;
pub mod logging;
pub mod rating;
pub mod sync;
pub mod tags;
pub mod timing;

/// Audio file extensions we can rate
pub const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "flac", "ogg", "opus"];

/// Application name for XDG paths, lock and log files
pub const APP_NAME: &str = "plex-ratings-sync";
