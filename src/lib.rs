//! OSLC resource browser: configuration and text views shared by the CLI
//! and the end-to-end tests.

pub mod config;
pub mod render;

pub use config::{BrowserConfig, Favorite, FavoriteFolder};
