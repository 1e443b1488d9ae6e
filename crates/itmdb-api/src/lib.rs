//! TMDb movie metadata library for itmdb.
//!
//! Provides the [`Movie`] entity populated from TMDb responses, image size
//! resolution, and an HTTP client for the TMDb API v3.

/// TMDb configuration document and the image URL settings trait.
pub mod configuration;
/// Fetch error kinds.
pub mod error;
/// Poster/backdrop images and size resolution.
pub mod image;
/// Movie entity.
pub mod movie;
/// Fetch option flags.
pub mod options;
/// Cast and crew credits.
pub mod person;
/// TMDb API client.
pub mod tmdb;
/// Typed reads from JSON trees.
pub mod value;

pub use configuration::{ImageConfig, TmdbConfiguration};
pub use error::FetchError;
pub use image::{Image, ImageDimension, ImageType, SizeToken, closest_size};
pub use movie::{Movie, search_movies};
pub use options::FetchOptions;
pub use person::{CreditKind, Person};
