//! TMDb `configuration` endpoint and the image configuration seam.

use serde::Deserialize;

use crate::image::ImageType;

/// Source of image base URL and supported size tokens.
///
/// Implemented by [`TmdbConfiguration`]; tests and offline callers can
/// provide their own.
pub trait ImageConfig {
    /// Prefix placed before the size token, e.g. `https://image.tmdb.org/t/p/`.
    fn image_base_url(&self) -> &str;

    /// Size tokens available for `image_type`, in TMDb's order.
    fn image_sizes(&self, image_type: ImageType) -> &[String];
}

/// Response from the `configuration` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TmdbConfiguration {
    /// Image URL settings.
    pub images: ImagesConfiguration,
    /// Fields that trigger change events.
    #[serde(default)]
    pub change_keys: Vec<String>,
}

/// The `images` block of [`TmdbConfiguration`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImagesConfiguration {
    /// Plain HTTP base URL.
    #[serde(default)]
    pub base_url: String,
    /// HTTPS base URL.
    #[serde(default)]
    pub secure_base_url: String,
    /// Poster size tokens.
    #[serde(default)]
    pub poster_sizes: Vec<String>,
    /// Backdrop size tokens.
    #[serde(default)]
    pub backdrop_sizes: Vec<String>,
    /// Profile photo size tokens.
    #[serde(default)]
    pub profile_sizes: Vec<String>,
    /// Logo size tokens.
    #[serde(default)]
    pub logo_sizes: Vec<String>,
    /// Episode still size tokens.
    #[serde(default)]
    pub still_sizes: Vec<String>,
}

impl ImageConfig for TmdbConfiguration {
    /// Prefers the HTTPS base URL.
    fn image_base_url(&self) -> &str {
        if self.images.secure_base_url.is_empty() {
            &self.images.base_url
        } else {
            &self.images.secure_base_url
        }
    }

    fn image_sizes(&self, image_type: ImageType) -> &[String] {
        match image_type {
            ImageType::Poster => &self.images.poster_sizes,
            ImageType::Backdrop => &self.images.backdrop_sizes,
        }
    }
}
