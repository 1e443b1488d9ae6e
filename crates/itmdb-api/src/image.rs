//! Image assets and size variant resolution.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use url::Url;

use crate::configuration::ImageConfig;
use crate::value::{get_f64, get_string, get_u32};

/// Size token for the unscaled image.
pub const ORIGINAL_SIZE: &str = "original";

/// Regex for `w<width>` / `h<height>` size tokens.
#[allow(clippy::expect_used)]
static SIZE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([wh])(\d+)$").expect("failed to compile size token regex"));

/// Image category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageType {
    /// Movie poster.
    Poster,
    /// Backdrop (fan art).
    Backdrop,
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Poster => f.write_str("poster"),
            Self::Backdrop => f.write_str("backdrop"),
        }
    }
}

/// Axis a size token constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageDimension {
    /// Width in pixels.
    Width,
    /// Height in pixels.
    Height,
}

/// A parsed size token such as `w500`, `h632`, or `original`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeToken {
    /// The unscaled image; no numeric constraint.
    Original,
    /// Scaled to the given width.
    Width(u32),
    /// Scaled to the given height.
    Height(u32),
}

impl SizeToken {
    /// Parses a size token. Returns `None` for anything that is not
    /// `original`, `w<n>`, or `h<n>`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        if s == ORIGINAL_SIZE {
            return Some(Self::Original);
        }
        let caps = SIZE_TOKEN_RE.captures(s)?;
        let value: u32 = caps.get(2)?.as_str().parse().ok()?;
        match caps.get(1)?.as_str() {
            "w" => Some(Self::Width(value)),
            "h" => Some(Self::Height(value)),
            _ => None,
        }
    }

    /// Constrained axis, or `None` for [`SizeToken::Original`].
    #[must_use]
    pub const fn dimension(self) -> Option<ImageDimension> {
        match self {
            Self::Original => None,
            Self::Width(_) => Some(ImageDimension::Width),
            Self::Height(_) => Some(ImageDimension::Height),
        }
    }

    /// Pixel value, or `None` for [`SizeToken::Original`].
    #[must_use]
    pub const fn value(self) -> Option<u32> {
        match self {
            Self::Original => None,
            Self::Width(v) | Self::Height(v) => Some(v),
        }
    }
}

impl fmt::Display for SizeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Original => f.write_str(ORIGINAL_SIZE),
            Self::Width(v) => write!(f, "w{v}"),
            Self::Height(v) => write!(f, "h{v}"),
        }
    }
}

/// Returns the size token from `sizes` that best serves `target` pixels
/// along `dimension`.
///
/// - The smallest token on that axis whose value is `>= target` wins.
/// - If none covers the target, the largest token on that axis is used.
/// - If the axis has no token at all, `original` is used when listed.
///
/// Equal values keep the first one in input order. Unparseable tokens are
/// ignored. Returns `None` when nothing matches (including an empty list).
#[must_use]
pub fn closest_size<S: AsRef<str>>(
    target: u32,
    sizes: &[S],
    dimension: ImageDimension,
) -> Option<&str> {
    let mut covering: Option<(u32, &str)> = None;
    let mut largest: Option<(u32, &str)> = None;
    let mut original: Option<&str> = None;

    for size in sizes {
        let token = size.as_ref();
        match SizeToken::parse(token) {
            Some(SizeToken::Original) => {
                original = original.or(Some(token));
            }
            Some(parsed) if parsed.dimension() == Some(dimension) => {
                let Some(value) = parsed.value() else {
                    continue;
                };
                if value >= target && covering.is_none_or(|(best, _)| value < best) {
                    covering = Some((value, token));
                }
                if largest.is_none_or(|(best, _)| value > best) {
                    largest = Some((value, token));
                }
            }
            _ => {}
        }
    }

    covering.or(largest).map(|(_, token)| token).or(original)
}

/// An image available in several named size variants.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    image_type: ImageType,
    width: u32,
    height: u32,
    aspect_ratio: Option<f64>,
    iso_639_1: Option<String>,
    vote_average: f64,
    vote_count: u32,
    file_path: Option<String>,
}

impl Image {
    /// Builds an image from one raw image object.
    ///
    /// Returns `None` if `raw` is not an object.
    #[must_use]
    pub fn from_raw(raw: &Value, image_type: ImageType) -> Option<Self> {
        let map = raw.as_object()?;
        Some(Self {
            image_type,
            width: get_u32(map, "width").unwrap_or_default(),
            height: get_u32(map, "height").unwrap_or_default(),
            aspect_ratio: get_f64(map, "aspect_ratio"),
            iso_639_1: get_string(map, "iso_639_1"),
            vote_average: get_f64(map, "vote_average").unwrap_or_default(),
            vote_count: get_u32(map, "vote_count").unwrap_or_default(),
            file_path: get_string(map, "file_path"),
        })
    }

    /// Builds images of one type from a raw array, skipping non-objects.
    #[must_use]
    pub fn list_from_raw(raw: &[Value], image_type: ImageType) -> Vec<Self> {
        raw.iter()
            .filter_map(|item| Self::from_raw(item, image_type))
            .collect()
    }

    /// Image category.
    #[must_use]
    pub const fn image_type(&self) -> ImageType {
        self.image_type
    }

    /// Original `(width, height)` in pixels (`0` when unknown).
    #[must_use]
    pub const fn original_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Width / height ratio reported by TMDb.
    #[must_use]
    pub const fn aspect_ratio(&self) -> Option<f64> {
        self.aspect_ratio
    }

    /// Two-letter language code of any text in the image.
    #[must_use]
    pub fn iso_639_1(&self) -> Option<&str> {
        self.iso_639_1.as_deref()
    }

    /// Average user vote.
    #[must_use]
    pub const fn vote_average(&self) -> f64 {
        self.vote_average
    }

    /// Number of user votes.
    #[must_use]
    pub const fn vote_count(&self) -> u32 {
        self.vote_count
    }

    /// Path fragment appended after the size token, e.g. `/abc.jpg`.
    #[must_use]
    pub fn file_path(&self) -> Option<&str> {
        self.file_path.as_deref()
    }

    /// Builds the URL of an explicit size variant.
    ///
    /// Returns `None` if the image has no file path or the result is not a
    /// valid URL.
    #[must_use]
    pub fn url_for_size(&self, size: &str, config: &impl ImageConfig) -> Option<Url> {
        let path = self.file_path.as_deref()?;
        Url::parse(&format!("{}{size}{path}", config.image_base_url())).ok()
    }

    /// Resolves the size variant closest to `target` pixels along
    /// `dimension` and builds its URL.
    ///
    /// Returns `None` if no size token matches or the image has no file
    /// path.
    #[must_use]
    pub fn url_for_target(
        &self,
        target: u32,
        dimension: ImageDimension,
        config: &impl ImageConfig,
    ) -> Option<Url> {
        let size = closest_size(target, config.image_sizes(self.image_type), dimension)?;
        self.url_for_size(size, config)
    }
}
