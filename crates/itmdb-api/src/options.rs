//! Movie fetch options.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use anyhow::bail;

/// Flag set selecting which optional response sections are requested and
/// populated.
///
/// Sections whose flag is unset are never parsed, even when the payload
/// happens to contain them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FetchOptions(u8);

impl FetchOptions {
    /// No sections.
    pub const NONE: Self = Self(0);
    /// Basic movie information.
    pub const BASIC: Self = Self(1 << 1);
    /// Cast and crew (`casts`).
    pub const CASTS: Self = Self(1 << 2);
    /// Keywords (`keywords`).
    pub const KEYWORDS: Self = Self(1 << 3);
    /// Posters and backdrops (`images`).
    pub const IMAGES: Self = Self(1 << 4);
    /// Every section.
    pub const ALL: Self = Self(Self::BASIC.0 | Self::CASTS.0 | Self::KEYWORDS.0 | Self::IMAGES.0);

    /// Appended sections and their TMDb `append_to_response` names.
    const APPENDED: [(Self, &'static str); 3] = [
        (Self::CASTS, "casts"),
        (Self::KEYWORDS, "keywords"),
        (Self::IMAGES, "images"),
    ];

    /// Returns `true` if every flag in `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if no flag is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Raw bit value.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Builds the `append_to_response` query value, or `None` when no
    /// appended section is requested.
    #[must_use]
    pub fn append_to_response(self) -> Option<String> {
        let parts: Vec<&str> = Self::APPENDED
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(","))
        }
    }
}

impl BitOr for FetchOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for FetchOptions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for FetchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.contains(Self::BASIC) {
            names.push("basic");
        }
        for (flag, name) in Self::APPENDED {
            if self.contains(flag) {
                names.push(name);
            }
        }
        f.write_str(&names.join(","))
    }
}

impl FromStr for FetchOptions {
    type Err = anyhow::Error;

    /// Parses a comma-separated list such as `basic,casts` or `all`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut options = Self::NONE;
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            options |= match part {
                "basic" => Self::BASIC,
                "casts" | "cast" => Self::CASTS,
                "keywords" => Self::KEYWORDS,
                "images" => Self::IMAGES,
                "all" => Self::ALL,
                other => bail!("unknown fetch option: {other}"),
            };
        }
        Ok(options)
    }
}
