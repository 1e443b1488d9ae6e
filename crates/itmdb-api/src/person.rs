//! Cast and crew references.

use serde_json::Value;

use crate::value::{get_string, get_u32, get_u64};

/// Whether a credit is an on-screen role or a crew job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreditKind {
    /// Acting role.
    Cast,
    /// Crew job (director, writer, ...).
    Crew,
}

/// A person credited on a movie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    id: u64,
    name: String,
    kind: CreditKind,
    character: Option<String>,
    job: Option<String>,
    department: Option<String>,
    order: Option<u32>,
    profile_path: Option<String>,
}

impl Person {
    /// Builds a person from one raw credit object.
    ///
    /// Returns `None` if `raw` is not an object or carries no `id`.
    #[must_use]
    pub fn from_raw(raw: &Value, kind: CreditKind) -> Option<Self> {
        let map = raw.as_object()?;
        Some(Self {
            id: get_u64(map, "id")?,
            name: get_string(map, "name").unwrap_or_default(),
            kind,
            character: get_string(map, "character"),
            job: get_string(map, "job"),
            department: get_string(map, "department"),
            order: get_u32(map, "order"),
            profile_path: get_string(map, "profile_path"),
        })
    }

    /// Builds people of one credit kind from a raw array, skipping invalid
    /// entries.
    #[must_use]
    pub fn list_from_raw(raw: &[Value], kind: CreditKind) -> Vec<Self> {
        raw.iter()
            .filter_map(|item| Self::from_raw(item, kind))
            .collect()
    }

    /// TMDb person ID.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cast or crew.
    #[must_use]
    pub const fn kind(&self) -> CreditKind {
        self.kind
    }

    /// Character played (cast only).
    #[must_use]
    pub fn character(&self) -> Option<&str> {
        self.character.as_deref()
    }

    /// Job title (crew only).
    #[must_use]
    pub fn job(&self) -> Option<&str> {
        self.job.as_deref()
    }

    /// Department (crew only).
    #[must_use]
    pub fn department(&self) -> Option<&str> {
        self.department.as_deref()
    }

    /// Billing order (cast only).
    #[must_use]
    pub const fn order(&self) -> Option<u32> {
        self.order
    }

    /// Profile photo path fragment.
    #[must_use]
    pub fn profile_path(&self) -> Option<&str> {
        self.profile_path.as_deref()
    }
}
