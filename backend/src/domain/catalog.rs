//! Health catalogs: allergies, diseases, and special conditions.
//!
//! Catalog rows are seeded reference data. The domain only reads them and
//! manages which rows a user is associated with.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

/// The three parallel user-to-catalog relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    Allergy,
    Disease,
    SpecialCondition,
}

impl CatalogKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 3] = [Self::Allergy, Self::Disease, Self::SpecialCondition];

    /// Singular label used in logs and error messages.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Allergy => "allergy",
            Self::Disease => "disease",
            Self::SpecialCondition => "special condition",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a catalog id is not a positive integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("catalog id must be a positive integer (got {value})")]
pub struct CatalogIdError {
    value: i64,
}

/// Primary key of a catalog row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CatalogId(i32);

impl CatalogId {
    /// Validate a raw identifier; catalog keys start at 1 and fit in `i32`.
    ///
    /// # Examples
    /// ```
    /// use allergy_scan_backend::domain::CatalogId;
    ///
    /// assert_eq!(CatalogId::new(3).map(CatalogId::get), Ok(3));
    /// assert!(CatalogId::new(0).is_err());
    /// ```
    pub fn new(value: i64) -> Result<Self, CatalogIdError> {
        match i32::try_from(value) {
            Ok(id) if id > 0 => Ok(Self(id)),
            _ => Err(CatalogIdError { value }),
        }
    }

    /// Wrap a key read from storage.
    pub const fn from_db(value: i32) -> Self {
        Self(value)
    }

    /// Raw key for persistence adapters.
    pub const fn get(self) -> i32 {
        self.0
    }
}

/// A catalog row: identifier plus machine and display names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub id: CatalogId,
    pub name: String,
    pub display_name: String,
}

/// Complete desired association set for one relation.
///
/// Duplicates are collapsed (first occurrence wins) so the replace operation
/// never trips the association primary key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSelection(Vec<CatalogId>);

impl CatalogSelection {
    /// Build a selection from ids in caller order.
    pub fn new(ids: impl IntoIterator<Item = CatalogId>) -> Self {
        let mut seen = HashSet::new();
        Self(ids.into_iter().filter(|id| seen.insert(*id)).collect())
    }

    /// An empty selection; replacing with it clears the relation.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> &[CatalogId] {
        &self.0
    }

    /// True when the relation should be cleared.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
