//! Document types for the store capability.
//!
//! Entities cross the store boundary as flat JSON field maps. Each domain
//! module owns an explicit typed mapping to and from [`Document`]; nothing
//! in the core reads loosely-typed payloads directly.

use serde_json::Value;

/// A document's fields as stored: a JSON object without its id.
pub type Document = serde_json::Map<String, Value>;

/// A document returned from a query, paired with its id.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    /// Document id within its collection.
    pub id: String,
    /// The stored fields.
    pub fields: Document,
}

/// A document returned from a proximity query, annotated with its
/// great-circle distance from the query center.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoDocument {
    /// Document id within its collection.
    pub id: String,
    /// The stored fields.
    pub fields: Document,
    /// Distance from the query center in kilometers (unrounded).
    pub distance_km: f64,
}

/// Sort direction for ordered queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest value first.
    Ascending,
    /// Largest value first.
    Descending,
}

impl SortDirection {
    /// Converts to string representation for diagnostics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    /// Parses from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(Self::Ascending),
            "desc" => Some(Self::Descending),
            _ => None,
        }
    }
}
