//! Newtype wrapper for area identifiers.
//!
//! An `AreaId` names the formatting object whose areas may be referenced from
//! elsewhere in the document (page-number citations, internal links, bookmarks).
//! The same type is used for the defining side ("id") and the referencing side
//! ("idref").

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// An identifier of a referenceable area.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AreaId(Arc<str>);

impl AreaId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for AreaId {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for AreaId {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl From<&AreaId> for AreaId {
    fn from(id: &AreaId) -> Self {
        id.clone()
    }
}

impl AsRef<str> for AreaId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lets maps keyed by `AreaId` be queried with a plain `&str`.
impl Borrow<str> for AreaId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_id_creation() {
        let id1 = AreaId::new("section-1");
        let id2 = AreaId::from("section-1");
        let id3 = AreaId::from(String::from("section-1"));

        assert_eq!(id1, id2);
        assert_eq!(id2, id3);
        assert_eq!(id1.as_str(), "section-1");
    }

    #[test]
    fn test_hash_map_lookup_by_str() {
        use std::collections::HashMap;

        let mut locations = HashMap::new();
        locations.insert(AreaId::new("section-1"), 42);
        locations.insert(AreaId::new("section-2"), 100);

        assert_eq!(locations.get("section-1"), Some(&42));
        assert_eq!(locations.get("missing"), None);
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&AreaId::new("toc")).unwrap();
        assert_eq!(json, "\"toc\"");
        let back: AreaId = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_str(), "toc");
    }
}
