use serde::{Deserialize, Serialize};
use std::fmt;

use super::control::ControlKey;

/// Relationship tag carried by a mapping.
///
/// The conventional values are `equivalent`, `partial` and `related`, but any
/// tag found in the source data is kept as-is.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Relationship(String);

impl Relationship {
    pub const EQUIVALENT: &'static str = "equivalent";
    pub const PARTIAL: &'static str = "partial";
    pub const RELATED: &'static str = "related";

    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Build a tag from an optional, already trimmed source field; empty or
    /// absent becomes `related`
    pub fn from_field(field: Option<&str>) -> Self {
        match field {
            Some(tag) if !tag.is_empty() => Self::new(tag),
            _ => Self::default(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_equivalent(&self) -> bool {
        self.0 == Self::EQUIVALENT
    }

    pub fn is_partial(&self) -> bool {
        self.0 == Self::PARTIAL
    }

    pub fn is_related(&self) -> bool {
        self.0 == Self::RELATED
    }

    /// Whether the tag is one of the three conventional values
    pub fn is_conventional(&self) -> bool {
        self.is_equivalent() || self.is_partial() || self.is_related()
    }
}

impl Default for Relationship {
    fn default() -> Self {
        Self::new(Self::RELATED)
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Relationship {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// Directed relationship from a source control to a target control.
///
/// Both ends are referenced by natural key only; a mapping may point at a
/// control that was never loaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    pub source_framework: String,
    pub source_id: String,
    pub target_framework: String,
    pub target_id: String,
    #[serde(default)]
    pub relationship: Relationship,
}

impl Mapping {
    pub fn new(
        source_framework: impl Into<String>,
        source_id: impl Into<String>,
        target_framework: impl Into<String>,
        target_id: impl Into<String>,
        relationship: impl Into<Relationship>,
    ) -> Self {
        Self {
            source_framework: source_framework.into(),
            source_id: source_id.into(),
            target_framework: target_framework.into(),
            target_id: target_id.into(),
            relationship: relationship.into(),
        }
    }

    pub fn source_key(&self) -> ControlKey {
        ControlKey::new(&self.source_framework, &self.source_id)
    }

    pub fn target_key(&self) -> ControlKey {
        ControlKey::new(&self.target_framework, &self.target_id)
    }

    pub fn targets_framework(&self, framework: &str) -> bool {
        self.target_framework == framework
    }
}
