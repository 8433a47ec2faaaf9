use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnchorError {
    #[error("annotation id must not be empty")]
    EmptyId,
    #[error("cannot attach an annotation to an empty selection")]
    EmptySelection,
}

/// Opaque, externally assigned identifier joining an anchor to its
/// annotation content.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AnnotationId(String);

impl AnnotationId {
    pub fn new(id: impl Into<String>) -> Result<Self, AnchorError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(AnchorError::EmptyId);
        }
        Ok(Self(id))
    }

    /// Fresh random id for a newly created annotation.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AnnotationId {
    type Error = AnchorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for AnnotationId {
    type Error = AnchorError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AnnotationId> for String {
    fn from(id: AnnotationId) -> Self {
        id.0
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// The inline anchor mark: a single annotation id attached to a text span.
///
/// A mark read from a portable representation without a usable id is kept
/// as an *inert* mark (`id == None`). Inert marks survive round trips but
/// are ignored by the range index and everything derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawAnchorMark", into = "RawAnchorMark")]
pub struct AnchorMark {
    id: Option<AnnotationId>,
}

impl AnchorMark {
    pub fn new(id: AnnotationId) -> Self {
        Self { id: Some(id) }
    }

    pub fn inert() -> Self {
        Self { id: None }
    }

    /// Build from an untrusted attribute value, demoting it to inert when
    /// it is not a valid id.
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value.map(AnnotationId::new) {
            Some(Ok(id)) => Self::new(id),
            Some(Err(_)) => {
                log::warn!("anchor mark with empty id demoted to inert");
                Self::inert()
            }
            None => {
                log::warn!("anchor mark without id demoted to inert");
                Self::inert()
            }
        }
    }

    pub fn id(&self) -> Option<&AnnotationId> {
        self.id.as_ref()
    }

    pub fn is_inert(&self) -> bool {
        self.id.is_none()
    }
}

// Wire shape: {"attrs": {"id": "..."}}. The id is read as an arbitrary JSON
// value so a malformed one degrades instead of failing the whole document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawAnchorMark {
    #[serde(default)]
    attrs: RawAnchorAttrs,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawAnchorAttrs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<serde_json::Value>,
}

impl From<RawAnchorMark> for AnchorMark {
    fn from(raw: RawAnchorMark) -> Self {
        match raw.attrs.id {
            Some(serde_json::Value::String(s)) => Self::from_attribute(Some(&s)),
            Some(other) => {
                log::warn!("anchor mark with non-string id {other} demoted to inert");
                Self::inert()
            }
            None => Self::from_attribute(None),
        }
    }
}

impl From<AnchorMark> for RawAnchorMark {
    fn from(mark: AnchorMark) -> Self {
        RawAnchorMark {
            attrs: RawAnchorAttrs {
                id: mark.id.map(|id| serde_json::Value::String(id.into())),
            },
        }
    }
}
