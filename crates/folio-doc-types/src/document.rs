/*
 * document.rs
 */

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::asset::{ResolvedAsset, TransformParams};
use crate::content::ContentTree;

/// Ordered field map of a document.
///
/// Insertion order is preserved so that a document round-trips through
/// serde without reshuffling its fields.
pub type Fields = IndexMap<String, FieldValue>;

/// An immutable structured record fetched from the content store.
///
/// The engine never mutates a `Document` in place; resolution and
/// narrowing produce new derived values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_type")]
    pub kind: String,
    /// Store-assigned creation timestamp. Used by the default query
    /// ordering; absent on embedded snapshots.
    #[serde(rename = "_createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            created_at: None,
            fields: Fields::new(),
        }
    }

    /// Look up a field by name.
    ///
    /// Declared-but-absent optional fields are materialized as
    /// [`FieldValue::Null`] by the store client, so `None` here means the
    /// field was never part of the projection.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

/// The value of a single document field.
///
/// Untagged on the wire: the map-shaped variants are distinguished by
/// their marker keys (`$ref`, `$unresolved`, `url`, `blocks`), so they
/// must stay declared before the generic `Object` catch-all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    String(String),
    Reference(Reference),
    Unresolved(Unresolved),
    Asset(ResolvedAsset),
    Content(ContentTree),
    Array(Vec<FieldValue>),
    Object(Fields),
    /// Explicit absence. A projected optional field the store omitted is
    /// materialized as `Null`, never dropped from the field map.
    Null,
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_content(&self) -> Option<&ContentTree> {
        match self {
            FieldValue::Content(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_asset(&self) -> Option<&ResolvedAsset> {
        match self {
            FieldValue::Asset(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

/// What a [`Reference`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefKind {
    Asset,
    Document,
}

/// A pointer field requiring resolution before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "$ref")]
    pub target_id: String,
    /// Declared target kind. Stores that omit it rely on the asset id
    /// naming convention; see [`Reference::effective_kind`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<RefKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<TransformParams>,
    /// Alternative text carried alongside asset references.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl Reference {
    pub fn to_asset(target_id: impl Into<String>) -> Self {
        Self {
            target_id: target_id.into(),
            kind: Some(RefKind::Asset),
            params: None,
            alt: None,
        }
    }

    pub fn to_document(target_id: impl Into<String>) -> Self {
        Self {
            target_id: target_id.into(),
            kind: Some(RefKind::Document),
            params: None,
            alt: None,
        }
    }

    /// Declared kind, falling back to the asset id naming convention
    /// (`image-…`, `file-…`) when the wire omitted it.
    pub fn effective_kind(&self) -> RefKind {
        match self.kind {
            Some(kind) => kind,
            None => {
                if self.target_id.starts_with("image-") || self.target_id.starts_with("file-") {
                    RefKind::Asset
                } else {
                    RefKind::Document
                }
            }
        }
    }
}

/// Terminal marker for a reference whose target could not be found.
///
/// A degraded value, not an error: renderers see it and degrade
/// gracefully instead of failing the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unresolved {
    #[serde(rename = "$unresolved")]
    pub target_id: String,
}
