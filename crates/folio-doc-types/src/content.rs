/*
 * content.rs
 *
 * The rich-text AST: an ordered, finite, acyclic sequence of blocks,
 * each holding spans of text with mark references. Style and mark kinds
 * are open-ended on the wire; here they are closed enums with an explicit
 * `Unknown` fallback variant carrying the raw tag, so the fallback path
 * in the renderer is enforced by exhaustive pattern matching.
 */

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// An ordered sequence of rich-text blocks embedded in a document field.
///
/// The `blocks` key is required on the wire: it is what distinguishes a
/// content tree from a plain object field in the untagged field-value
/// representation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContentTree {
    pub blocks: Vec<Block>,
}

impl ContentTree {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Look up a mark definition by id anywhere in the tree.
    ///
    /// Definitions are carried per block on the wire but scoped to the
    /// whole tree: a span may reference a definition declared on a
    /// sibling block.
    pub fn mark_def(&self, id: &str) -> Option<&MarkDef> {
        self.blocks
            .iter()
            .flat_map(|b| b.marks.iter())
            .find(|m| m.id == id)
    }
}

/// A single rich-text block: a style tag, an optional list-item wrapper,
/// the spans it contains, and the mark definitions it declares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub style: BlockStyle,
    #[serde(rename = "listItem", default, skip_serializing_if = "Option::is_none")]
    pub list_item: Option<ListItem>,
    #[serde(default)]
    pub spans: Vec<Span>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<MarkDef>,
}

impl Block {
    pub fn paragraph(spans: Vec<Span>) -> Self {
        Self {
            style: BlockStyle::Normal,
            list_item: None,
            spans,
            marks: Vec::new(),
        }
    }
}

/// Block style tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum BlockStyle {
    #[default]
    Normal,
    /// Heading level 1..=6; tags outside that range parse to `Unknown`.
    Heading(u8),
    Blockquote,
    /// Unrecognized style, carrying the raw tag.
    Unknown(String),
}

impl BlockStyle {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "normal" => BlockStyle::Normal,
            "blockquote" => BlockStyle::Blockquote,
            "h1" => BlockStyle::Heading(1),
            "h2" => BlockStyle::Heading(2),
            "h3" => BlockStyle::Heading(3),
            "h4" => BlockStyle::Heading(4),
            "h5" => BlockStyle::Heading(5),
            "h6" => BlockStyle::Heading(6),
            other => BlockStyle::Unknown(other.to_owned()),
        }
    }

    pub fn as_tag(&self) -> String {
        match self {
            BlockStyle::Normal => "normal".to_owned(),
            BlockStyle::Blockquote => "blockquote".to_owned(),
            BlockStyle::Heading(level) => format!("h{level}"),
            BlockStyle::Unknown(raw) => raw.clone(),
        }
    }
}

impl Serialize for BlockStyle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_tag())
    }
}

impl<'de> Deserialize<'de> for BlockStyle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(BlockStyle::parse(&tag))
    }
}

/// List membership of a block: the list kind and nesting depth.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListItem {
    pub kind: ListKind,
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListKind {
    Bullet,
    Number,
    Unknown(String),
}

impl ListKind {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "bullet" => ListKind::Bullet,
            "number" => ListKind::Number,
            other => ListKind::Unknown(other.to_owned()),
        }
    }

    pub fn as_tag(&self) -> &str {
        match self {
            ListKind::Bullet => "bullet",
            ListKind::Number => "number",
            ListKind::Unknown(raw) => raw,
        }
    }
}

impl Serialize for ListKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_tag())
    }
}

impl<'de> Deserialize<'de> for ListKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(ListKind::parse(&tag))
    }
}

/// A run of text with the marks applied to it, referenced by id.
///
/// Marks apply left-to-right in list order; duplicate references are
/// idempotent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    #[serde(rename = "markRefs", default, skip_serializing_if = "Vec::is_empty")]
    pub mark_refs: Vec<String>,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mark_refs: Vec::new(),
        }
    }

    pub fn marked(text: impl Into<String>, refs: &[&str]) -> Self {
        Self {
            text: text.into(),
            mark_refs: refs.iter().map(|r| (*r).to_owned()).collect(),
        }
    }
}

/// A mark definition, referenced by id from spans in the same tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkDef {
    pub id: String,
    pub kind: MarkKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MarkKind {
    Link,
    Emphasis,
    Strong,
    Code,
    Unknown(String),
}

impl MarkKind {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "link" => MarkKind::Link,
            // both spellings appear in stored content
            "emphasis" | "em" => MarkKind::Emphasis,
            "strong" => MarkKind::Strong,
            "code" => MarkKind::Code,
            other => MarkKind::Unknown(other.to_owned()),
        }
    }

    pub fn as_tag(&self) -> &str {
        match self {
            MarkKind::Link => "link",
            MarkKind::Emphasis => "emphasis",
            MarkKind::Strong => "strong",
            MarkKind::Code => "code",
            MarkKind::Unknown(raw) => raw,
        }
    }
}

impl Serialize for MarkKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_tag())
    }
}

impl<'de> Deserialize<'de> for MarkKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(MarkKind::parse(&tag))
    }
}
