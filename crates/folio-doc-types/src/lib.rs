/*
 * lib.rs
 *
 * Document and rich-text AST type definitions for Folio.
 *
 * This crate provides pure data type definitions for documents fetched
 * from the content store and for the Portable-Text-style rich text tree
 * embedded in them. It has minimal dependencies (serde, indexmap, chrono)
 * and can be used by any crate that needs to work with store documents
 * without pulling in the engine or the HTTP client.
 */

pub mod asset;
pub mod content;
pub mod document;

// Re-export commonly used types at the crate root
pub use asset::{AssetId, ResolvedAsset, TransformParams};
pub use content::{Block, BlockStyle, ContentTree, ListItem, ListKind, MarkDef, MarkKind, Span};
pub use document::{Document, FieldValue, Fields, RefKind, Reference, Unresolved};
