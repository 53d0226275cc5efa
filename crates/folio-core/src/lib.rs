//! Content resolution and rendering engine for Folio
//!
//! This crate turns documents fetched from a remote structured-content
//! store into safe, renderable output. The pipeline:
//!
//! - [`QueryBuilder`] builds a typed, parameterized [`ProjectedQuery`]
//!   validated against the declared entity [`schema`]
//! - the store client (the `folio-store` crate) executes it and returns
//!   immutable [`Document`](folio_doc_types::Document) snapshots
//! - [`resolve`](resolve::resolve) replaces embedded references with
//!   resolved assets or document snapshots
//! - [`narrow`](registry::narrow) validates the result into a typed
//!   [`DomainRecord`]
//! - [`render`](render::render) serializes embedded rich-text trees
//!   into presentation nodes, on demand
//!
//! Every operation here is pure: no I/O, no shared mutable state, safe
//! to call concurrently from independent call sites.

pub mod descriptor;
pub mod error;
pub mod html;
pub mod query;
pub mod records;
pub mod registry;
pub mod render;
pub mod resolve;
pub mod schema;

// Re-export commonly used types
pub use descriptor::{Descriptor, ProjectContext, SkillDescriptor, skill_descriptor};
pub use error::{EngineError, Result};
pub use query::{Direction, Op, Ordering, Predicate, PredicateValue, ProjectedQuery, QueryBuilder};
pub use records::{
    Category, DomainRecord, Experience, GalleryImage, LandingRecord, ProfileRecord, ProjectRecord,
};
pub use registry::{EntityKind, narrow};
pub use render::{OutputNode, RenderConfig, render};
pub use resolve::{AssetUrlBuilder, DEFAULT_MAX_DEPTH, ResolverContext, document_ref_ids, resolve};
