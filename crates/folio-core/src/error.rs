//! Error types for folio-core

use thiserror::Error;

/// Structural and input errors surfaced by the engine.
///
/// These are caller bugs or permanent mismatches, never retried.
/// Degraded conditions (unresolved references, unknown block or mark
/// kinds) are absorbed inside the engine and do not appear here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("field '{field}' is not declared for entity kind '{entity}'")]
    InvalidField { entity: String, field: String },

    #[error("unknown entity kind: {0}")]
    UnknownEntityKind(String),

    #[error("expected document of kind '{expected}', found '{found}'")]
    SchemaMismatch { expected: String, found: String },

    #[error("missing required field: {0}")]
    MissingRequiredField(String),
}

impl EngineError {
    pub fn invalid_field(entity: impl Into<String>, field: impl Into<String>) -> Self {
        Self::InvalidField {
            entity: entity.into(),
            field: field.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
