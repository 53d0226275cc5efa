//! Declared entity schemas.
//!
//! The store is schemaless on the wire; this module is the engine's
//! authority on which fields each entity kind declares, which of them are
//! required, which can be sorted on, and which carry references. The
//! query builder validates against it and the registry narrows with it.

use crate::error::{EngineError, Result};

/// Declaration of a single field of an entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    pub sortable: bool,
    /// The field may contain references that resolution must reach, so
    /// the query builder always includes it in explicit projections.
    pub reference_bearing: bool,
}

impl FieldSpec {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            required: false,
            sortable: false,
            reference_bearing: false,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub const fn reference_bearing(mut self) -> Self {
        self.reference_bearing = true;
        self
    }
}

/// The declared shape of one entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySchema {
    pub kind: &'static str,
    pub fields: &'static [FieldSpec],
}

/// Store-maintained creation timestamp, sortable on every entity kind.
pub const CREATED_AT: &str = "createdAt";

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn declares(&self, name: &str) -> bool {
        name == CREATED_AT || self.field(name).is_some()
    }

    pub fn is_sortable(&self, name: &str) -> bool {
        name == CREATED_AT || self.field(name).map(|f| f.sortable).unwrap_or(false)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().filter(|f| f.required).map(|f| f.name)
    }

    pub fn reference_bearing_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields
            .iter()
            .filter(|f| f.reference_bearing)
            .map(|f| f.name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }
}

const PROFILE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("fullName").required(),
    FieldSpec::new("title").required(),
    FieldSpec::new("email").required(),
    FieldSpec::new("portrait").reference_bearing(),
    FieldSpec::new("shortBio"),
    FieldSpec::new("location"),
    FieldSpec::new("bio"),
    FieldSpec::new("cv").reference_bearing(),
    FieldSpec::new("skills"),
    FieldSpec::new("experiences").reference_bearing(),
];

const LANDING_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("title").required(),
    FieldSpec::new("subtitle"),
    FieldSpec::new("body"),
    FieldSpec::new("category").sortable(),
    FieldSpec::new("company"),
    FieldSpec::new("companyLogo").reference_bearing(),
    FieldSpec::new("role"),
    FieldSpec::new("period"),
    FieldSpec::new("slider").reference_bearing(),
];

const PROJECT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("name").required().sortable(),
    FieldSpec::new("slug").required(),
    FieldSpec::new("category").required().sortable(),
    FieldSpec::new("skills"),
    FieldSpec::new("context"),
    FieldSpec::new("duration"),
    FieldSpec::new("period"),
    FieldSpec::new("tagline"),
    FieldSpec::new("projectUrl"),
    FieldSpec::new("description"),
    FieldSpec::new("approach"),
    FieldSpec::new("outcomes"),
    FieldSpec::new("resources"),
    FieldSpec::new("cover").reference_bearing(),
    FieldSpec::new("logo").reference_bearing(),
    FieldSpec::new("gallery").reference_bearing(),
];

const ENTITIES: &[EntitySchema] = &[
    EntitySchema {
        kind: "profile",
        fields: PROFILE_FIELDS,
    },
    EntitySchema {
        kind: "landing",
        fields: LANDING_FIELDS,
    },
    EntitySchema {
        kind: "project",
        fields: PROJECT_FIELDS,
    },
];

/// Look up the schema for an entity kind.
pub fn entity(kind: &str) -> Result<&'static EntitySchema> {
    ENTITIES
        .iter()
        .find(|e| e.kind == kind)
        .ok_or_else(|| EngineError::UnknownEntityKind(kind.to_owned()))
}
