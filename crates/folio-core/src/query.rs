//! Query projection builder.
//!
//! Builds typed, parameterized read requests against the store. A built
//! [`ProjectedQuery`] is a plain value: deterministic for identical
//! inputs, comparable and hashable, which is what makes equality-keyed
//! caching of results sound.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{EngineError, Result};
use crate::schema::{self, CREATED_AT, EntitySchema};

/// Comparison operator of a predicate. Predicates are conjunctive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Eq,
    In,
}

/// A predicate value. Deliberately narrower than `serde_json::Value` so
/// the whole query stays `Eq + Hash`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PredicateValue {
    Str(String),
    Int(i64),
    Bool(bool),
    List(Vec<PredicateValue>),
}

impl PredicateValue {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            PredicateValue::Str(s) => serde_json::Value::String(s.clone()),
            PredicateValue::Int(n) => serde_json::Value::from(*n),
            PredicateValue::Bool(b) => serde_json::Value::Bool(*b),
            PredicateValue::List(items) => {
                serde_json::Value::Array(items.iter().map(PredicateValue::to_json).collect())
            }
        }
    }
}

impl From<&str> for PredicateValue {
    fn from(s: &str) -> Self {
        PredicateValue::Str(s.to_owned())
    }
}

impl From<String> for PredicateValue {
    fn from(s: String) -> Self {
        PredicateValue::Str(s)
    }
}

impl From<i64> for PredicateValue {
    fn from(n: i64) -> Self {
        PredicateValue::Int(n)
    }
}

impl From<bool> for PredicateValue {
    fn from(b: bool) -> Self {
        PredicateValue::Bool(b)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Predicate {
    pub field: String,
    pub op: Op,
    pub value: PredicateValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    Asc,
    #[default]
    Desc,
}

impl Direction {
    fn as_groq(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ordering {
    pub field: String,
    pub direction: Direction,
}

impl Default for Ordering {
    /// Creation time, newest first.
    fn default() -> Self {
        Self {
            field: CREATED_AT.to_owned(),
            direction: Direction::Desc,
        }
    }
}

/// A typed, parameterized read request. Construct via [`QueryBuilder`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectedQuery {
    pub entity_kind: String,
    pub predicates: Vec<Predicate>,
    pub ordering: Ordering,
    /// Explicit projection, if any. Always a superset of the entity's
    /// reference-bearing fields; `None` projects every declared field.
    pub projection: Option<BTreeSet<String>>,
}

const EMPTY_SCHEMA: EntitySchema = EntitySchema {
    kind: "",
    fields: &[],
};

impl ProjectedQuery {
    fn entity(&self) -> &'static EntitySchema {
        // the builder validated the kind, so this cannot fail afterwards
        schema::entity(&self.entity_kind).unwrap_or(&EMPTY_SCHEMA)
    }

    /// The fields the result documents must carry: the explicit
    /// projection, or every declared field of the entity kind.
    ///
    /// The store client uses this to materialize absent optional fields
    /// as explicit nulls.
    pub fn effective_fields(&self) -> Vec<&str> {
        match &self.projection {
            Some(fields) => fields.iter().map(String::as_str).collect(),
            None => self.entity().field_names().collect(),
        }
    }

    /// Emit the parameterized query string and its parameter map.
    ///
    /// Output is deterministic: predicates in declaration order,
    /// projection fields in sorted order, every value passed as a `$`
    /// parameter rather than spliced into the text.
    pub fn to_groq(&self) -> (String, BTreeMap<String, serde_json::Value>) {
        let mut params = BTreeMap::new();
        let mut clauses = vec![format!("_type == ${}", TYPE_PARAM)];
        params.insert(
            TYPE_PARAM.to_owned(),
            serde_json::Value::String(self.entity_kind.clone()),
        );

        for (i, pred) in self.predicates.iter().enumerate() {
            let param = format!("p{i}");
            let clause = match (pred.op, &pred.value) {
                (Op::Eq, _) => format!("{} == ${param}", groq_field(&pred.field)),
                // membership of the field's value in a provided list
                (Op::In, PredicateValue::List(_)) => {
                    format!("{} in ${param}", groq_field(&pred.field))
                }
                // membership of a provided scalar in the field's array
                (Op::In, _) => format!("${param} in {}", groq_field(&pred.field)),
            };
            clauses.push(clause);
            params.insert(param, pred.value.to_json());
        }

        let mut projection: Vec<String> = vec!["_id".into(), "_type".into(), "_createdAt".into()];
        projection.extend(self.effective_fields().iter().map(|f| (*f).to_owned()));

        let query = format!(
            "*[{}] | order({} {}){{{}}}",
            clauses.join(" && "),
            groq_field(&self.ordering.field),
            self.ordering.direction.as_groq(),
            projection.join(", "),
        );
        (query, params)
    }
}

const TYPE_PARAM: &str = "entityKind";

fn groq_field(name: &str) -> &str {
    match name {
        CREATED_AT => "_createdAt",
        other => other,
    }
}

/// Builder for [`ProjectedQuery`]. Pure; `build` validates every
/// referenced field against the entity schema.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    entity_kind: String,
    predicates: Vec<Predicate>,
    ordering: Option<Ordering>,
    projection: Option<BTreeSet<String>>,
}

impl QueryBuilder {
    pub fn new(entity_kind: impl Into<String>) -> Self {
        Self {
            entity_kind: entity_kind.into(),
            ..Self::default()
        }
    }

    pub fn filter_eq(mut self, field: impl Into<String>, value: impl Into<PredicateValue>) -> Self {
        self.predicates.push(Predicate {
            field: field.into(),
            op: Op::Eq,
            value: value.into(),
        });
        self
    }

    pub fn filter_in(mut self, field: impl Into<String>, value: impl Into<PredicateValue>) -> Self {
        self.predicates.push(Predicate {
            field: field.into(),
            op: Op::In,
            value: value.into(),
        });
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.ordering = Some(Ordering {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn project<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Validate and build.
    ///
    /// Fails with [`EngineError::InvalidField`] when a filter, ordering,
    /// or projection references a field the entity kind does not
    /// declare. An explicit projection is widened to include the
    /// entity's reference-bearing fields so resolution always has what
    /// it needs.
    pub fn build(self) -> Result<ProjectedQuery> {
        if self.entity_kind.is_empty() {
            return Err(EngineError::UnknownEntityKind(String::new()));
        }
        let entity = schema::entity(&self.entity_kind)?;

        for pred in &self.predicates {
            if !entity.declares(&pred.field) {
                return Err(EngineError::invalid_field(entity.kind, &pred.field));
            }
        }

        let ordering = self.ordering.unwrap_or_default();
        if !entity.is_sortable(&ordering.field) {
            return Err(EngineError::invalid_field(entity.kind, &ordering.field));
        }

        let projection = match self.projection {
            None => None,
            Some(mut fields) => {
                for field in &fields {
                    if !entity.declares(field) {
                        return Err(EngineError::invalid_field(entity.kind, field));
                    }
                }
                fields.extend(entity.reference_bearing_fields().map(str::to_owned));
                Some(fields)
            }
        };

        Ok(ProjectedQuery {
            entity_kind: self.entity_kind,
            predicates: self.predicates,
            ordering,
            projection,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_inputs_build_identical_queries() {
        let build = || {
            QueryBuilder::new("project")
                .filter_eq("category", "iut")
                .order_by(CREATED_AT, Direction::Desc)
                .build()
                .unwrap()
        };
        let a = build();
        let b = build();
        assert_eq!(a, b);
        assert_eq!(a.to_groq(), b.to_groq());
    }

    #[test]
    fn undeclared_filter_field_is_rejected() {
        let err = QueryBuilder::new("project")
            .filter_eq("flavour", "vanilla")
            .build()
            .unwrap_err();
        assert_eq!(err, EngineError::invalid_field("project", "flavour"));
    }

    #[test]
    fn undeclared_ordering_field_is_rejected() {
        let err = QueryBuilder::new("landing")
            .order_by("popularity", Direction::Asc)
            .build()
            .unwrap_err();
        assert_eq!(err, EngineError::invalid_field("landing", "popularity"));
    }

    #[test]
    fn non_sortable_field_is_rejected_for_ordering() {
        let err = QueryBuilder::new("project")
            .order_by("slug", Direction::Asc)
            .build()
            .unwrap_err();
        assert_eq!(err, EngineError::invalid_field("project", "slug"));
    }

    #[test]
    fn explicit_projection_includes_reference_bearing_fields() {
        let q = QueryBuilder::new("project")
            .project(["name", "slug"])
            .build()
            .unwrap();
        let projection = q.projection.as_ref().unwrap();
        for field in ["name", "slug", "cover", "logo", "gallery"] {
            assert!(projection.contains(field), "missing {field}");
        }
    }

    #[test]
    fn projection_of_undeclared_field_is_rejected() {
        let err = QueryBuilder::new("project")
            .project(["name", "favoriteColor"])
            .build()
            .unwrap_err();
        assert_eq!(err, EngineError::invalid_field("project", "favoriteColor"));
    }

    #[test]
    fn default_ordering_is_created_at_descending() {
        let q = QueryBuilder::new("project").build().unwrap();
        assert_eq!(q.ordering, Ordering::default());
        let (groq, _) = q.to_groq();
        assert!(groq.contains("| order(_createdAt desc)"), "{groq}");
    }

    #[test]
    fn groq_emission_is_parameterized() {
        let q = QueryBuilder::new("project")
            .filter_eq("category", "iut")
            .filter_in("skills", "AC34.01")
            .build()
            .unwrap();
        let (groq, params) = q.to_groq();
        assert!(groq.starts_with("*[_type == $entityKind && category == $p0 && $p1 in skills]"));
        assert_eq!(params["entityKind"], "project");
        assert_eq!(params["p0"], "iut");
        assert_eq!(params["p1"], "AC34.01");
        // values never spliced into the text
        assert!(!groq.contains("iut"));
    }

    #[test]
    fn in_with_list_tests_field_membership_in_list() {
        let q = QueryBuilder::new("project")
            .filter_in(
                "category",
                PredicateValue::List(vec!["iut".into(), "alternance".into()]),
            )
            .build()
            .unwrap();
        let (groq, params) = q.to_groq();
        assert!(groq.contains("category in $p0"), "{groq}");
        assert_eq!(params["p0"], serde_json::json!(["iut", "alternance"]));
    }

    #[test]
    fn unknown_entity_kind_is_rejected() {
        let err = QueryBuilder::new("carousel").build().unwrap_err();
        assert_eq!(err, EngineError::UnknownEntityKind("carousel".into()));
    }
}
