//! Reference resolution.
//!
//! Replaces every reference-typed field of a document with its resolved
//! value: asset references become [`ResolvedAsset`]s with a
//! transform-applied delivery URL, document references become embedded
//! snapshots of the target's fields. Resolution is a pure function of
//! the document and the [`ResolverContext`]: no I/O, no mutation of the
//! input, no dependence on sibling order, so call sites may resolve
//! fields in any order or in parallel.

use std::collections::{BTreeSet, HashMap};

use folio_doc_types::{
    AssetId, Document, FieldValue, Fields, RefKind, Reference, ResolvedAsset, TransformParams,
    Unresolved,
};

/// Builds transform-applied delivery URLs for asset references.
#[derive(Debug, Clone)]
pub struct AssetUrlBuilder {
    base_url: String,
    project_id: String,
    dataset: String,
    /// Applied when a reference carries no params of its own.
    default_params: TransformParams,
}

impl AssetUrlBuilder {
    pub fn new(
        base_url: impl Into<String>,
        project_id: impl Into<String>,
        dataset: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            project_id: project_id.into(),
            dataset: dataset.into(),
            default_params: TransformParams {
                format: Some("auto".to_owned()),
                fit: Some("max".to_owned()),
                width: None,
                height: None,
            },
        }
    }

    pub fn with_default_params(mut self, params: TransformParams) -> Self {
        self.default_params = params;
        self
    }

    /// Build the delivery URL for an asset reference, or `None` when the
    /// asset id does not follow the store's naming convention.
    pub fn url_for(&self, reference: &Reference) -> Option<String> {
        let asset = AssetId::parse(&reference.target_id)?;
        let mut url = format!(
            "{}/images/{}/{}/{}-{}x{}.{}",
            self.base_url,
            self.project_id,
            self.dataset,
            asset.hash,
            asset.width,
            asset.height,
            asset.format,
        );

        let params = reference.params.as_ref().unwrap_or(&self.default_params);
        let mut pairs: Vec<(&str, String)> = Vec::new();
        if let Some(format) = &params.format {
            // "auto" turns on delivery-side format negotiation; anything
            // else pins the output format
            if format == "auto" {
                pairs.push(("auto", "format".to_owned()));
            } else {
                pairs.push(("fm", format.clone()));
            }
        }
        if let Some(fit) = &params.fit {
            pairs.push(("fit", fit.clone()));
        }
        if let Some(width) = params.width {
            pairs.push(("w", width.to_string()));
        }
        if let Some(height) = params.height {
            pairs.push(("h", height.to_string()));
        }
        for (i, (key, value)) in pairs.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        Some(url)
    }
}

/// Everything one `resolve` call needs: the depth bound, the asset URL
/// builder, and the arena of target documents fetched once for the call.
///
/// Snapshots are immutable for the lifetime of the context. Nothing is
/// shared across calls; a reference cycle in the source graph simply
/// yields independent embedded copies truncated at the depth bound.
#[derive(Debug, Clone)]
pub struct ResolverContext {
    pub max_depth: usize,
    pub assets: AssetUrlBuilder,
    pub snapshots: HashMap<String, Document>,
}

/// Default depth bound, matching the deepest nesting the schema allows.
pub const DEFAULT_MAX_DEPTH: usize = 4;

impl ResolverContext {
    pub fn new(assets: AssetUrlBuilder) -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            assets,
            snapshots: HashMap::new(),
        }
    }

    pub fn with_snapshots(mut self, snapshots: HashMap<String, Document>) -> Self {
        self.snapshots = snapshots;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Resolve every reference in `document`, producing a derived document.
/// The input is never mutated. Missing targets degrade to
/// [`FieldValue::Unresolved`]; this function does not fail.
pub fn resolve(document: &Document, ctx: &ResolverContext) -> Document {
    Document {
        id: document.id.clone(),
        kind: document.kind.clone(),
        created_at: document.created_at,
        fields: resolve_fields(&document.fields, ctx, ctx.max_depth),
    }
}

fn resolve_fields(fields: &Fields, ctx: &ResolverContext, depth: usize) -> Fields {
    fields
        .iter()
        .map(|(name, value)| (name.clone(), resolve_value(value, ctx, depth)))
        .collect()
}

fn resolve_value(value: &FieldValue, ctx: &ResolverContext, depth: usize) -> FieldValue {
    match value {
        FieldValue::Reference(reference) => resolve_reference(reference, ctx, depth),
        FieldValue::Array(items) => FieldValue::Array(
            items
                .iter()
                .map(|item| resolve_value(item, ctx, depth))
                .collect(),
        ),
        FieldValue::Object(fields) => FieldValue::Object(resolve_fields(fields, ctx, depth)),
        other => other.clone(),
    }
}

fn resolve_reference(reference: &Reference, ctx: &ResolverContext, depth: usize) -> FieldValue {
    match reference.effective_kind() {
        RefKind::Asset => match ctx.assets.url_for(reference) {
            Some(url) => FieldValue::Asset(ResolvedAsset {
                url,
                alt: reference.alt.clone(),
                transform: reference.params.clone(),
            }),
            None => {
                tracing::debug!(target_id = %reference.target_id, "malformed asset id");
                unresolved(reference)
            }
        },
        RefKind::Document => {
            if depth == 0 {
                tracing::debug!(target_id = %reference.target_id, "depth bound reached");
                return unresolved(reference);
            }
            match ctx.snapshots.get(&reference.target_id) {
                Some(target) => {
                    // embed the target's projected fields, resolving its
                    // own references one level deeper
                    let mut embedded = Fields::new();
                    embedded.insert(
                        "_id".to_owned(),
                        FieldValue::String(target.id.clone()),
                    );
                    embedded.insert(
                        "_type".to_owned(),
                        FieldValue::String(target.kind.clone()),
                    );
                    for (name, value) in &target.fields {
                        embedded.insert(name.clone(), resolve_value(value, ctx, depth - 1));
                    }
                    FieldValue::Object(embedded)
                }
                None => {
                    tracing::debug!(target_id = %reference.target_id, "reference target not found");
                    unresolved(reference)
                }
            }
        }
    }
}

fn unresolved(reference: &Reference) -> FieldValue {
    FieldValue::Unresolved(Unresolved {
        target_id: reference.target_id.clone(),
    })
}

/// Collect the ids of all document references a document declares,
/// including inside arrays and nested objects. The store client uses
/// this to fetch the snapshot arena in one request.
pub fn document_ref_ids(document: &Document) -> BTreeSet<String> {
    let mut ids = BTreeSet::new();
    for value in document.fields.values() {
        collect_ref_ids(value, &mut ids);
    }
    ids
}

fn collect_ref_ids(value: &FieldValue, ids: &mut BTreeSet<String>) {
    match value {
        FieldValue::Reference(r) if r.effective_kind() == RefKind::Document => {
            ids.insert(r.target_id.clone());
        }
        FieldValue::Array(items) => {
            for item in items {
                collect_ref_ids(item, ids);
            }
        }
        FieldValue::Object(fields) => {
            for nested in fields.values() {
                collect_ref_ids(nested, ids);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_doc_types::Fields;

    fn test_assets() -> AssetUrlBuilder {
        AssetUrlBuilder::new("https://cdn.example.com", "p1", "production")
    }

    fn doc_with_field(name: &str, value: FieldValue) -> Document {
        let mut doc = Document::new("d1", "project");
        doc.fields.insert(name.to_owned(), value);
        doc
    }

    #[test]
    fn asset_reference_resolves_to_transform_applied_url() {
        let ctx = ResolverContext::new(test_assets());
        let doc = doc_with_field(
            "cover",
            FieldValue::Reference(Reference {
                target_id: "image-abc123-1200x800-webp".into(),
                kind: Some(RefKind::Asset),
                params: None,
                alt: Some("cover image".into()),
            }),
        );

        let resolved = resolve(&doc, &ctx);
        let asset = resolved.field("cover").unwrap().as_asset().unwrap();
        assert_eq!(
            asset.url,
            "https://cdn.example.com/images/p1/production/abc123-1200x800.webp?auto=format&fit=max"
        );
        assert_eq!(asset.alt.as_deref(), Some("cover image"));
        // input untouched
        assert!(matches!(doc.field("cover"), Some(FieldValue::Reference(_))));
    }

    #[test]
    fn explicit_params_override_defaults() {
        let ctx = ResolverContext::new(test_assets());
        let doc = doc_with_field(
            "cover",
            FieldValue::Reference(Reference {
                target_id: "image-abc123-1200x800-webp".into(),
                kind: Some(RefKind::Asset),
                params: Some(TransformParams {
                    format: None,
                    fit: Some("crop".into()),
                    width: Some(640),
                    height: None,
                }),
                alt: None,
            }),
        );

        let resolved = resolve(&doc, &ctx);
        let asset = resolved.field("cover").unwrap().as_asset().unwrap();
        assert!(asset.url.ends_with(".webp?fit=crop&w=640"), "{}", asset.url);
    }

    #[test]
    fn missing_target_degrades_to_unresolved() {
        let ctx = ResolverContext::new(test_assets());
        let doc = doc_with_field(
            "related",
            FieldValue::Reference(Reference::to_document("project-gone")),
        );

        let resolved = resolve(&doc, &ctx);
        assert_eq!(
            resolved.field("related"),
            Some(&FieldValue::Unresolved(Unresolved {
                target_id: "project-gone".into()
            }))
        );
    }

    #[test]
    fn document_reference_embeds_snapshot_fields() {
        let mut target = Document::new("profile-1", "profile");
        target
            .fields
            .insert("fullName".into(), FieldValue::String("Ada".into()));

        let ctx = ResolverContext::new(test_assets())
            .with_snapshots(HashMap::from([("profile-1".to_owned(), target)]));
        let doc = doc_with_field(
            "author",
            FieldValue::Reference(Reference::to_document("profile-1")),
        );

        let resolved = resolve(&doc, &ctx);
        match resolved.field("author").unwrap() {
            FieldValue::Object(fields) => {
                assert_eq!(fields.get("_id"), Some(&FieldValue::String("profile-1".into())));
                assert_eq!(fields.get("fullName"), Some(&FieldValue::String("Ada".into())));
            }
            other => panic!("expected embedded snapshot, got {other:?}"),
        }
    }

    #[test]
    fn cyclic_reference_graph_terminates_with_independent_copies() {
        let mut a = Document::new("a", "project");
        a.fields
            .insert("peer".into(), FieldValue::Reference(Reference::to_document("b")));
        let mut b = Document::new("b", "project");
        b.fields
            .insert("peer".into(), FieldValue::Reference(Reference::to_document("a")));

        let ctx = ResolverContext::new(test_assets())
            .with_max_depth(3)
            .with_snapshots(HashMap::from([
                ("a".to_owned(), a.clone()),
                ("b".to_owned(), b),
            ]));

        // must terminate; the innermost reference degrades to Unresolved
        let resolved = resolve(&a, &ctx);
        let mut value = resolved.field("peer").unwrap();
        let mut hops = 0;
        while let FieldValue::Object(fields) = value {
            value = fields.get("peer").expect("embedded peer field");
            hops += 1;
        }
        assert_eq!(hops, 3);
        assert!(matches!(value, FieldValue::Unresolved(_)));
    }

    #[test]
    fn sibling_field_order_does_not_affect_resolved_values() {
        let mut target = Document::new("profile-1", "profile");
        target
            .fields
            .insert("fullName".into(), FieldValue::String("Ada".into()));
        let ctx = ResolverContext::new(test_assets())
            .with_snapshots(HashMap::from([("profile-1".to_owned(), target)]));

        let cover = FieldValue::Reference(Reference::to_asset("image-abc123-1200x800-webp"));
        let author = FieldValue::Reference(Reference::to_document("profile-1"));
        let name = FieldValue::String("Atlas".into());

        let mut forward = Document::new("d1", "project");
        forward.fields.insert("cover".into(), cover.clone());
        forward.fields.insert("author".into(), author.clone());
        forward.fields.insert("name".into(), name.clone());

        let mut backward = Document::new("d1", "project");
        backward.fields.insert("name".into(), name);
        backward.fields.insert("author".into(), author);
        backward.fields.insert("cover".into(), cover);

        let forward = resolve(&forward, &ctx);
        let backward = resolve(&backward, &ctx);
        for field in ["cover", "author", "name"] {
            assert_eq!(forward.field(field), backward.field(field), "{field}");
        }
    }

    #[test]
    fn resolution_reaches_arrays_and_nested_objects() {
        let ctx = ResolverContext::new(test_assets());
        let mut inner = Fields::new();
        inner.insert(
            "image".into(),
            FieldValue::Reference(Reference::to_asset("image-deadbeef-100x100-png")),
        );
        let doc = doc_with_field(
            "gallery",
            FieldValue::Array(vec![FieldValue::Object(inner)]),
        );

        let resolved = resolve(&doc, &ctx);
        let items = resolved.field("gallery").unwrap().as_array().unwrap();
        match &items[0] {
            FieldValue::Object(fields) => {
                assert!(matches!(fields.get("image"), Some(FieldValue::Asset(_))));
            }
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn collects_document_ref_ids_transitively_through_containers() {
        let mut doc = Document::new("d", "project");
        doc.fields.insert(
            "related".into(),
            FieldValue::Array(vec![
                FieldValue::Reference(Reference::to_document("x")),
                FieldValue::Reference(Reference::to_asset("image-a-1x1-png")),
            ]),
        );
        let mut nested = Fields::new();
        nested.insert(
            "author".into(),
            FieldValue::Reference(Reference::to_document("y")),
        );
        doc.fields.insert("meta".into(), FieldValue::Object(nested));

        let ids = document_ref_ids(&doc);
        assert_eq!(ids, BTreeSet::from(["x".to_owned(), "y".to_owned()]));
    }
}
