//! Content type registry.
//!
//! Maps raw, resolved documents into the closed set of
//! [`DomainRecord`] variants. Dispatch is an exhaustive match over
//! [`EntityKind`]; adding a kind means one new arm, not modifying the
//! existing ones. Narrowing checks structural shape only (required
//! fields present, kinds matching), never business semantics.

use chrono::NaiveDate;
use folio_doc_types::{ContentTree, Document, FieldValue, ResolvedAsset};

use crate::descriptor::ProjectContext;
use crate::error::{EngineError, Result};
use crate::records::{
    Category, DomainRecord, Experience, GalleryImage, LandingRecord, ProfileRecord, ProjectRecord,
};

/// The closed, enumerable set of entity kinds the registry narrows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Profile,
    Landing,
    Project,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Profile => "profile",
            EntityKind::Landing => "landing",
            EntityKind::Project => "project",
        }
    }
}

/// Narrow a resolved document into its domain record.
///
/// Fails with [`EngineError::SchemaMismatch`] when the document's kind
/// does not match, and [`EngineError::MissingRequiredField`] naming the
/// first absent required field. Optional fields default rather than
/// erroring.
pub fn narrow(document: &Document, expected: EntityKind) -> Result<DomainRecord> {
    if document.kind != expected.as_str() {
        return Err(EngineError::SchemaMismatch {
            expected: expected.as_str().to_owned(),
            found: document.kind.clone(),
        });
    }

    match expected {
        EntityKind::Profile => narrow_profile(document).map(DomainRecord::Profile),
        EntityKind::Landing => narrow_landing(document).map(DomainRecord::Landing),
        EntityKind::Project => narrow_project(document).map(DomainRecord::Project),
    }
}

fn narrow_profile(doc: &Document) -> Result<ProfileRecord> {
    Ok(ProfileRecord {
        id: doc.id.clone(),
        full_name: required_str(doc, "fullName")?,
        title: required_str(doc, "title")?,
        email: required_str(doc, "email")?,
        portrait: optional_asset(doc, "portrait"),
        short_bio: optional_str(doc, "shortBio"),
        location: optional_str(doc, "location"),
        bio: optional_content(doc, "bio"),
        cv_url: optional_str(doc, "cv"),
        skills: str_list(doc, "skills"),
        experiences: experiences(doc),
        created_at: doc.created_at,
    })
}

fn narrow_landing(doc: &Document) -> Result<LandingRecord> {
    Ok(LandingRecord {
        id: doc.id.clone(),
        title: required_str(doc, "title")?,
        subtitle: optional_str(doc, "subtitle"),
        body: optional_content(doc, "body"),
        category: optional_str(doc, "category").map(|c| Category::parse(&c)),
        company: optional_str(doc, "company"),
        company_logo: optional_asset(doc, "companyLogo"),
        role: optional_str(doc, "role"),
        period: optional_str(doc, "period"),
        slider: image_list(doc, "slider"),
        created_at: doc.created_at,
    })
}

fn narrow_project(doc: &Document) -> Result<ProjectRecord> {
    Ok(ProjectRecord {
        id: doc.id.clone(),
        name: required_str(doc, "name")?,
        slug: required_str(doc, "slug")?,
        category: Category::parse(&required_str(doc, "category")?),
        skills: str_list(doc, "skills"),
        context: optional_str(doc, "context").map(|c| ProjectContext::parse(&c)),
        duration: optional_str(doc, "duration"),
        period: optional_str(doc, "period"),
        tagline: optional_str(doc, "tagline"),
        project_url: optional_str(doc, "projectUrl"),
        description: optional_content(doc, "description"),
        approach: optional_content(doc, "approach"),
        outcomes: optional_content(doc, "outcomes"),
        resources: str_list(doc, "resources"),
        cover: optional_asset(doc, "cover"),
        logo: optional_asset(doc, "logo"),
        gallery: image_list(doc, "gallery"),
        created_at: doc.created_at,
    })
}

fn required_str(doc: &Document, name: &str) -> Result<String> {
    match doc.field(name) {
        Some(FieldValue::String(s)) if !s.is_empty() => Ok(s.clone()),
        _ => Err(EngineError::MissingRequiredField(name.to_owned())),
    }
}

fn optional_str(doc: &Document, name: &str) -> Option<String> {
    doc.field(name).and_then(FieldValue::as_str).map(str::to_owned)
}

fn optional_content(doc: &Document, name: &str) -> ContentTree {
    doc.field(name)
        .and_then(FieldValue::as_content)
        .cloned()
        .unwrap_or_default()
}

fn optional_asset(doc: &Document, name: &str) -> Option<ResolvedAsset> {
    doc.field(name).and_then(FieldValue::as_asset).cloned()
}

fn str_list(doc: &Document, name: &str) -> Vec<String> {
    doc.field(name)
        .and_then(FieldValue::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(FieldValue::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

fn experiences(doc: &Document) -> Vec<Experience> {
    let Some(items) = doc.field("experiences").and_then(FieldValue::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let FieldValue::Object(fields) = item else {
                return None;
            };
            let get = |name: &str| fields.get(name).and_then(FieldValue::as_str);
            // malformed entries are skipped, not fatal: one bad array
            // element must not sink the whole profile
            let (Some(company), Some(role)) = (get("company"), get("role")) else {
                tracing::debug!("skipping experience entry without company/role");
                return None;
            };
            Some(Experience {
                company: company.to_owned(),
                role: role.to_owned(),
                logo_url: get("logo").map(str::to_owned),
                url: get("url").map(str::to_owned),
                description: get("description").map(str::to_owned),
                start_date: get("startDate").and_then(parse_date),
                end_date: get("endDate").and_then(parse_date),
                ongoing: matches!(fields.get("ongoing"), Some(FieldValue::Bool(true))),
            })
        })
        .collect()
}

fn image_list(doc: &Document, name: &str) -> Vec<GalleryImage> {
    let Some(items) = doc.field(name).and_then(FieldValue::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            FieldValue::Asset(asset) => Some(GalleryImage {
                image: asset.clone(),
                caption: None,
            }),
            FieldValue::Object(fields) => {
                let image = fields.get("image").and_then(FieldValue::as_asset)?.clone();
                let caption = fields
                    .get("caption")
                    .and_then(FieldValue::as_str)
                    .map(str::to_owned);
                Some(GalleryImage { image, caption })
            }
            _ => None,
        })
        .collect()
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    // store dates arrive either as plain dates or full timestamps
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| chrono::DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}
