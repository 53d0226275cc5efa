//! Typed domain records, the output of narrowing.
//!
//! Every optional field has a defined default after narrowing (empty
//! tree, empty vec, `None`) so nothing downstream has to handle holes.

use chrono::{DateTime, NaiveDate, Utc};
use folio_doc_types::{ContentTree, ResolvedAsset};

use crate::descriptor::ProjectContext;

/// The closed set of domain record variants.
///
/// Adding a new entity kind means adding one variant here and one
/// mapping entry in the registry, not touching existing arms.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainRecord {
    Profile(ProfileRecord),
    Landing(LandingRecord),
    Project(ProjectRecord),
}

/// Content category, shared by projects and landing pages.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Iut,
    Alternance,
    PersoPro,
    Unknown(String),
}

impl Category {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "iut" => Category::Iut,
            "alternance" => Category::Alternance,
            "perso-pro" => Category::PersoPro,
            other => Category::Unknown(other.to_owned()),
        }
    }

    pub fn as_tag(&self) -> &str {
        match self {
            Category::Iut => "iut",
            Category::Alternance => "alternance",
            Category::PersoPro => "perso-pro",
            Category::Unknown(raw) => raw,
        }
    }
}

/// The site owner's profile.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileRecord {
    pub id: String,
    pub full_name: String,
    pub title: String,
    pub email: String,
    pub portrait: Option<ResolvedAsset>,
    pub short_bio: Option<String>,
    pub location: Option<String>,
    pub bio: ContentTree,
    pub cv_url: Option<String>,
    pub skills: Vec<String>,
    pub experiences: Vec<Experience>,
    pub created_at: Option<DateTime<Utc>>,
}

/// One professional experience entry on a profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Experience {
    pub company: String,
    pub role: String,
    pub logo_url: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub ongoing: bool,
}

/// A category landing page.
///
/// The work-study landing additionally carries a company block and a
/// slider gallery; those fields stay empty on the other categories.
#[derive(Debug, Clone, PartialEq)]
pub struct LandingRecord {
    pub id: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub body: ContentTree,
    pub category: Option<Category>,
    pub company: Option<String>,
    pub company_logo: Option<ResolvedAsset>,
    pub role: Option<String>,
    pub period: Option<String>,
    pub slider: Vec<GalleryImage>,
    pub created_at: Option<DateTime<Utc>>,
}

/// A portfolio project.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRecord {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub category: Category,
    pub skills: Vec<String>,
    pub context: Option<ProjectContext>,
    pub duration: Option<String>,
    pub period: Option<String>,
    pub tagline: Option<String>,
    pub project_url: Option<String>,
    pub description: ContentTree,
    pub approach: ContentTree,
    pub outcomes: ContentTree,
    pub resources: Vec<String>,
    pub cover: Option<ResolvedAsset>,
    pub logo: Option<ResolvedAsset>,
    pub gallery: Vec<GalleryImage>,
    pub created_at: Option<DateTime<Utc>>,
}

/// One image of a project gallery.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryImage {
    pub image: ResolvedAsset,
    pub caption: Option<String>,
}
