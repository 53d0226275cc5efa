//! Presentation descriptors for enumerated content codes.
//!
//! One mapping from enum variant to descriptor record, defined once and
//! consumed by presentation code, instead of per-call-site lookup
//! tables.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Presentation metadata for an enumerated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    pub label: &'static str,
    pub icon_id: &'static str,
    pub style_class: &'static str,
}

/// The setting a project was carried out in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProjectContext {
    Sae,
    Resource,
    Company,
    Personal,
    Freelance,
    Unknown(String),
}

impl ProjectContext {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "sae" => ProjectContext::Sae,
            "ressource" => ProjectContext::Resource,
            "entreprise" => ProjectContext::Company,
            "personnel" => ProjectContext::Personal,
            "freelance" => ProjectContext::Freelance,
            other => ProjectContext::Unknown(other.to_owned()),
        }
    }

    pub fn as_tag(&self) -> &str {
        match self {
            ProjectContext::Sae => "sae",
            ProjectContext::Resource => "ressource",
            ProjectContext::Company => "entreprise",
            ProjectContext::Personal => "personnel",
            ProjectContext::Freelance => "freelance",
            ProjectContext::Unknown(raw) => raw,
        }
    }

    /// Presentation descriptor; `None` for unrecognized tags, which the
    /// caller renders with the raw tag instead.
    pub fn descriptor(&self) -> Option<&'static Descriptor> {
        let descriptor = match self {
            ProjectContext::Sae => &Descriptor {
                label: "SAE (Situation d'Apprentissage et d'Évaluation)",
                icon_id: "academic",
                style_class: "context-sae",
            },
            ProjectContext::Resource => &Descriptor {
                label: "Ressource pédagogique",
                icon_id: "book",
                style_class: "context-resource",
            },
            ProjectContext::Company => &Descriptor {
                label: "Mission en entreprise",
                icon_id: "briefcase",
                style_class: "context-company",
            },
            ProjectContext::Personal => &Descriptor {
                label: "Projet personnel",
                icon_id: "user",
                style_class: "context-personal",
            },
            ProjectContext::Freelance => &Descriptor {
                label: "Freelance/Auto-entrepreneur",
                icon_id: "contract",
                style_class: "context-freelance",
            },
            ProjectContext::Unknown(_) => return None,
        };
        Some(descriptor)
    }
}

/// Presentation metadata for a declared skill code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillDescriptor {
    pub code: &'static str,
    pub description: &'static str,
    pub icon_id: &'static str,
    pub style_class: &'static str,
}

const DEV_CLASS: &str = "skill-dev";
const MGMT_CLASS: &str = "skill-mgmt";

static SKILLS: Lazy<HashMap<&'static str, SkillDescriptor>> = Lazy::new(|| {
    [
        (
            "AC34.01",
            "Développer à l'aide d'un framework de développement côté client",
            "code",
            DEV_CLASS,
        ),
        (
            "AC34.02",
            "Développer à l'aide d'un framework de développement côté serveur",
            "code",
            DEV_CLASS,
        ),
        (
            "AC34.03",
            "Développer des dispositifs interactifs sophistiqués",
            "code",
            DEV_CLASS,
        ),
        (
            "AC34.04",
            "Concevoir et développer des composants logiciels, plugins ou extensions",
            "code",
            DEV_CLASS,
        ),
        (
            "AC34.05",
            "Maîtriser l'hébergement et le déploiement d'applications",
            "code",
            DEV_CLASS,
        ),
        (
            "AC35.01",
            "Piloter un produit, un service ou une équipe",
            "lightbulb",
            MGMT_CLASS,
        ),
        (
            "AC35.02",
            "Maîtriser la qualité en projet web ou multimédia",
            "lightbulb",
            MGMT_CLASS,
        ),
        (
            "AC35.03",
            "Concevoir un projet d'entreprise innovante",
            "lightbulb",
            MGMT_CLASS,
        ),
        (
            "AC35.04",
            "Défendre un projet de manière convaincante",
            "lightbulb",
            MGMT_CLASS,
        ),
    ]
    .into_iter()
    .map(|(code, description, icon_id, style_class)| {
        (
            code,
            SkillDescriptor {
                code,
                description,
                icon_id,
                style_class,
            },
        )
    })
    .collect()
});

/// Look up the descriptor for a skill code. Undeclared codes yield
/// `None`; presentation drops them rather than inventing metadata.
pub fn skill_descriptor(code: &str) -> Option<&'static SkillDescriptor> {
    SKILLS.get(code)
}
