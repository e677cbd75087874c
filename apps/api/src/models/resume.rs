//! Resume document model: the read-only input of every pagination run.
//!
//! Field names follow the camelCase JSON produced by the editor. Sections are
//! never mutated by the pagination core; splitting derives new sections via
//! [`Section::slice`].

use std::ops::Range;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::layout::PageLayoutDefinition;

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDocument {
    #[serde(default)]
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub layout: Vec<PageLayoutDefinition>,
    #[serde(default)]
    pub footer_type: FooterType,
    /// Default footer reservation in cm, used when a page definition has no override.
    #[serde(default)]
    pub footer_margin: f64,
    #[serde(default)]
    pub page_margins: PageMargins,
    #[serde(default)]
    pub colors: Colors,
}

/// Backs the reserved `name` / `personal_info` placements.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub links: Vec<String>,
}

/// Page margins in centimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMargins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for PageMargins {
    fn default() -> Self {
        PageMargins {
            top: 1.5,
            right: 1.5,
            bottom: 1.5,
            left: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Colors {
    pub text: String,
    pub accent: String,
    /// Background of the left column on column layouts. `None` = transparent.
    #[serde(default)]
    pub column_background: Option<String>,
}

impl Default for Colors {
    fn default() -> Self {
        Colors {
            text: "#1f2937".to_string(),
            accent: "#2563eb".to_string(),
            column_background: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FooterType {
    #[default]
    None,
    Simple,
    PageNumber,
    Mountains,
    MountainsRandom,
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Languages,
    Summary,
    #[default]
    #[serde(other)]
    Custom,
}

impl SectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Skills => "skills",
            SectionKind::Projects => "projects",
            SectionKind::Certifications => "certifications",
            SectionKind::Languages => "languages",
            SectionKind::Summary => "summary",
            SectionKind::Custom => "custom",
        }
    }
}

/// A named, typed content block.
///
/// `items` holds heterogeneous entry records; `categories` is only meaningful
/// for [`SectionKind::Skills`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: SectionKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Item>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<SkillCategory>,
}

/// One entry of a section (experience, education, ...). Kept as raw JSON so
/// the renderer can pick whatever fields its template needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item(pub Value);

impl Item {
    pub fn field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// The bullet list of a complex entry, if present.
    pub fn details(&self) -> Option<&Vec<Value>> {
        self.0.get("details").and_then(Value::as_array)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillCategory {
    pub name: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl Section {
    /// Skills sections split on categories; everything else on items.
    pub fn uses_categories(&self) -> bool {
        self.kind == SectionKind::Skills && !self.categories.is_empty()
    }

    /// Number of splittable units (items, or categories for skills).
    pub fn unit_count(&self) -> usize {
        if self.uses_categories() {
            self.categories.len()
        } else {
            self.items.len()
        }
    }

    /// A section may be cut into chunks only when it has at least two units
    /// and is a complex section: skill categories, or items carrying a
    /// `details` array. Simple lists are always kept whole.
    pub fn is_splittable(&self) -> bool {
        if self.unit_count() < 2 {
            return false;
        }
        self.uses_categories() || self.items.iter().any(|item| item.details().is_some())
    }

    /// Derives a new section holding only the units in `range`.
    ///
    /// Panics if `range` is out of bounds; callers iterate over `0..unit_count()`.
    pub fn slice(&self, range: Range<usize>) -> Section {
        let mut derived = Section {
            id: self.id.clone(),
            title: self.title.clone(),
            kind: self.kind,
            items: Vec::new(),
            categories: Vec::new(),
        };
        if self.uses_categories() {
            derived.categories = self.categories[range].to_vec();
        } else {
            derived.items = self.items[range].to_vec();
        }
        derived
    }
}
