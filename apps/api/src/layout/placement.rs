//! Placement keys, chunks and the resolved placements the packers work on.
//!
//! `"Title:variant"` strings are parsed exactly once, at the orchestrator
//! boundary, into a [`SectionKey`]. Nothing deeper in the pipeline re-parses
//! layout strings.

use serde::Serialize;

use crate::models::layout::SectionRef;
use crate::models::resume::Section;

/// Pseudo-titles resolved from the personal info block, never from `sections[]`.
pub const RESERVED_TITLES: [&str; 2] = ["name", "personal_info"];

const CONTINUATION_MARKER: &str = "__continuation_";

/// A parsed section reference: title plus optional template variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SectionKey {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

impl SectionKey {
    /// Parses `"Title"` or `"Title:variant"`. Only the first `:` separates the
    /// variant; a blank variant is treated as none.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(':') {
            Some((title, variant)) => SectionKey {
                title: title.trim().to_string(),
                variant: Some(variant.trim())
                    .filter(|v| !v.is_empty())
                    .map(str::to_string),
            },
            None => SectionKey {
                title: raw.trim().to_string(),
                variant: None,
            },
        }
    }

    pub fn is_reserved(&self) -> bool {
        RESERVED_TITLES.contains(&self.title.as_str())
    }

    /// Canonical `Title[:variant]` form, used as the measurement key.
    pub fn label(&self) -> String {
        match &self.variant {
            Some(variant) => format!("{}:{variant}", self.title),
            None => self.title.clone(),
        }
    }
}

/// `"<title>__continuation_<n>"`, with `n` starting at 1.
pub fn continuation_title(title: &str, n: usize) -> String {
    format!("{title}{CONTINUATION_MARKER}{n}")
}

/// True when a title has the synthesized continuation shape.
pub fn is_continuation_title(title: &str) -> bool {
    title
        .rsplit_once(CONTINUATION_MARKER)
        .is_some_and(|(_, n)| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

/// A derived partial section produced by the item splitter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chunk {
    /// The source title for the first chunk, a continuation title afterwards.
    pub title: String,
    pub source_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    pub section: Section,
    pub is_continuation: bool,
    /// Measured height of this chunk as rendered, in cm.
    pub height_cm: f64,
}

/// One entry of a page: a bare reference, a reference carrying its own data,
/// or a split chunk.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Placement {
    Section { key: SectionKey },
    Inline { key: SectionKey, section: Section },
    Chunk { chunk: Chunk },
}

impl Placement {
    pub fn from_ref(section_ref: &SectionRef) -> Self {
        match section_ref {
            SectionRef::Title(raw) => Placement::Section {
                key: SectionKey::parse(raw),
            },
            SectionRef::Inline {
                title,
                data,
                template_variant,
            } => {
                let mut key = SectionKey::parse(title);
                if let Some(variant) = template_variant.as_deref().filter(|v| !v.is_empty()) {
                    key.variant = Some(variant.to_string());
                }
                match data {
                    Some(section) => Placement::Inline {
                        key,
                        section: section.clone(),
                    },
                    None => Placement::Section { key },
                }
            }
        }
    }

    /// `title[:variant]`, or the chunk title. Used for logging and error reports.
    pub fn label(&self) -> String {
        match self {
            Placement::Section { key } | Placement::Inline { key, .. } => key.label(),
            Placement::Chunk { chunk } => chunk.title.clone(),
        }
    }

    /// Title the layout referenced, without any variant suffix.
    pub fn title(&self) -> &str {
        match self {
            Placement::Section { key } | Placement::Inline { key, .. } => &key.title,
            Placement::Chunk { chunk } => &chunk.source_title,
        }
    }

    pub fn variant(&self) -> Option<&str> {
        match self {
            Placement::Section { key } | Placement::Inline { key, .. } => key.variant.as_deref(),
            Placement::Chunk { chunk } => chunk.variant.as_deref(),
        }
    }
}

pub fn resolve_refs(refs: &[SectionRef]) -> Vec<Placement> {
    refs.iter().map(Placement::from_ref).collect()
}
