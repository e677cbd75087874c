//! Page layout definitions as stored in the resume document.

use serde::{Deserialize, Serialize};

use crate::models::resume::Section;

/// A placement of a section within a layout slot.
///
/// Either a bare title (`"Education"`, `"Education:wide"`) or an object that
/// may carry the section data directly, bypassing the lookup by title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionRef {
    Title(String),
    Inline {
        title: String,
        #[serde(default)]
        data: Option<Section>,
        #[serde(default, rename = "templateVariant")]
        template_variant: Option<String>,
    },
}

/// One entry of the layout configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLayoutDefinition {
    #[serde(default)]
    pub left: Vec<SectionRef>,
    #[serde(default)]
    pub right: Vec<SectionRef>,
    #[serde(default)]
    pub whole_page: Vec<SectionRef>,
    #[serde(default)]
    pub auto_page_break: bool,
    /// Vertical padding reservation in cm, held on every page of this definition.
    #[serde(default)]
    pub padding: f64,
    /// Overrides the document-level footer reservation for this definition.
    #[serde(default)]
    pub footer_margin: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LayoutMode {
    Columns,
    WholePage,
    Hybrid,
    Empty,
}

impl PageLayoutDefinition {
    pub fn has_columns(&self) -> bool {
        !self.left.is_empty() || !self.right.is_empty()
    }

    pub fn mode(&self) -> LayoutMode {
        match (self.has_columns(), !self.whole_page.is_empty()) {
            (true, true) => LayoutMode::Hybrid,
            (true, false) => LayoutMode::Columns,
            (false, true) => LayoutMode::WholePage,
            (false, false) => LayoutMode::Empty,
        }
    }
}
