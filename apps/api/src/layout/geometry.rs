//! Physical page geometry and per-definition height budgets.
//!
//! The base capacity is an empirically tuned, conservative figure: A4 height
//! minus top/bottom margins, a worst-case footer reservation and a safety
//! margin for CSS spacing that isolated measurement does not capture. It is
//! configuration, not a derived constant.

use serde::{Deserialize, Serialize};

use crate::models::layout::PageLayoutDefinition;
use crate::models::resume::PageMargins;

pub const A4_WIDTH_CM: f64 = 21.0;
pub const A4_HEIGHT_CM: f64 = 29.7;
pub const DEFAULT_PAGE_CAPACITY_CM: f64 = 22.0;

/// Page dimensions shared by every layout definition of a build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageGeometry {
    pub page_width_cm: f64,
    pub page_height_cm: f64,
    /// Content height budget before footer and padding reservations.
    pub base_capacity_cm: f64,
    pub column_gap_cm: f64,
    /// Share of the content width given to the left column (0.0 – 1.0).
    pub left_column_fraction: f64,
}

/// Returns A4 geometry with the given base capacity.
pub fn default_page_geometry(base_capacity_cm: f64) -> PageGeometry {
    PageGeometry {
        page_width_cm: A4_WIDTH_CM,
        page_height_cm: A4_HEIGHT_CM,
        base_capacity_cm,
        column_gap_cm: 0.6,
        left_column_fraction: 0.35,
    }
}

/// Height budget of one page of a layout definition.
///
/// Every page's running height starts at `padding_cm`, so the space available
/// to content on an empty page is `capacity_cm - padding_cm`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageBudget {
    pub capacity_cm: f64,
    pub padding_cm: f64,
}

impl PageBudget {
    pub fn content_capacity_cm(&self) -> f64 {
        (self.capacity_cm - self.padding_cm).max(0.0)
    }
}

impl PageGeometry {
    /// Width available to whole-page rows.
    pub fn content_width_cm(&self, margins: &PageMargins) -> f64 {
        (self.page_width_cm - margins.left - margins.right).max(0.0)
    }

    /// `(left, right)` column widths.
    pub fn column_widths_cm(&self, margins: &PageMargins) -> (f64, f64) {
        let usable = (self.content_width_cm(margins) - self.column_gap_cm).max(0.0);
        let fraction = self.left_column_fraction.clamp(0.0, 1.0);
        let left = usable * fraction;
        (left, usable - left)
    }

    /// `capacity = base − footer reservation`; the definition's own
    /// `footerMargin` wins over the document default.
    pub fn budget(&self, definition: &PageLayoutDefinition, default_footer_margin: f64) -> PageBudget {
        let footer = definition.footer_margin.unwrap_or(default_footer_margin);
        PageBudget {
            capacity_cm: self.base_capacity_cm - footer.max(0.0),
            padding_cm: definition.padding.max(0.0),
        }
    }
}
