//! Page Packer: greedy assignment of placements to pages.
//!
//! # Rules, in order, per placement
//! - Fits the remaining space → append to the current page.
//! - Splittable (≥ 2 units, complex) → split with `first_page = remaining`,
//!   `full_page = content capacity`, and place the chunks one by one, opening
//!   a new page whenever a chunk does not fit. A split yielding one chunk did
//!   not help and falls through.
//! - Otherwise → close the current page and start a new one with the whole
//!   placement, even if it overflows an empty page.
//!
//! Closing a page resets the running height to the definition's padding.

use tracing::debug;

use crate::layout::context::{Measurements, PaginationContext};
use crate::layout::geometry::PageBudget;
use crate::layout::placement::Placement;
use crate::layout::splitter::{split_section, SplitSpace};
use crate::layout::PaginationError;

/// Tolerance for float comparisons against the page budget.
const FIT_EPSILON_CM: f64 = 1e-9;

/// Running state of the page being filled.
struct PageCursor {
    budget: PageBudget,
    pages: Vec<Vec<Placement>>,
    current: Vec<Placement>,
    height: f64,
    /// Space on the current page already taken by content outside this packer.
    reserved: bool,
}

impl PageCursor {
    fn new(budget: PageBudget, first_page_offset_cm: f64) -> Self {
        PageCursor {
            budget,
            pages: Vec::new(),
            current: Vec::new(),
            height: budget.padding_cm + first_page_offset_cm.max(0.0),
            reserved: first_page_offset_cm > 0.0,
        }
    }

    fn remaining(&self) -> f64 {
        (self.budget.capacity_cm - self.height).max(0.0)
    }

    fn fits(&self, height_cm: f64) -> bool {
        height_cm <= self.remaining() + FIT_EPSILON_CM
    }

    fn is_blank(&self) -> bool {
        self.current.is_empty() && !self.reserved
    }

    fn push(&mut self, placement: Placement, height_cm: f64) {
        self.current.push(placement);
        self.height += height_cm;
    }

    fn close(&mut self) {
        if self.is_blank() {
            return;
        }
        self.pages.push(std::mem::take(&mut self.current));
        self.height = self.budget.padding_cm;
        self.reserved = false;
    }

    fn finish(mut self) -> Vec<Vec<Placement>> {
        self.close();
        if self.pages.is_empty() {
            self.pages.push(Vec::new());
        }
        self.pages
    }
}

/// Packs `placements` into page groups.
///
/// `measurements` is index-aligned with `placements`; a missing entry is an
/// orchestration bug and fails the run. `width_cm` is the width the slot was
/// measured at, reused for any split.
pub async fn pack_pages(
    ctx: &PaginationContext<'_>,
    placements: &[Placement],
    measurements: &Measurements,
    budget: PageBudget,
    width_cm: f64,
) -> Result<Vec<Vec<Placement>>, PaginationError> {
    pack_pages_with_offset(ctx, placements, measurements, budget, width_cm, 0.0).await
}

/// Like [`pack_pages`], with `first_page_offset_cm` of the first page already
/// taken. The first returned group may then be empty when nothing fits beside
/// the reserved content.
pub async fn pack_pages_with_offset(
    ctx: &PaginationContext<'_>,
    placements: &[Placement],
    measurements: &Measurements,
    budget: PageBudget,
    width_cm: f64,
    first_page_offset_cm: f64,
) -> Result<Vec<Vec<Placement>>, PaginationError> {
    let mut cursor = PageCursor::new(budget, first_page_offset_cm);

    for (index, placement) in placements.iter().enumerate() {
        let label = placement.label();
        let height = *measurements
            .get(index)
            .ok_or_else(|| PaginationError::MissingMeasurement {
                title: label.clone(),
            })?;

        if cursor.fits(height) {
            debug!(title = %label, height_cm = height, "Placed on current page");
            cursor.push(placement.clone(), height);
            continue;
        }

        if let Some(section) = ctx.splittable_section(placement) {
            let space = SplitSpace {
                first_page_cm: cursor.remaining(),
                full_page_cm: budget.content_capacity_cm(),
            };
            let chunks = split_section(
                ctx,
                placement.title(),
                &section,
                placement.variant(),
                width_cm,
                space,
            )
            .await?;
            if chunks.len() > 1 {
                for chunk in chunks {
                    let chunk_height = chunk.height_cm;
                    if !cursor.fits(chunk_height) {
                        cursor.close();
                    }
                    debug!(title = %chunk.title, height_cm = chunk_height, "Placed chunk");
                    cursor.push(Placement::Chunk { chunk }, chunk_height);
                }
                continue;
            }
        }

        debug!(title = %label, height_cm = height, "Moved to a new page");
        cursor.close();
        cursor.push(placement.clone(), height);
    }

    Ok(cursor.finish())
}
