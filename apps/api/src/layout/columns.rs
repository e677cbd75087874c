//! Column Co-Packer: paginates left/right columns against one page budget.
//!
//! Columns-only: each column is packed on its own and the layout runs for
//! `max(left pages, right pages)`; the shorter column is empty on trailing
//! pages.
//!
//! Hybrid (columns + whole-page rows): the columns stay on the first page,
//! unpaginated. Whole-page content is packed with the taller column's height
//! already taken from the first page, and continues from page 2 onward.

use serde::Serialize;
use tracing::debug;

use crate::layout::context::PaginationContext;
use crate::layout::geometry::PageBudget;
use crate::layout::packer::{pack_pages, pack_pages_with_offset};
use crate::layout::placement::Placement;
use crate::layout::PaginationError;

/// Column content of one output page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColumnPage {
    pub left: Vec<Placement>,
    pub right: Vec<Placement>,
}

/// Content of one output page of a hybrid definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HybridPage {
    pub left: Vec<Placement>,
    pub right: Vec<Placement>,
    pub whole_page: Vec<Placement>,
}

/// Column widths a definition is measured at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnWidths {
    pub left_cm: f64,
    pub right_cm: f64,
}

/// Pairs page groups by index; a column with fewer groups is empty on the
/// remaining pages.
pub fn reconcile(left: Vec<Vec<Placement>>, right: Vec<Vec<Placement>>) -> Vec<ColumnPage> {
    let count = left.len().max(right.len());
    let mut left = left.into_iter();
    let mut right = right.into_iter();
    (0..count)
        .map(|_| ColumnPage {
            left: left.next().unwrap_or_default(),
            right: right.next().unwrap_or_default(),
        })
        .collect()
}

pub async fn pack_columns(
    ctx: &PaginationContext<'_>,
    left: &[Placement],
    right: &[Placement],
    budget: PageBudget,
    widths: ColumnWidths,
) -> Result<Vec<ColumnPage>, PaginationError> {
    let left_measurements = ctx.measure_placements(left, widths.left_cm).await?;
    let left_groups = pack_pages(ctx, left, &left_measurements, budget, widths.left_cm).await?;

    let right_measurements = ctx.measure_placements(right, widths.right_cm).await?;
    let right_groups = pack_pages(ctx, right, &right_measurements, budget, widths.right_cm).await?;

    debug!(
        left_pages = left_groups.len(),
        right_pages = right_groups.len(),
        "Columns packed"
    );
    Ok(reconcile(left_groups, right_groups))
}

pub async fn pack_hybrid(
    ctx: &PaginationContext<'_>,
    left: &[Placement],
    right: &[Placement],
    whole_page: &[Placement],
    budget: PageBudget,
    widths: ColumnWidths,
    whole_width_cm: f64,
) -> Result<Vec<HybridPage>, PaginationError> {
    let left_height = ctx.measure_stack(left, widths.left_cm).await?;
    let right_height = ctx.measure_stack(right, widths.right_cm).await?;
    let column_height = left_height.max(right_height);

    let measurements = ctx.measure_placements(whole_page, whole_width_cm).await?;
    let groups = pack_pages_with_offset(
        ctx,
        whole_page,
        &measurements,
        budget,
        whole_width_cm,
        column_height,
    )
    .await?;

    debug!(
        column_height_cm = column_height,
        whole_page_pages = groups.len(),
        "Hybrid layout packed"
    );

    let mut pages: Vec<HybridPage> = groups
        .into_iter()
        .map(|whole_page| HybridPage {
            whole_page,
            ..Default::default()
        })
        .collect();
    if let Some(first) = pages.first_mut() {
        first.left = left.to_vec();
        first.right = right.to_vec();
    }
    Ok(pages)
}
