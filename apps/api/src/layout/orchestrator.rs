//! Layout Orchestrator: drives one pagination run over every page layout
//! definition, in order.
//!
//! Per definition: `autoPageBreak: false` puts everything on exactly one page,
//! overflow or not. Otherwise dispatch on the mode (columns, whole-page,
//! hybrid) to the packers. Definitions are independent: nothing measured or
//! decided for one carries into the next.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::layout::assemble::{assemble_pages, PaginatedDocument};
use crate::layout::columns::{pack_columns, pack_hybrid, ColumnWidths};
use crate::layout::context::PaginationContext;
use crate::layout::geometry::{PageBudget, PageGeometry};
use crate::layout::measure::MeasurementProvider;
use crate::layout::packer::pack_pages;
use crate::layout::placement::{is_continuation_title, resolve_refs, Placement};
use crate::layout::PaginationError;
use crate::models::layout::{LayoutMode, PageLayoutDefinition};
use crate::models::resume::ResumeDocument;
use crate::render::SectionRenderer;

/// Placements of one output page, before markup assembly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedPage {
    pub definition_index: usize,
    pub mode: LayoutMode,
    pub padding_cm: f64,
    pub left: Vec<Placement>,
    pub right: Vec<Placement>,
    pub whole_page: Vec<Placement>,
}

/// Runs the packers for every definition and returns the page plan.
pub async fn plan_pages(
    ctx: &PaginationContext<'_>,
    geometry: &PageGeometry,
) -> Result<Vec<PlannedPage>, PaginationError> {
    let document = ctx.document();
    for section in &document.sections {
        if is_continuation_title(&section.title) {
            warn!(
                title = %section.title,
                "Section title has the continuation shape; chunk titles may collide"
            );
        }
    }

    let whole_width = geometry.content_width_cm(&document.page_margins);
    let (left_cm, right_cm) = geometry.column_widths_cm(&document.page_margins);
    let widths = ColumnWidths { left_cm, right_cm };

    let mut plan = Vec::new();
    for (index, definition) in document.layout.iter().enumerate() {
        let budget = geometry.budget(definition, document.footer_margin);
        validate_definition(index, definition, budget)?;

        let pages = plan_definition(ctx, index, definition, budget, widths, whole_width).await?;
        debug!(definition = index, pages = pages.len(), "Definition paginated");
        plan.extend(pages);
    }
    Ok(plan)
}

async fn plan_definition(
    ctx: &PaginationContext<'_>,
    index: usize,
    definition: &PageLayoutDefinition,
    budget: PageBudget,
    widths: ColumnWidths,
    whole_width_cm: f64,
) -> Result<Vec<PlannedPage>, PaginationError> {
    let mode = definition.mode();
    let left = resolve_refs(&definition.left);
    let right = resolve_refs(&definition.right);
    let whole_page = resolve_refs(&definition.whole_page);
    let page = |left: Vec<Placement>, right: Vec<Placement>, whole_page: Vec<Placement>| {
        PlannedPage {
            definition_index: index,
            mode,
            padding_cm: budget.padding_cm,
            left,
            right,
            whole_page,
        }
    };

    if mode == LayoutMode::Empty {
        debug!(definition = index, "Empty layout definition skipped");
        return Ok(Vec::new());
    }

    if !definition.auto_page_break {
        return Ok(vec![page(left, right, whole_page)]);
    }

    let pages: Vec<PlannedPage> = match mode {
        LayoutMode::Columns => pack_columns(ctx, &left, &right, budget, widths)
            .await?
            .into_iter()
            .map(|p| page(p.left, p.right, Vec::new()))
            .collect(),
        LayoutMode::WholePage => {
            let measurements = ctx.measure_placements(&whole_page, whole_width_cm).await?;
            pack_pages(ctx, &whole_page, &measurements, budget, whole_width_cm)
                .await?
                .into_iter()
                .map(|group| page(Vec::new(), Vec::new(), group))
                .collect()
        }
        LayoutMode::Hybrid => {
            pack_hybrid(ctx, &left, &right, &whole_page, budget, widths, whole_width_cm)
                .await?
                .into_iter()
                .map(|p| page(p.left, p.right, p.whole_page))
                .collect()
        }
        LayoutMode::Empty => Vec::new(),
    };
    Ok(pages)
}

fn validate_definition(
    index: usize,
    definition: &PageLayoutDefinition,
    budget: PageBudget,
) -> Result<(), PaginationError> {
    let invalid = |reason: &str| PaginationError::InvalidLayout {
        index,
        reason: reason.to_string(),
    };

    if !definition.padding.is_finite() {
        return Err(invalid("padding must be a finite number"));
    }
    if definition.footer_margin.is_some_and(|m| !m.is_finite()) {
        return Err(invalid("footerMargin must be a finite number"));
    }
    if definition.auto_page_break && budget.content_capacity_cm() <= 0.0 {
        return Err(invalid("padding and footer margin leave no room for content"));
    }
    Ok(())
}

/// Full pagination run: plan every definition, then assemble page markup.
///
/// `footer_seed` only drives decorative footers; page assignments never
/// depend on it.
pub async fn paginate_document(
    document: &ResumeDocument,
    geometry: &PageGeometry,
    renderer: &dyn SectionRenderer,
    measurer: &dyn MeasurementProvider,
    footer_seed: u64,
) -> Result<PaginatedDocument, PaginationError> {
    info!(
        definitions = document.layout.len(),
        sections = document.sections.len(),
        "Pagination run started"
    );
    let ctx = PaginationContext::new(document, renderer, measurer);
    let plan = plan_pages(&ctx, geometry).await?;
    let pages = assemble_pages(&ctx, plan, footer_seed);
    info!(
        pages = pages.len(),
        measurements = ctx.measure_calls(),
        "Pagination run finished"
    );
    Ok(PaginatedDocument::new(pages))
}

/// Plan-only run, for inspecting page breaks without markup.
pub async fn plan_document(
    document: &ResumeDocument,
    geometry: &PageGeometry,
    renderer: &dyn SectionRenderer,
    measurer: &dyn MeasurementProvider,
) -> Result<Vec<PlannedPage>, PaginationError> {
    let ctx = PaginationContext::new(document, renderer, measurer);
    plan_pages(&ctx, geometry).await
}
