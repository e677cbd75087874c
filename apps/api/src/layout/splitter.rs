//! Item Splitter: cuts one oversized section into ordered chunks.
//!
//! # Algorithm
//! 1. Measure every unit alone. The table is a planning aid only: rendered
//!    height is not additive (headers, margins, connectors), so acceptance
//!    always re-measures the cumulative candidate.
//! 2. Grow the current chunk one unit at a time; accept the candidate while
//!    its measured height fits the budget (`first_page_cm` for the first
//!    chunk, `full_page_cm` afterwards).
//! 3. On overflow, close the current chunk and open a new one holding just
//!    this unit, measured against `full_page_cm`. An empty first chunk is
//!    never emitted: a first unit that does not fit `first_page_cm` opens
//!    the first chunk itself, so every unit is always placed.
//!
//! Chunks are contiguous ranges of the source, so concatenating them in
//! order reproduces the original units exactly.

use std::ops::Range;

use tracing::debug;

use crate::layout::context::PaginationContext;
use crate::layout::placement::{continuation_title, Chunk};
use crate::layout::PaginationError;
use crate::models::resume::Section;

/// Space budgets for one split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitSpace {
    /// Space left on the page the first chunk lands on.
    pub first_page_cm: f64,
    /// Space on an empty page.
    pub full_page_cm: f64,
}

/// Splits `section` into chunks fitting `space`. Chunk titles derive from
/// `title`, the title the layout referenced the section by.
///
/// The caller guarantees `section.unit_count() >= 2`. Any measurement failure
/// aborts the split.
pub async fn split_section(
    ctx: &PaginationContext<'_>,
    title: &str,
    section: &Section,
    variant: Option<&str>,
    width_cm: f64,
    space: SplitSpace,
) -> Result<Vec<Chunk>, PaginationError> {
    let total = section.unit_count();

    let mut planning = Vec::with_capacity(total);
    for i in 0..total {
        let single = section.slice(i..i + 1);
        planning.push(ctx.measure_section(&single, variant, width_cm, false).await?);
    }
    debug!(
        title = %title,
        units = total,
        planned_cm = planning.iter().sum::<f64>(),
        first_page_cm = space.first_page_cm,
        full_page_cm = space.full_page_cm,
        "Splitting section"
    );

    let mut chunks: Vec<Chunk> = Vec::new();
    let mut start = 0usize;
    let mut end = 0usize;
    let mut height = 0.0_f64;
    let mut budget = space.first_page_cm;

    for i in 0..total {
        let continuation = !chunks.is_empty();
        let candidate = section.slice(start..i + 1);
        let candidate_height = ctx
            .measure_section(&candidate, variant, width_cm, continuation)
            .await?;

        if candidate_height <= budget {
            end = i + 1;
            height = candidate_height;
            continue;
        }

        if end > start {
            let n = chunks.len();
            chunks.push(make_chunk(title, section, variant, start..end, height, n));
        }

        start = i;
        end = i + 1;
        budget = space.full_page_cm;
        height = ctx
            .measure_section(&section.slice(i..i + 1), variant, width_cm, !chunks.is_empty())
            .await?;
        if height > budget {
            debug!(
                title = %title,
                unit = i,
                planned_cm = planning[i],
                height_cm = height,
                "Unit taller than a full page; placed alone"
            );
        }
    }

    if end > start {
        let n = chunks.len();
        chunks.push(make_chunk(title, section, variant, start..end, height, n));
    }

    debug!(title = %title, chunks = chunks.len(), "Section split");
    Ok(chunks)
}

fn make_chunk(
    title: &str,
    section: &Section,
    variant: Option<&str>,
    range: Range<usize>,
    height_cm: f64,
    index: usize,
) -> Chunk {
    Chunk {
        title: if index == 0 {
            title.to_string()
        } else {
            continuation_title(title, index)
        },
        source_title: title.to_string(),
        variant: variant.map(str::to_string),
        section: section.slice(range),
        is_continuation: index > 0,
        height_cm,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::testing::{
        complex_section, document_with, item_names, skills_section, FailingMeasurer,
        FixtureMeasurer, FixtureRenderer,
    };
    use crate::layout::measure::MeasureError;

    async fn split_first(
        ctx: &PaginationContext<'_>,
        variant: Option<&str>,
        width_cm: f64,
        space: SplitSpace,
    ) -> Result<Vec<Chunk>, PaginationError> {
        let section = &ctx.document().sections[0];
        split_section(ctx, &section.title, section, variant, width_cm, space).await
    }

    fn concat_names(chunks: &[Chunk]) -> Vec<String> {
        chunks.iter().flat_map(|c| item_names(&c.section)).collect()
    }

    #[tokio::test]
    async fn test_everything_fits_single_chunk() {
        let doc = document_with(vec![complex_section("Experience", &[5.0; 4])]);
        let renderer = FixtureRenderer;
        let measurer = FixtureMeasurer::new(1.0);
        let ctx = PaginationContext::new(&doc, &renderer, &measurer);
        let space = SplitSpace { first_page_cm: 22.0, full_page_cm: 22.0 };

        let chunks = split_first(&ctx, None, 18.0, space).await.unwrap();
        assert_eq!(chunks.len(), 1);
        assert!(!chunks[0].is_continuation);
        assert_eq!(chunks[0].title, "Experience");
        assert_eq!(chunks[0].height_cm, 21.0);
    }

    #[tokio::test]
    async fn test_five_items_overflowing_split_in_two() {
        // header 1 + 5×5 = 26 > 22: first chunk takes 4 items (21cm), second takes 1.
        let doc = document_with(vec![complex_section("Experience", &[5.0; 5])]);
        let renderer = FixtureRenderer;
        let measurer = FixtureMeasurer::new(1.0);
        let ctx = PaginationContext::new(&doc, &renderer, &measurer);
        let space = SplitSpace { first_page_cm: 22.0, full_page_cm: 22.0 };

        let chunks = split_first(&ctx, None, 18.0, space).await.unwrap();
        assert_eq!(chunks.len(), 2);
        assert!(!chunks[0].is_continuation);
        assert!(chunks[1].is_continuation);
        assert_eq!(chunks[0].section.items.len(), 4);
        assert!(chunks[0].height_cm <= 22.0);
        assert_eq!(chunks[1].section.items.len(), 1);
        assert_eq!(chunks[1].title, "Experience__continuation_1");
        assert_eq!(chunks[1].source_title, "Experience");
    }

    #[tokio::test]
    async fn test_acceptance_uses_cumulative_measurement_not_sum() {
        // Items are 4cm each; the surface adds 1cm between units, so four
        // items measure 1 + 16 + 3 = 20 and a fifth would measure 25.
        let doc = document_with(vec![complex_section("Experience", &[4.0; 6])]);
        let renderer = FixtureRenderer;
        let measurer = FixtureMeasurer::new(1.0).with_gap(1.0);
        let ctx = PaginationContext::new(&doc, &renderer, &measurer);
        let space = SplitSpace { first_page_cm: 22.0, full_page_cm: 22.0 };

        let chunks = split_first(&ctx, None, 18.0, space).await.unwrap();
        assert_eq!(chunks[0].section.items.len(), 4);
        assert_eq!(chunks[0].height_cm, 20.0);
        assert_eq!(chunks[1].section.items.len(), 2);
    }

    #[tokio::test]
    async fn test_items_conserved_in_order_across_many_chunks() {
        let heights = [3.0, 7.0, 2.0, 9.0, 4.0, 6.0, 1.0, 8.0, 5.0, 2.0];
        let doc = document_with(vec![complex_section("Projects", &heights)]);
        let renderer = FixtureRenderer;
        let measurer = FixtureMeasurer::new(1.0);
        let ctx = PaginationContext::new(&doc, &renderer, &measurer);
        let space = SplitSpace { first_page_cm: 6.0, full_page_cm: 12.0 };

        let chunks = split_first(&ctx, None, 18.0, space).await.unwrap();
        assert!(chunks.len() > 2);
        assert_eq!(concat_names(&chunks), item_names(&doc.sections[0]));
        assert!(!chunks[0].is_continuation);
        assert!(chunks[1..].iter().all(|c| c.is_continuation));
        for (n, chunk) in chunks.iter().enumerate().skip(1) {
            assert_eq!(chunk.title, format!("Projects__continuation_{n}"));
            assert!(chunk.height_cm <= 12.0);
        }
        assert!(chunks[0].height_cm <= 6.0);
    }

    #[tokio::test]
    async fn test_first_item_too_big_for_first_page_is_forced_to_full_page() {
        let doc = document_with(vec![complex_section("Experience", &[8.0, 3.0, 3.0])]);
        let renderer = FixtureRenderer;
        let measurer = FixtureMeasurer::new(1.0);
        let ctx = PaginationContext::new(&doc, &renderer, &measurer);
        let space = SplitSpace { first_page_cm: 4.0, full_page_cm: 22.0 };

        let chunks = split_first(&ctx, None, 18.0, space).await.unwrap();
        assert_eq!(chunks.len(), 1, "forced chunk keeps growing against the full page");
        assert!(!chunks[0].is_continuation);
        assert_eq!(chunks[0].section.items.len(), 3);
        assert_eq!(chunks[0].height_cm, 15.0);
    }

    #[tokio::test]
    async fn test_oversized_unit_is_placed_alone() {
        let doc = document_with(vec![complex_section("Experience", &[2.0, 40.0, 2.0])]);
        let renderer = FixtureRenderer;
        let measurer = FixtureMeasurer::new(1.0);
        let ctx = PaginationContext::new(&doc, &renderer, &measurer);
        let space = SplitSpace { first_page_cm: 22.0, full_page_cm: 22.0 };

        let chunks = split_first(&ctx, None, 18.0, space).await.unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1].section.items.len(), 1);
        assert_eq!(chunks[1].height_cm, 41.0);
        assert_eq!(concat_names(&chunks), item_names(&doc.sections[0]));
    }

    #[tokio::test]
    async fn test_skills_split_on_categories() {
        let doc = document_with(vec![skills_section("Skills", &[4, 4, 4])]);
        let renderer = FixtureRenderer;
        let measurer = FixtureMeasurer::new(1.0);
        let ctx = PaginationContext::new(&doc, &renderer, &measurer);
        let space = SplitSpace { first_page_cm: 9.0, full_page_cm: 22.0 };

        let chunks = split_first(&ctx, None, 6.0, space).await.unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].section.categories.len(), 2);
        assert_eq!(chunks[1].section.categories.len(), 1);
        assert_eq!(chunks[1].section.categories[0].name, "Category 2");
    }

    #[tokio::test]
    async fn test_measurements_are_sequential_and_at_requested_width() {
        let doc = document_with(vec![complex_section("Experience", &[5.0; 6])]);
        let renderer = FixtureRenderer;
        let measurer = FixtureMeasurer::new(1.0);
        let ctx = PaginationContext::new(&doc, &renderer, &measurer);
        let space = SplitSpace { first_page_cm: 10.0, full_page_cm: 22.0 };

        split_first(&ctx, Some("wide"), 11.0, space).await.unwrap();
        assert_eq!(measurer.overlapped_calls(), 0);
        assert!(measurer.widths().iter().all(|w| *w == 11.0));
    }

    #[tokio::test]
    async fn test_chunk_titles_follow_the_referenced_title() {
        let doc = document_with(vec![]);
        let renderer = FixtureRenderer;
        let measurer = FixtureMeasurer::new(1.0);
        let ctx = PaginationContext::new(&doc, &renderer, &measurer);
        let space = SplitSpace { first_page_cm: 22.0, full_page_cm: 22.0 };
        let data = complex_section("Work History", &[5.0; 5]);

        let chunks = split_section(&ctx, "Experience", &data, None, 18.0, space)
            .await
            .unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].title, "Experience");
        assert_eq!(chunks[1].title, "Experience__continuation_1");
        assert!(chunks.iter().all(|c| c.source_title == "Experience"));
    }

    #[tokio::test]
    async fn test_measurement_failure_aborts_split() {
        let doc = document_with(vec![complex_section("Experience", &[5.0; 5])]);
        let renderer = FixtureRenderer;
        let measurer = FailingMeasurer::new(7);
        let ctx = PaginationContext::new(&doc, &renderer, &measurer);
        let space = SplitSpace { first_page_cm: 22.0, full_page_cm: 22.0 };

        let err = split_first(&ctx, None, 18.0, space)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PaginationError::Measurement(MeasureError::Unavailable(_))
        ));
    }
}
