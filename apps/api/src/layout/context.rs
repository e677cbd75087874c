//! Per-run pagination context: section lookup, rendering and measurement.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use tracing::{debug, warn};

use crate::layout::measure::{MeasurementProvider, StyleContext, MIN_MEASURED_HEIGHT_CM};
use crate::layout::placement::Placement;
use crate::layout::PaginationError;
use crate::models::resume::{ResumeDocument, Section};
use crate::render::SectionRenderer;

/// Measured heights of one slot, index-aligned with its placements. Two
/// references may share a title yet carry different data, so heights are
/// never looked up by label.
pub type Measurements = Vec<f64>;

/// Everything a pagination run reads. Created once per run, never shared
/// between runs.
pub struct PaginationContext<'a> {
    document: &'a ResumeDocument,
    sections: HashMap<&'a str, &'a Section>,
    renderer: &'a dyn SectionRenderer,
    measurer: &'a dyn MeasurementProvider,
    style: StyleContext,
    measure_calls: AtomicU32,
}

impl<'a> PaginationContext<'a> {
    pub fn new(
        document: &'a ResumeDocument,
        renderer: &'a dyn SectionRenderer,
        measurer: &'a dyn MeasurementProvider,
    ) -> Self {
        let mut sections = HashMap::new();
        for section in &document.sections {
            // First definition wins on duplicate titles.
            sections.entry(section.title.as_str()).or_insert(section);
        }
        PaginationContext {
            document,
            sections,
            renderer,
            measurer,
            style: StyleContext::for_document(document),
            measure_calls: AtomicU32::new(0),
        }
    }

    pub fn document(&self) -> &'a ResumeDocument {
        self.document
    }

    pub fn measure_calls(&self) -> u32 {
        self.measure_calls.load(Ordering::Relaxed)
    }

    /// The section data behind a placement, if any. Reserved titles and
    /// missing sections resolve to `None`.
    pub fn resolve<'p>(&self, placement: &'p Placement) -> Option<Cow<'p, Section>>
    where
        'a: 'p,
    {
        match placement {
            Placement::Section { key } if key.is_reserved() => None,
            Placement::Section { key } => self
                .sections
                .get(key.title.as_str())
                .map(|s| Cow::Borrowed(*s)),
            Placement::Inline { section, .. } => Some(Cow::Borrowed(section)),
            Placement::Chunk { chunk } => Some(Cow::Borrowed(&chunk.section)),
        }
    }

    /// Section data for a placement that qualifies for splitting.
    pub fn splittable_section<'p>(&self, placement: &'p Placement) -> Option<Cow<'p, Section>>
    where
        'a: 'p,
    {
        match placement {
            Placement::Chunk { .. } => None,
            _ => self.resolve(placement).filter(|s| s.is_splittable()),
        }
    }

    /// Markup for a section, wrapped in the continuation marker when needed.
    pub fn render_section(
        &self,
        section: &Section,
        variant: Option<&str>,
        is_continuation: bool,
    ) -> String {
        let html = self.renderer.render(section, variant);
        if is_continuation {
            format!("<div class=\"section-continuation\">{html}</div>")
        } else {
            html
        }
    }

    /// Markup for a placement. `None` when the referenced section does not exist.
    pub fn render_placement(&self, placement: &Placement) -> Option<String> {
        match placement {
            Placement::Section { key } if key.is_reserved() => Some(
                self.renderer
                    .render_reserved(key, &self.document.personal_info),
            ),
            Placement::Section { key } => match self.sections.get(key.title.as_str()) {
                Some(section) => Some(self.render_section(section, key.variant.as_deref(), false)),
                None => {
                    warn!(title = %key.title, "Referenced section not found; rendering empty");
                    None
                }
            },
            Placement::Inline { key, section } => {
                Some(self.render_section(section, key.variant.as_deref(), false))
            }
            Placement::Chunk { chunk } => Some(self.render_section(
                &chunk.section,
                chunk.variant.as_deref(),
                chunk.is_continuation,
            )),
        }
    }

    /// Measures a fragment at `width_cm`, floored at [`MIN_MEASURED_HEIGHT_CM`].
    /// Errors are fatal to the run and returned unchanged.
    pub async fn measure_html(&self, html: &str, width_cm: f64) -> Result<f64, PaginationError> {
        self.measure_calls.fetch_add(1, Ordering::Relaxed);
        let raw = self.measurer.measure(html, &self.style, width_cm).await?;
        Ok(raw.max(MIN_MEASURED_HEIGHT_CM))
    }

    pub async fn measure_section(
        &self,
        section: &Section,
        variant: Option<&str>,
        width_cm: f64,
        is_continuation: bool,
    ) -> Result<f64, PaginationError> {
        let html = self.render_section(section, variant, is_continuation);
        self.measure_html(&html, width_cm).await
    }

    /// Measures every placement of one slot, sequentially. Missing sections
    /// measure as zero: they render as nothing.
    pub async fn measure_placements(
        &self,
        placements: &[Placement],
        width_cm: f64,
    ) -> Result<Measurements, PaginationError> {
        let mut measurements = Measurements::with_capacity(placements.len());
        for placement in placements {
            let label = placement.label();
            let height = match self.render_placement(placement) {
                Some(html) => self.measure_html(&html, width_cm).await?,
                None => 0.0,
            };
            debug!(title = %label, height_cm = height, width_cm, "Measured placement");
            measurements.push(height);
        }
        Ok(measurements)
    }

    /// Height of a whole slot rendered as one fragment. Zero for an empty slot.
    pub async fn measure_stack(
        &self,
        placements: &[Placement],
        width_cm: f64,
    ) -> Result<f64, PaginationError> {
        let html: String = placements
            .iter()
            .filter_map(|p| self.render_placement(p))
            .collect();
        if html.is_empty() {
            return Ok(0.0);
        }
        self.measure_html(&html, width_cm).await
    }
}
