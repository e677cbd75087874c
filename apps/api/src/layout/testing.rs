//! Deterministic renderer / measurer fixtures for pagination tests.
//!
//! `FixtureRenderer` writes each unit's height into the markup as
//! `data-h="…"`; `FixtureMeasurer` reads them back, so tests control exactly
//! what the measurement surface reports for any candidate chunk.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use crate::layout::measure::{MeasureError, MeasurementProvider, MeasurementSurface, StyleContext};
use crate::layout::placement::SectionKey;
use crate::models::resume::{
    Item, PersonalInfo, ResumeDocument, Section, SectionKind, SkillCategory,
};
use crate::render::SectionRenderer;

pub const RESERVED_HEIGHT_CM: f64 = 2.0;

pub struct FixtureRenderer;

impl SectionRenderer for FixtureRenderer {
    fn render(&self, section: &Section, _variant: Option<&str>) -> String {
        let mut html = format!("<section title=\"{}\">", section.title);
        if section.uses_categories() {
            for category in &section.categories {
                let h = category.skills.len().max(1) as f64;
                html.push_str(&format!("<i data-h=\"{h}\"></i>"));
            }
        } else {
            for item in &section.items {
                let h = item.0.get("height").and_then(|v| v.as_f64()).unwrap_or(1.0);
                html.push_str(&format!("<i data-h=\"{h}\"></i>"));
            }
        }
        html.push_str("</section>");
        html
    }

    fn render_reserved(&self, _key: &SectionKey, _info: &PersonalInfo) -> String {
        format!("<i data-h=\"{RESERVED_HEIGHT_CM}\"></i>")
    }
}

/// Height = `header_cm` per `<section` + Σ unit heights + `gap_cm` between units.
pub struct FixtureMeasurer {
    header_cm: f64,
    gap_cm: f64,
    widths: Mutex<Vec<f64>>,
    in_flight: AtomicUsize,
    overlapped: AtomicUsize,
}

impl FixtureMeasurer {
    pub fn new(header_cm: f64) -> Self {
        FixtureMeasurer {
            header_cm,
            gap_cm: 0.0,
            widths: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            overlapped: AtomicUsize::new(0),
        }
    }

    pub fn with_gap(mut self, gap_cm: f64) -> Self {
        self.gap_cm = gap_cm;
        self
    }

    pub fn call_count(&self) -> usize {
        self.widths.lock().unwrap().len()
    }

    pub fn widths(&self) -> Vec<f64> {
        self.widths.lock().unwrap().clone()
    }

    /// Number of calls that started while another was still in flight.
    pub fn overlapped_calls(&self) -> usize {
        self.overlapped.load(Ordering::SeqCst)
    }

    pub fn height_of(&self, fragment: &str) -> f64 {
        let headers = fragment.matches("<section").count() as f64;
        let units: Vec<f64> = fragment
            .split("data-h=\"")
            .skip(1)
            .filter_map(|rest| rest.split('"').next())
            .filter_map(|n| n.parse::<f64>().ok())
            .collect();
        let gaps = units.len().saturating_sub(1) as f64;
        headers * self.header_cm + units.iter().sum::<f64>() + gaps * self.gap_cm
    }
}

#[async_trait]
impl MeasurementProvider for FixtureMeasurer {
    async fn measure(
        &self,
        fragment: &str,
        _style: &StyleContext,
        width_cm: f64,
    ) -> Result<f64, MeasureError> {
        if self.in_flight.fetch_add(1, Ordering::SeqCst) > 0 {
            self.overlapped.fetch_add(1, Ordering::SeqCst);
        }
        tokio::task::yield_now().await;
        self.widths.lock().unwrap().push(width_cm);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(self.height_of(fragment))
    }
}

/// Succeeds for the first `fail_after` calls, then reports the surface as gone.
pub struct FailingMeasurer {
    fail_after: usize,
    calls: AtomicUsize,
}

impl FailingMeasurer {
    pub fn new(fail_after: usize) -> Self {
        FailingMeasurer {
            fail_after,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl MeasurementProvider for FailingMeasurer {
    async fn measure(
        &self,
        fragment: &str,
        _style: &StyleContext,
        _width_cm: f64,
    ) -> Result<f64, MeasureError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) >= self.fail_after {
            return Err(MeasureError::Unavailable("fixture surface closed".to_string()));
        }
        Ok(FixtureMeasurer::new(1.0).height_of(fragment))
    }
}

/// Opens a fresh [`FixtureMeasurer`] per session.
pub struct FixtureSurface {
    pub header_cm: f64,
}

#[async_trait]
impl MeasurementSurface for FixtureSurface {
    async fn open_session(&self) -> Result<Box<dyn MeasurementProvider>, MeasureError> {
        Ok(Box::new(FixtureMeasurer::new(self.header_cm)))
    }
}

/// Items carry `details`, so the section is eligible for splitting.
pub fn complex_section(title: &str, heights: &[f64]) -> Section {
    Section {
        id: title.to_lowercase(),
        title: title.to_string(),
        kind: SectionKind::Experience,
        items: heights
            .iter()
            .enumerate()
            .map(|(i, h)| Item(json!({ "name": format!("{title} {i}"), "height": h, "details": ["x"] })))
            .collect(),
        categories: vec![],
    }
}

/// A plain list: never split regardless of size.
pub fn simple_section(title: &str, heights: &[f64]) -> Section {
    Section {
        id: title.to_lowercase(),
        title: title.to_string(),
        kind: SectionKind::Custom,
        items: heights
            .iter()
            .enumerate()
            .map(|(i, h)| Item(json!({ "name": format!("{title} {i}"), "height": h })))
            .collect(),
        categories: vec![],
    }
}

pub fn skills_section(title: &str, sizes: &[usize]) -> Section {
    Section {
        id: title.to_lowercase(),
        title: title.to_string(),
        kind: SectionKind::Skills,
        items: vec![],
        categories: sizes
            .iter()
            .enumerate()
            .map(|(i, n)| SkillCategory {
                name: format!("Category {i}"),
                skills: (0..*n).map(|s| format!("skill {s}")).collect(),
            })
            .collect(),
    }
}

pub fn document_with(sections: Vec<Section>) -> ResumeDocument {
    let mut document: ResumeDocument =
        serde_json::from_str("{}").expect("empty document deserializes");
    document.sections = sections;
    document
}

/// Item names in order, for conservation checks.
pub fn item_names(section: &Section) -> Vec<String> {
    section
        .items
        .iter()
        .filter_map(|i| i.field("name").map(str::to_string))
        .collect()
}
