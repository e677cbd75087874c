use std::sync::Arc;

use crate::config::Config;
use crate::layout::{MeasurementSurface, PageGeometry};
use crate::render::SectionRenderer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Page dimensions and base capacity shared by every pagination run.
    pub geometry: PageGeometry,
    /// Immutable after startup; helpers are resolved once.
    pub renderer: Arc<dyn SectionRenderer>,
    /// Opens one measurement session per request. Sessions are never shared.
    pub measure_surface: Arc<dyn MeasurementSurface>,
}
