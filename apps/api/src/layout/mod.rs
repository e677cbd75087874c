// Pagination engine: item splitting, page packing, column co-packing and the
// per-definition orchestrator. Measurement is the only suspension point; every
// packing step awaits it sequentially.

pub mod assemble;
pub mod columns;
pub mod context;
pub mod geometry;
pub mod handlers;
pub mod measure;
pub mod orchestrator;
pub mod packer;
pub mod placement;
pub mod splitter;

#[cfg(test)]
pub mod testing;

use thiserror::Error;

// Re-export the public API consumed by the HTTP layer and bootstrap.
pub use geometry::{default_page_geometry, PageGeometry};
pub use measure::MeasurementSurface;

use measure::MeasureError;

/// Errors that abort a pagination run. None of them is caught or retried
/// inside the engine.
#[derive(Debug, Error)]
pub enum PaginationError {
    #[error("Measurement failed: {0}")]
    Measurement(#[from] MeasureError),

    #[error("No measurement recorded for '{title}'")]
    MissingMeasurement { title: String },

    #[error("Invalid layout definition #{index}: {reason}")]
    InvalidLayout { index: usize, reason: String },
}
