//! Measurement seam: the only place the pagination core suspends.
//!
//! Packing code awaits one `measure` call at a time: whether chunk N fits
//! decides what chunk N+1 contains, so measurements are never issued
//! speculatively or in parallel.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::models::resume::ResumeDocument;

/// Floor applied to every reported height.
pub const MIN_MEASURED_HEIGHT_CM: f64 = 0.5;

#[derive(Debug, Error)]
pub enum MeasureError {
    #[error("Measurement surface unavailable: {0}")]
    Unavailable(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Measurement surface error (status {status}): {message}")]
    Surface { status: u16, message: String },

    #[error("Measurement surface returned an invalid height: {0}")]
    InvalidHeight(f64),
}

/// CSS rules applied to every measured fragment; identical to the final document's.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleContext {
    pub stylesheet: String,
}

impl StyleContext {
    pub fn for_document(document: &ResumeDocument) -> Self {
        let colors = &document.colors;
        let stylesheet = format!(
            ".page {{ color: {text}; font-size: 10.5pt; line-height: 1.35; }}\n\
             .resume-section h2 {{ color: {accent}; margin: 0 0 0.2cm; }}\n\
             .resume-section .item {{ margin-bottom: 0.25cm; }}\n\
             .section-continuation h2 {{ display: none; }}\n\
             .page-column--left {{ background: {background}; }}",
            text = colors.text,
            accent = colors.accent,
            background = colors.column_background.as_deref().unwrap_or("transparent"),
        );
        StyleContext { stylesheet }
    }
}

/// Reports the rendered height of a markup fragment in centimeters.
///
/// Implementations render the fragment in isolation at `width_cm`, with the
/// given style context. Results must be deterministic for identical inputs
/// within one run.
#[async_trait]
pub trait MeasurementProvider: Send + Sync {
    async fn measure(
        &self,
        fragment: &str,
        style: &StyleContext,
        width_cm: f64,
    ) -> Result<f64, MeasureError>;
}

/// Opens independently-scoped measurement providers, one per pagination run,
/// so concurrent builds never share rendering-surface state.
#[async_trait]
pub trait MeasurementSurface: Send + Sync {
    async fn open_session(&self) -> Result<Box<dyn MeasurementProvider>, MeasureError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::Colors;

    #[test]
    fn test_style_context_uses_document_colors() {
        let mut document: ResumeDocument = serde_json::from_str("{}").unwrap();
        document.colors = Colors {
            text: "#000".to_string(),
            accent: "#f00".to_string(),
            column_background: Some("#eee".to_string()),
        };
        let style = StyleContext::for_document(&document);
        assert!(style.stylesheet.contains("color: #000"));
        assert!(style.stylesheet.contains("color: #f00"));
        assert!(style.stylesheet.contains("background: #eee"));
    }

    #[test]
    fn test_style_context_defaults_transparent_column() {
        let document: ResumeDocument = serde_json::from_str("{}").unwrap();
        let style = StyleContext::for_document(&document);
        assert!(style.stylesheet.contains("background: transparent"));
    }
}
