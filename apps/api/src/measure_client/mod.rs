//! Measurement Client: HTTP bridge to the off-screen rendering surface.
//!
//! Every pagination run opens its own session: `open_session` health-checks
//! the surface and tags each subsequent request with a fresh session id, so
//! concurrent builds never share surface state.
//!
//! There are no retries and no estimate fallbacks. A failed call fails the run.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::layout::measure::{MeasureError, MeasurementProvider, MeasurementSurface, StyleContext};

const SESSION_HEADER: &str = "x-measure-session";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MeasureRequest<'a> {
    html: &'a str,
    css: &'a str,
    width_cm: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MeasureResponse {
    height_cm: f64,
}

/// Connection settings for the measurement service. Cheap to clone.
#[derive(Clone)]
pub struct HttpMeasurementSurface {
    client: Client,
    base_url: String,
}

impl HttpMeasurementSurface {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, MeasureError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(HttpMeasurementSurface {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl MeasurementSurface for HttpMeasurementSurface {
    async fn open_session(&self) -> Result<Box<dyn MeasurementProvider>, MeasureError> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(|e| MeasureError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MeasureError::Unavailable(format!(
                "health check returned {}",
                response.status()
            )));
        }

        let session_id = Uuid::new_v4();
        info!(%session_id, "Measurement session opened");
        Ok(Box::new(HttpMeasurer {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            session_id,
        }))
    }
}

/// One measurement session against the remote surface.
pub struct HttpMeasurer {
    client: Client,
    base_url: String,
    session_id: Uuid,
}

#[async_trait]
impl MeasurementProvider for HttpMeasurer {
    async fn measure(
        &self,
        fragment: &str,
        style: &StyleContext,
        width_cm: f64,
    ) -> Result<f64, MeasureError> {
        let request = MeasureRequest {
            html: fragment,
            css: &style.stylesheet,
            width_cm,
        };

        let response = self
            .client
            .post(format!("{}/measure", self.base_url))
            .header(SESSION_HEADER, self.session_id.to_string())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MeasureError::Surface {
                status: status.as_u16(),
                message,
            });
        }

        let body: MeasureResponse = response.json().await?;
        let height = validate_height(body.height_cm)?;
        debug!(
            session_id = %self.session_id,
            width_cm,
            height_cm = height,
            bytes = fragment.len(),
            "Fragment measured"
        );
        Ok(height)
    }
}

fn validate_height(height_cm: f64) -> Result<f64, MeasureError> {
    if height_cm.is_finite() && height_cm >= 0.0 {
        Ok(height_cm)
    } else {
        Err(MeasureError::InvalidHeight(height_cm))
    }
}
