//! Axum route handlers for the Pagination API.

use axum::{extract::State, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::layout::assemble::PaginatedDocument;
use crate::layout::orchestrator::{paginate_document, plan_document, PlannedPage};
use crate::layout::PaginationError;
use crate::models::resume::ResumeDocument;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub pages: Vec<PlannedPage>,
    pub total_pages: usize,
}

fn validate(document: &ResumeDocument) -> Result<(), AppError> {
    if document.layout.is_empty() {
        return Err(AppError::Validation(
            "layout must contain at least one page definition".to_string(),
        ));
    }
    Ok(())
}

/// POST /api/v1/paginate
///
/// Paginates a resume document and returns the assembled pages. Each request
/// opens its own measurement session.
pub async fn handle_paginate(
    State(state): State<AppState>,
    Json(document): Json<ResumeDocument>,
) -> Result<Json<PaginatedDocument>, AppError> {
    validate(&document)?;

    let measurer = state
        .measure_surface
        .open_session()
        .await
        .map_err(PaginationError::from)?;

    // Decorative footers only.
    let footer_seed = Uuid::new_v4().as_u128() as u64;

    let paginated = paginate_document(
        &document,
        &state.geometry,
        state.renderer.as_ref(),
        measurer.as_ref(),
        footer_seed,
    )
    .await?;

    Ok(Json(paginated))
}

/// POST /api/v1/paginate/plan
///
/// Same run as `/paginate`, returning only the page placements.
pub async fn handle_plan(
    State(state): State<AppState>,
    Json(document): Json<ResumeDocument>,
) -> Result<Json<PlanResponse>, AppError> {
    validate(&document)?;

    let measurer = state
        .measure_surface
        .open_session()
        .await
        .map_err(PaginationError::from)?;

    let pages = plan_document(
        &document,
        &state.geometry,
        state.renderer.as_ref(),
        measurer.as_ref(),
    )
    .await?;

    Ok(Json(PlanResponse {
        total_pages: pages.len(),
        pages,
    }))
}
