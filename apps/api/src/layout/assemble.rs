//! Markup assembly: turns the page plan into final page objects with markup
//! and footers.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::layout::context::PaginationContext;
use crate::layout::orchestrator::PlannedPage;
use crate::layout::placement::Placement;
use crate::models::layout::LayoutMode;
use crate::models::resume::FooterType;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Footer {
    pub kind: FooterType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Decorative seed for `mountains-random`; never feeds pagination.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssembledPage {
    /// 1-based position in the output.
    pub number: usize,
    pub definition_index: usize,
    pub left: Vec<Placement>,
    pub right: Vec<Placement>,
    pub whole_page: Vec<Placement>,
    pub footer: Option<Footer>,
    pub html: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginatedDocument {
    pub pages: Vec<AssembledPage>,
    pub total_pages: usize,
    pub generated_at: DateTime<Utc>,
}

impl PaginatedDocument {
    pub fn new(pages: Vec<AssembledPage>) -> Self {
        PaginatedDocument {
            total_pages: pages.len(),
            pages,
            generated_at: Utc::now(),
        }
    }
}

/// Footer for page `number` of `total`, or `None` when footers are off.
pub fn footer_for(
    kind: FooterType,
    number: usize,
    total: usize,
    owner_name: &str,
    seed: u64,
) -> Option<Footer> {
    let (text, seed) = match kind {
        FooterType::None => return None,
        FooterType::Simple => (Some(owner_name.to_string()).filter(|n| !n.is_empty()), None),
        FooterType::PageNumber => (Some(format!("{number} / {total}")), None),
        FooterType::Mountains => (None, None),
        FooterType::MountainsRandom => (None, Some(seed.wrapping_add(number as u64))),
    };
    Some(Footer { kind, text, seed })
}

fn footer_class(kind: FooterType) -> &'static str {
    match kind {
        FooterType::None => "none",
        FooterType::Simple => "simple",
        FooterType::PageNumber => "page-number",
        FooterType::Mountains => "mountains",
        FooterType::MountainsRandom => "mountains-random",
    }
}

pub fn assemble_pages(
    ctx: &PaginationContext<'_>,
    plan: Vec<PlannedPage>,
    footer_seed: u64,
) -> Vec<AssembledPage> {
    let document = ctx.document();
    let total = plan.len();

    plan.into_iter()
        .enumerate()
        .map(|(i, page)| {
            let number = i + 1;
            let footer = footer_for(
                document.footer_type,
                number,
                total,
                &document.personal_info.name,
                footer_seed,
            );
            let html = page_html(ctx, &page, number, footer.as_ref());
            AssembledPage {
                number,
                definition_index: page.definition_index,
                left: page.left,
                right: page.right,
                whole_page: page.whole_page,
                footer,
                html,
            }
        })
        .collect()
}

fn slot_html(ctx: &PaginationContext<'_>, placements: &[Placement]) -> String {
    placements
        .iter()
        .map(|p| ctx.render_placement(p).unwrap_or_default())
        .collect()
}

fn page_html(
    ctx: &PaginationContext<'_>,
    page: &PlannedPage,
    number: usize,
    footer: Option<&Footer>,
) -> String {
    let mut html = format!(
        "<div class=\"page\" data-page=\"{number}\" style=\"padding-top: {}cm\">",
        page.padding_cm
    );

    if matches!(page.mode, LayoutMode::Columns | LayoutMode::Hybrid) {
        let background = ctx
            .document()
            .colors
            .column_background
            .as_deref()
            .map(|c| format!(" style=\"background: {c}\""))
            .unwrap_or_default();
        html.push_str(&format!(
            "<div class=\"page-columns\"><div class=\"page-column page-column--left\"{background}>{}</div><div class=\"page-column page-column--right\">{}</div></div>",
            slot_html(ctx, &page.left),
            slot_html(ctx, &page.right),
        ));
    }

    if !page.whole_page.is_empty() {
        html.push_str(&format!(
            "<div class=\"page-whole\">{}</div>",
            slot_html(ctx, &page.whole_page)
        ));
    }

    if let Some(footer) = footer {
        let seed = footer
            .seed
            .map(|s| format!(" data-seed=\"{s}\""))
            .unwrap_or_default();
        html.push_str(&format!(
            "<footer class=\"page-footer page-footer--{}\"{seed}>{}</footer>",
            footer_class(footer.kind),
            footer.text.as_deref().unwrap_or_default(),
        ));
    }

    html.push_str("</div>");
    html
}
