//! Section rendering: turns structured section data into markup fragments.
//!
//! Helpers live in an explicit [`RenderContext`] built once per run and passed
//! to the renderer. There is no global helper registry.

use std::collections::HashMap;

use serde_json::Value;

use crate::layout::placement::SectionKey;
use crate::models::resume::{Item, PersonalInfo, Section, SkillCategory};

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

pub type Helper = fn(&[&str]) -> String;

/// Immutable table of named template helpers.
#[derive(Clone)]
pub struct RenderContext {
    helpers: HashMap<&'static str, Helper>,
}

impl RenderContext {
    /// The standard helper set: `escape`, `date_range`, `join`.
    pub fn standard() -> Self {
        let mut helpers: HashMap<&'static str, Helper> = HashMap::new();
        helpers.insert("escape", helper_escape);
        helpers.insert("date_range", helper_date_range);
        helpers.insert("join", helper_join);
        RenderContext { helpers }
    }

    /// Calls a helper by name. Unknown helpers render nothing.
    pub fn call(&self, name: &str, args: &[&str]) -> String {
        match self.helpers.get(name) {
            Some(helper) => helper(args),
            None => {
                tracing::debug!(helper = name, "Unknown render helper");
                String::new()
            }
        }
    }

    pub fn escape(&self, text: &str) -> String {
        self.call("escape", &[text])
    }
}

fn helper_escape(args: &[&str]) -> String {
    let text = args.first().copied().unwrap_or_default();
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn helper_date_range(args: &[&str]) -> String {
    match (args.first().copied(), args.get(1).copied()) {
        (Some(start), Some(end)) if !start.is_empty() && !end.is_empty() => {
            format!("{start} – {end}")
        }
        (Some(start), _) if !start.is_empty() => format!("{start} – Present"),
        _ => String::new(),
    }
}

fn helper_join(args: &[&str]) -> String {
    args.iter()
        .filter(|a| !a.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

// ────────────────────────────────────────────────────────────────────────────
// Renderer trait
// ────────────────────────────────────────────────────────────────────────────

/// Produces the markup fragment for a section. Pure: identical inputs give
/// identical output.
pub trait SectionRenderer: Send + Sync {
    fn render(&self, section: &Section, variant: Option<&str>) -> String;

    /// Renders the reserved `name` / `personal_info` placements.
    fn render_reserved(&self, key: &SectionKey, info: &PersonalInfo) -> String;
}

/// Minimal HTML renderer keyed by section type and variant.
pub struct HtmlSectionRenderer {
    ctx: RenderContext,
}

impl HtmlSectionRenderer {
    pub fn new(ctx: RenderContext) -> Self {
        HtmlSectionRenderer { ctx }
    }

    fn render_item(&self, item: &Item) -> String {
        let heading = ["title", "role", "degree", "name"]
            .iter()
            .find_map(|k| item.field(k))
            .unwrap_or_default();
        let organization = ["company", "organization", "institution"]
            .iter()
            .find_map(|k| item.field(k))
            .unwrap_or_default();
        let dates = self.ctx.call(
            "date_range",
            &[
                item.field("startDate").unwrap_or_default(),
                item.field("endDate").unwrap_or_default(),
            ],
        );

        let mut html = String::from("<div class=\"item\"><div class=\"item-head\">");
        html.push_str(&format!("<strong>{}</strong>", self.ctx.escape(heading)));
        if !organization.is_empty() {
            html.push_str(&format!(
                "<span class=\"item-org\">{}</span>",
                self.ctx.escape(organization)
            ));
        }
        if !dates.is_empty() {
            html.push_str(&format!(
                "<span class=\"item-dates\">{}</span>",
                self.ctx.escape(&dates)
            ));
        }
        html.push_str("</div>");

        if let Some(description) = item.field("description") {
            html.push_str(&format!("<p>{}</p>", self.ctx.escape(description)));
        }
        if let Some(details) = item.details() {
            html.push_str("<ul>");
            for detail in details.iter().filter_map(Value::as_str) {
                html.push_str(&format!("<li>{}</li>", self.ctx.escape(detail)));
            }
            html.push_str("</ul>");
        }
        html.push_str("</div>");
        html
    }

    fn render_category(&self, category: &SkillCategory) -> String {
        let tags: String = category
            .skills
            .iter()
            .map(|s| format!("<li>{}</li>", self.ctx.escape(s)))
            .collect();
        format!(
            "<div class=\"skill-category\"><h3>{}</h3><ul class=\"tags\">{tags}</ul></div>",
            self.ctx.escape(&category.name)
        )
    }
}

/// Variants become CSS class suffixes; anything outside `[a-z0-9-]` is dropped.
fn variant_class(variant: Option<&str>) -> Option<String> {
    let variant = variant?.to_ascii_lowercase();
    if variant.is_empty()
        || !variant
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return None;
    }
    Some(variant)
}

impl SectionRenderer for HtmlSectionRenderer {
    fn render(&self, section: &Section, variant: Option<&str>) -> String {
        let kind = section.kind.as_str();
        let mut class = format!("resume-section resume-section--{kind}");
        if let Some(v) = variant_class(variant) {
            class.push_str(&format!(" resume-section--{kind}-{v}"));
        }

        let body: String = if section.uses_categories() {
            section
                .categories
                .iter()
                .map(|c| self.render_category(c))
                .collect()
        } else {
            section.items.iter().map(|i| self.render_item(i)).collect()
        };

        format!(
            "<section class=\"{class}\"><h2>{}</h2>{body}</section>",
            self.ctx.escape(&section.title)
        )
    }

    fn render_reserved(&self, key: &SectionKey, info: &PersonalInfo) -> String {
        if key.title == "name" {
            return format!(
                "<header class=\"resume-name\"><h1>{}</h1><p>{}</p></header>",
                self.ctx.escape(&info.name),
                self.ctx.escape(&info.headline)
            );
        }

        let mut parts = vec![
            info.email.as_str(),
            info.phone.as_str(),
            info.location.as_str(),
        ];
        parts.extend(info.links.iter().map(String::as_str));
        let contact = self.ctx.call("join", &parts);
        format!(
            "<div class=\"personal-info\">{}</div>",
            self.ctx.escape(&contact)
        )
    }
}
