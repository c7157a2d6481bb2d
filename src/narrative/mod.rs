//! Executive-summary narrative from a generative-text service

mod gemini;

pub use gemini::{GeminiClient, NarrativeConfig, DEFAULT_API_BASE, DEFAULT_MODEL};

use crate::error::{Error, Result};
use crate::metrics::Insights;
use regex::Regex;
use std::sync::LazyLock;

static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*(.*?)\*\*").expect("BUG: invalid BOLD_RE regex literal")
});

/// Something that turns a prompt into free text.
pub trait NarrativeService {
    fn complete(&self, prompt: &str) -> Result<String>;
}

/// Ask `service` for a summary of `insights`, with `**bold**` rewritten to `<b>bold</b>`
pub fn generate<S>(service: &S, insights: &Insights) -> Result<String>
where
    S: NarrativeService + ?Sized,
{
    log::info!("Generating narrative");
    let prompt = build_prompt(insights);
    log::debug!("Prompt is {} characters", prompt.len());

    let text = service.complete(&prompt)?;
    if text.trim().is_empty() {
        return Err(Error::NarrativeService(
            "service returned an empty response".to_string(),
        ));
    }
    log::info!("Narrative received ({} characters)", text.len());
    Ok(bold_to_markup(&text))
}

pub fn build_prompt(insights: &Insights) -> String {
    format!(
        "You are an expert AdTech analyst. Write a highly professional executive summary.

Use this formatting:
- For bold text, ALWAYS wrap with double asterisks like **this**.
- Do NOT use HTML tags.

Base the summary on these metrics:

- Total Impressions: {}
- Total Revenue: {:.2}
- Average Revenue Share %: {:.2}%
- Viewability Rate (%): {:.2}%
- Viewable Impressions: {}
- Measurable Impressions: {}

Provide key trends, insights, and actionable recommendations.
",
        insights.total_impressions,
        insights.total_revenue,
        insights.average_revenue_share,
        insights.viewability_rate,
        insights.total_viewable_impressions,
        insights.total_measurable_impressions,
    )
}

/// Rewrite each `**phrase**` span as `<b>phrase</b>`, leftmost first, never across lines
pub fn bold_to_markup(text: &str) -> String {
    BOLD_RE.replace_all(text, "<b>$1</b>").into_owned()
}
