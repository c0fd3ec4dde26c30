//! Template renderer.

use super::context::TemplateContext;
use super::{TemplateDocument, TemplateError};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use handlebars::{
    no_escape, Context, Handlebars, Helper, HelperResult, Output, RenderContext, RenderErrorReason,
};
use serde_json::Value;

/// Format used by `format_date` when the template gives none.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Creates a configured Handlebars registry with custom helpers.
///
/// The registry is configured with:
/// - No HTML escaping (for markdown output)
/// - Lenient lookups (unknown placeholders render as nothing)
/// - `format_date` helper for the injected timestamp
#[must_use]
pub fn create_handlebars_registry() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();

    // Disable HTML escaping for markdown output
    hbs.register_escape_fn(no_escape);

    hbs.set_strict_mode(false);

    hbs.register_helper("format_date", Box::new(format_date_helper));

    hbs
}

/// Formats a timestamp in templates.
///
/// Usage: `{{format_date date}}` or `{{format_date date "%B %-d, %Y"}}`
///
/// The value may be milliseconds since the epoch or an RFC 3339 string; the
/// format uses `strftime` syntax.
fn format_date_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let value = h
        .param(0)
        .map(|p| p.value())
        .ok_or(RenderErrorReason::ParamNotFoundForIndex("format_date", 0))?;

    let format = match h.param(1) {
        Some(p) => p
            .value()
            .as_str()
            .ok_or(RenderErrorReason::InvalidParamType("string"))?,
        None => DEFAULT_DATE_FORMAT,
    };

    let timestamp = parse_timestamp(value).ok_or_else(|| {
        RenderErrorReason::Other(format!("format_date: cannot interpret {value} as a date"))
    })?;
    let formatted = format_timestamp(&timestamp, format).ok_or_else(|| {
        RenderErrorReason::Other(format!("format_date: invalid format string '{format}'"))
    })?;

    out.write(&formatted)?;
    Ok(())
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => DateTime::from_timestamp_millis(n.as_i64()?),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|d| d.with_timezone(&Utc)),
        _ => None,
    }
}

/// Formats with `strftime` syntax, or `None` if the format is invalid.
fn format_timestamp(timestamp: &DateTime<Utc>, format: &str) -> Option<String> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return None;
    }
    Some(timestamp.format(format).to_string())
}

/// Title and body after placeholder substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTemplate {
    pub title: String,
    pub body: String,
}

/// Template renderer for discussion templates.
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Creates a new template renderer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlebars: create_handlebars_registry(),
        }
    }

    /// Renders the title and body of a template document.
    ///
    /// # Errors
    ///
    /// Returns an error if either template fails to render.
    pub fn render(
        &self,
        document: &TemplateDocument,
        context: &TemplateContext,
    ) -> Result<RenderedTemplate, TemplateError> {
        let data = context.to_value().map_err(|e| {
            TemplateError::Render(RenderErrorReason::Other(e.to_string()).into())
        })?;

        Ok(RenderedTemplate {
            title: self.render_template(&document.attributes.title, &data)?,
            body: self.render_template(&document.body, &data)?,
        })
    }

    /// Renders a single template string with the given data.
    pub fn render_template(&self, template: &str, data: &Value) -> Result<String, TemplateError> {
        Ok(self.handlebars.render_template(template, data)?)
    }
}
