//! Text rendering for message and report payloads.
//!
//! Provides the `{}` placeholder substitution used for format/argument
//! pairs, a width-bounded structural dump for arbitrary payloads, and the
//! [`ReportRenderer`] capability used for verbose crash and supervisor
//! reports.

use std::{fmt, sync::Arc};

use serde_json::Value;

use crate::event::ReportKind;

/// Maximum number of characters produced by [`bounded_dump`].
pub const DEFAULT_DUMP_WIDTH: usize = 4096;

const TRUNCATION_MARKER: &str = "...";

/// Render a value as text: strings without quotes, anything else as compact
/// JSON.
pub fn render_bare(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render `value` bare, truncated to at most `width` characters.
///
/// Truncated output ends with `...` and still respects the width limit; the
/// marker itself is cut short when `width` is below three.
pub fn bounded_dump(value: &Value, width: usize) -> String {
    let rendered = render_bare(value);
    if rendered.chars().count() <= width {
        return rendered;
    }
    // The marker is ASCII, so slicing it by byte count is safe.
    let marker = &TRUNCATION_MARKER[..TRUNCATION_MARKER.len().min(width)];
    let keep = width - marker.len();
    let mut out: String = rendered.chars().take(keep).collect();
    out.push_str(marker);
    out
}

/// Substitute `{}` placeholders in `format` with `args` in order.
///
/// `{{` and `}}` produce literal braces. Placeholders left without an
/// argument stay as `{}`; surplus arguments are appended, each preceded by a
/// single space.
pub fn render_format(format: &str, args: &[Value]) -> String {
    let mut out = String::with_capacity(format.len());
    let mut remaining = args.iter();
    let mut chars = format.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek().copied()) {
            ('{', Some('{')) => {
                chars.next();
                out.push('{');
            }
            ('}', Some('}')) => {
                chars.next();
                out.push('}');
            }
            ('{', Some('}')) => {
                chars.next();
                match remaining.next() {
                    Some(arg) => out.push_str(&render_bare(arg)),
                    None => out.push_str("{}"),
                }
            }
            _ => out.push(c),
        }
    }
    for arg in remaining {
        out.push(' ');
        out.push_str(&render_bare(arg));
    }
    out
}

/// Capability producing the verbose text of crash and supervisor reports.
pub trait ReportRenderer: Send + Sync {
    fn render(&self, kind: &ReportKind, payload: &Value) -> String;
}

/// Default renderer: a header line followed by the pretty-printed payload.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrettyReportRenderer;

impl ReportRenderer for PrettyReportRenderer {
    fn render(&self, kind: &ReportKind, payload: &Value) -> String {
        let body = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
        format!("{kind} report\n{body}")
    }
}

/// Shared renderer trait object held by the handler.
#[derive(Clone)]
pub struct SharedRenderer {
    inner: Arc<dyn ReportRenderer>,
}

impl SharedRenderer {
    pub fn new<R>(renderer: R) -> Self
    where
        R: ReportRenderer + 'static,
    {
        Self {
            inner: Arc::new(renderer),
        }
    }

    pub fn render(&self, kind: &ReportKind, payload: &Value) -> String {
        self.inner.render(kind, payload)
    }
}

impl Default for SharedRenderer {
    fn default() -> Self {
        Self::new(PrettyReportRenderer)
    }
}

impl fmt::Debug for SharedRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedRenderer(<dyn ReportRenderer>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("plain text", vec![], "plain text")]
    #[case("{} of {}", vec![json!(3), json!("five")], "3 of five")]
    #[case("{{literal}} {}", vec![json!(true)], "{literal} true")]
    #[case("missing {} and {}", vec![json!(1)], "missing 1 and {}")]
    #[case("extra", vec![json!("a"), json!([1, 2])], "extra a [1,2]")]
    fn formats_placeholders(#[case] fmt: &str, #[case] args: Vec<Value>, #[case] expected: &str) {
        assert_eq!(render_format(fmt, &args), expected);
    }

    #[test]
    fn bare_rendering_unquotes_strings_only() {
        assert_eq!(render_bare(&json!("shutdown")), "shutdown");
        assert_eq!(render_bare(&json!({"k": "v"})), r#"{"k":"v"}"#);
    }

    #[test]
    fn bounded_dump_truncates_at_width() {
        let value = json!("x".repeat(100));
        let dumped = bounded_dump(&value, 10);
        assert_eq!(dumped, "xxxxxxx...");
        assert_eq!(dumped.chars().count(), 10);
    }

    #[rstest]
    #[case(0, "")]
    #[case(2, "..")]
    #[case(3, "...")]
    #[case(4, "a...")]
    fn bounded_dump_never_exceeds_narrow_widths(#[case] width: usize, #[case] expected: &str) {
        assert_eq!(bounded_dump(&json!("abcdef"), width), expected);
    }

    #[test]
    fn bounded_dump_respects_char_boundaries() {
        let value = json!("ééééé");
        assert_eq!(bounded_dump(&value, 4), "é...");
    }

    #[test]
    fn pretty_renderer_spans_multiple_lines() {
        let text = PrettyReportRenderer.render(&ReportKind::Crash, &json!({"reason": "badarg"}));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "crash report");
        assert!(lines.len() > 2);
        assert!(text.contains("\"reason\": \"badarg\""));
    }
}
