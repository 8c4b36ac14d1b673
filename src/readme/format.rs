// src/readme/format.rs
// =============================================================================
// Turns gists into the markdown bullet list that goes into the README.
//
// One line per gist, in the order we got them:
//   - [description](https://gist.github.com/...) (2024-01-31) `Rust`
//
// A gist that cannot be rendered is logged and skipped; the rest of the list
// is still produced.
// =============================================================================

use crate::error::FormatError;
use crate::github::GistRecord;
use chrono::DateTime;
use tracing::warn;
use url::Url;

pub const NO_DESCRIPTION: &str = "(Sin descripción)";
pub const NO_DATE: &str = "sin fecha";
pub const EMPTY_LIST: &str = "_No hay gists públicos todavía._";

/// Renders the whole list, or the empty-state sentence when nothing renders
pub fn format_gists(gists: &[GistRecord]) -> String {
    let lines: Vec<String> = gists
        .iter()
        .filter_map(|gist| match format_entry(gist) {
            Ok(line) => Some(line),
            Err(e) => {
                warn!(error = %e, "skipping gist");
                None
            }
        })
        .collect();

    if lines.is_empty() {
        EMPTY_LIST.to_string()
    } else {
        lines.join("\n")
    }
}

/// Renders a single gist as one markdown bullet
pub fn format_entry(gist: &GistRecord) -> Result<String, FormatError> {
    let url = checked_link(&gist.url)?;
    let description = one_line(gist.description.as_deref());
    let date = short_date(&gist.created_at);

    let mut line = format!("- [{}]({}) ({})", description, url, date);
    if let Some(language) = gist.primary_language() {
        line.push_str(&format!(" `{}`", language.trim()));
    }
    Ok(line)
}

// The link must be an absolute http(s) URL or the bullet is useless
fn checked_link(raw: &str) -> Result<&str, FormatError> {
    let raw = raw.trim();
    let invalid = |reason: String| FormatError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };

    let parsed = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(raw),
        other => Err(invalid(format!("unsupported scheme '{}'", other))),
    }
}

// The description becomes the text of a markdown link, so:
// - line breaks would end the bullet early, collapse them to spaces
// - a stray `[` or `]` would end the link text early, escape them
//   (and escape `\` too, so an existing backslash stays literal)
fn one_line(description: Option<&str>) -> String {
    let text = description
        .map(|d| d.split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default();

    if text.is_empty() {
        return NO_DESCRIPTION.to_string();
    }

    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '[' | ']') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// "2024-01-31T10:00:00Z" -> "2024-01-31"
// Unparseable timestamps fall back to their first 10 characters, and
// anything shorter than that to NO_DATE.
fn short_date(created_at: &str) -> String {
    let raw = created_at.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format("%Y-%m-%d").to_string();
    }

    match raw.get(..10) {
        Some(prefix) => prefix.to_string(),
        None => NO_DATE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn gist(description: Option<&str>, url: &str, created_at: &str, language: Option<&str>) -> GistRecord {
        serde_json::from_value(json!({
            "description": description,
            "html_url": url,
            "created_at": created_at,
            "files": { "snippet": { "language": language } }
        }))
        .unwrap()
    }

    #[test]
    fn test_format_full_entry() {
        let g = gist(
            Some("Backup script"),
            "https://gist.github.com/abc",
            "2024-01-31T10:00:00Z",
            Some("Shell"),
        );
        assert_eq!(
            format_entry(&g).unwrap(),
            "- [Backup script](https://gist.github.com/abc) (2024-01-31) `Shell`"
        );
    }

    #[test]
    fn test_missing_description_and_language() {
        let g = gist(None, "https://gist.github.com/abc", "2024-01-31T10:00:00Z", None);
        assert_eq!(
            format_entry(&g).unwrap(),
            "- [(Sin descripción)](https://gist.github.com/abc) (2024-01-31)"
        );
    }

    #[test]
    fn test_blank_description_uses_placeholder() {
        let g = gist(Some("   "), "https://gist.github.com/abc", "2024-01-31T10:00:00Z", None);
        assert!(format_entry(&g).unwrap().starts_with("- [(Sin descripción)]"));
    }

    #[test]
    fn test_multiline_description_is_flattened() {
        let g = gist(
            Some("first line\nsecond  line"),
            "https://gist.github.com/abc",
            "2024-01-31T10:00:00Z",
            None,
        );
        assert!(format_entry(&g).unwrap().starts_with("- [first line second line]"));
    }

    #[test]
    fn test_brackets_in_description_are_escaped() {
        let g = gist(
            Some("fix ] and [ in C:\\tmp"),
            "https://gist.github.com/abc",
            "2024-01-31T10:00:00Z",
            None,
        );
        assert_eq!(
            format_entry(&g).unwrap(),
            "- [fix \\] and \\[ in C:\\\\tmp](https://gist.github.com/abc) (2024-01-31)"
        );
    }

    #[test]
    fn test_date_fallbacks() {
        assert_eq!(short_date("2024-01-31T23:59:59-05:00"), "2024-01-31");
        assert_eq!(short_date("2024-01-31 garbage"), "2024-01-31");
        assert_eq!(short_date("yesterday"), NO_DATE);
        assert_eq!(short_date(""), NO_DATE);
    }

    #[test]
    fn test_malformed_date_does_not_fail_entry() {
        let g = gist(Some("x"), "https://gist.github.com/abc", "31/01/2024 10:00", None);
        assert_eq!(
            format_entry(&g).unwrap(),
            "- [x](https://gist.github.com/abc) (31/01/2024)"
        );
    }

    #[test]
    fn test_empty_list_uses_empty_state() {
        assert_eq!(format_gists(&[]), EMPTY_LIST);
    }

    #[test]
    fn test_bad_url_is_skipped_not_fatal() {
        let gists = vec![
            gist(Some("broken"), "", "2024-01-01T00:00:00Z", None),
            gist(Some("ok"), "https://gist.github.com/ok", "2024-01-02T00:00:00Z", None),
        ];
        assert_eq!(
            format_gists(&gists),
            "- [ok](https://gist.github.com/ok) (2024-01-02)"
        );
    }

    #[test]
    fn test_only_bad_entries_gives_empty_state() {
        let gists = vec![gist(Some("broken"), "javascript:alert(1)", "2024-01-01T00:00:00Z", None)];
        assert_eq!(format_gists(&gists), EMPTY_LIST);
    }

    #[test]
    fn test_order_is_preserved_and_deterministic() {
        let gists = vec![
            gist(Some("newest"), "https://gist.github.com/2", "2024-02-01T00:00:00Z", None),
            gist(Some("older"), "https://gist.github.com/1", "2024-01-01T00:00:00Z", Some("Rust")),
        ];
        let expected = "- [newest](https://gist.github.com/2) (2024-02-01)\n\
                        - [older](https://gist.github.com/1) (2024-01-01) `Rust`";
        assert_eq!(format_gists(&gists), expected);
        assert_eq!(format_gists(&gists), format_gists(&gists));
    }
}
