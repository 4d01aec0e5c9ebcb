//! JSON parsing for API responses and for objects embedded in page scripts.
//!
//! Summary and reader pages ship their state as
//! `window.project_data = {...};` followed by more script. The object is
//! located with a bracket-depth scan that understands JSON string literals,
//! so whatever follows the closing brace never leaks into the parse.
//!
//! # Examples
//!
//! ```rust
//! use mangadraft::net::json;
//! use serde_json::Value;
//!
//! let page = r#"<script>window.project_data = {"a": "};"};var x = 1;</script>"#;
//! let data: Value = json::extract_embedded(page, "window.project_data", "demo").unwrap();
//! assert_eq!(data["a"], "};");
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::error::Category;

use super::{Response, html, validate_response};
use crate::error::{EmbeddedDataIssue, Error, Result};

/// Global variable holding project state on summary and reader pages.
pub const PROJECT_DATA_VAR: &str = "window.project_data";

static PROJECT_DATA_ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    assignment_pattern(PROJECT_DATA_VAR).expect("Failed to build project_data pattern")
});

/// Validates the status of `response` and parses its body as JSON.
///
/// # Errors
///
/// * Any status error from [`validate_response`]
/// * [`Error::MalformedUpstreamJson`] if the body does not parse into `T`
pub fn parse_response<T>(response: Response, purpose: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let body = validate_response(response, purpose)?;
    serde_json::from_str(&body).map_err(|e| {
        tracing::error!("response is not valid JSON [{}]: {}", purpose, e);
        Error::malformed_json(purpose, e)
    })
}

/// Extracts and deserializes the `window.project_data` object from a page.
pub fn extract_project_data<T>(html: &str, purpose: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    extract_with(html, PROJECT_DATA_VAR, &PROJECT_DATA_ASSIGNMENT, purpose)
}

/// Extracts and deserializes the object assigned to `variable` in a page.
///
/// Inline script bodies mentioning the variable are searched first; when no
/// script does, the whole document is scanned instead.
///
/// # Errors
///
/// [`Error::MalformedEmbeddedData`] carrying
/// * [`EmbeddedDataIssue::DeclarationNotFound`] when `variable` never occurs
/// * [`EmbeddedDataIssue::MalformedAssignment`] when it occurs but is never
///   assigned an object literal
/// * [`EmbeddedDataIssue::InvalidJson`] when the object is unterminated or is
///   not valid JSON
/// * [`EmbeddedDataIssue::UnexpectedStructure`] when it is valid JSON of the
///   wrong shape for `T`
pub fn extract_embedded<T>(html: &str, variable: &str, purpose: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let pattern = assignment_pattern(variable)
        .map_err(|e| Error::parse(format!("Invalid variable name {:?}: {}", variable, e)))?;
    extract_with(html, variable, &pattern, purpose)
}

fn assignment_pattern(variable: &str) -> std::result::Result<Regex, regex::Error> {
    // Group 1 catches the second `=` of a comparison.
    Regex::new(&format!(r"(?:^|[^\w$.]){}\b\s*=(=?)", regex::escape(variable)))
}

fn extract_with<T>(html: &str, variable: &str, pattern: &Regex, purpose: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let mut candidates = html::scripts_containing(html, variable);
    if candidates.is_empty() {
        candidates.push(html.to_string());
    }

    let mut issue = EmbeddedDataIssue::DeclarationNotFound;
    for text in &candidates {
        let start = match locate_object(text, variable, pattern) {
            Ok(start) => start,
            Err(found) => {
                if found == EmbeddedDataIssue::MalformedAssignment {
                    issue = found;
                }
                continue;
            }
        };

        let end = find_object_end(text, start).ok_or_else(|| {
            Error::embedded(
                variable,
                purpose,
                EmbeddedDataIssue::InvalidJson("object is never closed".to_string()),
            )
        })?;

        let span = &text[start..end];
        tracing::debug!(variable, bytes = span.len(), "extracted embedded object");

        return serde_json::from_str(span).map_err(|e| {
            let issue = match e.classify() {
                Category::Data => EmbeddedDataIssue::UnexpectedStructure(e.to_string()),
                _ => EmbeddedDataIssue::InvalidJson(e.to_string()),
            };
            let error = Error::embedded(variable, purpose, issue);
            tracing::error!("{}", error);
            error
        });
    }

    Err(Error::embedded(variable, purpose, issue))
}

/// Byte offset of the `{` opening the object assigned to `variable`.
fn locate_object(
    text: &str,
    variable: &str,
    pattern: &Regex,
) -> std::result::Result<usize, EmbeddedDataIssue> {
    if !text.contains(variable) {
        return Err(EmbeddedDataIssue::DeclarationNotFound);
    }

    for caps in pattern.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if caps.get(1).is_some_and(|m| !m.as_str().is_empty()) {
            continue;
        }

        let rest = &text[whole.end()..];
        let value = rest.trim_start();
        if value.starts_with('{') {
            return Ok(whole.end() + (rest.len() - value.len()));
        }
    }

    Err(EmbeddedDataIssue::MalformedAssignment)
}

/// Finds the end (exclusive) of the JSON object opening at `start`.
///
/// Walks the text tracking brace depth, ignoring braces inside string
/// literals and honoring backslash escapes. Returns `None` when the object is
/// never closed.
pub fn find_object_end(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.get(start) != Some(&b'{') {
        return None;
    }

    let mut depth = 0_usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => depth += 1,
            b'}' | b']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(start + offset + 1);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_find_object_end_respects_strings() {
        let text = r#"{"a": "}", "b": {"c": "\"{"}} trailing }"#;
        let end = find_object_end(text, 0).unwrap();
        assert_eq!(&text[..end], r#"{"a": "}", "b": {"c": "\"{"}}"#);
    }

    #[test]
    fn test_find_object_end_unterminated() {
        assert_eq!(find_object_end(r#"{"a": {"b": 1}"#, 0), None);
        assert_eq!(find_object_end("x{}", 0), None);
    }

    #[test]
    fn test_trailing_content_is_ignored() {
        let embedded = json!({"project": {"name": "Le Chat; {noir}"}, "list": [1, 2]});
        for trailing in ["", ";", ";var next = {\"x\": 1};", "; </script><div>}</div>"] {
            let page = format!("<script>window.project_data = {}{}</script>", embedded, trailing);
            let parsed: Value = extract_project_data(&page, "test").unwrap();
            assert_eq!(parsed, embedded, "trailing content: {:?}", trailing);
        }
    }

    #[test]
    fn test_spacing_variants() {
        for assignment in ["window.project_data={\"a\":1};", "window.project_data =\n  {\"a\":1};"] {
            let parsed: Value = extract_project_data(assignment, "test").unwrap();
            assert_eq!(parsed, json!({"a": 1}));
        }
    }

    #[test]
    fn test_comparison_is_not_an_assignment() {
        let page = r#"<script>if (window.project_data == null) {}
            window.project_data = {"a": 2};</script>"#;
        let parsed: Value = extract_project_data(page, "test").unwrap();
        assert_eq!(parsed, json!({"a": 2}));
    }

    #[test]
    fn test_declaration_not_found() {
        let error = extract_project_data::<Value>("<script>var x = {};</script>", "purpose label")
            .unwrap_err();
        match error {
            Error::MalformedEmbeddedData { issue, purpose, .. } => {
                assert_eq!(issue, EmbeddedDataIssue::DeclarationNotFound);
                assert_eq!(purpose, "purpose label");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_assignment() {
        let page = "<script>window.project_data = null;</script>";
        let error = extract_project_data::<Value>(page, "purpose label").unwrap_err();
        assert!(matches!(
            error,
            Error::MalformedEmbeddedData {
                issue: EmbeddedDataIssue::MalformedAssignment,
                ..
            }
        ));
        assert!(error.to_string().contains("[purpose label]"));
    }

    #[test]
    fn test_invalid_json() {
        let page = "<script>window.project_data = {name: 'single quotes'};</script>";
        let error = extract_project_data::<Value>(page, "purpose label").unwrap_err();
        assert!(matches!(
            error,
            Error::MalformedEmbeddedData {
                issue: EmbeddedDataIssue::InvalidJson(_),
                ..
            }
        ));
        assert!(error.is_reportable());
    }

    #[test]
    fn test_wrong_shape_is_unexpected_structure() {
        #[derive(Debug, serde::Deserialize)]
        struct Reader {
            #[allow(dead_code)]
            first_page: Value,
        }

        let page = r#"<script>window.project_data = {"project": {}};</script>"#;
        let error = extract_project_data::<Reader>(page, "purpose label").unwrap_err();
        match error {
            Error::MalformedEmbeddedData {
                issue: EmbeddedDataIssue::UnexpectedStructure(reason),
                ..
            } => assert!(reason.contains("first_page")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_custom_variable() {
        let page = r#"<script>window.reader_state = {"page": 3};</script>"#;
        let parsed: Value = extract_embedded(page, "window.reader_state", "test").unwrap();
        assert_eq!(parsed["page"], 3);
    }

    #[test]
    fn test_parse_response() {
        let parsed: Value = parse_response(Response::new(200, r#"{"data": []}"#), "test").unwrap();
        assert_eq!(parsed, json!({"data": []}));

        let error = parse_response::<Value>(Response::new(200, "<html>"), "label").unwrap_err();
        assert!(matches!(error, Error::MalformedUpstreamJson { .. }));
        assert!(error.to_string().starts_with("Response is not valid JSON"));
        assert!(error.to_string().ends_with("[label]"));

        let error = parse_response::<Value>(Response::new(404, ""), "label").unwrap_err();
        assert!(matches!(error, Error::NotFound { .. }));
    }
}
