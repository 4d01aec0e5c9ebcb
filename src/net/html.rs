//! HTML helpers for pulling inline script text out of a page.
//!
//! Pages on the site carry their state in `<script>` blocks. Narrowing the
//! search to script bodies keeps text that merely looks like an assignment
//! (in attributes or visible copy) from being picked up.
//!
//! ```rust
//! use mangadraft::net::html;
//!
//! let page = r#"<html><body><script>window.a = {"x": 1};</script></body></html>"#;
//! let scripts = html::script_bodies(page);
//! assert_eq!(scripts, vec![r#"window.a = {"x": 1};"#.to_string()]);
//! ```

use scraper::{Html, Selector};

/// Returns the text of every inline `<script>` element, in document order.
///
/// External scripts (`src=...`) and empty blocks are skipped.
pub fn script_bodies(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    Selector::parse("script")
        .ok()
        .map(|sel| {
            document
                .select(&sel)
                .filter(|el| el.value().attr("src").is_none())
                .map(|el| el.text().collect::<String>())
                .filter(|text| !text.trim().is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Returns the script bodies that mention `needle`.
pub fn scripts_containing(html: &str, needle: &str) -> Vec<String> {
    script_bodies(html)
        .into_iter()
        .filter(|text| text.contains(needle))
        .collect()
}
