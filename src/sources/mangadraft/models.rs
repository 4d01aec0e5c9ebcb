//! Upstream MangaDraft records.
//!
//! Only the fields the source reads are modelled; the embedded project blob
//! carries a lot more.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

/// Language codes indexed by the site's numeric language id.
pub const LANGUAGE_CODES: [Option<&str>; 11] = [
    None,
    Some("en"),
    None,
    Some("fr"),
    Some("it"),
    Some("es"),
    Some("de"),
    Some("pl"),
    Some("pt"),
    Some("fi"),
    Some("jp"),
];

/// English language names, same indexing as [`LANGUAGE_CODES`].
pub const LANGUAGE_NAMES: [Option<&str>; 11] = [
    None,
    Some("English"),
    None,
    Some("French"),
    Some("Italian"),
    Some("Spanish"),
    Some("German"),
    Some("Polish"),
    Some("Portuguese"),
    Some("Finnish"),
    Some("Japanese"),
];

pub fn language_code(language: i64) -> Option<&'static str> {
    usize::try_from(language)
        .ok()
        .and_then(|index| LANGUAGE_CODES.get(index).copied().flatten())
}

pub fn language_name(language: i64) -> Option<&'static str> {
    usize::try_from(language)
        .ok()
        .and_then(|index| LANGUAGE_NAMES.get(index).copied().flatten())
}

/// The `window.project_data` object of a summary or reader page.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectData {
    pub project: Project,
    #[serde(default)]
    pub summary: Summary,
}

/// The `window.project_data` object of a reader page, reduced to what the
/// page listing needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ReaderData {
    pub first_page: FirstPage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FirstPage {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub slug: Option<String>,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub language: i64,
    pub project_status_id: i64,
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Genre {
    pub id: i64,
    #[serde(default)]
    pub slug: Option<String>,
    pub name: String,
}

/// How a project organizes its chapters.
///
/// `CHAPTER` maps a tome id (or the root id) to its chapters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Summary {
    #[serde(rename = "TOME", default, deserialize_with = "list_or_empty_object")]
    pub tomes: Vec<Tome>,
    #[serde(rename = "ROOT", default, deserialize_with = "list_or_empty_object")]
    pub root: Vec<Tome>,
    #[serde(rename = "CHAPTER", default, deserialize_with = "map_or_empty_list")]
    pub chapters: HashMap<String, Vec<UpstreamChapter>>,
}

/// A tome (volume) or the root container; only the id matters.
#[derive(Debug, Clone, Deserialize)]
pub struct Tome {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamChapter {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub published_at: Option<String>,
}

impl UpstreamChapter {
    /// Parses `published_at`, accepting RFC 3339 and the site's
    /// `YYYY-MM-DD HH:MM:SS` form (taken as UTC).
    pub fn published(&self) -> Option<DateTime<Utc>> {
        let raw = self.published_at.as_deref()?.trim();

        if let Ok(time) = DateTime::parse_from_rfc3339(raw) {
            return Some(time.with_timezone(&Utc));
        }

        ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
            .map(|naive| naive.and_utc())
    }
}

/// Response of `/api/reader/listPages`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListPagesResponse {
    pub data: Vec<PageEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageEntry {
    /// Chapter id the page belongs to
    pub cat: i64,
    pub url: String,
}

/// Response of `/api/search/autocomplete` and `/api/catalog/projects`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectListResponse {
    pub data: Vec<ProjectListItem>,
}

/// One entry of a project listing.
///
/// Autocomplete mixes comics with users and other project kinds whose
/// shapes differ, so everything except `type` is optional here and checked
/// only once an entry is kept. Catalog entries carry both `name` and `title`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProjectListItem {
    pub slug: Option<String>,
    pub name: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub avatar: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ProjectListItem {
    pub fn is_comic(&self) -> bool {
        self.kind == "comics"
    }
}

// PHP serializes empty arrays and empty maps the same way, so an empty
// `TOME` can arrive as `{}` and an empty `CHAPTER` as `[]`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListOrMap<T> {
    List(Vec<T>),
    Map(HashMap<String, T>),
}

fn list_or_empty_object<'de, D>(deserializer: D) -> Result<Vec<Tome>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match ListOrMap::<Tome>::deserialize(deserializer)? {
        ListOrMap::List(list) => list,
        ListOrMap::Map(map) => {
            let mut entries: Vec<(String, Tome)> = map.into_iter().collect();
            entries.sort_by_key(|(key, _)| key.parse::<i64>().unwrap_or(i64::MAX));
            entries.into_iter().map(|(_, tome)| tome).collect()
        }
    })
}

fn map_or_empty_list<'de, D>(
    deserializer: D,
) -> Result<HashMap<String, Vec<UpstreamChapter>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        match ListOrMap::<Vec<UpstreamChapter>>::deserialize(deserializer)? {
            ListOrMap::Map(map) => map,
            ListOrMap::List(lists) => lists
                .into_iter()
                .enumerate()
                .map(|(index, chapters)| (index.to_string(), chapters))
                .collect(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_lookup() {
        assert_eq!(language_code(3), Some("fr"));
        assert_eq!(language_code(10), Some("jp"));
        assert_eq!(language_code(0), None);
        assert_eq!(language_code(2), None);
        assert_eq!(language_code(11), None);
        assert_eq!(language_code(-1), None);
        assert_eq!(language_name(1), Some("English"));
    }

    #[test]
    fn test_published_formats() {
        let chapter = |published: &str| UpstreamChapter {
            id: 1,
            name: "c".to_string(),
            published_at: Some(published.to_string()),
        };

        let expected = NaiveDate::from_ymd_opt(2021, 5, 3)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap()
            .and_utc();

        assert_eq!(chapter("2021-05-03 12:30:00").published(), Some(expected));
        assert_eq!(chapter("2021-05-03T12:30:00").published(), Some(expected));
        assert_eq!(chapter("2021-05-03T14:30:00+02:00").published(), Some(expected));
        assert!(chapter("2021-05-03").published().is_some());
        assert_eq!(chapter("yesterday").published(), None);
    }

    #[test]
    fn test_summary_accepts_php_empty_containers() {
        let summary: Summary =
            serde_json::from_str(r#"{"TOME": {}, "ROOT": [{"id": 9}], "CHAPTER": {"9": []}}"#)
                .unwrap();
        assert!(summary.tomes.is_empty());
        assert_eq!(summary.root[0].id, 9);

        let summary: Summary = serde_json::from_str(r#"{"TOME": [], "CHAPTER": []}"#).unwrap();
        assert!(summary.chapters.is_empty());
        assert!(summary.root.is_empty());
    }

    #[test]
    fn test_project_list_item_kind() {
        let item: ProjectListItem = serde_json::from_str(
            r#"{"slug": "a", "title": "A", "subtitle": "by b", "avatar": "x.png", "type": "comics"}"#,
        )
        .unwrap();
        assert!(item.is_comic());
        assert_eq!(item.title.as_deref(), Some("A"));
        assert!(item.name.is_none());
        assert_eq!(item.subtitle.as_deref(), Some("by b"));
    }

    #[test]
    fn test_catalog_item_with_name_and_title() {
        let listing: ProjectListResponse = serde_json::from_str(
            r#"{"data":[{"slug":"a","name":"A","title":"A title","subtitle":"s","avatar":"x","type":"comics"}]}"#,
        )
        .unwrap();
        assert_eq!(listing.data[0].name.as_deref(), Some("A"));
        assert_eq!(listing.data[0].title.as_deref(), Some("A title"));
    }

    #[test]
    fn test_listing_tolerates_other_shapes() {
        let listing: ProjectListResponse = serde_json::from_str(
            r#"{"data":[{"slug":"a","name":"A","avatar":"x","type":"comics"},{"name":"some user","avatar":"u","type":"users"}]}"#,
        )
        .unwrap();
        assert_eq!(listing.data.len(), 2);
        assert!(listing.data[0].is_comic());
        assert!(!listing.data[1].is_comic());
        assert!(listing.data[1].slug.is_none());
    }

    #[test]
    fn test_missing_status_is_rejected() {
        let result = serde_json::from_value::<Project>(serde_json::json!({
            "name": "A",
            "avatar": "x",
            "user": {"name": "b"}
        }));
        assert!(result.is_err());
    }
}
