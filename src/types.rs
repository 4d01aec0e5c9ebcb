//! Host-facing data types.
//!
//! These are the shapes a manga reader host consumes: manga details, chapter
//! lists, chapter page lists, search results and homepage sections. They are
//! plain data, built by pure functions and serializable for hosts that talk
//! JSON across a plugin boundary.
//!
//! # Examples
//!
//! ```rust
//! use mangadraft::types::{SearchRequestBuilder, Tag};
//!
//! let request = SearchRequestBuilder::default()
//!     .included_tags(vec![Tag::new("action", "Action")])
//!     .build()
//!     .unwrap();
//!
//! assert!(request.title.is_none());
//! assert_eq!(request.included_tags[0].id, "action");
//! ```

use chrono::{DateTime, Utc};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A manga as shown on its detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceManga {
    /// Identifier within the source (the project slug)
    pub id: String,

    pub info: MangaInfo,
}

/// Descriptive metadata for a manga.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MangaInfo {
    /// Titles, main title first
    pub titles: Vec<String>,

    /// Cover image URL
    pub image: String,

    /// Banner image URL
    pub banner: Option<String>,

    pub author: String,
    pub artist: String,

    /// Description/summary
    pub description: String,

    pub status: MangaStatus,

    /// Adult content flag, used by hosts for content-rating gating
    pub hentai: bool,

    #[serde(default)]
    pub tags: Vec<TagSection>,
}

/// Publication status of a manga.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MangaStatus {
    Ongoing,
    Completed,
    OnHiatus,
}

impl MangaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MangaStatus::Ongoing => "Ongoing",
            MangaStatus::Completed => "Completed",
            MangaStatus::OnHiatus => "On Hiatus",
        }
    }
}

impl fmt::Display for MangaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single searchable tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub label: String,
}

impl Tag {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// A named group of tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSection {
    pub id: String,
    pub label: String,
    pub tags: Vec<Tag>,
}

/// A chapter entry in a manga's chapter list.
///
/// `number` is the position of the chapter in reading order, starting at 1.
/// `volume` is only set for projects organized in tomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    /// Identifier within the source
    pub id: String,

    /// Sequential chapter number
    pub number: u32,

    /// 1-based volume number
    pub volume: Option<u32>,

    /// Chapter title
    pub name: String,

    /// Publication time, when the upstream timestamp parses
    pub time: Option<DateTime<Utc>>,

    /// Two or three letter language code
    pub lang_code: Option<String>,
}

/// The readable content of a chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterDetails {
    pub id: String,
    pub manga_id: String,

    /// Page image URLs in reading order
    pub pages: Vec<String>,
}

/// A manga as listed in search results or homepage sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialManga {
    pub manga_id: String,
    pub image: String,
    pub title: String,
    pub subtitle: Option<String>,
}

/// One page of results. The source never paginates, so there is no cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagedResults {
    pub results: Vec<PartialManga>,
}

/// Layout hint for a homepage section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HomeSectionKind {
    Featured,
    SingleRowNormal,
    SingleRowLarge,
    DoubleRow,
}

/// A titled row of manga on the host's homepage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeSection {
    pub id: String,
    pub title: String,
    pub kind: HomeSectionKind,
    pub items: Vec<PartialManga>,
    pub contains_more_items: bool,
}

/// What the host asks the source to search for.
///
/// The upstream API cannot combine a title with tags, and only filters by one
/// tag at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct SearchRequest {
    #[builder(default)]
    pub title: Option<String>,
    #[builder(default)]
    pub included_tags: Vec<Tag>,
}

impl From<&str> for SearchRequest {
    /// Creates a title-only search request.
    ///
    /// ```rust
    /// use mangadraft::types::SearchRequest;
    ///
    /// let request: SearchRequest = "dragon".into();
    /// assert_eq!(request.title.as_deref(), Some("dragon"));
    /// ```
    fn from(title: &str) -> Self {
        SearchRequest {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }
}

/// Content rating of a source as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContentRating {
    Everyone,
    Mature,
    Adult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BadgeColor {
    Blue,
    Green,
    Grey,
    Yellow,
    Red,
}

/// A badge shown next to the source in the host's source list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceTag {
    pub text: &'static str,
    pub color: BadgeColor,
}

/// Capabilities a source advertises to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SourceIntent {
    MangaChapters,
    MangaTracking,
    HomepageSections,
    CloudflareBypassRequired,
}

/// Static description of a source, consumed by the host at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceInfo {
    pub version: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub author: &'static str,
    pub author_website: &'static str,
    pub icon: &'static str,
    pub content_rating: ContentRating,
    pub website_base_url: &'static str,
    pub source_tags: &'static [SourceTag],
    pub intents: &'static [SourceIntent],
}

impl SourceInfo {
    pub fn has_intent(&self, intent: SourceIntent) -> bool {
        self.intents.contains(&intent)
    }
}
