//! MangaDraft (`mangadraft.com`), a French webcomic platform.
//!
//! Project state lives in a `window.project_data` object on the summary and
//! reader pages; search, catalog and page listings come from a small JSON API.
//!
//! # Request Flow
//!
//! - Details and chapters: `/manga/{id}/summary`, embedded project data
//! - Chapter pages: `/reader/{id}/c.{chapter}` for the first page id, then
//!   `/api/reader/listPages?first_page={page}`
//! - Search: `/api/search/autocomplete` for titles, `/api/catalog/projects`
//!   for a tag
//! - Homepage: three fixed `/api/catalog/projects` queries
//!
//! Calls within an operation are sequential; each waits for the previous one.

use async_trait::async_trait;

use crate::{
    config::{BASE_DOMAIN, SourceConfig},
    error::{EmbeddedDataIssue, Error, Result},
    net::{
        HttpClient, Request, Transport,
        json::{PROJECT_DATA_VAR, extract_project_data, parse_response},
        validate_response,
    },
    source::Source,
    types::{
        BadgeColor, Chapter, ChapterDetails, ContentRating, HomeSection, HomeSectionKind,
        PagedResults, SearchRequest, SourceInfo, SourceIntent, SourceManga, SourceTag,
    },
};

pub mod builders;
pub mod models;

use models::{ListPagesResponse, ProjectData, ProjectListResponse, ReaderData};

pub const SOURCE_ID: &str = "mangadraft";

pub static SOURCE_INFO: SourceInfo = SourceInfo {
    version: "1.0.2",
    name: "MangaDraft",
    description: "Extension that pulls manga from MangaDraft.",
    author: "Seize",
    author_website: "http://github.com/seizefire",
    icon: "icon.png",
    content_rating: ContentRating::Everyone,
    website_base_url: BASE_DOMAIN,
    source_tags: &[SourceTag {
        text: "French",
        color: BadgeColor::Grey,
    }],
    intents: &[SourceIntent::MangaChapters, SourceIntent::HomepageSections],
};

/// Results per page of a tag search.
const TAG_SEARCH_PAGE_SIZE: u32 = 16;

/// Homepage sections as (name, catalog query, layout), in display order.
pub const HOME_SECTIONS: [(&str, &str, HomeSectionKind); 3] = [
    (
        "Trending",
        "order=trending&number=12&thumbnail=true&section=indepolis",
        HomeSectionKind::Featured,
    ),
    (
        "Indepolis",
        "order=news&number=12&thumbnail=true&section=indepolis",
        HomeSectionKind::SingleRowNormal,
    ),
    (
        "Neoville",
        "order=news&number=12&thumbnail=true&section=neoville",
        HomeSectionKind::SingleRowNormal,
    ),
];

/// MangaDraft source, generic over the transport that carries its requests.
///
/// # Examples
///
/// ```rust
/// use mangadraft::prelude::*;
///
/// let source = MangaDraftSource::new();
/// assert_eq!(source.id(), "mangadraft");
/// assert_eq!(
///     source.get_manga_share_url("les-chroniques"),
///     "https://mangadraft.com/manga/les-chroniques"
/// );
/// ```
pub struct MangaDraftSource<T = HttpClient> {
    transport: T,
    base_url: String,
}

impl MangaDraftSource<HttpClient> {
    /// Creates a source with the default configuration.
    pub fn new() -> Self {
        Self {
            transport: HttpClient::new(SOURCE_ID),
            base_url: BASE_DOMAIN.to_string(),
        }
    }

    /// Creates a source honoring every field of `config`.
    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        Ok(Self {
            transport: HttpClient::from_config(SOURCE_ID, config)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl Default for MangaDraftSource<HttpClient> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> MangaDraftSource<T> {
    /// Creates a source that sends its requests through `transport`.
    pub fn with_transport(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches a summary page and extracts its project data.
    async fn load_summary_data(&self, manga_id: &str, operation: &str) -> Result<ProjectData> {
        let purpose = format!("Loading summary page of id \"{}\" - {}", manga_id, operation);
        let url = format!("{}/manga/{}/summary", self.base_url, manga_id);

        let response = self.transport.fetch(Request::get(url)).await?;
        let body = validate_response(response, &purpose)?;
        extract_project_data(&body, &purpose)
    }

    async fn load_section(
        &self,
        name: &str,
        query: &str,
        kind: HomeSectionKind,
    ) -> Result<HomeSection> {
        let purpose = format!("Retrieving {} section - get_home_page_sections", name);
        let url = format!("{}/api/catalog/projects?{}", self.base_url, query);

        let response = self
            .transport
            .fetch(Request::get(url).with_referer(self.base_url.as_str()))
            .await?;
        let data: ProjectListResponse = parse_response(response, &purpose)?;

        Ok(builders::build_home_section(name, kind, data.data))
    }
}

fn embedded_error(purpose: &str) -> impl FnOnce(EmbeddedDataIssue) -> Error + '_ {
    move |issue| {
        let error = Error::embedded(PROJECT_DATA_VAR, purpose, issue);
        tracing::error!("{}", error);
        error
    }
}

#[async_trait]
impl<T: Transport> Source for MangaDraftSource<T> {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    fn info(&self) -> &'static SourceInfo {
        &SOURCE_INFO
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_manga_details(&self, manga_id: &str) -> Result<SourceManga> {
        let data = self.load_summary_data(manga_id, "get_manga_details").await?;
        let purpose = format!("Building details of id \"{}\" - get_manga_details", manga_id);

        builders::build_manga_details(manga_id, &data).map_err(embedded_error(&purpose))
    }

    async fn get_chapters(&self, manga_id: &str) -> Result<Vec<Chapter>> {
        let data = self.load_summary_data(manga_id, "get_chapters").await?;
        let purpose = format!("Building chapters of id \"{}\" - get_chapters", manga_id);

        let chapters = builders::build_chapters(&data).map_err(embedded_error(&purpose))?;
        tracing::debug!(manga_id, chapters = chapters.len(), "built chapter list");
        Ok(chapters)
    }

    async fn get_chapter_details(
        &self,
        manga_id: &str,
        chapter_id: &str,
    ) -> Result<ChapterDetails> {
        let context = format!("mid \"{}\" cid \"{}\"", manga_id, chapter_id);
        let chapter_num: i64 = chapter_id.parse().map_err(|_| {
            Error::parse(format!(
                "Chapter id is not numeric [{} - get_chapter_details]",
                context
            ))
        })?;

        let purpose = format!("Loading reader page of {} - get_chapter_details", context);
        let reader_url = format!("{}/reader/{}/c.{}", self.base_url, manga_id, chapter_id);
        let response = self.transport.fetch(Request::get(reader_url.as_str())).await?;
        let body = validate_response(response, &purpose)?;
        let reader: ReaderData = extract_project_data(&body, &purpose)?;

        let purpose = format!("Loading extra pages for {} - get_chapter_details", context);
        let pages_url = format!(
            "{}/api/reader/listPages?first_page={}",
            self.base_url, reader.first_page.id
        );
        let response = self
            .transport
            .fetch(Request::get(pages_url).with_referer(reader_url))
            .await?;
        let listing: ListPagesResponse = parse_response(response, &purpose)?;

        Ok(builders::build_chapter_details(
            manga_id,
            chapter_id,
            chapter_num,
            listing,
        ))
    }

    async fn get_search_results(&self, request: SearchRequest) -> Result<PagedResults> {
        let purpose = "Retrieving search results - get_search_results";

        // Title and tag filters cannot be combined upstream, and only one tag is honored.
        let fetch = if let Some(title) = request.title.as_deref().filter(|t| !t.is_empty()) {
            Request::get(format!(
                "{}/api/search/autocomplete?value={}",
                self.base_url,
                urlencoding::encode(title)
            ))
            .with_referer(self.base_url.as_str())
        } else if let Some(tag) = request.included_tags.first() {
            if request.included_tags.len() > 1 {
                tracing::debug!(
                    ignored = request.included_tags.len() - 1,
                    "only the first tag is used for search"
                );
            }
            Request::get(format!(
                "{}/api/catalog/projects?number={}&page=0&order=views&genre={}",
                self.base_url,
                TAG_SEARCH_PAGE_SIZE,
                urlencoding::encode(&tag.id)
            ))
            .with_referer(format!("{}/catalog/comics/all", self.base_url))
        } else {
            return Err(Error::UnsupportedRequest(serde_json::to_string(&request)?));
        };

        let response = self.transport.fetch(fetch).await?;
        let data: ProjectListResponse = parse_response(response, purpose)?;
        Ok(builders::build_search_results(data.data))
    }

    async fn get_home_page_sections(&self) -> Result<Vec<HomeSection>> {
        let mut sections = Vec::with_capacity(HOME_SECTIONS.len());
        for (name, query, kind) in HOME_SECTIONS {
            sections.push(self.load_section(name, query, kind).await?);
        }
        Ok(sections)
    }
}
