//! The plugin contract a manga reader host consumes.
//!
//! A host registers a [`Source`] and calls its operations independently; each
//! one is a short, self-contained sequence of requests and transforms with no
//! state carried between calls.
//!
//! # Examples
//!
//! ```rust,no_run
//! use mangadraft::prelude::*;
//! use mangadraft::error::Result;
//!
//! # async fn example() -> Result<()> {
//! let source = MangaDraftSource::new();
//!
//! let manga = source.get_manga_details("les-chroniques").await?;
//! let chapters = source.get_chapters("les-chroniques").await?;
//! if let Some(first) = chapters.first() {
//!     let details = source.get_chapter_details("les-chroniques", &first.id).await?;
//!     println!("{}: {} pages", manga.info.titles[0], details.pages.len());
//! }
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;

use crate::{
    error::Result,
    types::{
        Chapter, ChapterDetails, HomeSection, PagedResults, SearchRequest, SourceInfo,
        SourceManga,
    },
};

/// Trait every content source implements for the host.
///
/// # Required Methods
///
/// * [`info()`](Source::info) - Static metadata shown at registration
/// * [`base_url()`](Source::base_url) - Site root, no trailing slash
/// * [`get_manga_details()`](Source::get_manga_details) - Detail view of one manga
/// * [`get_chapters()`](Source::get_chapters) - Chapter list of one manga
/// * [`get_chapter_details()`](Source::get_chapter_details) - Page images of one chapter
/// * [`get_search_results()`](Source::get_search_results) - Title or tag search
/// * [`get_home_page_sections()`](Source::get_home_page_sections) - Homepage rows
///
/// # Errors
///
/// Every operation is all-or-nothing: a failure anywhere in the sequence is
/// returned as the operation's error and no partial data is produced.
#[async_trait]
pub trait Source: Send + Sync {
    /// Returns the unique identifier for this source.
    fn id(&self) -> &'static str;

    /// Returns the static description of this source.
    fn info(&self) -> &'static SourceInfo;

    /// Returns the human-readable name of this source.
    fn name(&self) -> &'static str {
        self.info().name
    }

    /// Returns the base URL of this source, without a trailing slash.
    fn base_url(&self) -> &str;

    /// Retrieves the detail view of a manga.
    ///
    /// # Errors
    ///
    /// * [`Error::NotFound`](crate::Error::NotFound) - If the manga doesn't exist
    /// * [`Error::MalformedEmbeddedData`](crate::Error::MalformedEmbeddedData) - If the page
    ///   no longer carries the expected data
    async fn get_manga_details(&self, manga_id: &str) -> Result<SourceManga>;

    /// Retrieves the chapters of a manga in reading order, numbered from 1.
    async fn get_chapters(&self, manga_id: &str) -> Result<Vec<Chapter>>;

    /// Retrieves the page image URLs of a chapter in reading order.
    async fn get_chapter_details(&self, manga_id: &str, chapter_id: &str)
    -> Result<ChapterDetails>;

    /// Runs a search by title or by tag.
    ///
    /// # Errors
    ///
    /// * [`Error::UnsupportedRequest`](crate::Error::UnsupportedRequest) - If the request
    ///   has neither a title nor a tag
    async fn get_search_results(&self, request: SearchRequest) -> Result<PagedResults>;

    /// Loads every homepage section, in display order.
    async fn get_home_page_sections(&self) -> Result<Vec<HomeSection>>;

    /// Loads more items for a homepage section.
    ///
    /// The default implementation has nothing more to offer.
    async fn get_view_more_items(&self, _section_id: &str) -> Result<PagedResults> {
        Ok(PagedResults::default())
    }

    /// Returns the public web URL of a manga.
    fn get_manga_share_url(&self, manga_id: &str) -> String {
        format!("{}/manga/{}", self.base_url(), manga_id)
    }
}
