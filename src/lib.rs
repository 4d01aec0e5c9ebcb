//! # MangaDraft - content source for manga reader hosts
//!
//! This crate scrapes and normalizes [MangaDraft](https://mangadraft.com) into
//! the shapes a manga reader host expects: manga details, chapter lists,
//! chapter pages, search results and homepage sections.
//!
//! Every operation is an independent, stateless sequence of requests and
//! transforms. The HTTP side is injected through the [`net::Transport`] trait,
//! so hosts can route requests through their own scheduler and tests can
//! replay recorded responses.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mangadraft::prelude::*;
//! use mangadraft::error::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let source = MangaDraftSource::new();
//!
//!     let results = source.get_search_results("chroniques".into()).await?;
//!     for manga in &results.results {
//!         let chapters = source.get_chapters(&manga.manga_id).await?;
//!         println!("{}: {} chapters", manga.title, chapters.len());
//!     }
//!
//!     for section in source.get_home_page_sections().await? {
//!         println!("{} ({} items)", section.title, section.items.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`source`]: The [`Source`] trait hosts program against
//! - [`sources`]: The MangaDraft implementation, its upstream models and builders
//! - [`types`]: Host-facing data structures
//! - [`net`]: Transport seam, HTTP client, response validation, embedded JSON extraction
//! - [`config`]: Runtime configuration
//! - [`error`]: Error taxonomy

pub mod config;
pub mod error;
pub mod net;
pub mod source;
pub mod sources;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        config::SourceConfig,
        net::{HttpClient, Request, Response, Transport},
        source::Source,
        sources::MangaDraftSource,
        types::{
            Chapter, ChapterDetails, HomeSection, HomeSectionKind, MangaStatus, PagedResults,
            PartialManga, SearchRequest, SourceManga, Tag, TagSection,
        },
    };
}

// Re-export main types at crate root for direct access
pub use error::{Error, Result};
pub use source::Source;
pub use sources::MangaDraftSource;
pub use types::{Chapter, ChapterDetails, HomeSection, PagedResults, SearchRequest, SourceManga};
