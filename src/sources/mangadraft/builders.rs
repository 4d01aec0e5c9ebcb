//! Pure conversions from upstream records to host types.
//!
//! Nothing here touches the network. Functions that can meet an unexpected
//! record shape return an [`EmbeddedDataIssue`]; the caller attaches the
//! variable name and purpose label.

use super::models::{
    ListPagesResponse, Project, ProjectData, ProjectListItem, UpstreamChapter, language_code,
};
use crate::{
    error::EmbeddedDataIssue,
    types::{
        Chapter, ChapterDetails, HomeSection, HomeSectionKind, MangaInfo, MangaStatus,
        PagedResults, PartialManga, SourceManga, Tag, TagSection,
    },
};

/// Query suffix requesting full-resolution page images.
pub const FULL_SIZE_SUFFIX: &str = "?size=full&u=0";

/// Genre-name marker for adult projects. Case-sensitive.
pub const ADULT_GENRE_MARKER: &str = "XXX";

/// Status names indexed by `project_status_id`.
pub const PROJECT_STATUSES: [MangaStatus; 3] = [
    MangaStatus::Ongoing,
    MangaStatus::Completed,
    MangaStatus::OnHiatus,
];

pub type BuildResult<T> = std::result::Result<T, EmbeddedDataIssue>;

/// Builds the chapter list of a project.
///
/// Tome-organized projects are walked tome by tome; root-organized ones
/// through their single chapter list. Numbers run 1..N across the whole
/// project and volumes are 1-based tome positions.
pub fn build_chapters(data: &ProjectData) -> BuildResult<Vec<Chapter>> {
    let summary = &data.summary;
    let lang_code = language_code(data.project.language).map(str::to_string);
    let mut chapters = Vec::new();

    let chapters_of = |id: i64| {
        summary
            .chapters
            .get(&id.to_string())
            .ok_or_else(|| {
                EmbeddedDataIssue::UnexpectedStructure(format!(
                    "summary has no chapter list for container {}",
                    id
                ))
            })
    };

    let mut push = |chapter: &UpstreamChapter, volume: Option<u32>| {
        let number = chapters.len() as u32 + 1;
        chapters.push(Chapter {
            id: chapter.id.to_string(),
            number,
            volume,
            name: chapter.name.clone(),
            time: chapter.published(),
            lang_code: lang_code.clone(),
        });
    };

    if !summary.tomes.is_empty() {
        for (index, tome) in summary.tomes.iter().enumerate() {
            let volume = index as u32 + 1;
            for chapter in chapters_of(tome.id)? {
                push(chapter, Some(volume));
            }
        }
    } else if let Some(root) = summary.root.first() {
        for chapter in chapters_of(root.id)? {
            push(chapter, None);
        }
    }

    Ok(chapters)
}

/// Builds the genre tag section and reports whether any genre marks the
/// project as adult content.
pub fn build_tag_section(project: &Project) -> (TagSection, bool) {
    let mut hentai = false;
    let tags = project
        .genres
        .iter()
        .map(|genre| {
            hentai |= genre.name.contains(ADULT_GENRE_MARKER);
            let id = genre.slug.clone().unwrap_or_else(|| genre.id.to_string());
            Tag::new(id, genre.name.clone())
        })
        .collect();

    let section = TagSection {
        id: "genre".to_string(),
        label: "Genres".to_string(),
        tags,
    };
    (section, hentai)
}

pub fn resolve_status(status_id: i64) -> BuildResult<MangaStatus> {
    usize::try_from(status_id)
        .ok()
        .and_then(|index| PROJECT_STATUSES.get(index).copied())
        .ok_or_else(|| {
            EmbeddedDataIssue::UnexpectedStructure(format!(
                "unknown project status {}",
                status_id
            ))
        })
}

/// Builds the detail view of a project.
pub fn build_manga_details(manga_id: &str, data: &ProjectData) -> BuildResult<SourceManga> {
    let project = &data.project;
    let (tag_section, hentai) = build_tag_section(project);
    let status = resolve_status(project.project_status_id)?;

    Ok(SourceManga {
        id: manga_id.to_string(),
        info: MangaInfo {
            titles: vec![project.name.clone()],
            image: project.avatar.clone(),
            banner: project.background.clone().filter(|b| !b.is_empty()),
            author: project.user.name.clone(),
            artist: project.user.name.clone(),
            description: project.description.clone(),
            status,
            hentai,
            tags: vec![tag_section],
        },
    })
}

/// Keeps the pages belonging to `chapter_id`, in listing order, at full size.
pub fn build_chapter_details(
    manga_id: &str,
    chapter_id: &str,
    chapter_num: i64,
    listing: ListPagesResponse,
) -> ChapterDetails {
    let pages = listing
        .data
        .into_iter()
        .filter(|page| page.cat == chapter_num)
        .map(|page| format!("{}{}", page.url, FULL_SIZE_SUFFIX))
        .collect();

    ChapterDetails {
        id: chapter_id.to_string(),
        manga_id: manga_id.to_string(),
        pages,
    }
}

/// Converts a listing entry, reading its display title from `name` (search)
/// or `title` (homepage) first. Entries without a slug cannot be opened and
/// are dropped.
fn partial_manga(item: ProjectListItem, prefer_title: bool) -> Option<PartialManga> {
    let Some(slug) = item.slug else {
        tracing::debug!(kind = %item.kind, "dropping listing entry without slug");
        return None;
    };
    let title = if prefer_title {
        item.title.or(item.name)
    } else {
        item.name.or(item.title)
    };

    Some(PartialManga {
        manga_id: slug,
        image: item.avatar.unwrap_or_default(),
        title: title.unwrap_or_default(),
        subtitle: item.subtitle,
    })
}

/// Maps search or catalog items to results, dropping everything that is not a comic.
pub fn build_search_results(items: Vec<ProjectListItem>) -> PagedResults {
    PagedResults {
        results: items
            .into_iter()
            .filter(ProjectListItem::is_comic)
            .filter_map(|item| partial_manga(item, false))
            .collect(),
    }
}

/// Builds a homepage section. Sections never advertise more items.
pub fn build_home_section(
    name: &str,
    kind: HomeSectionKind,
    items: Vec<ProjectListItem>,
) -> HomeSection {
    HomeSection {
        id: name.to_string(),
        title: name.to_string(),
        kind,
        items: items
            .into_iter()
            .filter_map(|item| partial_manga(item, true))
            .collect(),
        contains_more_items: false,
    }
}
