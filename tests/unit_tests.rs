use mangadraft::error::EmbeddedDataIssue;
use mangadraft::prelude::*;
use mangadraft::sources::mangadraft::{HOME_SECTIONS, SOURCE_INFO};
use mangadraft::types::{SearchRequestBuilder, SourceIntent};
use mangadraft::Error;

mod common;
use common::{genres, page_with_project_data, project_data, tome_summary};

#[cfg(test)]
mod tests {
    use super::*;
    use mangadraft::net::json::extract_project_data;
    use serde_json::Value;

    #[test]
    fn test_search_request_builder() {
        let request = SearchRequestBuilder::default()
            .title("dragon".to_string())
            .build()
            .unwrap();

        assert_eq!(request.title.as_deref(), Some("dragon"));
        assert!(request.included_tags.is_empty());

        let request = SearchRequestBuilder::default()
            .included_tags(vec![Tag::new("aventure", "Aventure")])
            .build()
            .unwrap();
        assert!(request.title.is_none());
        assert_eq!(request.included_tags.len(), 1);
    }

    #[test]
    fn test_search_request_from_str() {
        let request: SearchRequest = "les chroniques".into();
        assert_eq!(request.title.as_deref(), Some("les chroniques"));
        assert!(request.included_tags.is_empty());
    }

    #[test]
    fn test_source_info() {
        assert_eq!(SOURCE_INFO.name, "MangaDraft");
        assert_eq!(SOURCE_INFO.website_base_url, "https://mangadraft.com");
        assert_eq!(SOURCE_INFO.source_tags[0].text, "French");
        assert!(SOURCE_INFO.has_intent(SourceIntent::MangaChapters));
        assert!(SOURCE_INFO.has_intent(SourceIntent::HomepageSections));
        assert!(!SOURCE_INFO.has_intent(SourceIntent::CloudflareBypassRequired));

        let source = MangaDraftSource::new();
        assert_eq!(source.id(), "mangadraft");
        assert_eq!(source.name(), "MangaDraft");
        assert!(source.base_url().starts_with("https://"));
    }

    #[test]
    fn test_home_section_table() {
        let names: Vec<&str> = HOME_SECTIONS.iter().map(|(name, _, _)| *name).collect();
        assert_eq!(names, vec!["Trending", "Indepolis", "Neoville"]);
        assert!(HOME_SECTIONS.iter().all(|(_, query, _)| query.contains("number=12")));
    }

    #[test]
    fn test_source_from_config() {
        let config = SourceConfig::default()
            .with_base_url("http://localhost:9000/")
            .with_max_retries(1);
        let source = MangaDraftSource::from_config(&config).unwrap();

        assert_eq!(source.base_url(), "http://localhost:9000");
        assert_eq!(source.transport().max_retries(), 1);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(MangaStatus::Ongoing.to_string(), "Ongoing");
        assert_eq!(MangaStatus::OnHiatus.to_string(), "On Hiatus");
    }

    #[test]
    fn test_embedded_round_trip_on_full_page() {
        let data = project_data(tome_summary(), genres());
        let page = page_with_project_data(&data);

        let extracted: Value = extract_project_data(&page, "round trip").unwrap();
        assert_eq!(extracted, data);
    }

    #[test]
    fn test_embedded_error_messages_carry_purpose() {
        let purpose = "Loading summary page of id \"x\" - get_chapters";
        let error = extract_project_data::<Value>("<html></html>", purpose).unwrap_err();

        assert!(error.to_string().contains(purpose));
        assert_eq!(error.purpose(), Some(purpose));
        assert!(matches!(
            error,
            Error::MalformedEmbeddedData {
                issue: EmbeddedDataIssue::DeclarationNotFound,
                ..
            }
        ));
    }

    #[test]
    fn test_chapter_serializes_for_host() {
        let chapter = Chapter {
            id: "301".to_string(),
            number: 1,
            volume: Some(1),
            name: "Prologue".to_string(),
            time: None,
            lang_code: Some("fr".to_string()),
        };

        let value = serde_json::to_value(&chapter).unwrap();
        assert_eq!(value["id"], "301");
        assert_eq!(value["volume"], 1);
        assert_eq!(value["lang_code"], "fr");
    }
}
