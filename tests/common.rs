//! Common test utilities and fixtures
//!
//! Shared functionality used across all test modules.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::time::Duration;

use mangadraft::net::{Request, Response, Transport};

#[allow(dead_code)]
pub const TEST_TIMEOUT: Duration = Duration::from_secs(30);
#[allow(dead_code)]
pub const TEST_BASE: &str = "https://test.mangadraft.local";
#[allow(dead_code)]
pub const TEST_MANGA_ID: &str = "les-chroniques";

/// Transport that replays canned responses and records every request.
///
/// Unknown URLs answer 404 with an empty body.
#[allow(dead_code)]
#[derive(Default)]
pub struct ScriptedTransport {
    routes: HashMap<String, Response>,
    requests: Mutex<Vec<Request>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, path: &str, status: u16, body: impl Into<String>) -> Self {
        self.routes
            .insert(format!("{}{}", TEST_BASE, path), Response::new(status, body));
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn fetch(&self, request: Request) -> mangadraft::Result<Response> {
        let response = self
            .routes
            .get(&request.url)
            .cloned()
            .unwrap_or_else(|| Response::new(404, ""));
        self.requests.lock().push(request);
        Ok(response)
    }
}

/// Wraps `project_data` the way the site does: inline script, trailing code.
#[allow(dead_code)]
pub fn page_with_project_data(project_data: &Value) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="fr">
<head>
  <script src="/js/app.js"></script>
  <script>
    window.user = {{"logged": false}};
    window.project_data = {};window.reader_options = {{"mode": "vertical"}};
    if (window.project_data) {{ console.log("ready"); }}
  </script>
</head>
<body><div id="app">{{ chapter }}</div></body>
</html>"#,
        project_data
    )
}

#[allow(dead_code)]
pub fn project_data(summary: Value, genres: Value) -> Value {
    json!({
        "project": {
            "slug": TEST_MANGA_ID,
            "name": "Les Chroniques",
            "avatar": "https://cdn.test/avatar.jpg",
            "background": "https://cdn.test/banner.jpg",
            "description": "Une longue histoire.",
            "genres": genres,
            "language": 3,
            "project_status_id": 0,
            "project_type": "comics",
            "user": {"name": "Auteur"}
        },
        "summary": summary,
        "first_page": {"id": 7001}
    })
}

#[allow(dead_code)]
pub fn tome_summary() -> Value {
    json!({
        "TOME": [{"id": 11}, {"id": 12}],
        "ROOT": [],
        "CHAPTER": {
            "11": [
                {"id": 301, "name": "Prologue", "published_at": "2019-03-01 09:00:00"},
                {"id": 295, "name": "Chapitre 1", "published_at": "2019-03-15 09:00:00"}
            ],
            "12": [
                {"id": 410, "name": "Chapitre 2", "published_at": "2019-06-01 09:00:00"},
                {"id": 415, "name": "Chapitre 3", "published_at": "2019-06-15 09:00:00"}
            ]
        }
    })
}

#[allow(dead_code)]
pub fn root_summary() -> Value {
    json!({
        "TOME": [],
        "ROOT": [{"id": 90}],
        "CHAPTER": {
            "90": [
                {"id": 12, "name": "Episode 1", "published_at": "2022-01-01 12:00:00"},
                {"id": 5, "name": "Episode 2", "published_at": "2022-01-08 12:00:00"},
                {"id": 40, "name": "Episode 3", "published_at": "2022-01-15 12:00:00"}
            ]
        }
    })
}

#[allow(dead_code)]
pub fn genres() -> Value {
    json!([
        {"id": 1, "slug": "aventure", "name": "Aventure"},
        {"id": 2, "slug": "fantastique", "name": "Fantastique"}
    ])
}
