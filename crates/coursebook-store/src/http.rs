//! HTTP-backed static document store.

use async_trait::async_trait;
use serde_json::Value;
use tracing::instrument;

use coursebook_core::store::DocumentStore;

use crate::error::StoreError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Read-only document store served as static files over HTTP.
///
/// Honors the fetcher contract: any non-success status, network failure,
/// or parse failure resolves to absent. Callers never see an error from
/// this boundary.
pub struct HttpStore {
    base_url: String,
    client: reqwest::Client,
}

impl HttpStore {
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(base_url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    async fn try_fetch(&self, path: &str) -> Result<Value, StoreError> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| StoreError::Network {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        response.json().await.map_err(|e| StoreError::Parse {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl DocumentStore for HttpStore {
    #[instrument(skip(self))]
    async fn fetch(&self, path: &str) -> Option<Value> {
        match self.try_fetch(path).await {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::debug!("treating document as absent: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn successful_fetch_returns_document() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/linux-cli/course.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "title": "Linux CLI", "chapters": [] })),
            )
            .mount(&server)
            .await;

        let store = HttpStore::new(&server.uri());
        let doc = store.fetch("linux-cli/course.json").await.unwrap();
        assert_eq!(doc["title"], "Linux CLI");
    }

    #[tokio::test]
    async fn not_found_is_absent() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let store = HttpStore::new(&server.uri());
        assert!(store.fetch("missing/topics.json").await.is_none());
    }

    #[tokio::test]
    async fn server_error_is_absent() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let store = HttpStore::new(&server.uri());
        assert!(store.fetch("broken.json").await.is_none());
    }

    #[tokio::test]
    async fn unparseable_body_is_absent() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let store = HttpStore::new(&server.uri());
        assert!(store.fetch("garbled.json").await.is_none());
    }

    #[tokio::test]
    async fn connection_failure_is_absent() {
        // Port 1 refuses connections.
        let store = HttpStore::with_timeout("http://127.0.0.1:1", 1);
        assert!(store.fetch("index.json").await.is_none());
    }

    #[tokio::test]
    async fn fallback_path_resolution_against_http() {
        let server = MockServer::start().await;

        // Flattened layout absent, legacy layout present.
        Mock::given(method("GET"))
            .and(path("/demo/chapters/ch1/topics.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["01-a.json"])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let store = HttpStore::new(&server.uri());
        let doc = coursebook_core::paths::resolve_first(
            &store,
            coursebook_core::paths::TOPIC_INDEX,
            &[("slug", "demo"), ("chapter", "ch1")],
        )
        .await
        .unwrap();
        assert_eq!(doc[0], "01-a.json");
    }
}
