//! Hacker News Firebase API client.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::ItemSource;
use crate::config::FeedConfig;
use crate::error::{Error, LookupError, Result};
use crate::types::{ItemId, ItemRecord};

/// [`ItemSource`] backed by the Hacker News v0 API
///
/// Endpoints used:
/// - `{base_url}/topstories.json` - ranked list of up to 500 IDs
/// - `{base_url}/item/{id}.json` - item detail, or `null` for unknown IDs
#[derive(Clone, Debug)]
pub struct HnClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl HnClient {
    /// Create a client for the configured feed
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(config: &FeedConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("quiet-hn/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config {
                message: format!("failed to create HTTP client: {e}"),
                key: Some("feed".into()),
            })?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Root URL requests are made against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> std::result::Result<T, LookupError> {
        let response = self.http_client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| LookupError::Malformed(format!("{url}: {e}")))
    }
}

#[async_trait]
impl ItemSource for HnClient {
    async fn top_items(&self) -> std::result::Result<Vec<ItemId>, LookupError> {
        let url = format!("{}/topstories.json", self.base_url);
        let ids: Vec<ItemId> = self.get_json(&url).await?;
        tracing::debug!(count = ids.len(), "Loaded ranked item list");
        Ok(ids)
    }

    async fn get_item(&self, id: ItemId) -> std::result::Result<ItemRecord, LookupError> {
        let url = format!("{}/item/{}.json", self.base_url, id);
        // The API answers unknown IDs with a literal `null`
        let item: Option<ItemRecord> = self.get_json(&url).await?;
        item.ok_or(LookupError::NotFound(id))
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HnClient {
        HnClient::new(&FeedConfig {
            base_url: format!("{}/v0/", server.uri()),
            request_timeout: Duration::from_secs(2),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_top_items_preserves_feed_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0/topstories.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[30, 10, 20]"))
            .mount(&server)
            .await;

        let ids = client_for(&server).top_items().await.unwrap();
        assert_eq!(ids, vec![ItemId(30), ItemId(10), ItemId(20)]);
    }

    #[tokio::test]
    async fn test_get_item_parses_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0/item/8863.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 8863,
                "type": "story",
                "by": "dhouston",
                "title": "My YC app: Dropbox",
                "url": "http://www.getdropbox.com/u/2/screencast.html",
                "score": 111
            })))
            .mount(&server)
            .await;

        let record = client_for(&server).get_item(ItemId(8863)).await.unwrap();
        assert_eq!(record.id, ItemId(8863));
        assert_eq!(record.kind, "story");
        assert_eq!(record.score, 111);
        assert!(record.is_story_link());
    }

    #[tokio::test]
    async fn test_null_item_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0/item/1.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&server)
            .await;

        let err = client_for(&server).get_item(ItemId(1)).await.unwrap_err();
        assert_eq!(err, LookupError::NotFound(ItemId(1)));
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0/topstories.json"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server).top_items().await.unwrap_err();
        match err {
            LookupError::Status { status, url } => {
                assert_eq!(status, 503);
                assert!(url.ends_with("/v0/topstories.json"), "url was {url}");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_garbage_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0/item/5.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).get_item(ItemId(5)).await.unwrap_err();
        assert!(matches!(err, LookupError::Malformed(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_unreachable_feed_is_network_error() {
        // Port 9 (discard) on localhost is not expected to accept HTTP
        let client = HnClient::new(&FeedConfig {
            base_url: "http://127.0.0.1:9/v0".into(),
            request_timeout: Duration::from_secs(2),
        })
        .unwrap();

        let err = client.top_items().await.unwrap_err();
        assert!(matches!(err, LookupError::Network(_)), "got {err:?}");
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = HnClient::new(&FeedConfig {
            base_url: "https://example.com/v0///".into(),
            request_timeout: Duration::from_secs(1),
        })
        .unwrap();
        assert_eq!(client.base_url(), "https://example.com/v0");
    }
}
