//! Shared helpers for integration tests: a wiremock-backed feed.

#![allow(dead_code)]

use quiet_hn::Config;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Shape of one mocked item
#[derive(Clone, Copy, Debug)]
pub enum Item {
    /// Linked story
    Story,
    /// Linked story answering after a delay
    SlowStory(Duration),
    /// Text post without a URL
    AskHn,
    /// Comment
    Comment,
    /// Server error
    Broken,
}

/// A running mock feed
pub struct MockFeed {
    pub server: MockServer,
}

impl MockFeed {
    /// Start a feed ranking `items` in the given order
    pub async fn start(items: &[(u64, Item)]) -> Self {
        let server = MockServer::start().await;

        let ranking: Vec<u64> = items.iter().map(|(id, _)| *id).collect();
        Mock::given(method("GET"))
            .and(path("/v0/topstories.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&ranking))
            .mount(&server)
            .await;

        for &(id, item) in items {
            mount_item(&server, id, item).await;
        }

        Self { server }
    }

    /// Start a feed whose ranking endpoint fails
    pub async fn unavailable() -> Self {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0/topstories.json"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Self { server }
    }

    /// Config pointing at this feed
    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.feed.base_url = format!("{}/v0", self.server.uri());
        config.feed.request_timeout = Duration::from_secs(5);
        config.fetch.worker_count = 4;
        config
    }

    /// Number of requests made for item details
    pub async fn item_requests(&self) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path().starts_with("/v0/item/"))
            .count()
    }
}

async fn mount_item(server: &MockServer, id: u64, item: Item) {
    let story = json!({
        "id": id,
        "type": "story",
        "by": "author",
        "title": format!("Story {id}"),
        "url": format!("https://www.site{id}.example/post"),
        "score": id,
        "descendants": 0,
        "time": 1_700_000_000u64 + id,
    });

    let response = match item {
        Item::Story => ResponseTemplate::new(200).set_body_json(story),
        Item::SlowStory(delay) => ResponseTemplate::new(200)
            .set_body_json(story)
            .set_delay(delay),
        Item::AskHn => ResponseTemplate::new(200).set_body_json(json!({
            "id": id,
            "type": "story",
            "by": "author",
            "title": format!("Ask HN: question {id}"),
            "text": "What do you think?",
        })),
        Item::Comment => ResponseTemplate::new(200).set_body_json(json!({
            "id": id,
            "type": "comment",
            "by": "someone",
            "text": "Nice",
            "parent": 1,
        })),
        Item::Broken => ResponseTemplate::new(500),
    };

    Mock::given(method("GET"))
        .and(path(format!("/v0/item/{id}.json")))
        .respond_with(response)
        .mount(server)
        .await;
}

/// IDs of a story list, for compact assertions
pub fn ids(stories: &[quiet_hn::Story]) -> Vec<u64> {
    stories.iter().map(|s| s.id.get()).collect()
}
