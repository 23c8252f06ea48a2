use super::*;
use crate::config::CacheStrategy;
use crate::source::ItemSource;
use crate::test_helpers::ScriptedSource;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use std::time::Duration;
use tower::ServiceExt;


/// Config tuned for fast in-memory tests
fn test_config() -> Config {
    let mut config = Config::default();
    config.fetch.worker_count = 4;
    config.fetch.num_stories = 3;
    config.server.bind_address = "127.0.0.1:0".parse().unwrap(); // OS picks a free port
    config
}

/// Feed ranking IDs 1..=count, every one a linked story
fn test_feed(count: u64) -> Arc<ScriptedSource> {
    let ranking: Vec<u64> = (1..=count).collect();
    Arc::new((1..=count).fold(ScriptedSource::new(ranking), |s, id| s.story(id)))
}

/// Router over a service backed by `source`
fn test_app(config: Config, source: &Arc<ScriptedSource>) -> (Router, Arc<TopStories>) {
    let source = Arc::clone(source) as Arc<dyn ItemSource>;
    let service = Arc::new(TopStories::with_source(config.clone(), source).unwrap());
    (create_router(service.clone(), Arc::new(config)), service)
}

async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn json_body(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_api_server_spawns() {
    let source = test_feed(3);
    let config = Arc::new(test_config());
    let service = Arc::new(
        TopStories::with_source((*config).clone(), source as Arc<dyn ItemSource>).unwrap(),
    );

    let api_handle = tokio::spawn({
        let service = service.clone();
        let config = config.clone();
        async move { start_api_server(service, config).await }
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!api_handle.is_finished(), "server exited early");

    api_handle.abort();
    service.shutdown().await;
}

#[tokio::test]
async fn test_cors_enabled() {
    let mut config = test_config();
    config.server.cors_enabled = true;
    config.server.cors_origins = vec!["*".to_string()];
    let (app, service) = test_app(config, &test_feed(3));

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:8080")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers().contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
    service.shutdown().await;
}

#[tokio::test]
async fn test_cors_disabled() {
    let mut config = test_config();
    config.server.cors_enabled = false;
    let (app, service) = test_app(config, &test_feed(3));

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:8080")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(!response.headers().contains_key("access-control-allow-origin"));
    service.shutdown().await;
}

#[tokio::test]
async fn test_cors_specific_origin() {
    let mut config = test_config();
    config.server.cors_origins = vec!["http://allowed.example".to_string()];
    let (app, service) = test_app(config, &test_feed(3));

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://allowed.example")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "http://allowed.example"
    );
    service.shutdown().await;
}

#[tokio::test]
async fn test_swagger_ui_mounted_only_when_enabled() {
    let (app, service) = test_app(test_config(), &test_feed(1));
    assert_eq!(get(app, "/swagger-ui/").await.status(), StatusCode::NOT_FOUND);
    service.shutdown().await;

    let mut config = test_config();
    config.server.swagger_ui = true;
    let (app, service) = test_app(config, &test_feed(1));
    assert_eq!(
        get(app, "/api-docs/openapi.json").await.status(),
        StatusCode::OK
    );
    service.shutdown().await;
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (app, service) = test_app(test_config(), &test_feed(1));
    assert_eq!(get(app, "/nope").await.status(), StatusCode::NOT_FOUND);
    service.shutdown().await;
}

#[test]
fn test_strategy_names_match_config_spelling() {
    let json = serde_json::to_value(CacheStrategy::Ttl).unwrap();
    assert_eq!(json, "ttl");
}
