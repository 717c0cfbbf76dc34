//! Wire-contract tests for the backend gateway.
//!
//! These pin down the exact requests the backend expects (paths, bodies,
//! query encoding) and how each of its response shapes is normalized.

use hecate::api::{Channel, Gateway, GatewayError, SortBy};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway_at(base: &str) -> Gateway {
    Gateway::new(base, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_base_url_path_prefix_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/subreddits/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "travel", "numberOfSubscribers": 10},
            {"name": "rust", "numberOfSubscribers": 300000}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_at(&format!("{}/api", server.uri()));
    let channels = gateway.list_channels().await.unwrap();
    assert_eq!(
        channels,
        vec![
            Channel {
                name: "travel".into(),
                subscriber_count: 10
            },
            Channel {
                name: "rust".into(),
                subscriber_count: 300000
            },
        ]
    );
}

#[tokio::test]
async fn test_trailing_slash_on_base_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/subreddits/travel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_at(&format!("{}/api/", server.uri()));
    assert!(gateway.fetch_posts("travel").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_subscribe_request_shape_and_capitalized_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/subreddits/ingest"))
        .and(body_json(json!({"subreddit": {"name": "golang", "sortBy": "month"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ID": 7,
            "Name": "golang",
            "NumberOfSubscribers": 5000,
            "Posts": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let channel = gateway_at(&server.uri())
        .subscribe_and_ingest("golang", SortBy::Month)
        .await
        .unwrap();
    assert_eq!(
        channel,
        Channel {
            name: "golang".into(),
            subscriber_count: 5000
        }
    );
}

#[tokio::test]
async fn test_ingest_all_request_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/subreddits/ingest-all"))
        .and(body_json(json!({"sortBy": "day"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "accepted"})))
        .expect(1)
        .mount(&server)
        .await;

    gateway_at(&server.uri())
        .ingest_all(SortBy::Day)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_error_envelope_with_ok_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/subreddits/ingest"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"error": "subreddit not found"})),
        )
        .mount(&server)
        .await;

    let err = gateway_at(&server.uri())
        .subscribe_and_ingest("nope", SortBy::Day)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        GatewayError::Backend { status: 200, message: Some(ref m) } if m == "subreddit not found"
    ));
    assert_eq!(err.reason(), "subreddit not found (status 200)");
}

#[tokio::test]
async fn test_search_query_encoding_and_channel_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/subreddits/search"))
        .and(query_param("q", "c++ & rust"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "posts": [{
                "title": "Interop",
                "content": "body",
                "discussionUrl": "https://reddit.com/r/cpp/1",
                "commentCount": 9,
                "upvotes": 77,
                "subredditName": "cpp"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let posts = gateway_at(&server.uri()).search(" c++ & rust ").await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].channel.as_deref(), Some("cpp"));
    assert_eq!(posts[0].upvotes, 77);
}

#[tokio::test]
async fn test_search_missing_posts_field_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/subreddits/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let posts = gateway_at(&server.uri()).search("anything").await.unwrap();
    assert!(posts.is_empty());
}

#[tokio::test]
async fn test_list_wrong_shape_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/subreddits/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "travel"})))
        .mount(&server)
        .await;

    let err = gateway_at(&server.uri()).list_channels().await.unwrap_err();
    assert!(matches!(err, GatewayError::Decode(_)));
}
