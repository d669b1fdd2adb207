//! Router-level tests for the gateway handlers.

use axum::{Router, body::Body, http::Request, http::StatusCode, response::IntoResponse};
use http_body_util::BodyExt;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use crate::cache::{CacheStore, Snapshot};
use crate::embedding::{BoundingBox, DetectedFace, EmbeddingVector, MockFaceExtractor};
use crate::fixtures::{embedding_at, offset, record};
use crate::gateway::error::GatewayError;
use crate::gateway::state::HandlerState;
use crate::gateway::{VISAGE_STATUS_HEADER, create_router_with_state};
use crate::store::{MockEnrollmentStore, UserDocument};
use crate::sync::{MockAvatarFetcher, SyncConfig, SyncOrchestrator};

const BOUNDARY: &str = "visage-test-boundary";

struct TestApp {
    router: Router,
    cache: Arc<CacheStore>,
    store: Arc<MockEnrollmentStore>,
    fetcher: Arc<MockAvatarFetcher>,
    extractor: Arc<MockFaceExtractor>,
}

impl TestApp {
    fn new() -> Self {
        Self::with_limit(crate::config::DEFAULT_MAX_UPLOAD_BYTES)
    }

    fn with_limit(max_upload_bytes: usize) -> Self {
        let cache = Arc::new(CacheStore::new());
        let store = Arc::new(MockEnrollmentStore::new());
        let fetcher = Arc::new(MockAvatarFetcher::new());
        let extractor = Arc::new(MockFaceExtractor::new());
        let orchestrator = Arc::new(SyncOrchestrator::new(
            Arc::clone(&cache),
            store.clone(),
            fetcher.clone(),
            extractor.clone(),
            SyncConfig::default(),
        ));
        let state = HandlerState::new(orchestrator, extractor.clone())
            .with_max_upload_bytes(max_upload_bytes);

        Self {
            router: create_router_with_state(state),
            cache,
            store,
            fetcher,
            extractor,
        }
    }

    fn add_user(&self, id: &str, name: &str, embedding: EmbeddingVector) {
        let url = format!("https://avatars.test/{id}.jpg");
        let image = format!("avatar-{id}").into_bytes();
        self.store
            .insert(UserDocument::new(id).with_name(name).with_avatar_url(&url));
        self.fetcher.insert(&url, image.clone());
        self.extractor.insert(image, vec![face(embedding)]);
    }

    async fn send(&self, request: Request<Body>) -> axum::response::Response {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

fn face(embedding: EmbeddingVector) -> DetectedFace {
    DetectedFace::new(BoundingBox::new(10, 60, 70, 5), embedding)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Builds a multipart body from `(field name, filename, content)` parts.
fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, file_name, content) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match file_name {
            Some(file_name) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn detect_request(parts: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/detect")
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

fn upload(image: &[u8]) -> Request<Body> {
    detect_request(&[("file", Some("probe.jpg"), image)])
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn status_header(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(VISAGE_STATUS_HEADER)
        .unwrap()
        .to_str()
        .unwrap()
}

mod health_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_on_empty_cache() {
        let app = TestApp::new();

        let response = app.send(get("/")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(status_header(&response), "healthy");
        let json = body_json(response).await;
        assert_eq!(json["status"], "AI Service is Running");
        assert_eq!(json["loaded_faces"], 0);
    }

    #[tokio::test]
    async fn test_health_reports_snapshot_size_without_side_effects() {
        let app = TestApp::new();
        app.cache.replace(Snapshot::new(vec![
            record("u1", "Alice", embedding_at(0, 0.1)),
            record("u2", "Bob", embedding_at(1, 0.1)),
        ]));
        let before = app.cache.current();

        let json = body_json(app.send(get("/")).await).await;

        assert_eq!(json["loaded_faces"], 2);
        assert!(Arc::ptr_eq(&before, &app.cache.current()));
        assert_eq!(app.store.list_calls(), 0);
    }
}

mod reload_tests {
    use super::*;

    #[tokio::test]
    async fn test_reload_enrolls_store_users() {
        let app = TestApp::new();
        app.add_user("u1", "Alice", embedding_at(0, 0.1));
        app.add_user("u2", "Bob", embedding_at(1, 0.1));

        let response = app.send(post_empty("/reload")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(status_header(&response), "reloaded");
        let json = body_json(response).await;
        assert_eq!(json["status"], "success");
        assert_eq!(json["message"], "Database reloaded");
        assert_eq!(json["count"], 2);

        let health = body_json(app.send(get("/")).await).await;
        assert_eq!(health["loaded_faces"], 2);
    }

    #[tokio::test]
    async fn test_reload_accepts_get() {
        let app = TestApp::new();
        app.add_user("u1", "Alice", embedding_at(0, 0.1));

        let response = app.send(get("/reload")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["count"], 1);
    }

    #[tokio::test]
    async fn test_reload_counts_only_successes() {
        let app = TestApp::new();
        app.add_user("u1", "Alice", embedding_at(0, 0.1));
        app.add_user("u2", "Bob", embedding_at(1, 0.1));
        app.fetcher.remove("https://avatars.test/u2.jpg");

        let json = body_json(app.send(post_empty("/reload")).await).await;

        assert_eq!(json["count"], 1);
        assert_eq!(app.cache.len(), 1);
    }

    #[tokio::test]
    async fn test_reload_with_unreachable_store_keeps_snapshot() {
        let app = TestApp::new();
        app.add_user("u1", "Alice", embedding_at(0, 0.1));
        app.send(post_empty("/reload")).await;
        app.store.set_unreachable(true);

        let response = app.send(post_empty("/reload")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(status_header(&response), "stale");
        let json = body_json(response).await;
        assert_eq!(json["status"], "success");
        assert_eq!(json["count"], 0);
        assert_eq!(app.cache.len(), 1);
    }

    #[tokio::test]
    async fn test_reload_commits_after_client_disconnects() {
        let app = TestApp::new();
        app.fetcher.set_delay(Duration::from_millis(200));
        app.add_user("u1", "Alice", embedding_at(0, 0.1));
        app.add_user("u2", "Bob", embedding_at(1, 0.1));

        let dropped =
            tokio::time::timeout(Duration::from_millis(50), app.send(post_empty("/reload"))).await;
        assert!(dropped.is_err());
        assert!(app.cache.is_empty());

        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(app.cache.len(), 2);
        assert_eq!(app.fetcher.calls(), 2);
        let health = body_json(app.send(get("/")).await).await;
        assert_eq!(health["loaded_faces"], 2);
    }

    #[tokio::test]
    async fn test_overlapping_reloads_report_the_same_sync() {
        let app = TestApp::new();
        app.fetcher.set_delay(Duration::from_millis(50));
        app.add_user("u1", "Alice", embedding_at(0, 0.1));

        let (first, second) =
            tokio::join!(app.send(post_empty("/reload")), app.send(get("/reload")));

        assert_eq!(body_json(first).await["count"], 1);
        assert_eq!(body_json(second).await["count"], 1);
        assert_eq!(app.store.list_calls(), 1);
        assert_eq!(app.fetcher.calls(), 1);
    }
}

mod detect_tests {
    use super::*;

    #[tokio::test]
    async fn test_detect_matches_enrolled_face() {
        let app = TestApp::new();
        let alice = embedding_at(0, 0.1);
        app.cache
            .replace(Snapshot::new(vec![record("u1", "Alice", alice.clone())]));
        app.extractor
            .insert(b"probe".to_vec(), vec![face(offset(&alice, 5, 0.3))]);

        let response = app.send(upload(b"probe")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(status_header(&response), "detected");
        let json = body_json(response).await;
        assert_eq!(json["count"], 1);
        let m = &json["matches"][0];
        assert_eq!(m["name"], "Alice");
        assert_eq!(m["confidence"], 70.0);
        assert_eq!(m["box"], serde_json::json!([10, 60, 70, 5]));
        assert_eq!(m["info"]["id"], "u1");
        assert_eq!(m["info"]["name"], "Alice");
        assert_eq!(m["info"]["noelEmoji"], "🎄");
        assert_eq!(m["info"]["avatarUrl"], "https://avatars.test/u1.jpg");
    }

    #[tokio::test]
    async fn test_detect_unknown_face_has_empty_info() {
        let app = TestApp::new();
        let alice = embedding_at(0, 0.1);
        app.cache
            .replace(Snapshot::new(vec![record("u1", "Alice", alice.clone())]));
        app.extractor
            .insert(b"stranger".to_vec(), vec![face(offset(&alice, 5, 0.55))]);

        let json = body_json(app.send(upload(b"stranger")).await).await;

        assert_eq!(json["count"], 1);
        let m = &json["matches"][0];
        assert_eq!(m["name"], "Unknown");
        assert_eq!(m["confidence"], 0.0);
        assert_eq!(m["info"], serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_detect_against_empty_cache_is_unknown() {
        let app = TestApp::new();
        app.extractor
            .insert(b"probe".to_vec(), vec![face(embedding_at(0, 0.1))]);

        let json = body_json(app.send(upload(b"probe")).await).await;

        assert_eq!(json["matches"][0]["name"], "Unknown");
        assert_eq!(json["matches"][0]["confidence"], 0.0);
    }

    #[tokio::test]
    async fn test_detect_no_faces_returns_empty_list() {
        let app = TestApp::new();
        app.extractor.insert(b"landscape".to_vec(), vec![]);

        let response = app.send(upload(b"landscape")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["count"], 0);
        assert_eq!(json["matches"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_detect_preserves_face_order() {
        let app = TestApp::new();
        app.cache.replace(Snapshot::new(vec![
            record("u1", "Alice", embedding_at(0, 0.1)),
            record("u2", "Bob", embedding_at(1, 0.1)),
        ]));
        app.extractor.insert(
            b"group".to_vec(),
            vec![
                face(embedding_at(1, 0.1)),
                face(embedding_at(7, 5.0)),
                face(embedding_at(0, 0.1)),
            ],
        );

        let json = body_json(app.send(upload(b"group")).await).await;

        assert_eq!(json["count"], 3);
        let names: Vec<&str> = json["matches"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Bob", "Unknown", "Alice"]);
        assert_eq!(json["matches"][0]["confidence"], 100.0);
    }

    #[tokio::test]
    async fn test_detect_missing_file_part() {
        let app = TestApp::new();

        let response = app
            .send(detect_request(&[("photo", Some("a.jpg"), b"probe")]))
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(status_header(&response), "invalid_request");
        assert_eq!(body_json(response).await["error"], "No file part");
        assert_eq!(app.extractor.calls(), 0);
    }

    #[tokio::test]
    async fn test_detect_file_field_without_filename_is_missing() {
        let app = TestApp::new();

        let response = app.send(detect_request(&[("file", None, b"probe")])).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "No file part");
    }

    #[tokio::test]
    async fn test_detect_not_multipart() {
        let app = TestApp::new();

        let response = app.send(post_empty("/detect")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "No file part");
    }

    #[tokio::test]
    async fn test_detect_empty_filename() {
        let app = TestApp::new();

        let response = app
            .send(detect_request(&[("file", Some(""), b"probe")]))
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "No selected file");
        assert_eq!(app.extractor.calls(), 0);
    }

    #[tokio::test]
    async fn test_detect_empty_payload() {
        let app = TestApp::new();

        let response = app.send(upload(b"")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Empty file");
        assert_eq!(app.extractor.calls(), 0);
    }

    #[tokio::test]
    async fn test_detect_skips_leading_form_fields() {
        let app = TestApp::new();
        app.extractor.insert(b"probe".to_vec(), vec![]);

        let response = app
            .send(detect_request(&[
                ("note", None, b"hello"),
                ("file", Some("probe.jpg"), b"probe"),
            ]))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(app.extractor.calls(), 1);
    }

    #[tokio::test]
    async fn test_detect_undecodable_image_is_server_error() {
        let app = TestApp::new();
        app.cache
            .replace(Snapshot::new(vec![record("u1", "Alice", embedding_at(0, 0.1))]));
        let before = app.cache.current();

        let response = app.send(upload(b"not an image")).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status_header(&response), "processing_error");
        let json = body_json(response).await;
        assert!(
            json["error"]
                .as_str()
                .unwrap()
                .contains("failed to decode image")
        );
        assert!(Arc::ptr_eq(&before, &app.cache.current()));
    }

    #[tokio::test]
    async fn test_detect_body_over_limit_is_rejected() {
        let app = TestApp::with_limit(64);
        let image = vec![7u8; 1024];
        app.extractor.insert(image.clone(), vec![]);

        let response = app.send(upload(&image)).await;

        assert!(response.status().is_client_error());
        assert_eq!(app.extractor.calls(), 0);
    }
}

mod error_handling_tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_request_response() {
        let response = GatewayError::InvalidRequest("No file part".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json, serde_json::json!({"error": "No file part"}));
    }

    #[tokio::test]
    async fn test_processing_response() {
        let response = GatewayError::Processing("boom".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status_header(&response), "processing_error");
        assert_eq!(body_json(response).await["error"], "boom");
    }

    #[tokio::test]
    async fn test_payload_too_large_response() {
        let response = GatewayError::PayloadTooLarge("too big".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(status_header(&response), "too_large");
    }

    #[test]
    fn test_extraction_error_converts_to_processing() {
        let err = GatewayError::from(crate::embedding::ExtractionError::DecodeFailed {
            reason: "truncated".to_string(),
        });
        assert!(matches!(err, GatewayError::Processing(_)));
        assert!(err.to_string().contains("truncated"));
    }
}

mod routing_tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let app = TestApp::new();

        let response = app.send(get("/nope")).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_detect_rejects_get() {
        let app = TestApp::new();

        let response = app.send(get("/detect")).await;

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_cors_headers_present() {
        let app = TestApp::new();
        let request = Request::builder()
            .method("GET")
            .uri("/")
            .header("Origin", "http://kiosk.local")
            .body(Body::empty())
            .unwrap();

        let response = app.send(request).await;

        assert!(
            response
                .headers()
                .contains_key("access-control-allow-origin")
        );
    }
}
