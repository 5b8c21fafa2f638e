//! Router-level tests: CORS admission and the transform/sync routes.

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use content_gate::search_client::SearchIndex;
use content_gate::server::{build_router, AppState};
use content_gate_core::{DocumentId, IndexDocument, IndexSettings, OriginAllowList};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

const ALLOWED: &str = "https://www.labs.test";

#[derive(Default)]
struct FakeIndex {
    upserts: Mutex<Vec<(String, Value)>>,
    deletes: Mutex<Vec<(String, DocumentId)>>,
}

#[async_trait]
impl SearchIndex for FakeIndex {
    async fn configure_index(&self, _settings: &IndexSettings) -> anyhow::Result<()> {
        Ok(())
    }

    async fn upsert_documents(
        &self,
        index: &str,
        documents: &[IndexDocument],
    ) -> anyhow::Result<()> {
        let mut upserts = self.upserts.lock().unwrap();
        for doc in documents {
            upserts.push((index.to_string(), doc.to_value()?));
        }
        Ok(())
    }

    async fn delete_document(&self, index: &str, id: &DocumentId) -> anyhow::Result<()> {
        self.deletes
            .lock()
            .unwrap()
            .push((index.to_string(), id.clone()));
        Ok(())
    }
}

fn allow_list() -> Arc<OriginAllowList> {
    Arc::new(OriginAllowList::new([ALLOWED], ["https://*.preview.test"]).unwrap())
}

fn app(search: Option<Arc<dyn SearchIndex>>) -> Router {
    build_router(AppState {
        allow: allow_list(),
        search,
    })
}

fn preflight(uri: &str, origin: &str) -> Request<Body> {
    Request::builder()
        .method(Method::OPTIONS)
        .uri(uri)
        .header(header::ORIGIN, origin)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, origin: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(origin) = origin {
        builder = builder.header(header::ORIGIN, origin);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, origin: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(origin) = origin {
        builder = builder.header(header::ORIGIN, origin);
    }
    builder.body(Body::empty()).unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn allow_origin(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .and_then(|v| v.to_str().ok())
}

// ============ CORS ============

#[tokio::test]
async fn test_preflight_allowed_origin() {
    let response = app(None)
        .oneshot(preflight("/transform/industry", ALLOWED))
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert_eq!(allow_origin(&response), Some(ALLOWED));

    let methods = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    for method in ["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS"] {
        assert!(methods.contains(method), "missing {} in {}", method, methods);
    }

    let headers = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_HEADERS)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_ascii_lowercase();
    for name in ["content-type", "authorization", "origin", "accept"] {
        assert!(headers.contains(name), "missing {} in {}", name, headers);
    }
}

#[tokio::test]
async fn test_preflight_pattern_origin() {
    let response = app(None)
        .oneshot(preflight("/sync/video", "https://pr-7.preview.test"))
        .await
        .unwrap();
    assert_eq!(allow_origin(&response), Some("https://pr-7.preview.test"));
}

#[tokio::test]
async fn test_preflight_rejected_origin_gets_no_cors_headers() {
    let response = app(None)
        .oneshot(preflight("/transform/industry", "https://evil.test"))
        .await
        .unwrap();

    let headers = response.headers();
    assert!(!headers.contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    assert!(!headers.contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
    assert!(!headers.contains_key(header::ACCESS_CONTROL_ALLOW_HEADERS));
}

#[tokio::test]
async fn test_nested_subdomain_rejected() {
    let response = app(None)
        .oneshot(get("/health", Some("https://a.b.preview.test")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(allow_origin(&response), None);
}

#[tokio::test]
async fn test_request_without_origin_still_served() {
    let response = app(None).oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(allow_origin(&response), None);

    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_error_response_keeps_cors_headers() {
    let response = app(None)
        .oneshot(get("/indexes/announcement", Some(ALLOWED)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(allow_origin(&response), Some(ALLOWED));

    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "not_found");
}

// ============ Indexes ============

#[tokio::test]
async fn test_list_indexes() {
    let response = app(None).oneshot(get("/indexes", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let indexes = body["indexes"].as_array().unwrap();
    assert_eq!(indexes.len(), 6);
    assert_eq!(indexes[1]["indexName"], "blog-posts");
}

#[tokio::test]
async fn test_get_index() {
    let response = app(None)
        .oneshot(get("/indexes/team-member", None))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["indexName"], "team-members");
    assert_eq!(body["searchableAttributes"], json!(["name", "title"]));
}

// ============ Transform ============

#[tokio::test]
async fn test_transform_route() {
    let response = app(None)
        .oneshot(post_json(
            "/transform/industry",
            Some(ALLOWED),
            json!({
                "id": 4,
                "name": "Environmental",
                "popular_analyses": [{"text": "Water"}],
                "table_sections": [{"title": "Metals", "note": "EPA 200.8"}]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(allow_origin(&response), Some(ALLOWED));

    let doc = json_body(response).await;
    assert_eq!(doc["id"], 4);
    assert_eq!(doc["popular_analyses_text"], "Water");
    assert_eq!(doc["table_titles"], "Metals");
    assert_eq!(doc["table_content"], "EPA 200.8");
    assert_eq!(doc["seo_title"], "");
}

#[tokio::test]
async fn test_transform_missing_id_is_unprocessable() {
    let response = app(None)
        .oneshot(post_json("/transform/video", None, json!({"title": "Intro"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "invalid_id");
}

#[tokio::test]
async fn test_transform_malformed_relation_is_bad_request() {
    let response = app(None)
        .oneshot(post_json(
            "/transform/blog-post",
            None,
            json!({"id": 1, "tags": "soil"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn test_transform_unknown_type_not_found() {
    let response = app(None)
        .oneshot(post_json("/transform/announcement", None, json!({"id": 1})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============ Sync ============

#[tokio::test]
async fn test_sync_without_search_unavailable() {
    let response = app(None)
        .oneshot(post_json(
            "/sync/laboratory",
            None,
            json!({"event": "publish", "entry": {"id": 1, "name": "Omaha"}}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "search_unavailable");
}

#[tokio::test]
async fn test_sync_publish_upserts() {
    let index = Arc::new(FakeIndex::default());
    let response = app(Some(index.clone()))
        .oneshot(post_json(
            "/sync/laboratory",
            Some(ALLOWED),
            json!({"event": "publish", "entry": {"id": 1, "name": "Omaha", "slug": "omaha"}}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(
        body,
        json!({"action": "upserted", "index": "laboratories", "id": 1})
    );

    let upserts = index.upserts.lock().unwrap();
    assert_eq!(
        upserts.as_slice(),
        &[(
            "laboratories".to_string(),
            json!({"id": 1, "name": "Omaha", "slug": "omaha"})
        )]
    );
}

#[tokio::test]
async fn test_sync_delete_removes() {
    let index = Arc::new(FakeIndex::default());
    let response = app(Some(index.clone()))
        .oneshot(post_json(
            "/sync/resource",
            None,
            json!({"event": "delete", "entry": {"id": "guide-12"}}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["action"], "deleted");
    assert_eq!(
        index.deletes.lock().unwrap().as_slice(),
        &[(
            "resources".to_string(),
            DocumentId::Text("guide-12".to_string())
        )]
    );
}

#[tokio::test]
async fn test_sync_bad_record_never_pushed() {
    let index = Arc::new(FakeIndex::default());
    let response = app(Some(index.clone()))
        .oneshot(post_json(
            "/sync/team-member",
            None,
            json!({"event": "create", "entry": {"name": "No Id"}}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(index.upserts.lock().unwrap().is_empty());
}

// ============ Malformed bodies ============

#[tokio::test]
async fn test_unknown_sync_event_is_bad_request() {
    let index = Arc::new(FakeIndex::default());
    let response = app(Some(index.clone()))
        .oneshot(post_json(
            "/sync/video",
            Some(ALLOWED),
            json!({"event": "archive", "entry": {"id": 1}}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(allow_origin(&response), Some(ALLOWED));

    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "bad_request");
    assert!(body["error"]["message"].as_str().unwrap().contains("archive"));
    assert!(index.upserts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_non_json_body_is_bad_request() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/transform/video")
        .header(header::ORIGIN, ALLOWED)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("not json"))
        .unwrap();
    let response = app(None).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(allow_origin(&response), Some(ALLOWED));

    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn test_missing_content_type_is_bad_request() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/transform/video")
        .body(Body::from(json!({"id": 1}).to_string()))
        .unwrap();
    let response = app(None).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "bad_request");
}
