use async_trait::async_trait;
use chrono::{Duration, Utc};
use realmpress_publish::{
    Authenticator, DriveClient, DriveConfig, FileIdStore, PublishError, PublishResult, TokenCache,
    TokenStore,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;
use wiremock::matchers::{bearer_token, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct CountingAuthenticator {
    calls: AtomicUsize,
    result: PublishResult<TokenCache>,
}

impl CountingAuthenticator {
    fn succeeding() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            result: Ok(fresh_cache("interactive-token")),
        }
    }

    fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            result: Err(PublishError::AuthFailed("user closed browser".into())),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Authenticator for CountingAuthenticator {
    async fn authenticate(&self) -> PublishResult<TokenCache> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.result {
            Ok(cache) => Ok(cache.clone()),
            Err(_) => Err(PublishError::AuthFailed("user closed browser".into())),
        }
    }
}

fn fresh_cache(token: &str) -> TokenCache {
    TokenCache {
        access_token: token.into(),
        refresh_token: Some("rt".into()),
        expires_at: Utc::now() + Duration::hours(1),
    }
}

fn expired_cache(refreshable: bool) -> TokenCache {
    TokenCache {
        access_token: "stale".into(),
        refresh_token: refreshable.then(|| "rt".to_string()),
        expires_at: Utc::now() - Duration::hours(1),
    }
}

fn config(server: &MockServer) -> DriveConfig {
    DriveConfig {
        api_base_url: format!("{}/api", server.uri()),
        upload_base_url: format!("{}/upload", server.uri()),
        token_endpoint: format!("{}/token", server.uri()),
        client_id: "cid".into(),
        client_secret: "secret".into(),
        share_with_anyone: true,
    }
}

// ── Token lifecycle ──

#[tokio::test]
async fn valid_token_skips_refresh_and_auth() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let store = TokenStore::new(dir.path().join("token.json"));
    store.save(&fresh_cache("good")).unwrap();

    let auth = CountingAuthenticator::succeeding();
    let client = DriveClient::new(config(&server)).unwrap();
    let cache = client.ensure_token(&store, &auth).await.unwrap();

    assert_eq!(cache.access_token, "good");
    assert_eq!(auth.calls(), 0);
}

#[tokio::test]
async fn expired_refreshable_token_refreshes_silently() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "refreshed",
            "expires_in": 3600
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let store = TokenStore::new(dir.path().join("token.json"));
    store.save(&expired_cache(true)).unwrap();

    let auth = CountingAuthenticator::succeeding();
    let client = DriveClient::new(config(&server)).unwrap();
    let cache = client.ensure_token(&store, &auth).await.unwrap();

    assert_eq!(cache.access_token, "refreshed");
    // Old refresh token is kept when the response omits one.
    assert_eq!(cache.refresh_token.as_deref(), Some("rt"));
    assert_eq!(auth.calls(), 0);
    assert_eq!(store.load().unwrap().unwrap().access_token, "refreshed");
}

#[tokio::test]
async fn rejected_refresh_falls_back_to_interactive_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let store = TokenStore::new(dir.path().join("token.json"));
    store.save(&expired_cache(true)).unwrap();

    let auth = CountingAuthenticator::succeeding();
    let client = DriveClient::new(config(&server)).unwrap();
    let cache = client.ensure_token(&store, &auth).await.unwrap();

    assert_eq!(cache.access_token, "interactive-token");
    assert_eq!(auth.calls(), 1);
}

#[tokio::test]
async fn missing_token_triggers_interactive_auth() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let store = TokenStore::new(dir.path().join("token.json"));

    let auth = CountingAuthenticator::succeeding();
    let client = DriveClient::new(config(&server)).unwrap();
    let cache = client.ensure_token(&store, &auth).await.unwrap();

    assert_eq!(cache.access_token, "interactive-token");
    assert_eq!(auth.calls(), 1);
    assert!(store.load().unwrap().is_some());
}

#[tokio::test]
async fn failed_interactive_auth_is_fatal() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let store = TokenStore::new(dir.path().join("token.json"));

    let auth = CountingAuthenticator::failing();
    let client = DriveClient::new(config(&server)).unwrap();
    let err = client.ensure_token(&store, &auth).await.unwrap_err();
    assert!(matches!(err, PublishError::AuthFailed(_)));
}

// ── Upload ──

fn file_response(id: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "webViewLink": format!("https://drive.example/view/{id}")
    })
}

fn pdf_fixture(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("worldbook.pdf");
    std::fs::write(&path, b"%PDF-1.4 fake").unwrap();
    path
}

#[tokio::test]
async fn first_publish_creates_file_and_persists_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/files"))
        .and(query_param("uploadType", "multipart"))
        .and(bearer_token("at"))
        .respond_with(ResponseTemplate::new(200).set_body_json(file_response("new-id")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/files/new-id/permissions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "perm"})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let pdf = pdf_fixture(&dir);
    let file_ids = FileIdStore::new(dir.path().join("drive_file_id.json"));
    let client = DriveClient::new(config(&server)).unwrap();

    let outcome = client
        .publish("at", &pdf, "worldbook.pdf", &file_ids)
        .await
        .unwrap();

    assert!(!outcome.updated);
    assert_eq!(outcome.file_id, "new-id");
    assert_eq!(
        outcome.web_view_link.as_deref(),
        Some("https://drive.example/view/new-id")
    );
    assert_eq!(file_ids.load().unwrap().as_deref(), Some("new-id"));
}

#[tokio::test]
async fn republish_updates_file_on_record() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/upload/files/kept-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(file_response("kept-id")))
        .expect(1)
        .mount(&server)
        .await;
    // No create and no new permission grant on update.
    Mock::given(method("POST"))
        .and(path("/upload/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(file_response("wrong")))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let pdf = pdf_fixture(&dir);
    let file_ids = FileIdStore::new(dir.path().join("drive_file_id.json"));
    file_ids.save("kept-id").unwrap();
    let client = DriveClient::new(config(&server)).unwrap();

    let outcome = client
        .publish("at", &pdf, "worldbook.pdf", &file_ids)
        .await
        .unwrap();

    assert!(outcome.updated);
    assert_eq!(outcome.file_id, "kept-id");
    assert_eq!(file_ids.load().unwrap().as_deref(), Some("kept-id"));
}

#[tokio::test]
async fn deleted_remote_file_falls_back_to_create() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/upload/files/gone-id"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/upload/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(file_response("fresh-id")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/files/fresh-id/permissions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "perm"})))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let pdf = pdf_fixture(&dir);
    let file_ids = FileIdStore::new(dir.path().join("drive_file_id.json"));
    file_ids.save("gone-id").unwrap();
    let client = DriveClient::new(config(&server)).unwrap();

    let outcome = client
        .publish("at", &pdf, "worldbook.pdf", &file_ids)
        .await
        .unwrap();

    assert!(!outcome.updated);
    assert_eq!(outcome.file_id, "fresh-id");
    assert_eq!(file_ids.load().unwrap().as_deref(), Some("fresh-id"));
}

#[tokio::test]
async fn server_error_surfaces_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/files"))
        .respond_with(ResponseTemplate::new(403).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let pdf = pdf_fixture(&dir);
    let file_ids = FileIdStore::new(dir.path().join("drive_file_id.json"));
    let client = DriveClient::new(config(&server)).unwrap();

    let err = client
        .publish("at", &pdf, "worldbook.pdf", &file_ids)
        .await
        .unwrap_err();
    match err {
        PublishError::Api { status, body } => {
            assert_eq!(status, 403);
            assert!(body.contains("quota"));
        }
        other => panic!("unexpected error: {other}"),
    }
}
