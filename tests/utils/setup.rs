use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt; // for `oneshot`

use hipchat_web::{
    build_router,
    hipchat::HipChatClientFactory,
    session::{repository::InMemoryUserRepository, SessionService, TokenConfig},
    AppConfig, AppState,
};

use super::fake_hipchat::FakeHipChat;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub const HIPCHAT_TOKEN: &str = "alice-personal-token";

pub struct TestApp {
    pub router: Router,
    pub upstream: FakeHipChat,
    pub session_token: String,
}

impl TestApp {
    /// Starts a fake upstream and signs in a user holding a token it accepts
    pub async fn start() -> Self {
        Self::start_signed_in_with(HIPCHAT_TOKEN).await
    }

    /// Starts a fake upstream and signs in a user holding `hipchat_token`
    pub async fn start_signed_in_with(hipchat_token: &str) -> Self {
        Self::start_with(hipchat_token, None).await
    }

    /// Like `start`, with listings limited to `page_limit` upstream pages
    pub async fn start_with_page_limit(page_limit: usize) -> Self {
        Self::start_with(HIPCHAT_TOKEN, Some(page_limit)).await
    }

    async fn start_with(hipchat_token: &str, page_limit: Option<usize>) -> Self {
        let upstream = FakeHipChat::start(HIPCHAT_TOKEN).await;

        let session_service = SessionService::new(
            Arc::new(InMemoryUserRepository::new()),
            TokenConfig::with_secret("integration-secret", 1),
        );
        let mut chat_clients =
            HipChatClientFactory::new(&upstream.base_url(), Duration::from_secs(5)).unwrap();
        if let Some(page_limit) = page_limit {
            chat_clients = chat_clients.with_page_limit(page_limit);
        }
        let state = AppState::new(
            AppConfig::for_upstream(upstream.base_url()),
            Arc::new(session_service),
            Arc::new(chat_clients),
        );

        let mut app = Self {
            router: build_router(state),
            upstream,
            session_token: String::new(),
        };
        app.session_token = app.sign_in("alice", hipchat_token).await;
        app
    }

    pub async fn sign_in(&self, username: &str, hipchat_token: &str) -> String {
        let (status, body) = self.try_sign_in(username, hipchat_token, None).await;
        assert_eq!(status, StatusCode::OK, "sign in failed: {}", body);
        body["token"].as_str().unwrap().to_string()
    }

    /// Posts to `/session`, presenting `session` as the bearer when given
    pub async fn try_sign_in(
        &self,
        username: &str,
        hipchat_token: &str,
        session: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/session")
            .header("content-type", "application/json");
        if let Some(session) = session {
            builder = builder.header("Authorization", format!("Bearer {}", session));
        }
        self.send(
            builder
                .body(Body::from(
                    json!({ "username": username, "hipchat_token": hipchat_token }).to_string(),
                ))
                .unwrap(),
        )
        .await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("GET")
                .uri(uri)
                .header("Authorization", format!("Bearer {}", self.session_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn get_without_session(&self, uri: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Authorization", format!("Bearer {}", self.session_token))
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }
}
