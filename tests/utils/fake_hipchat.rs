use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

// ============================================================================
// Fake HipChat v2 API
// ============================================================================

#[derive(Default)]
struct FakeState {
    base_url: String,
    accepted_token: String,
    page_size: usize,
    rooms: Vec<Value>,
    members: HashMap<String, Vec<Value>>,
    webhooks: HashMap<String, Vec<Value>>,
    history: HashMap<String, Vec<Value>>,
    notifications: Vec<(String, Value)>,
    member_calls: usize,
    next_webhook_id: i64,
}

/// HTTP server speaking enough of the HipChat v2 API for the front-end,
/// bound to an ephemeral local port
#[derive(Clone)]
pub struct FakeHipChat {
    state: Arc<Mutex<FakeState>>,
}

impl FakeHipChat {
    pub async fn start(accepted_token: &str) -> Self {
        let state = Arc::new(Mutex::new(FakeState {
            accepted_token: accepted_token.to_string(),
            page_size: 2,
            ..FakeState::default()
        }));

        let app = Router::new()
            .route("/v2/room", get(list_rooms))
            .route("/v2/room/:room_id/member", get(list_members))
            .route(
                "/v2/room/:room_id/webhook",
                get(list_webhooks).post(create_webhook),
            )
            .route("/v2/room/:room_id/history", get(history))
            .route("/v2/room/:room_id/notification", post(notification))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        state.lock().unwrap().base_url = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { state }
    }

    pub fn base_url(&self) -> String {
        self.state.lock().unwrap().base_url.clone()
    }

    pub fn add_room(&self, id: i64, name: &str, with_members_link: bool) {
        let mut state = self.state.lock().unwrap();
        let mut links = json!({ "self": format!("{}/v2/room/{}", state.base_url, id) });
        if with_members_link {
            links["members"] = json!(format!("{}/v2/room/{}/member", state.base_url, id));
        }
        state
            .rooms
            .push(json!({ "id": id, "name": name, "links": links }));
    }

    pub fn set_member_names(&self, room_id: &str, names: &[&str]) {
        let members = names
            .iter()
            .enumerate()
            .map(|(i, name)| json!({ "id": i, "name": name, "mention_name": name }))
            .collect();
        self.state
            .lock()
            .unwrap()
            .members
            .insert(room_id.to_string(), members);
    }

    pub fn set_history(&self, room_id: &str, messages: Vec<Value>) {
        self.state
            .lock()
            .unwrap()
            .history
            .insert(room_id.to_string(), messages);
    }

    pub fn webhooks_for(&self, room_id: &str) -> Vec<Value> {
        self.state
            .lock()
            .unwrap()
            .webhooks
            .get(room_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn notifications(&self) -> Vec<(String, Value)> {
        self.state.lock().unwrap().notifications.clone()
    }

    pub fn member_calls(&self) -> usize {
        self.state.lock().unwrap().member_calls
    }
}

type SharedState = Arc<Mutex<FakeState>>;

fn authorized(state: &FakeState, headers: &HeaderMap) -> bool {
    let expected = format!("Bearer {}", state.accepted_token);
    headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .map(|value| value == expected)
        .unwrap_or(false)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": { "code": 401, "message": "Invalid OAuth session" } })),
    )
        .into_response()
}

fn single_page(items: Vec<Value>) -> Value {
    json!({ "items": items, "links": {}, "maxResults": 100, "startIndex": 0 })
}

async fn list_rooms(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let state = state.lock().unwrap();
    if !authorized(&state, &headers) {
        return unauthorized();
    }

    let start: usize = params
        .get("start-index")
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);
    let end = (start + state.page_size).min(state.rooms.len());
    let items = state.rooms[start.min(end)..end].to_vec();

    let mut links = json!({ "self": format!("{}/v2/room", state.base_url) });
    if end < state.rooms.len() {
        links["next"] = json!(format!(
            "{}/v2/room?start-index={}&max-results={}",
            state.base_url, end, state.page_size
        ));
    }

    Json(json!({
        "items": items,
        "links": links,
        "maxResults": state.page_size,
        "startIndex": start,
    }))
    .into_response()
}

async fn list_members(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(room_id): Path<String>,
) -> Response {
    let mut state = state.lock().unwrap();
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    state.member_calls += 1;
    let members = state.members.get(&room_id).cloned().unwrap_or_default();
    Json(single_page(members)).into_response()
}

async fn list_webhooks(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(room_id): Path<String>,
) -> Response {
    let state = state.lock().unwrap();
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    let hooks = state.webhooks.get(&room_id).cloned().unwrap_or_default();
    Json(single_page(hooks)).into_response()
}

async fn create_webhook(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(room_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    if !authorized(&state, &headers) {
        return unauthorized();
    }

    state.next_webhook_id += 1;
    let id = state.next_webhook_id;
    let mut hook = body;
    hook["id"] = json!(id);
    state.webhooks.entry(room_id).or_default().push(hook);

    (
        StatusCode::CREATED,
        Json(json!({ "id": id, "links": { "self": "" } })),
    )
        .into_response()
}

async fn history(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(room_id): Path<String>,
) -> Response {
    let state = state.lock().unwrap();
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    let messages = state.history.get(&room_id).cloned().unwrap_or_default();
    Json(single_page(messages)).into_response()
}

async fn notification(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(room_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    state.notifications.push((room_id, body));
    StatusCode::NO_CONTENT.into_response()
}
