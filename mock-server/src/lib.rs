use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    body::Bytes,
    extract::{Path, Query, RawQuery, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub active: bool,
}

#[derive(Deserialize)]
pub struct NewUser {
    #[serde(default)]
    pub email: String,
    pub username: Option<String>,
}

/// Request and response envelope: `{"user": {...}}`.
#[derive(Serialize, Deserialize)]
pub struct UserEnvelope<T> {
    pub user: T,
}

#[derive(Deserialize)]
pub struct UserSearch {
    pub email: Option<String>,
}

pub type Db = Arc<RwLock<HashMap<Uuid, User>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/api/user", get(search_users).post(create_user))
        .route("/api/user/{id}", get(get_user).put(update_user).delete(delete_user))
        .route("/echo", any(echo))
        .route("/status/{code}", any(fixed_status))
        .route("/text", get(plain_text))
        .route("/slow/{millis}", get(slow))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({"error": "not found"})))
}

fn blank_email() -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "fieldErrors": {
                "user.email": [{"code": "[blank]user.email", "message": "You must specify an email"}]
            }
        })),
    )
}

async fn search_users(State(db): State<Db>, Query(search): Query<UserSearch>) -> Response {
    let users = db.read().await;
    match search.email {
        Some(email) => match users.values().find(|u| u.email == email) {
            Some(user) => Json(UserEnvelope { user: user.clone() }).into_response(),
            None => not_found().into_response(),
        },
        None => Json(json!({"users": users.values().cloned().collect::<Vec<_>>()})).into_response(),
    }
}

async fn create_user(State(db): State<Db>, Json(input): Json<UserEnvelope<NewUser>>) -> Response {
    if input.user.email.is_empty() {
        return blank_email().into_response();
    }
    let user = User {
        id: Uuid::new_v4(),
        email: input.user.email,
        username: input.user.username,
        active: true,
    };
    db.write().await.insert(user.id, user.clone());
    (StatusCode::OK, Json(UserEnvelope { user })).into_response()
}

async fn get_user(State(db): State<Db>, Path(id): Path<Uuid>) -> Response {
    let users = db.read().await;
    match users.get(&id) {
        Some(user) => Json(UserEnvelope { user: user.clone() }).into_response(),
        None => not_found().into_response(),
    }
}

async fn update_user(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<UserEnvelope<NewUser>>,
) -> Response {
    if input.user.email.is_empty() {
        return blank_email().into_response();
    }
    let mut users = db.write().await;
    let Some(user) = users.get_mut(&id) else {
        return not_found().into_response();
    };
    user.email = input.user.email;
    if input.user.username.is_some() {
        user.username = input.user.username;
    }
    Json(UserEnvelope { user: user.clone() }).into_response()
}

async fn delete_user(State(db): State<Db>, Path(id): Path<Uuid>) -> Response {
    match db.write().await.remove(&id) {
        Some(_) => StatusCode::OK.into_response(),
        None => not_found().into_response(),
    }
}

/// Reflect the request back as JSON.
async fn echo(method: Method, RawQuery(query): RawQuery, headers: HeaderMap, body: Bytes) -> Json<Value> {
    let headers: Vec<Value> = headers
        .iter()
        .map(|(name, value)| json!([name.as_str(), String::from_utf8_lossy(value.as_bytes())]))
        .collect();
    Json(json!({
        "method": method.as_str(),
        "query": query,
        "headers": headers,
        "body": String::from_utf8_lossy(&body),
    }))
}

/// Respond with the requested status. Statuses that allow a body get
/// `{"status": code}`.
async fn fixed_status(Path(code): Path<u16>) -> Response {
    let Ok(status) = StatusCode::from_u16(code) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    if status == StatusCode::NO_CONTENT || status == StatusCode::NOT_MODIFIED || status.is_informational() {
        return status.into_response();
    }
    (status, Json(json!({"status": code}))).into_response()
}

async fn plain_text() -> &'static str {
    "this is not json"
}

async fn slow(Path(millis): Path<u64>) -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(millis)).await;
    Json(json!({"slept_ms": millis}))
}
