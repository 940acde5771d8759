//! A small Habitica look-alike for integration tests and local development.
//!
//! Every answer is a JSON envelope (`success`, `data`, `notifications`,
//! `message`); failures are `{"success": false, "error", "message",
//! "displayMessage"?}` with a non-2xx status. Routes live under `/api/v4`.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
    time::Duration,
};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const API_PREFIX: &str = "/api/v4";
pub const RECEIPT_ALREADY_USED: &str = "RECEIPT_ALREADY_USED";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub completed: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Deserialize)]
pub struct CreateTask {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub notes: Option<String>,
    pub completed: Option<bool>,
    pub tags: Option<Vec<String>>,
}

#[derive(Deserialize)]
pub struct UpdateTask {
    pub text: Option<String>,
    pub notes: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Deserialize)]
pub struct TaskFilter {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushDevice {
    pub reg_id: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Default, Deserialize)]
pub struct Invites {
    #[serde(default)]
    pub uuids: Vec<String>,
    #[serde(default)]
    pub emails: Vec<Value>,
    #[serde(default)]
    pub usernames: Vec<String>,
}

#[derive(Deserialize)]
pub struct Receipt {
    pub sku: Option<String>,
    pub transaction: Option<Value>,
}

#[derive(Deserialize)]
pub struct Delay {
    pub ms: Option<u64>,
}

#[derive(Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            notifications: None,
            message: None,
        }
    }

    pub fn with_notifications(mut self, notifications: Vec<Value>) -> Self {
        self.notifications = Some(notifications);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// An error answer in the server's wire shape.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: &'static str,
    pub message: String,
    pub display_message: Option<String>,
}

impl ApiError {
    fn new(status: StatusCode, error: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            error,
            message: message.into(),
            display_message: None,
        }
    }

    fn not_authorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "NotAuthorized", message)
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NotFound", message)
    }

    fn display(mut self, display_message: impl Into<String>) -> Self {
        self.display_message = Some(display_message.into());
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "success": false,
            "error": self.error,
            "message": self.message,
        });
        if let Some(display) = self.display_message {
            body["displayMessage"] = Value::String(display);
        }
        (self.status, Json(body)).into_response()
    }
}

pub type Db = Arc<RwLock<HashMap<Uuid, Task>>>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub user_id: String,
    pub api_key: String,
}

#[derive(Clone, Default)]
pub struct AppState {
    credentials: Option<Arc<Credentials>>,
    notifications: Arc<Vec<Value>>,
    tasks: Db,
    push_devices: Arc<RwLock<HashSet<String>>>,
    receipts: Arc<RwLock<HashSet<String>>>,
}

impl AppState {
    /// Requests must carry these in `x-api-user` / `x-api-key`.
    pub fn with_credentials(mut self, user_id: &str, api_key: &str) -> Self {
        self.credentials = Some(Arc::new(Credentials {
            user_id: user_id.to_string(),
            api_key: api_key.to_string(),
        }));
        self
    }

    /// Attached to every `GET /user` answer.
    pub fn with_notifications(mut self, notifications: Vec<Value>) -> Self {
        self.notifications = Arc::new(notifications);
        self
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        let Some(expected) = &self.credentials else {
            return Ok(());
        };
        let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
        match (header("x-api-user"), header("x-api-key")) {
            (Some(user), Some(key)) if user == expected.user_id && key == expected.api_key => Ok(()),
            (None, _) | (_, None) => Err(ApiError::not_authorized(
                "Missing authentication headers.",
            )),
            _ => Err(ApiError::not_authorized(
                "There is no account that uses those credentials.",
            )),
        }
    }
}

pub fn app() -> Router {
    app_with(AppState::default())
}

pub fn app_with(state: AppState) -> Router {
    let api = Router::new()
        .route("/status", get(status))
        .route("/user", get(get_user))
        .route("/tasks/user", get(list_tasks).post(create_task))
        .route("/tasks/{id}", get(get_task).put(update_task).delete(delete_task))
        .route("/user/feed/{pet}/{food}", post(feed_pet))
        .route("/user/push-devices", post(add_push_device))
        .route("/groups/{id}/invite", post(invite_to_group))
        .route("/iap/android/verify", post(verify_purchase))
        .route("/debug/slow", get(slow))
        .route("/debug/broken", get(broken))
        .route("/debug/crash", get(crash));
    Router::new().nest(API_PREFIX, api).with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, AppState::default()).await
}

pub async fn serve(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "mock server listening");
    }
    axum::serve(listener, app_with(state)).await
}

async fn status() -> Json<Envelope<Value>> {
    Json(Envelope::data(json!({ "status": "up" })))
}

async fn get_user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Envelope<Value>>, ApiError> {
    state.authorize(&headers)?;
    let id = state
        .credentials
        .as_ref()
        .map(|c| c.user_id.clone())
        .unwrap_or_default();
    let user = json!({
        "id": id,
        "stats": { "hp": 50.0, "mp": 32.0, "exp": 0.0, "gp": 12.5, "lvl": 3, "class": "warrior", "points": 0 },
        "profile": { "name": "Mock Adventurer" },
    });
    let mut envelope = Envelope::data(user);
    if !state.notifications.is_empty() {
        envelope = envelope.with_notifications(state.notifications.to_vec());
    }
    Ok(Json(envelope))
}

async fn list_tasks(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(filter): Query<TaskFilter>,
) -> Result<Json<Envelope<Vec<Task>>>, ApiError> {
    state.authorize(&headers)?;
    let tasks = state.tasks.read().await;
    let tasks = tasks
        .values()
        .filter(|t| filter.kind.as_deref().map_or(true, |kind| t.kind == kind))
        .cloned()
        .collect();
    Ok(Json(Envelope::data(tasks)))
}

async fn create_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<CreateTask>,
) -> Result<(StatusCode, Json<Envelope<Task>>), ApiError> {
    state.authorize(&headers)?;
    let task = Task {
        id: Uuid::new_v4(),
        text: input.text,
        kind: input.kind.unwrap_or_else(|| "todo".to_string()),
        notes: input.notes,
        completed: input.completed.unwrap_or(false),
        tags: input.tags.unwrap_or_default(),
    };
    tracing::debug!(id = %task.id, "task created");
    state.tasks.write().await.insert(task.id, task.clone());
    Ok((StatusCode::CREATED, Json(Envelope::data(task))))
}

fn task_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::not_found("Task not found."))
}

async fn get_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Task>>, ApiError> {
    state.authorize(&headers)?;
    let id = task_id(&id)?;
    let tasks = state.tasks.read().await;
    let task = tasks.get(&id).cloned().ok_or_else(|| ApiError::not_found("Task not found."))?;
    Ok(Json(Envelope::data(task)))
}

async fn update_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<UpdateTask>,
) -> Result<Json<Envelope<Task>>, ApiError> {
    state.authorize(&headers)?;
    let id = task_id(&id)?;
    let mut tasks = state.tasks.write().await;
    let task = tasks.get_mut(&id).ok_or_else(|| ApiError::not_found("Task not found."))?;
    if let Some(text) = input.text {
        task.text = text;
    }
    if input.notes.is_some() {
        task.notes = input.notes;
    }
    if let Some(completed) = input.completed {
        task.completed = completed;
    }
    Ok(Json(Envelope::data(task.clone())))
}

async fn delete_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Value>>, ApiError> {
    state.authorize(&headers)?;
    let id = task_id(&id)?;
    state
        .tasks
        .write()
        .await
        .remove(&id)
        .ok_or_else(|| ApiError::not_found("Task not found."))?;
    Ok(Json(Envelope::data(json!({}))))
}

async fn feed_pet(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((pet, food)): Path<(String, String)>,
) -> Result<Json<Envelope<Value>>, ApiError> {
    state.authorize(&headers)?;
    let message = format!("{pet} likes the {food}!");
    Ok(Json(Envelope::data(json!({ "value": 10 })).with_message(message)))
}

async fn add_push_device(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(device): Json<PushDevice>,
) -> Result<Json<Envelope<Vec<Value>>>, ApiError> {
    state.authorize(&headers)?;
    let mut devices = state.push_devices.write().await;
    if !devices.insert(device.reg_id) {
        return Err(ApiError::not_authorized("This push device already exists."));
    }
    let kind = device.kind.unwrap_or_else(|| "android".to_string());
    let listed = devices
        .iter()
        .map(|reg_id| json!({ "regId": reg_id, "type": kind }))
        .collect();
    Ok(Json(Envelope::data(listed)))
}

async fn invite_to_group(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(group_id): Path<String>,
    Json(invites): Json<Invites>,
) -> Result<Json<Envelope<Vec<Value>>>, ApiError> {
    state.authorize(&headers)?;
    if invites.uuids.is_empty() && invites.emails.is_empty() && invites.usernames.is_empty() {
        return Err(
            ApiError::new(StatusCode::BAD_REQUEST, "BadRequest", "Invalid request parameters.")
                .display("You need to invite at least one user."),
        );
    }
    tracing::debug!(%group_id, "invites sent");
    let invited = invites
        .uuids
        .into_iter()
        .chain(invites.usernames)
        .map(Value::String)
        .chain(invites.emails)
        .collect();
    Ok(Json(Envelope::data(invited)))
}

async fn verify_purchase(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(receipt): Json<Receipt>,
) -> Result<Json<Envelope<Value>>, ApiError> {
    state.authorize(&headers)?;
    let key = receipt
        .transaction
        .map(|t| t.to_string())
        .or(receipt.sku)
        .unwrap_or_default();
    if !state.receipts.write().await.insert(key) {
        return Err(ApiError::not_authorized(RECEIPT_ALREADY_USED));
    }
    Ok(Json(Envelope::data(json!({ "ok": true }))))
}

/// Answers after `ms` milliseconds with this server's task count.
async fn slow(State(state): State<AppState>, Query(delay): Query<Delay>) -> Json<Envelope<Value>> {
    tokio::time::sleep(Duration::from_millis(delay.ms.unwrap_or(2_000))).await;
    let tasks = state.tasks.read().await.len();
    Json(Envelope::data(json!({ "status": "up", "tasks": tasks })))
}

async fn broken() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        r#"{"success": true, "data": {"id": "#,
    )
}

async fn crash() -> ApiError {
    ApiError::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        "InternalServerError",
        "An unexpected error occurred.",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_serializes_with_type_field() {
        let task = Task {
            id: Uuid::nil(),
            text: "Test".to_string(),
            kind: "habit".to_string(),
            notes: None,
            completed: false,
            tags: Vec::new(),
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["type"], "habit");
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn create_task_tolerates_nulls_and_unknown_fields() {
        let input: CreateTask = serde_json::from_str(
            r#"{"id":null,"text":"Read","type":"daily","notes":null,"completed":null,"priority":1.5}"#,
        )
        .unwrap();
        assert_eq!(input.text, "Read");
        assert_eq!(input.kind.as_deref(), Some("daily"));
        assert!(input.completed.is_none());
    }

    #[test]
    fn create_task_rejects_missing_text() {
        let result: Result<CreateTask, _> = serde_json::from_str(r#"{"type":"todo"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn envelope_omits_absent_notifications() {
        let json = serde_json::to_value(Envelope::data(1)).unwrap();
        assert_eq!(json, json!({ "success": true, "data": 1 }));
    }

    #[test]
    fn error_body_carries_display_message_only_when_set() {
        let plain = ApiError::not_found("gone");
        assert!(plain.display_message.is_none());
        let shown = ApiError::not_found("gone").display("It is gone.");
        assert_eq!(shown.display_message.as_deref(), Some("It is gone."));
    }

    #[test]
    fn open_server_accepts_missing_headers() {
        let state = AppState::default();
        assert!(state.authorize(&HeaderMap::new()).is_ok());
    }

    #[test]
    fn protected_server_checks_both_headers() {
        let state = AppState::default().with_credentials("u", "k");
        let mut headers = HeaderMap::new();
        headers.insert("x-api-user", "u".parse().unwrap());
        assert_eq!(
            state.authorize(&headers).unwrap_err().status,
            StatusCode::UNAUTHORIZED
        );
        headers.insert("x-api-key", "k".parse().unwrap());
        assert!(state.authorize(&headers).is_ok());
        headers.insert("x-api-key", "wrong".parse().unwrap());
        assert!(state.authorize(&headers).is_err());
    }
}
