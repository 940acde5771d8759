//! Request and response DTOs for the Habitica API.
//!
//! # Design
//! Only the fields the client reads or writes are typed. Every response
//! model derives `Default` so endpoints can substitute a fresh empty model
//! when a call yields no data, and keeps unknown fields in `extra` so a
//! model can be sent back to the server without losing data. Models the
//! client never looks into are plain `serde_json::Value`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type Items = Value;
pub type Equipment = Value;
pub type ContentResult = Value;
pub type InviteResponse = Value;
pub type News = Value;

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAuth {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAuthSocial {
    pub network: String,
    pub auth_response: UserAuthSocialTokens,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserAuthSocialTokens {
    pub client_id: String,
    pub access_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserAuthResponse {
    pub id: String,
    pub api_token: String,
    pub new_user: bool,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VerifyUsernameResponse {
    pub is_usable: bool,
    pub issues: Vec<String>,
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Status {
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub stats: Option<Stats>,
    pub items: Option<Items>,
    /// Filled in by the client from the task endpoints, never sent.
    #[serde(skip)]
    pub tasks: Option<TaskList>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Stats {
    pub hp: f64,
    pub mp: f64,
    pub exp: f64,
    pub gp: f64,
    pub lvl: u32,
    #[serde(rename = "class")]
    pub habit_class: Option<String>,
    pub points: u32,
}

// ---------------------------------------------------------------------------
// Tasks and tags
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Task {
    pub id: Option<String>,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub notes: Option<String>,
    pub priority: Option<f64>,
    pub completed: Option<bool>,
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The task endpoints answer with a bare array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList {
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskDirectionData {
    pub delta: f64,
    pub hp: Option<f64>,
    pub exp: Option<f64>,
    pub gp: Option<f64>,
    pub lvl: Option<u32>,
    #[serde(rename = "_tmp")]
    pub tmp: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BulkTaskScoringData {
    pub tasks: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tag {
    pub id: Option<String>,
    pub name: String,
    pub challenge: Option<bool>,
}

// ---------------------------------------------------------------------------
// Inventory and shops
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuyResponse {
    pub items: Option<Items>,
    pub hp: Option<f64>,
    pub gp: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedResponse {
    pub value: Option<i64>,
    /// Copied from the envelope's `message`.
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UnlockResponse {
    pub items: Option<Items>,
    pub preferences: Option<Value>,
    pub purchased: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SkillResponse {
    pub user: Option<User>,
    pub task: Option<Task>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Shop {
    pub identifier: String,
    pub text: Option<String>,
    pub categories: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShopItem {
    pub key: String,
    pub text: Option<String>,
    pub value: Option<f64>,
    pub currency: Option<String>,
    pub purchase_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseValidationRequest {
    pub sku: Option<String>,
    pub transaction: Option<Value>,
    pub gift: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PurchaseValidationResult {
    pub ok: bool,
    pub data: Option<Value>,
}

// ---------------------------------------------------------------------------
// Social
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub profile: Option<Value>,
    pub stats: Option<Stats>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub privacy: Option<String>,
    pub leader: Option<Value>,
    pub quest: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub user: Option<String>,
    pub uuid: Option<String>,
    pub timestamp: Option<Value>,
    pub likes: BTreeMap<String, bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostChatMessageResult {
    pub message: Option<ChatMessage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InboxConversation {
    pub uuid: String,
    pub user: Option<String>,
    pub username: Option<String>,
    pub text: Option<String>,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FindUsernameResult {
    pub id: String,
    pub username: Option<String>,
    pub profile: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Achievement {
    pub key: String,
    pub title: Option<String>,
    pub text: Option<String>,
    pub earned: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Quest {
    pub key: String,
    pub active: bool,
    pub leader: Option<String>,
    pub members: BTreeMap<String, Option<bool>>,
    pub progress: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Challenge {
    pub id: Option<String>,
    pub name: String,
    pub short_name: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub prize: u32,
    pub member_count: u32,
    pub group: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Which tasks to keep when leaving a challenge: `keep-all` or `remove-all`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveChallengeBody {
    pub keep: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TeamPlan {
    pub id: String,
    pub name: String,
    pub summary: Option<String>,
    pub leader_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorldState {
    pub world_boss: Option<Value>,
    pub npc_image_suffix: Option<String>,
    pub current_event: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_keeps_unknown_fields() {
        let json = r#"{"id":"t1","text":"Walk","type":"habit","up":true,"value":1.5}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.kind, "habit");
        assert_eq!(task.extra["up"], true);
        let back = serde_json::to_value(&task).unwrap();
        assert_eq!(back["value"], 1.5);
        assert_eq!(back["type"], "habit");
    }

    #[test]
    fn task_list_is_a_bare_array() {
        let list: TaskList = serde_json::from_str(r#"[{"text":"a","type":"todo"}]"#).unwrap();
        assert_eq!(list.tasks.len(), 1);
        assert_eq!(list.tasks[0].text, "a");
    }

    #[test]
    fn user_auth_omits_unset_fields() {
        let auth = UserAuth {
            username: "u".to_string(),
            password: "p".to_string(),
            ..UserAuth::default()
        };
        let json = serde_json::to_value(&auth).unwrap();
        assert!(json.get("confirmPassword").is_none());
        assert!(json.get("email").is_none());
    }

    #[test]
    fn stats_class_field_is_renamed() {
        let stats: Stats = serde_json::from_str(r#"{"class":"wizard","lvl":10}"#).unwrap();
        assert_eq!(stats.habit_class.as_deref(), Some("wizard"));
        assert_eq!(stats.lvl, 10);
    }

    #[test]
    fn user_tasks_are_client_side_only() {
        let user = User {
            id: "u".to_string(),
            tasks: Some(TaskList::default()),
            ..User::default()
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("tasks").is_none());
    }
}
