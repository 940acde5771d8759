//! The endpoint table.
//!
//! Each row declares one endpoint: its name and arguments, the payload type,
//! what to return when the call yields no data, and the route. `or_default`
//! rows return the payload type and substitute `Default::default()`;
//! `optional` rows return `Option<_>`.

use std::collections::HashMap;

use serde_json::{json, Value};

use crate::client::ApiClient;
use crate::envelope::Ack;
use crate::http::Route;
use crate::types::*;

macro_rules! endpoints {
    (@method or_default [$(#[$meta:meta])*] $name:ident [$($arg:ident: $ty:ty),*] $out:ty, $route:expr) => {
        $(#[$meta])*
        pub async fn $name(&self, $($arg: $ty),*) -> $out {
            self.call::<$out>($route).await.unwrap_or_default()
        }
    };
    (@method optional [$(#[$meta:meta])*] $name:ident [$($arg:ident: $ty:ty),*] $out:ty, $route:expr) => {
        $(#[$meta])*
        pub async fn $name(&self, $($arg: $ty),*) -> Option<$out> {
            self.call::<$out>($route).await
        }
    };
    ($(
        $(#[$meta:meta])*
        $mode:ident fn $name:ident($($arg:ident: $ty:ty),* $(,)?) -> $out:ty = $route:expr;
    )*) => {
        impl ApiClient {
            $(
                endpoints!(@method $mode [$(#[$meta])*] $name [$($arg: $ty),*] $out, $route);
            )*
        }
    };
}

endpoints! {
    // --- auth ---------------------------------------------------------------

    optional fn register_user(username: &str, email: &str, password: &str, confirm_password: &str) -> UserAuthResponse =
        Route::post("user/auth/local/register").json(&UserAuth {
            username: username.to_string(),
            password: password.to_string(),
            confirm_password: Some(confirm_password.to_string()),
            email: Some(email.to_string()),
        });
    optional fn connect_user(username: &str, password: &str) -> UserAuthResponse =
        Route::post("user/auth/local/login").json(&UserAuth {
            username: username.to_string(),
            password: password.to_string(),
            ..UserAuth::default()
        });
    optional fn connect_social(network: &str, user_id: &str, access_token: &str) -> UserAuthResponse =
        Route::post("user/auth/social").json(&UserAuthSocial {
            network: network.to_string(),
            auth_response: UserAuthSocialTokens {
                client_id: user_id.to_string(),
                access_token: access_token.to_string(),
            },
        });
    optional fn disconnect_social(network: &str) -> Ack =
        Route::delete(format!("user/auth/social/{}", network));
    optional fn verify_username(username: &str) -> VerifyUsernameResponse =
        Route::post("user/auth/verify-username").json(&json!({ "username": username }));
    optional fn update_login_name(new_login_name: &str, password: &str) -> Ack =
        Route::put("user/auth/update-username").json(&json!({ "username": new_login_name, "password": password }));
    optional fn update_username(new_login_name: &str) -> Ack =
        Route::put("user/auth/update-username").json(&json!({ "username": new_login_name }));
    optional fn update_email(new_email: &str, password: &str) -> Ack =
        Route::put("user/auth/update-email").json(&json!({ "newEmail": new_email, "password": password }));
    optional fn update_password(old_password: &str, new_password: &str, new_password_confirmation: &str) -> Ack =
        Route::put("user/auth/update-password").json(&json!({
            "password": old_password,
            "newPassword": new_password,
            "confirmPassword": new_password_confirmation,
        }));
    optional fn send_password_reset_email(email: &str) -> Ack =
        Route::post("user/reset-password").json(&json!({ "email": email }));

    // --- user ---------------------------------------------------------------

    /// Server availability; `"up"` when healthy.
    or_default fn get_status() -> Status = Route::get("status");
    or_default fn sync_user_stats() -> User = Route::post("user/stats/sync");
    optional fn update_user(update: &HashMap<String, Value>) -> User = Route::put("user").json(update);
    or_default fn registration_language(language: &str) -> User =
        Route::put("user/registration-language").json(&json!({ "language": language }));
    optional fn sleep() -> bool = Route::post("user/sleep");
    optional fn revive() -> Items = Route::post("user/revive");
    optional fn reroll() -> User = Route::post("user/reroll");
    optional fn disable_classes() -> User = Route::post("user/disable-classes");
    optional fn allocate_point(stat: &str) -> Stats = Route::post("user/allocate").query("stat", stat);
    optional fn bulk_allocate_points(strength: u32, intelligence: u32, constitution: u32, perception: u32) -> Stats =
        Route::post("user/allocate-bulk").json(&json!({
            "stats": { "str": strength, "int": intelligence, "con": constitution, "per": perception }
        }));
    optional fn change_custom_day_start(update: &HashMap<String, Value>) -> Ack =
        Route::post("user/custom-day-start").json(update);
    optional fn run_cron() -> Ack = Route::post("cron");
    optional fn reset_account(password: &str) -> Ack =
        Route::post("user/reset").json(&json!({ "password": password }));
    optional fn delete_account(password: &str) -> Ack =
        Route::delete("user").json(&json!({ "password": password }));
    optional fn unlock_path(path: &str) -> UnlockResponse = Route::post("user/unlock").query("path", path);
    optional fn use_skill(skill_name: &str, target_type: &str, target_id: &str) -> SkillResponse =
        Route::post(format!("user/class/cast/{}", skill_name))
            .query("targetType", target_type)
            .query("targetId", target_id);
    optional fn use_skill_on_self(skill_name: &str, target_type: &str) -> SkillResponse =
        Route::post(format!("user/class/cast/{}", skill_name)).query("targetType", target_type);
    optional fn mark_private_messages_read() -> Ack = Route::post("user/mark-pms-read");
    or_default fn block_member(user_id: &str) -> Vec<String> = Route::post(format!("user/block/{}", user_id));
    or_default fn add_push_device(device: &HashMap<String, String>) -> Vec<Value> =
        Route::post("user/push-devices").json(device);
    or_default fn delete_push_device(reg_id: &str) -> Vec<Value> =
        Route::delete(format!("user/push-devices/{}", reg_id));
    optional fn toggle_pinned_item(pin_type: &str, path: &str) -> Ack =
        Route::get(format!("user/toggle-pinned-item/{}/{}", pin_type, path));

    // --- inventory & shops --------------------------------------------------

    or_default fn retrieve_in_app_rewards() -> Vec<ShopItem> = Route::get("user/in-app-rewards");
    optional fn equip_item(kind: &str, item_key: &str) -> Items =
        Route::post(format!("user/equip/{}/{}", kind, item_key));
    optional fn buy_item(item_key: &str, quantity: u32) -> BuyResponse =
        Route::post(format!("user/buy/{}", item_key)).json(&json!({ "quantity": quantity }));
    optional fn purchase_item(kind: &str, item_key: &str, quantity: u32) -> Ack =
        Route::post(format!("user/purchase/{}/{}", kind, item_key)).json(&json!({ "quantity": quantity }));
    optional fn purchase_hourglass_item(kind: &str, item_key: &str) -> Ack =
        Route::post(format!("user/purchase-hourglass/{}/{}", kind, item_key));
    optional fn purchase_mystery_set(item_key: &str) -> Ack =
        Route::post(format!("user/buy-mystery-set/{}", item_key));
    optional fn purchase_quest(key: &str) -> Ack = Route::post(format!("user/buy-quest/{}", key));
    optional fn purchase_special_spell(key: &str) -> Ack =
        Route::post(format!("user/buy-special-spell/{}", key));
    optional fn sell_item(kind: &str, item_key: &str) -> User =
        Route::post(format!("user/sell/{}/{}", kind, item_key));
    optional fn hatch_pet(egg_key: &str, hatching_potion_key: &str) -> Items =
        Route::post(format!("user/hatch/{}/{}", egg_key, hatching_potion_key));
    optional fn open_mystery_item() -> Equipment = Route::post("user/open-mystery-item");
    optional fn transfer_gems(giftee_id: &str, amount: u32) -> Ack =
        Route::post("members/transfer-gems").json(&json!({ "toUserId": giftee_id, "gemAmount": amount }));

    // --- purchases ----------------------------------------------------------

    optional fn validate_purchase(request: &PurchaseValidationRequest) -> PurchaseValidationResult =
        Route::post("iap/android/verify").json(request);
    optional fn validate_subscription(request: &PurchaseValidationRequest) -> Value =
        Route::post("iap/android/subscribe").json(request);
    optional fn validate_no_renew_subscription(request: &PurchaseValidationRequest) -> Value =
        Route::post("iap/android/norenew-subscribe").json(request);
    optional fn cancel_subscription() -> Ack = Route::get("iap/android/subscribe/cancel");

    // --- tasks --------------------------------------------------------------

    or_default fn get_tasks() -> TaskList = Route::get("tasks/user");
    or_default fn get_tasks_of_type(kind: &str) -> TaskList = Route::get("tasks/user").query("type", kind);
    or_default fn get_tasks_due(kind: &str, due_date: &str) -> TaskList =
        Route::get("tasks/user").query("type", kind).query("dueDate", due_date);
    or_default fn get_task(id: &str) -> Task = Route::get(format!("tasks/{}", id));
    optional fn post_task_direction(id: &str, direction: &str) -> TaskDirectionData =
        Route::post(format!("tasks/{}/score/{}", id, direction));
    optional fn bulk_score_tasks(data: &[HashMap<String, String>]) -> BulkTaskScoringData =
        Route::post("tasks/bulk-score").json(data);
    or_default fn post_task_new_position(id: &str, position: i32) -> Vec<String> =
        Route::post(format!("tasks/{}/move/to/{}", id, position));
    optional fn score_checklist_item(task_id: &str, item_id: &str) -> Task =
        Route::post(format!("tasks/{}/checklist/{}/score", task_id, item_id));
    optional fn create_task(item: &Task) -> Task = Route::post("tasks/user").json(item);
    optional fn create_group_task(group_id: &str, item: &Task) -> Task =
        Route::post(format!("tasks/group/{}", group_id)).json(item);
    or_default fn create_tasks(tasks: &[Task]) -> Vec<Task> = Route::post("tasks/user").json(tasks);
    optional fn update_task(id: &str, item: &Task) -> Task = Route::put(format!("tasks/{}", id)).json(item);
    optional fn delete_task(id: &str) -> Ack = Route::delete(format!("tasks/{}", id));
    optional fn mark_task_needs_work(task_id: &str, user_id: &str) -> Task =
        Route::post(format!("tasks/{}/needs-work/{}", task_id, user_id));
    optional fn assign_to_task(task_id: &str, ids: &[String]) -> Task =
        Route::post(format!("tasks/{}/assign", task_id)).json(ids);
    optional fn unassign_from_task(task_id: &str, user_id: &str) -> Task =
        Route::post(format!("tasks/{}/unassign/{}", task_id, user_id));
    optional fn unlink_all_tasks(challenge_id: &str, keep_option: &str) -> Ack =
        Route::post(format!("tasks/unlink-all/{}", challenge_id)).query("keep", keep_option);

    // --- tags ---------------------------------------------------------------

    optional fn create_tag(tag: &Tag) -> Tag = Route::post("tags").json(tag);
    optional fn update_tag(id: &str, tag: &Tag) -> Tag = Route::put(format!("tags/{}", id)).json(tag);
    optional fn delete_tag(id: &str) -> Ack = Route::delete(format!("tags/{}", id));

    // --- groups & chat ------------------------------------------------------

    or_default fn list_groups(kind: &str) -> Vec<Group> = Route::get("groups").query("type", kind);
    optional fn get_group(group_id: &str) -> Group = Route::get(format!("groups/{}", group_id));
    optional fn create_group(group: &Group) -> Group = Route::post("groups").json(group);
    optional fn update_group(id: &str, group: &Group) -> Group = Route::put(format!("groups/{}", id)).json(group);
    optional fn remove_member_from_group(group_id: &str, user_id: &str) -> Ack =
        Route::post(format!("groups/{}/removeMember/{}", group_id, user_id));
    or_default fn list_group_chat(group_id: &str) -> Vec<ChatMessage> =
        Route::get(format!("groups/{}/chat", group_id));
    optional fn join_group(group_id: &str) -> Group = Route::post(format!("groups/{}/join", group_id));
    optional fn leave_group(group_id: &str, keep_challenges: &str) -> Ack =
        Route::post(format!("groups/{}/leave", group_id)).query("keepChallenges", keep_challenges);
    optional fn post_group_chat(group_id: &str, message: &HashMap<String, String>) -> PostChatMessageResult =
        Route::post(format!("groups/{}/chat", group_id)).json(message);
    optional fn delete_message(group_id: &str, message_id: &str) -> Ack =
        Route::delete(format!("groups/{}/chat/{}", group_id, message_id));
    optional fn like_message(group_id: &str, message_id: &str) -> ChatMessage =
        Route::post(format!("groups/{}/chat/{}/like", group_id, message_id));
    optional fn flag_message(group_id: &str, message_id: &str, data: &HashMap<String, String>) -> Ack =
        Route::post(format!("groups/{}/chat/{}/flag", group_id, message_id)).json(data);
    optional fn seen_messages(group_id: &str) -> Ack = Route::post(format!("groups/{}/chat/seen", group_id));
    or_default fn get_group_members(group_id: &str, include_all_public_fields: bool) -> Vec<Member> =
        Route::get(format!("groups/{}/members", group_id))
            .query("includeAllPublicFields", include_all_public_fields);
    or_default fn get_group_members_after(group_id: &str, include_all_public_fields: bool, last_id: &str) -> Vec<Member> =
        Route::get(format!("groups/{}/members", group_id))
            .query("includeAllPublicFields", include_all_public_fields)
            .query("lastId", last_id);
    or_default fn invite_to_group(group_id: &str, invites: &HashMap<String, Vec<String>>) -> Vec<InviteResponse> =
        Route::post(format!("groups/{}/invite", group_id)).json(invites);
    optional fn reject_group_invite(group_id: &str) -> Ack =
        Route::post(format!("groups/{}/reject-invite", group_id));
    or_default fn get_group_invites(group_id: &str, include_all_public_fields: bool) -> Vec<Member> =
        Route::get(format!("groups/{}/invites", group_id))
            .query("includeAllPublicFields", include_all_public_fields);
    or_default fn retrieve_party_seeking_users(page: u32) -> Vec<Member> =
        Route::get("looking-for-party").query("page", page);

    // --- quests -------------------------------------------------------------

    optional fn accept_quest(group_id: &str) -> Ack = Route::post(format!("groups/{}/quests/accept", group_id));
    optional fn reject_quest(group_id: &str) -> Ack = Route::post(format!("groups/{}/quests/reject", group_id));
    optional fn cancel_quest(group_id: &str) -> Ack = Route::post(format!("groups/{}/quests/cancel", group_id));
    optional fn force_start_quest(group_id: &str, group: &Group) -> Quest =
        Route::post(format!("groups/{}/quests/force-start", group_id)).json(group);
    optional fn invite_to_quest(group_id: &str, quest_key: &str) -> Quest =
        Route::post(format!("groups/{}/quests/invite/{}", group_id, quest_key));
    optional fn abort_quest(group_id: &str) -> Quest = Route::post(format!("groups/{}/quests/abort", group_id));
    optional fn leave_quest(group_id: &str) -> Ack = Route::post(format!("groups/{}/quests/leave", group_id));

    // --- members & inbox ----------------------------------------------------

    optional fn get_member(member_id: &str) -> Member = Route::get(format!("members/{}", member_id));
    optional fn get_member_with_username(username: &str) -> Member =
        Route::get(format!("members/username/{}", username));
    or_default fn get_hall_member(user_id: &str) -> Member = Route::get(format!("hall/heroes/{}", user_id));
    or_default fn update_member(member_id: &str, update: &HashMap<String, HashMap<String, bool>>) -> Member =
        Route::put(format!("hall/heroes/{}", member_id)).json(update);
    optional fn report_member(member_id: &str, data: &HashMap<String, String>) -> Ack =
        Route::post(format!("members/{}/flag", member_id)).json(data);
    or_default fn find_usernames(username: &str, context: &str, id: &str) -> Vec<FindUsernameResult> =
        Route::get(format!("members/find/{}", username)).query("context", context).query("id", id);
    optional fn post_private_message(message: &HashMap<String, String>) -> PostChatMessageResult =
        Route::post("members/send-private-message").json(message);
    optional fn flag_inbox_message(message_id: &str, data: &HashMap<String, String>) -> Ack =
        Route::post(format!("members/flag-private-message/{}", message_id)).json(data);
    optional fn delete_inbox_message(id: &str) -> Ack = Route::delete(format!("inbox/messages/{}", id));
    or_default fn retrieve_inbox_messages(uuid: &str, page: u32) -> Vec<ChatMessage> =
        Route::get("inbox/messages").query("conversation", uuid).query("page", page);
    or_default fn retrieve_inbox_conversations() -> Vec<InboxConversation> = Route::get("inbox/conversations");

    // --- challenges ---------------------------------------------------------

    optional fn get_challenge_tasks(challenge_id: &str) -> TaskList =
        Route::get(format!("tasks/challenge/{}", challenge_id));
    optional fn get_challenge(challenge_id: &str) -> Challenge = Route::get(format!("challenges/{}", challenge_id));
    optional fn join_challenge(challenge_id: &str) -> Challenge =
        Route::post(format!("challenges/{}/join", challenge_id));
    optional fn leave_challenge(challenge_id: &str, body: &LeaveChallengeBody) -> Ack =
        Route::post(format!("challenges/{}/leave", challenge_id)).json(body);
    optional fn create_challenge(challenge: &Challenge) -> Challenge = Route::post("challenges").json(challenge);
    or_default fn create_challenge_tasks(challenge_id: &str, tasks: &[Task]) -> Vec<Task> =
        Route::post(format!("tasks/challenge/{}", challenge_id)).json(tasks);
    optional fn create_challenge_task(challenge_id: &str, task: &Task) -> Task =
        Route::post(format!("tasks/challenge/{}", challenge_id)).json(task);
    optional fn update_challenge(challenge: &Challenge) -> Challenge =
        Route::put(format!("challenges/{}", challenge.id.as_deref().unwrap_or_default())).json(challenge);
    optional fn delete_challenge(challenge_id: &str) -> Ack = Route::delete(format!("challenges/{}", challenge_id));
    optional fn report_challenge(challenge_id: &str, data: &HashMap<String, String>) -> Ack =
        Route::post(format!("challenges/{}/flag", challenge_id)).json(data);

    // --- team plans ---------------------------------------------------------

    or_default fn get_team_plans() -> Vec<TeamPlan> = Route::get("group-plans");
    or_default fn get_team_plan_tasks(team_id: &str) -> TaskList = Route::get(format!("tasks/group/{}", team_id));

    // --- notifications & news -----------------------------------------------

    or_default fn get_news() -> Vec<News> = Route::get("news");
    or_default fn read_notification(notification_id: &str) -> Vec<Value> =
        Route::post(format!("notifications/{}/read", notification_id));
    or_default fn read_notifications(ids: &HashMap<String, Vec<String>>) -> Vec<Value> =
        Route::post("notifications/read").json(ids);
    or_default fn see_notifications(ids: &HashMap<String, Vec<String>>) -> Vec<Value> =
        Route::post("notifications/see").json(ids);
    or_default fn get_world_state() -> WorldState = Route::get("world-state");

    // --- debug --------------------------------------------------------------

    optional fn debug_add_ten_gems() -> Ack = Route::post("debug/add-ten-gems");
}
