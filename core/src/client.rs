//! The Habitica API client.
//!
//! # Design
//! `ApiClient` ties the rebuildable transport to the response processor.
//! Every endpoint is `process(|| fetch(route))` plus, at most, a default for
//! the "no data" case: the table-driven ones live in `endpoints.rs`, the
//! handful that need more than that are written out here.

use std::sync::{Arc, PoisonError, RwLock};

use serde::de::DeserializeOwned;

use crate::call::ResponseProcessor;
use crate::collaborators::{DialogPresenter, NotificationSink, Telemetry, TracingTelemetry};
use crate::config::{HostConfig, TransportSettings};
use crate::envelope::ResponseEnvelope;
use crate::error::{ConfigError, Fault};
use crate::http::Route;
use crate::transport::TransportBinding;
use crate::types::{Achievement, Challenge, ContentResult, FeedResponse, Shop, User};

pub struct ApiClient {
    binding: TransportBinding,
    processor: ResponseProcessor,
    language_code: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(
        host: HostConfig,
        settings: TransportSettings,
        notifications: Arc<dyn NotificationSink>,
        dialogs: Arc<dyn DialogPresenter>,
    ) -> Result<Self, ConfigError> {
        Self::with_telemetry(host, settings, notifications, dialogs, Arc::new(TracingTelemetry))
    }

    pub fn with_telemetry(
        host: HostConfig,
        settings: TransportSettings,
        notifications: Arc<dyn NotificationSink>,
        dialogs: Arc<dyn DialogPresenter>,
        telemetry: Arc<dyn Telemetry>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            binding: TransportBinding::new(host, settings)?,
            processor: ResponseProcessor::new(notifications, dialogs, telemetry),
            language_code: RwLock::new(None),
        })
    }

    pub fn binding(&self) -> &TransportBinding {
        &self.binding
    }

    pub fn processor(&self) -> &ResponseProcessor {
        &self.processor
    }

    pub fn host_config(&self) -> HostConfig {
        self.binding.host_config()
    }

    pub fn has_authentication_keys(&self) -> bool {
        self.binding.host_config().has_authentication()
    }

    pub fn update_server_url(&self, address: Option<&str>) -> Result<(), ConfigError> {
        self.binding.update_server_url(address)
    }

    pub fn update_authentication_credentials(
        &self,
        user_id: Option<&str>,
        api_token: Option<&str>,
    ) -> Result<(), ConfigError> {
        self.binding.update_credentials(user_id, api_token)?;
        tracing::info!(user_id = user_id.unwrap_or_default(), "Authentication credentials updated");
        Ok(())
    }

    pub fn language_code(&self) -> Option<String> {
        self.language_code
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_language_code(&self, code: Option<&str>) {
        *self
            .language_code
            .write()
            .unwrap_or_else(PoisonError::into_inner) = code.map(str::to_string);
    }

    /// One round trip against the current transport handle.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        route: Route,
    ) -> Result<ResponseEnvelope<T>, Fault> {
        let path = route.api_path();
        let handle = self.binding.current();
        let request = route.into_request(handle.base_url())?;
        let response = handle.execute(request).await?;
        ResponseEnvelope::decode(&path, &response.body)
    }

    /// `fetch` through the response processor: faults are absorbed.
    pub async fn call<T: DeserializeOwned>(&self, route: Route) -> Option<T> {
        self.processor.process(move || self.fetch(route)).await
    }

    // -----------------------------------------------------------------------
    // Endpoints that do more than default substitution
    // -----------------------------------------------------------------------

    /// `GET /user`, then, if asked, `GET /tasks/user` attached as `tasks`.
    pub async fn retrieve_user(&self, with_tasks: bool) -> Option<User> {
        let mut user = self.call::<User>(Route::get("user")).await;
        if with_tasks {
            let tasks = self.get_tasks().await;
            if let Some(user) = user.as_mut() {
                user.tasks = Some(tasks);
            }
        }
        user
    }

    /// `POST /user/feed/{pet}/{food}`. The envelope message ("Ferocious
    /// Wolf likes the meat!") is copied onto the payload.
    pub async fn feed_pet(&self, pet_key: &str, food_key: &str) -> Option<FeedResponse> {
        let route = Route::post(format!("user/feed/{pet_key}/{food_key}"));
        self.processor
            .process(move || async move {
                let mut envelope = self.fetch::<FeedResponse>(route).await?;
                if let Some(data) = envelope.data.as_mut() {
                    data.message = envelope.message.clone();
                }
                Ok(envelope)
            })
            .await
    }

    /// `POST /user/change-class`, without a class it opens the class picker.
    pub async fn change_class(&self, class_name: Option<&str>) -> Option<User> {
        let route = Route::post("user/change-class").query_opt("class", class_name);
        self.call(route).await
    }

    /// `GET /challenges/user`, optionally restricted to joined challenges.
    pub async fn get_user_challenges(&self, page: u32, member_only: Option<bool>) -> Vec<Challenge> {
        let route = Route::get("challenges/user")
            .query("page", page)
            .query_opt("member", member_only);
        self.call(route).await.unwrap_or_default()
    }

    /// `GET /content`, in `language` or the client's language.
    pub async fn get_content(&self, language: Option<&str>) -> Option<ContentResult> {
        let language = language.map(str::to_string).or_else(|| self.language_code());
        self.call(Route::get("content").query_opt("language", language))
            .await
    }

    /// `GET /shops/{identifier}` in the client's language.
    pub async fn retrieve_shop_inventory(&self, identifier: &str) -> Option<Shop> {
        let route = Route::get(format!("shops/{identifier}")).query_opt("language", self.language_code());
        self.call(route).await
    }

    /// `GET /shops/market-gear` in the client's language.
    pub async fn retrieve_market_gear(&self) -> Option<Shop> {
        let route = Route::get("shops/market-gear").query_opt("language", self.language_code());
        self.call(route).await
    }

    /// `GET /members/{id}/achievements` in the client's language.
    pub async fn get_member_achievements(&self, member_id: &str) -> Vec<Achievement> {
        let route = Route::get(format!("members/{member_id}/achievements"))
            .query_opt("lang", self.language_code());
        self.call(route).await.unwrap_or_default()
    }
}
