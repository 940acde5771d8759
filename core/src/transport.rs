//! The live HTTP client bound to a [`HostConfig`].
//!
//! # Design
//! A [`TransportHandle`] is immutable once built: base url, auth headers and
//! timeouts are baked into its `reqwest::Client`. Changing the server
//! address or credentials never edits a handle. [`TransportBinding`] builds
//! a complete replacement and swaps the `Arc` under a write lock, so a call
//! runs entirely against the handle it picked up and calls issued after
//! `rebuild()` returns see the new one.

use std::error::Error as _;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, Url};

use crate::config::{HostConfig, HttpLogLevel, TransportSettings, API_PREFIX};
use crate::error::{ConfigError, Fault, FaultKind};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

#[derive(Debug)]
pub struct TransportHandle {
    base_url: Url,
    client: reqwest::Client,
    log_level: HttpLogLevel,
}

impl TransportHandle {
    pub fn build(host: &HostConfig, settings: &TransportSettings) -> Result<Self, ConfigError> {
        let base_url = host.server_url()?;

        let mut headers = HeaderMap::new();
        headers.insert("x-client", header_value(&settings.client_id, "x-client")?);
        if host.has_authentication() {
            headers.insert("x-api-user", header_value(&host.user_id, "x-api-user")?);
            let mut key = header_value(&host.api_key, "x-api-key")?;
            key.set_sensitive(true);
            headers.insert("x-api-key", key);
        }

        let connect = Duration::from_millis(settings.connect_timeout_ms);
        let read = Duration::from_millis(settings.read_timeout_ms);
        let write = Duration::from_millis(settings.write_timeout_ms);
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(connect)
            .read_timeout(read)
            .timeout(connect + read + write)
            .build()?;

        Ok(Self {
            base_url,
            client,
            log_level: settings.log_level,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Execute one request. Non-2xx statuses come back as
    /// [`FaultKind::Http`] with the raw body.
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, Fault> {
        let path = api_path(&request.path);
        let started = Instant::now();

        let mut builder = self.client.request(to_method(request.method), &request.path);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        self.log_request(&request);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| map_error(&path, e))?;
        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
            .collect();
        let body = response.text().await.map_err(|e| map_error(&path, e))?;
        let response = HttpResponse {
            status,
            headers,
            body,
        };
        self.log_response(&path, &response, started.elapsed());

        if response.is_success() {
            Ok(response)
        } else {
            Err(Fault::http(path, status, response.body))
        }
    }

    fn log_request(&self, request: &HttpRequest) {
        match self.log_level {
            HttpLogLevel::None | HttpLogLevel::Basic => {}
            HttpLogLevel::Headers => {
                tracing::debug!(method = request.method.as_str(), url = %request.path, headers = ?request.headers, "--> request");
            }
            HttpLogLevel::Body => {
                tracing::debug!(
                    method = request.method.as_str(),
                    url = %request.path,
                    headers = ?request.headers,
                    body = request.body.as_deref().unwrap_or(""),
                    "--> request"
                );
            }
        }
    }

    fn log_response(&self, path: &str, response: &HttpResponse, elapsed: Duration) {
        let elapsed_ms = elapsed.as_millis() as u64;
        match self.log_level {
            HttpLogLevel::None => {}
            HttpLogLevel::Basic => {
                tracing::debug!(path, status = response.status, elapsed_ms, "<-- response");
            }
            HttpLogLevel::Headers => {
                tracing::debug!(path, status = response.status, elapsed_ms, headers = ?response.headers, "<-- response");
            }
            HttpLogLevel::Body => {
                tracing::debug!(
                    path,
                    status = response.status,
                    elapsed_ms,
                    headers = ?response.headers,
                    body = %response.body,
                    "<-- response"
                );
            }
        }
    }
}

fn header_value(value: &str, name: &'static str) -> Result<HeaderValue, ConfigError> {
    HeaderValue::from_str(value).map_err(|_| ConfigError::InvalidHeader(name))
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Request path below the API prefix, e.g. `/groups/1/invite`.
pub(crate) fn api_path(url: &str) -> String {
    match Url::parse(url) {
        Ok(url) => {
            let path = url.path();
            path.strip_prefix(API_PREFIX).unwrap_or(path).to_string()
        }
        Err(_) => url.to_string(),
    }
}

/// Maps reqwest errors onto the fault taxonomy.
///
/// Text checks only look at the `source()` chain: reqwest's own message
/// carries the request url, which can hold arbitrary user data. DNS and TLS
/// failures surface while connecting, so they are only looked for there.
fn map_error(path: &str, error: reqwest::Error) -> Fault {
    let message = error_chain(&error);
    let causes = source_chain(&error).to_lowercase();
    let io_kind = io_error_kind(&error);

    let kind = if error.is_timeout() || io_kind == Some(io::ErrorKind::TimedOut) {
        FaultKind::Timeout
    } else if error.is_decode() {
        FaultKind::Payload { message }
    } else if error.is_connect() {
        if causes.contains("dns error")
            || causes.contains("failed to lookup address")
            || causes.contains("name or service not known")
        {
            FaultKind::UnknownHost { message }
        } else if causes.contains("certificate")
            || causes.contains("tls")
            || causes.contains("handshake")
        {
            FaultKind::Tls { message }
        } else {
            FaultKind::Socket { message }
        }
    } else if matches!(
        io_kind,
        Some(
            io::ErrorKind::ConnectionRefused
                | io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionAborted
                | io::ErrorKind::BrokenPipe
                | io::ErrorKind::NotConnected
        )
    ) {
        FaultKind::Socket { message }
    } else if error.is_request() || error.is_body() || io_kind.is_some() {
        FaultKind::Io { message }
    } else {
        FaultKind::Unclassified { message }
    };
    Fault::new(path, kind)
}

/// The full message, url included, for telemetry.
fn error_chain(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let causes = source_chain(error);
    if !causes.is_empty() {
        message.push_str(": ");
        message.push_str(&causes);
    }
    message
}

fn source_chain(error: &reqwest::Error) -> String {
    let mut causes = Vec::new();
    let mut source = error.source();
    while let Some(err) = source {
        causes.push(err.to_string());
        source = err.source();
    }
    causes.join(": ")
}

fn io_error_kind(error: &reqwest::Error) -> Option<io::ErrorKind> {
    let mut source = error.source();
    while let Some(err) = source {
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            return Some(io_err.kind());
        }
        source = err.source();
    }
    None
}

/// Owner of the shared, rebuildable transport handle.
pub struct TransportBinding {
    settings: TransportSettings,
    /// Held for the whole build-and-swap so concurrent updates apply in order.
    host: Mutex<HostConfig>,
    handle: RwLock<Arc<TransportHandle>>,
}

impl TransportBinding {
    pub fn new(host: HostConfig, settings: TransportSettings) -> Result<Self, ConfigError> {
        let handle = TransportHandle::build(&host, &settings)?;
        Ok(Self {
            settings,
            host: Mutex::new(host),
            handle: RwLock::new(Arc::new(handle)),
        })
    }

    /// The handle new calls should use.
    pub fn current(&self) -> Arc<TransportHandle> {
        self.handle
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn host_config(&self) -> HostConfig {
        self.lock_host().clone()
    }

    pub fn settings(&self) -> &TransportSettings {
        &self.settings
    }

    /// Replace the handle with one built from the current host config.
    pub fn rebuild(&self) -> Result<(), ConfigError> {
        let host = self.lock_host();
        self.install(&host)
    }

    /// Point the client at a new server. `None` leaves everything as is.
    ///
    /// On error the previous address and handle stay in place.
    pub fn update_server_url(&self, address: Option<&str>) -> Result<(), ConfigError> {
        let Some(address) = address else {
            return Ok(());
        };
        self.update(|host| host.address = address.to_string())
    }

    /// Replace the credential pair; `None` clears a field.
    pub fn update_credentials(
        &self,
        user_id: Option<&str>,
        api_key: Option<&str>,
    ) -> Result<(), ConfigError> {
        self.update(|host| {
            host.user_id = user_id.unwrap_or_default().to_string();
            host.api_key = api_key.unwrap_or_default().to_string();
        })
    }

    fn update(&self, apply: impl FnOnce(&mut HostConfig)) -> Result<(), ConfigError> {
        let mut host = self.lock_host();
        let mut next = host.clone();
        apply(&mut next);
        self.install(&next)?;
        *host = next;
        Ok(())
    }

    fn install(&self, host: &HostConfig) -> Result<(), ConfigError> {
        let handle = Arc::new(TransportHandle::build(host, &self.settings)?);
        tracing::info!(base_url = handle.base_url(), authenticated = host.has_authentication(), "Transport rebuilt");
        *self.handle.write().unwrap_or_else(PoisonError::into_inner) = handle;
        Ok(())
    }

    fn lock_host(&self) -> MutexGuard<'_, HostConfig> {
        self.host.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
