//! HTTP requests and responses as plain data.
//!
//! # Design
//! Endpoint methods never touch `reqwest` directly. They describe the call
//! as a [`Route`], which the current transport handle resolves against its
//! base url into an [`HttpRequest`]. The handle executes it and hands back an
//! [`HttpResponse`]. Keeping both ends as owned data lets the envelope and
//! classifier logic be tested without a network.

use serde::Serialize;

use crate::error::{Fault, FaultKind};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// A fully resolved HTTP request.
///
/// `path` is the absolute url, `query` is appended by the transport.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A server endpoint relative to the API base, e.g. `tasks/user`.
#[derive(Debug, Clone)]
pub struct Route {
    method: HttpMethod,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Result<String, String>>,
}

impl Route {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Append a query parameter.
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Append a query parameter only when `value` is present.
    pub fn query_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Attach a JSON body. A serialization failure is reported when the
    /// route is resolved, not here.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        self.body = Some(serde_json::to_string(body).map_err(|e| e.to_string()));
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Path as the server sees it below the API base, always with a leading `/`.
    pub fn api_path(&self) -> String {
        format!("/{}", self.path.trim_start_matches('/'))
    }

    /// Resolve against `base_url` (which ends in `/`).
    pub fn into_request(self, base_url: &str) -> Result<HttpRequest, Fault> {
        let api_path = self.api_path();
        let body = match self.body {
            Some(Ok(body)) => Some(body),
            Some(Err(message)) => {
                return Err(Fault::new(api_path, FaultKind::Payload { message }));
            }
            None => None,
        };
        let headers = if body.is_some() {
            vec![("content-type".to_string(), "application/json".to_string())]
        } else {
            Vec::new()
        };
        Ok(HttpRequest {
            method: self.method,
            path: format!(
                "{}/{}",
                base_url.trim_end_matches('/'),
                self.path.trim_start_matches('/')
            ),
            query: self.query,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const BASE: &str = "https://habitica.com/api/v4/";

    #[test]
    fn get_route_resolves_against_base() {
        let req = Route::get("tasks/user").into_request(BASE).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "https://habitica.com/api/v4/tasks/user");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn json_body_sets_content_type() {
        let mut body = HashMap::new();
        body.insert("quantity", 3);
        let req = Route::post("user/buy/potion")
            .json(&body)
            .into_request(BASE)
            .unwrap();
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let json: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(json["quantity"], 3);
    }

    #[test]
    fn query_opt_skips_missing_values() {
        let req = Route::get("content")
            .query_opt("language", None::<&str>)
            .query("page", 2)
            .into_request(BASE)
            .unwrap();
        assert_eq!(req.query, vec![("page".to_string(), "2".to_string())]);
    }

    #[test]
    fn api_path_has_leading_slash() {
        assert_eq!(Route::post("/groups/1/invite").api_path(), "/groups/1/invite");
        assert_eq!(Route::post("groups/1/invite").api_path(), "/groups/1/invite");
    }

    #[test]
    fn unserializable_body_becomes_payload_fault() {
        let mut map = HashMap::new();
        map.insert(vec![1u8], 1);
        let err = Route::post("user").json(&map).into_request(BASE).unwrap_err();
        assert_eq!(err.path, "/user");
        assert!(matches!(err.kind, FaultKind::Payload { .. }));
    }
}
