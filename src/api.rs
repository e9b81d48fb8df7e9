//! Blocking HTTP transport to the companion backend.
//!
//! Wraps a lazily created `reqwest` blocking client. Non-success responses
//! are turned into [`CompanionError::Api`] (or [`CompanionError::NotFound`]
//! for 404) using the backend's `{"error": "..."}` body when present.
//! Nothing is retried.

use std::cell::RefCell;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CompanionError, Result};

pub struct ApiClient {
    base_url: String,
    timeout: Duration,
    auth_token: Option<String>,
    client: RefCell<Option<Client>>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration, auth_token: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            auth_token,
            client: RefCell::new(None),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_auth_token(&mut self, token: Option<String>) {
        self.auth_token = token;
    }

    pub fn has_auth_token(&self) -> bool {
        self.auth_token.is_some()
    }

    /// Lazy HTTP client, created on first use.
    fn client(&self) -> Result<Client> {
        if let Some(client) = self.client.borrow().as_ref() {
            return Ok(client.clone());
        }
        let client = Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        *self.client.borrow_mut() = Some(client.clone());
        Ok(client)
    }

    /// Absolute URL for an API path such as `/api/search`.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    fn send(&self, req: RequestBuilder) -> Result<Response> {
        let resp = self.authorize(req).send()?;
        check_status(resp)
    }

    /// `GET path?query` and decode a JSON body.
    pub fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(String, String)]) -> Result<T> {
        let url = self.url(path);
        log::debug!("GET {} ({} params)", url, query.len());
        let resp = self.send(self.client()?.get(&url).query(query))?;
        Ok(resp.json()?)
    }

    /// `POST path` with a JSON body and decode the JSON response.
    pub fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        log::debug!("POST {}", url);
        let resp = self.send(self.client()?.post(&url).json(body))?;
        Ok(resp.json()?)
    }

    /// `PUT path` with a JSON body and decode the JSON response.
    pub fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        log::debug!("PUT {}", url);
        let resp = self.send(self.client()?.put(&url).json(body))?;
        Ok(resp.json()?)
    }

    /// `DELETE path`, discarding any response body.
    pub fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path);
        log::debug!("DELETE {}", url);
        self.send(self.client()?.delete(&url))?;
        Ok(())
    }

    /// `GET path?query` and return the raw body.
    pub fn get_bytes(&self, path: &str, query: &[(String, String)]) -> Result<Vec<u8>> {
        let url = self.url(path);
        log::debug!("GET {} (binary)", url);
        let resp = self.send(self.client()?.get(&url).query(query))?;
        Ok(resp.bytes()?.to_vec())
    }

    /// Drop the HTTP client, if open. A new one is created on next use.
    pub fn close(&self) {
        self.client.borrow_mut().take();
    }
}

fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let url = resp.url().to_string();
    let body = resp.text().unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });
    if status == StatusCode::NOT_FOUND {
        return Err(CompanionError::NotFound(format!("{}: {}", url, message)));
    }
    Err(CompanionError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Pull a human-readable message out of an error body.
pub(crate) fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(value) => ["error", "message", "detail"]
            .iter()
            .find_map(|k| value.get(*k).and_then(|v| v.as_str()))
            .map(|s| s.to_string()),
        Err(_) => Some(trimmed.chars().take(200).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_paths_without_double_slash() {
        let api = ApiClient::new("http://example.test/", Duration::from_secs(1), None);
        assert_eq!(api.url("/api/search"), "http://example.test/api/search");
        assert_eq!(api.url("api/search"), "http://example.test/api/search");
    }

    #[test]
    fn error_message_prefers_json_fields() {
        assert_eq!(
            error_message(r#"{"error": "Deck not found"}"#),
            Some("Deck not found".to_string())
        );
        assert_eq!(
            error_message(r#"{"detail": "Unauthorized"}"#),
            Some("Unauthorized".to_string())
        );
        assert_eq!(error_message("Bad Gateway"), Some("Bad Gateway".to_string()));
        assert_eq!(error_message("   "), None);
        assert_eq!(error_message(r#"{"ok": false}"#), None);
    }
}
