use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::database::models::{Like, PopulatedProfile, Profile, PublicUser, Tweet};
use crate::handlers::public::users::TokenResponse;
use crate::middleware::TOKEN_HEADER;
use crate::validation::{LoginRequest, ProfileRequest, RegisterRequest, TweetRequest};

#[derive(Debug, Error)]
pub enum ClientError {
    /// Non-2xx answer. `messages` holds every `msg` found in the body.
    #[error("{status} {status_text}: {}", .messages.join("; "))]
    Api {
        status: u16,
        status_text: String,
        messages: Vec<String>,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ClientError {
    /// Messages worth showing to a user, one per server-side error.
    pub fn messages(&self) -> Vec<String> {
        match self {
            ClientError::Api { messages, .. } => messages.clone(),
            other => vec![other.to_string()],
        }
    }

    /// `(statusText, status)` as the profile slice records it.
    pub fn status(&self) -> (String, u16) {
        match self {
            ClientError::Api {
                status, status_text, ..
            } => (status_text.clone(), *status),
            ClientError::Transport(_) => ("Network Error".to_string(), 0),
            ClientError::Decode(_) => ("Invalid Response".to_string(), 0),
        }
    }
}

/// Plain `{ "msg": ... }` acknowledgement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub msg: String,
}

fn error_messages(body: &Value) -> Vec<String> {
    if let Some(errors) = body.get("errors").and_then(Value::as_array) {
        return errors
            .iter()
            .filter_map(|e| e.get("msg").and_then(Value::as_str))
            .map(str::to_string)
            .collect();
    }

    body.get("msg")
        .and_then(Value::as_str)
        .map(|msg| vec![msg.to_string()])
        .unwrap_or_default()
}

/// Typed HTTP client for the TwitterClone API. Once a token is set it is
/// sent on every request.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.header(TOKEN_HEADER, token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(api_error(status, &bytes));
        }

        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<TokenResponse, ClientError> {
        let body = RegisterRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        };
        self.send(self.request(Method::POST, "/api/users").json(&body)).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, ClientError> {
        let body = LoginRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        };
        self.send(self.request(Method::POST, "/api/auth").json(&body)).await
    }

    pub async fn current_user(&self) -> Result<PublicUser, ClientError> {
        self.send(self.request(Method::GET, "/api/auth")).await
    }

    pub async fn delete_account(&self) -> Result<Message, ClientError> {
        self.send(self.request(Method::DELETE, "/api/users")).await
    }

    pub async fn own_profile(&self) -> Result<PopulatedProfile, ClientError> {
        self.send(self.request(Method::GET, "/api/profile/me")).await
    }

    pub async fn profiles(&self) -> Result<Vec<PopulatedProfile>, ClientError> {
        self.send(self.request(Method::GET, "/api/profile")).await
    }

    pub async fn profile_by_user(&self, user_id: &str) -> Result<PopulatedProfile, ClientError> {
        self.send(self.request(Method::GET, &format!("/api/profile/user/{}", user_id)))
            .await
    }

    pub async fn upsert_profile(&self, form: &ProfileRequest) -> Result<Profile, ClientError> {
        self.send(self.request(Method::POST, "/api/profile").json(form)).await
    }

    pub async fn tweets(&self) -> Result<Vec<Tweet>, ClientError> {
        self.send(self.request(Method::GET, "/api/tweets")).await
    }

    pub async fn tweet(&self, id: &str) -> Result<Tweet, ClientError> {
        self.send(self.request(Method::GET, &format!("/api/tweets/{}", id))).await
    }

    pub async fn post_tweet(&self, text: &str) -> Result<Tweet, ClientError> {
        let body = TweetRequest {
            text: Some(text.to_string()),
        };
        self.send(self.request(Method::POST, "/api/tweets").json(&body)).await
    }

    pub async fn reply(&self, parent_id: &str, text: &str) -> Result<Tweet, ClientError> {
        let body = TweetRequest {
            text: Some(text.to_string()),
        };
        let path = format!("/api/tweets/reply/{}", parent_id);
        self.send(self.request(Method::POST, &path).json(&body)).await
    }

    pub async fn edit_tweet(&self, id: &str, text: &str) -> Result<Tweet, ClientError> {
        let body = TweetRequest {
            text: Some(text.to_string()),
        };
        let path = format!("/api/tweets/{}", id);
        self.send(self.request(Method::PUT, &path).json(&body)).await
    }

    pub async fn delete_tweet(&self, id: &str) -> Result<Message, ClientError> {
        self.send(self.request(Method::DELETE, &format!("/api/tweets/{}", id))).await
    }

    pub async fn like(&self, id: &str) -> Result<Vec<Like>, ClientError> {
        self.send(self.request(Method::PUT, &format!("/api/tweets/like/{}", id))).await
    }

    pub async fn unlike(&self, id: &str) -> Result<Vec<Like>, ClientError> {
        self.send(self.request(Method::PUT, &format!("/api/tweets/unlike/{}", id))).await
    }
}

fn api_error(status: StatusCode, body: &[u8]) -> ClientError {
    let messages = serde_json::from_slice::<Value>(body)
        .map(|value| error_messages(&value))
        .unwrap_or_default();

    ClientError::Api {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
        messages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_field_error_lists() {
        let body = json!({ "errors": [{ "msg": "a", "param": "email" }, { "msg": "b" }] });
        assert_eq!(error_messages(&body), vec!["a", "b"]);
    }

    #[test]
    fn reads_single_msg() {
        assert_eq!(error_messages(&json!({ "msg": "Tweet not found" })), vec!["Tweet not found"]);
        assert!(error_messages(&json!({ "other": 1 })).is_empty());
    }

    #[test]
    fn api_error_keeps_status_text() {
        let err = api_error(StatusCode::NOT_FOUND, br#"{"msg":"Tweet not found"}"#);
        assert_eq!(err.status(), ("Not Found".to_string(), 404));
        assert_eq!(err.messages(), vec!["Tweet not found"]);
        assert_eq!(err.to_string(), "404 Not Found: Tweet not found");
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:5000/");
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert!(client.token().is_none());
    }
}
