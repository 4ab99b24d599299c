//! Typed access to the REST surface.

use crate::error::ClientError;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use sweetshop_core::api_types::{
    CreateSweetRequest, CredentialsRequest, LoginResponse, SearchParams, StockRequest,
};
use sweetshop_core::{Sweet, SweetId, SweetPatch, User};

/// Sweet operations, independent of transport.
#[async_trait]
pub trait SweetApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Sweet>, ClientError>;
    async fn search(&self, params: &SearchParams) -> Result<Vec<Sweet>, ClientError>;
    async fn get(&self, id: SweetId) -> Result<Sweet, ClientError>;
    async fn create(&self, sweet: &CreateSweetRequest) -> Result<Sweet, ClientError>;
    async fn update(&self, id: SweetId, patch: &SweetPatch) -> Result<Sweet, ClientError>;
    async fn delete(&self, id: SweetId) -> Result<(), ClientError>;
    async fn purchase(&self, id: SweetId, quantity: u32) -> Result<Sweet, ClientError>;
    async fn restock(&self, id: SweetId, quantity: u32) -> Result<Sweet, ClientError>;
}

/// HTTP client for a server rooted at `base_url`, e.g.
/// `http://localhost:8080/api`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            token: None,
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<User, ClientError> {
        let response = self
            .http
            .post(self.url("/auth/register"))
            .json(&CredentialsRequest::new(username, password))
            .send()
            .await?;
        decode(response).await
    }

    /// Log in and keep the token for subsequent calls.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(&CredentialsRequest::new(username, password))
            .send()
            .await?;
        let session: LoginResponse = decode(response).await?;
        tracing::debug!(username, role = %session.role, "logged in");
        self.token = Some(session.token.clone());
        Ok(session)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, builder: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let token = self.token.as_deref().ok_or(ClientError::NotLoggedIn)?;
        Ok(builder.bearer_auth(token))
    }
}

#[async_trait]
impl SweetApi for ApiClient {
    async fn list(&self) -> Result<Vec<Sweet>, ClientError> {
        let response = self.authed(self.http.get(self.url("/sweets")))?.send().await?;
        decode(response).await
    }

    async fn search(&self, params: &SearchParams) -> Result<Vec<Sweet>, ClientError> {
        let response = self
            .authed(self.http.get(self.url("/sweets/search")))?
            .query(params)
            .send()
            .await?;
        decode(response).await
    }

    async fn get(&self, id: SweetId) -> Result<Sweet, ClientError> {
        let response = self
            .authed(self.http.get(self.url(&format!("/sweets/{id}"))))?
            .send()
            .await?;
        decode(response).await
    }

    async fn create(&self, sweet: &CreateSweetRequest) -> Result<Sweet, ClientError> {
        let response = self
            .authed(self.http.post(self.url("/sweets")))?
            .json(sweet)
            .send()
            .await?;
        decode(response).await
    }

    async fn update(&self, id: SweetId, patch: &SweetPatch) -> Result<Sweet, ClientError> {
        let response = self
            .authed(self.http.put(self.url(&format!("/sweets/{id}"))))?
            .json(patch)
            .send()
            .await?;
        decode(response).await
    }

    async fn delete(&self, id: SweetId) -> Result<(), ClientError> {
        let response = self
            .authed(self.http.delete(self.url(&format!("/sweets/{id}"))))?
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn purchase(&self, id: SweetId, quantity: u32) -> Result<Sweet, ClientError> {
        let response = self
            .authed(self.http.post(self.url(&format!("/sweets/{id}/purchase"))))?
            .json(&StockRequest::new(quantity))
            .send()
            .await?;
        decode(response).await
    }

    async fn restock(&self, id: SweetId, quantity: u32) -> Result<Sweet, ClientError> {
        let response = self
            .authed(self.http.post(self.url(&format!("/sweets/{id}/restock"))))?
            .json(&StockRequest::new(quantity))
            .send()
            .await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let response = check(response).await?;
    Ok(response.json().await?)
}

/// Turn a non-2xx response into [`ClientError::Api`].
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Api {
        status,
        message: error_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string()),
    })
}

/// The `message` (or else `error`) field of a JSON error body.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(|m| m.as_str()))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_message_field() {
        assert_eq!(
            error_message(r#"{"error":"forbidden","message":"admin role required"}"#).as_deref(),
            Some("admin role required")
        );
        assert_eq!(error_message(r#"{"error":"conflict"}"#).as_deref(), Some("conflict"));
        assert_eq!(error_message("<html>oops</html>"), None);
    }

    #[test]
    fn base_url_is_normalised() {
        let client = ApiClient::new("http://localhost:8080/api/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/api");
        assert_eq!(client.url("/sweets"), "http://localhost:8080/api/sweets");
        assert!(client.token().is_none());
    }
}
