use std::time::Duration;

use async_trait::async_trait;
use callboard_types::{
    AgentConfiguration, AgentCreateInput, AgentUpdateInput, AuthToken, CallRecord,
    FullCallDetails, LoginCredentials, PhoneCallInput, RegisterInput, User, WebCallInput,
    WebCallResponse,
};
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::queries::{CallLauncher, CallQueries};
use crate::{Error, Result};

/// Backend client. Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

impl HttpBackend {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        Self::with_timeout(base_url, token, Some(Duration::from_secs(30)))
    }

    pub fn from_config(config: &Config, token: Option<String>) -> Result<Self> {
        Self::with_timeout(&config.backend_url, token, config.request_timeout())
    }

    fn with_timeout(
        base_url: &str,
        token: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "backend url cannot carry a path: {}",
                base_url
            )));
        }
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("backend url cannot carry a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        let builder = self.http.request(method, url);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Response> {
        let request = builder.build()?;
        let method = request.method().clone();
        let path = request.url().path().to_string();

        let response = self.http.execute(request).await?;
        let status = response.status();
        debug!(%method, %path, status = status.as_u16(), "backend response");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(ErrorBody {
                detail: serde_json::Value::String(text),
            }) => text,
            Ok(ErrorBody { detail }) => detail.to_string(),
            Err(_) if body.is_empty() => status.to_string(),
            Err(_) => body,
        };
        Err(Error::from_status(status.as_u16(), detail))
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.execute(builder).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| Error::Decode(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        self.fetch(self.request(Method::GET, segments)?).await
    }

    async fn send_json<B, T>(&self, method: Method, segments: &[&str], body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.fetch(self.request(method, segments)?.json(body)).await
    }

    async fn delete(&self, segments: &[&str]) -> Result<()> {
        self.execute(self.request(Method::DELETE, segments)?).await?;
        Ok(())
    }

    // ----- auth -----

    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthToken> {
        self.send_json(Method::POST, &["auth", "login"], credentials)
            .await
    }

    pub async fn register(&self, input: &RegisterInput) -> Result<AuthToken> {
        self.send_json(Method::POST, &["auth", "register"], input)
            .await
    }

    pub async fn me(&self) -> Result<User> {
        self.get(&["auth", "me"]).await
    }

    // ----- agents -----

    pub async fn list_agents(&self) -> Result<Vec<AgentConfiguration>> {
        self.get(&["agents"]).await
    }

    pub async fn get_agent(&self, id: &str) -> Result<AgentConfiguration> {
        self.get(&["agents", id]).await
    }

    pub async fn create_agent(&self, input: &AgentCreateInput) -> Result<AgentConfiguration> {
        input.validate()?;
        self.send_json(Method::POST, &["agents"], input).await
    }

    pub async fn update_agent(
        &self,
        id: &str,
        input: &AgentUpdateInput,
    ) -> Result<AgentConfiguration> {
        if input.is_empty() {
            return Err(Error::InvalidInput("no fields to update".to_string()));
        }
        input.validate()?;
        self.send_json(Method::PATCH, &["agents", id], input).await
    }

    /// Soft delete: the backend marks the profile inactive.
    pub async fn delete_agent(&self, id: &str) -> Result<()> {
        self.delete(&["agents", id]).await
    }

    // ----- calls -----

    pub async fn delete_call(&self, id: &str) -> Result<()> {
        self.delete(&["calls", id]).await
    }
}

#[async_trait]
impl CallQueries for HttpBackend {
    async fn list_calls(&self) -> Result<Vec<CallRecord>> {
        self.get(&["calls"]).await
    }

    async fn get_call(&self, id: &str) -> Result<CallRecord> {
        self.get(&["calls", id]).await
    }

    async fn get_call_full(&self, id: &str) -> Result<FullCallDetails> {
        self.get(&["calls", id, "full"]).await
    }
}

#[async_trait]
impl CallLauncher for HttpBackend {
    async fn create_web_call(&self, input: &WebCallInput) -> Result<WebCallResponse> {
        self.send_json(Method::POST, &["calls", "web"], input).await
    }

    async fn create_phone_call(&self, input: &PhoneCallInput) -> Result<CallRecord> {
        self.send_json(Method::POST, &["calls", "phone"], input)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_segments_under_base_path() -> anyhow::Result<()> {
        let backend = HttpBackend::new("https://dispatch.example.com/api/", None)?;
        let url = backend.endpoint(&["calls", "call_abc", "full"])?;
        assert_eq!(url.as_str(), "https://dispatch.example.com/api/calls/call_abc/full");
        Ok(())
    }

    #[test]
    fn test_endpoint_escapes_ids() -> anyhow::Result<()> {
        let backend = HttpBackend::new("http://localhost:8000", None)?;
        let url = backend.endpoint(&["calls", "a/b c"])?;
        assert_eq!(url.path(), "/calls/a%2Fb%20c");
        Ok(())
    }

    #[test]
    fn test_from_config_accepts_zero_timeout() -> anyhow::Result<()> {
        let config = Config {
            request_timeout_secs: 0,
            ..Config::default()
        };
        let backend = HttpBackend::from_config(&config, None)?;
        assert_eq!(backend.base_url().as_str(), "http://localhost:8000/");
        Ok(())
    }

    #[test]
    fn test_rejects_non_base_url() {
        let err = HttpBackend::new("mailto:ops@example.com", None).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
