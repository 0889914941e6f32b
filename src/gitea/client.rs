//! Gitea HTTP client for API interactions

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::api;
use crate::error::{GiteaError, Result};
use crate::gitea::credentials::{Auth, ProviderConfig};

/// Error body returned by the Gitea API
#[derive(Deserialize, Debug)]
struct ApiErrorBody {
    message: Option<String>,
}

/// Gitea API client
pub struct GiteaClient {
    client: Client,
    auth: Auth,
    /// API root, e.g. `https://git.example.com/api/v1`
    base_url: String,
}

impl GiteaClient {
    /// Create a new client for a resolved provider configuration
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .danger_accept_invalid_certs(config.insecure)
            .build()?;

        Ok(Self {
            client,
            auth: config.auth.clone(),
            base_url: format!(
                "{}/{}",
                config.base_url.trim_end_matches('/'),
                api::BASE_PATH.trim_start_matches('/')
            ),
        })
    }

    /// Create a client with custom API root (for testing with mock servers)
    pub fn with_base_url(auth: Auth, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            auth,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build the API root for requests
    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Username of the authenticated user, when known locally
    pub fn auth_username(&self) -> Option<&str> {
        match &self.auth {
            Auth::Basic { username, .. } => Some(username),
            Auth::Token(_) => None,
        }
    }

    /// Add standard headers to a request builder
    fn with_headers(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let authorization = match &self.auth {
            Auth::Token(token) => format!("token {}", token),
            Auth::Basic { username, password } => {
                format!(
                    "Basic {}",
                    BASE64.encode(format!("{}:{}", username, password))
                )
            }
        };
        builder
            .header("Authorization", authorization)
            .header("Accept", "application/json")
    }

    /// Create a GET request builder with standard headers
    pub(crate) fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.with_headers(self.client.get(url))
    }

    /// Create a POST request builder with standard headers
    pub(crate) fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.with_headers(self.client.post(url))
    }

    /// Create a DELETE request builder with standard headers
    pub(crate) fn delete(&self, url: &str) -> reqwest::RequestBuilder {
        self.with_headers(self.client.delete(url))
    }

    /// Turn a non-success response into an API error, keeping Gitea's message
    async fn api_error(response: reqwest::Response, error_context: &str) -> GiteaError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.is_empty());

        let message = match detail {
            Some(detail) => format!("Failed to {}: {}", error_context, detail),
            None => format!("Failed to {}", error_context),
        };
        GiteaError::Api { status, message }
    }

    /// Parse an API response, returning error for non-success status codes
    pub(crate) async fn parse_api_response<T>(
        &self,
        response: reqwest::Response,
        error_context: &str,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        if !response.status().is_success() {
            return Err(Self::api_error(response, error_context).await);
        }
        Ok(response.json().await?)
    }

    /// Fetch a single resource by API path, `None` on 404
    pub async fn fetch_resource_by_path<T>(
        &self,
        path: &str,
        resource_label: &str,
    ) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url(), path);
        debug!("Fetching {} from: {}", resource_label, url);

        let response = self.get(&url).send().await?;

        match response.status().as_u16() {
            404 => Ok(None),
            _ => {
                let context = format!("fetch {}", resource_label);
                self.parse_api_response(response, &context).await.map(Some)
            }
        }
    }

    /// Fetch one page of a list endpoint using Gitea's `page`/`limit` parameters
    pub async fn fetch_page<T>(
        &self,
        path: &str,
        page: u32,
        limit: u32,
        error_context: &str,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let separator = if path.contains('?') { "&" } else { "?" };
        let url = format!(
            "{}{}{}page={}&limit={}",
            self.base_url(),
            path,
            separator,
            page,
            limit
        );
        debug!("Fetching page {} from: {}", page, url);

        let response = self.get(&url).send().await?;
        let context = format!("list {} (page {})", error_context, page);
        let items: Vec<T> = self.parse_api_response(response, &context).await?;

        debug!("Page {} returned {} items", page, items.len());
        Ok(items)
    }

    /// POST a JSON body and parse the created resource
    pub async fn post_json<B, T>(&self, path: &str, body: &B, resource_label: &str) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url(), path);
        debug!("Creating {} at: {}", resource_label, url);

        let response = self.post(&url).json(body).send().await?;
        let context = format!("create {}", resource_label);
        self.parse_api_response(response, &context).await
    }

    /// DELETE a resource by path
    ///
    /// Returns `false` when the resource was already gone (404).
    pub async fn delete_by_path(&self, path: &str, resource_label: &str) -> Result<bool> {
        let url = format!("{}{}", self.base_url(), path);
        debug!("Deleting {} at: {}", resource_label, url);

        let response = self.delete(&url).send().await?;

        match response.status().as_u16() {
            200..=299 => Ok(true),
            404 => Ok(false),
            _ => {
                let context = format!("delete {}", resource_label);
                Err(Self::api_error(response, &context).await)
            }
        }
    }
}

/// Percent-encode one path segment
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[cfg(test)]
impl GiteaClient {
    /// Create a token-authenticated test client with mock base URL
    pub fn test_client(base_url: &str) -> Self {
        Self::with_base_url(Auth::Token("test-token".to_string()), base_url)
    }
}
