//! Access token API operations

use crate::config::api;
use crate::error::Result;
use crate::gitea::client::segment;
use crate::gitea::GiteaClient;

use super::models::{AccessToken, CreateAccessTokenOption};

/// `/users/{username}/tokens`
fn tokens_path(username: &str) -> String {
    format!("/{}/{}/{}", api::USERS, segment(username), api::TOKENS)
}

impl GiteaClient {
    /// List one page of a user's access tokens
    pub async fn list_access_tokens(
        &self,
        username: &str,
        page: u32,
        limit: u32,
    ) -> Result<Vec<AccessToken>> {
        let context = format!("access tokens of user '{}'", username);
        self.fetch_page(&tokens_path(username), page, limit, &context)
            .await
    }

    /// Create an access token; the response carries the secret
    pub async fn create_access_token(
        &self,
        username: &str,
        opt: &CreateAccessTokenOption,
    ) -> Result<AccessToken> {
        let label = format!("access token '{}' for user '{}'", opt.name, username);
        self.post_json(&tokens_path(username), opt, &label).await
    }

    /// Delete an access token by name or ID; `false` if it was already gone
    pub async fn delete_access_token(&self, username: &str, name_or_id: &str) -> Result<bool> {
        let path = format!("{}/{}", tokens_path(username), segment(name_or_id));
        let label = format!("access token '{}' of user '{}'", name_or_id, username);
        self.delete_by_path(&path, &label).await
    }
}
