//! Access token data models

use serde::{Deserialize, Serialize};

/// Access token as returned by the Gitea API.
///
/// `sha1` holds the secret and is only filled in by the create call.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AccessToken {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sha1: String,
    #[serde(default)]
    pub token_last_eight: String,
    #[serde(default)]
    pub scopes: Option<Vec<String>>,
}

/// Request body for creating an access token
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateAccessTokenOption {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,
}
