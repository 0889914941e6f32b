//! Push mirror data models

use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Push mirror as returned by the Gitea API
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PushMirror {
    #[serde(default)]
    pub repo_name: String,
    #[serde(default)]
    pub remote_name: String,
    #[serde(default)]
    pub remote_address: String,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub last_update: Option<String>,
    #[serde(default)]
    pub last_error: String,
    #[serde(default)]
    pub interval: String,
    #[serde(default)]
    pub sync_on_commit: bool,
}

/// Request body for adding a push mirror
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatePushMirrorOption {
    pub remote_address: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub remote_username: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub remote_password: String,
    pub interval: String,
    pub sync_on_commit: bool,
}

impl PushMirror {
    /// Creation time normalised to RFC 3339
    pub fn created(&self) -> String {
        normalize_timestamp(self.created.as_deref())
    }

    /// Last sync time normalised to RFC 3339, empty if never synced
    pub fn last_update(&self) -> String {
        normalize_timestamp(self.last_update.as_deref())
    }
}

/// Normalise a server timestamp to RFC 3339 in UTC.
///
/// Gitea reports the zero time (`0001-01-01T00:00:00Z`) for mirrors that never
/// synced; that and missing values become the empty string. Unparseable values
/// are passed through untouched.
pub fn normalize_timestamp(raw: Option<&str>) -> String {
    let Some(raw) = raw.filter(|r| !r.is_empty()) else {
        return String::new();
    };
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => {
            let utc = ts.with_timezone(&Utc);
            if utc.year() <= 1 {
                String::new()
            } else {
                utc.to_rfc3339_opts(SecondsFormat::Secs, true)
            }
        }
        Err(_) => raw.to_string(),
    }
}
