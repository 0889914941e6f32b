//! `gitea_push_mirror` resource: schema and lifecycle handlers

use log::{debug, info, warn};
use serde_json::Value;

use crate::config::defaults;
use crate::error::{GiteaError, Result};
use crate::gitea::GiteaClient;
use crate::provider::{Attribute, AttributeType, ResourceData, ResourceSchema};

use super::models::{CreatePushMirrorOption, PushMirror};

pub const TYPE_NAME: &str = "gitea_push_mirror";

pub const OWNER: &str = "owner";
pub const REPO: &str = "repo";
pub const REMOTE_ADDRESS: &str = "remote_address";
pub const REMOTE_USERNAME: &str = "remote_username";
pub const REMOTE_PASSWORD: &str = "remote_password";
pub const INTERVAL: &str = "interval";
pub const SYNC_ON_COMMIT: &str = "sync_on_commit";
pub const CREATED: &str = "created";
pub const LAST_UPDATE: &str = "last_update";
pub const LAST_ERROR: &str = "last_error";
pub const REMOTE_NAME: &str = "remote_name";
pub const REPO_NAME: &str = "repo_name";

pub fn schema() -> ResourceSchema {
    ResourceSchema::new(
        "`gitea_push_mirror` manages gitea repository push mirrors.\n\n\
         Push mirrors are a way to mirror a gitea repository to a remote repository.",
    )
    .attribute(
        OWNER,
        Attribute::required(AttributeType::String)
            .force_new()
            .describe("The Owner of the repository"),
    )
    .attribute(
        REPO,
        Attribute::required(AttributeType::String)
            .force_new()
            .describe("The Name of the repository"),
    )
    .attribute(
        INTERVAL,
        Attribute::optional(AttributeType::String)
            .default_value(defaults::PUSH_MIRROR_INTERVAL)
            .validate_with(validate_interval)
            .describe("valid time units are 'h', 'm', 's'. 0 to disable automatic sync"),
    )
    .attribute(
        REMOTE_ADDRESS,
        Attribute::required(AttributeType::String)
            .force_new()
            .describe(
                "The address of the remote repository that this repository should be mirrored to",
            ),
    )
    .attribute(
        REMOTE_PASSWORD,
        Attribute::optional(AttributeType::String)
            .sensitive()
            .describe("The password for the remote repository"),
    )
    .attribute(
        REMOTE_USERNAME,
        Attribute::optional(AttributeType::String)
            .describe("The username for the remote repository"),
    )
    .attribute(
        SYNC_ON_COMMIT,
        Attribute::optional(AttributeType::Bool)
            .default_value(false)
            .describe("If the repository should be synced on every commit"),
    )
    .attribute(CREATED, Attribute::computed(AttributeType::String))
    .attribute(LAST_UPDATE, Attribute::computed(AttributeType::String))
    .attribute(LAST_ERROR, Attribute::computed(AttributeType::String))
    .attribute(REMOTE_NAME, Attribute::computed(AttributeType::String))
    .attribute(REPO_NAME, Attribute::computed(AttributeType::String))
}

/// Length of a sync interval in seconds.
///
/// Accepts `0`, or number+unit groups with units h, m, s (`8h0m0s`, `90m`, `1.5h`).
pub fn interval_seconds(interval: &str) -> Option<f64> {
    if interval == "0" {
        return Some(0.0);
    }
    if interval.is_empty() {
        return None;
    }

    let mut total = 0.0;
    let mut number = String::new();
    for c in interval.chars() {
        match c {
            '0'..='9' | '.' => number.push(c),
            'h' | 'm' | 's' => {
                let value: f64 = number.parse().ok()?;
                total += match c {
                    'h' => value * 3600.0,
                    'm' => value * 60.0,
                    _ => value,
                };
                number.clear();
            }
            _ => return None,
        }
    }
    number.is_empty().then_some(total)
}

fn validate_interval(value: &Value) -> std::result::Result<(), String> {
    let interval = value.as_str().unwrap_or_default();
    match interval_seconds(interval) {
        Some(_) => Ok(()),
        None => Err(format!(
            "invalid interval '{}': valid time units are 'h', 'm', 's'",
            interval
        )),
    }
}

/// Resource ID: `{owner}/{repo}/{remote_name}`
pub fn resource_id(owner: &str, repo: &str, remote_name: &str) -> String {
    format!("{}/{}/{}", owner, repo, remote_name)
}

/// Split a resource ID into owner, repo and remote name
pub fn parse_resource_id(id: &str) -> Result<(&str, &str, &str)> {
    let parts: Vec<&str> = id.split('/').collect();
    match parts.as_slice() {
        [owner, repo, remote_name]
            if !owner.is_empty() && !repo.is_empty() && !remote_name.is_empty() =>
        {
            Ok((*owner, *repo, *remote_name))
        }
        _ => Err(GiteaError::Validation(format!(
            "invalid push mirror ID '{}': expected owner/repo/remote_name",
            id
        ))),
    }
}

/// Copy server-reported fields into the resource data
fn set_resource_data(mirror: &PushMirror, owner: &str, repo: &str, data: &mut ResourceData) {
    data.set_id(resource_id(owner, repo, &mirror.remote_name));
    data.set(CREATED, mirror.created());
    // Gitea reports `1h` as `1h0m0s`; keep the configured spelling when equal
    let same_interval = interval_seconds(data.get_str(INTERVAL)).is_some()
        && interval_seconds(data.get_str(INTERVAL)) == interval_seconds(&mirror.interval);
    if !same_interval {
        data.set(INTERVAL, mirror.interval.as_str());
    }
    data.set(LAST_ERROR, mirror.last_error.as_str());
    data.set(LAST_UPDATE, mirror.last_update());
    data.set(REMOTE_ADDRESS, mirror.remote_address.as_str());
    data.set(REMOTE_NAME, mirror.remote_name.as_str());
    data.set(REPO_NAME, mirror.repo_name.as_str());
    data.set(SYNC_ON_COMMIT, mirror.sync_on_commit);
}

/// Refresh from the server. A mirror that no longer exists clears the ID.
pub async fn read(client: &GiteaClient, data: &mut ResourceData) -> Result<()> {
    let owner = data.require_str(OWNER)?.to_string();
    let repo = data.require_str(REPO)?.to_string();
    let remote_name = data.require_str(REMOTE_NAME)?.to_string();

    match client.get_push_mirror(&owner, &repo, &remote_name).await? {
        Some(mirror) => {
            set_resource_data(&mirror, &owner, &repo, data);
            Ok(())
        }
        None => {
            warn!(
                "Push mirror '{}' of {}/{} no longer exists",
                remote_name, owner, repo
            );
            data.clear_id();
            Ok(())
        }
    }
}

pub async fn create(client: &GiteaClient, data: &mut ResourceData) -> Result<()> {
    let owner = data.require_str(OWNER)?.to_string();
    let repo = data.require_str(REPO)?.to_string();

    let opt = CreatePushMirrorOption {
        remote_address: data.require_str(REMOTE_ADDRESS)?.to_string(),
        remote_username: data.get_str(REMOTE_USERNAME).to_string(),
        remote_password: data.get_str(REMOTE_PASSWORD).to_string(),
        interval: data.get_str(INTERVAL).to_string(),
        sync_on_commit: data.get_bool(SYNC_ON_COMMIT),
    };

    let mirror = client.add_push_mirror(&owner, &repo, &opt).await?;
    info!(
        "Created push mirror '{}' of {}/{}",
        mirror.remote_name, owner, repo
    );
    set_resource_data(&mirror, &owner, &repo, data);
    Ok(())
}

/// Gitea has no edit endpoint for push mirrors: delete, then create again.
pub async fn update(client: &GiteaClient, data: &mut ResourceData) -> Result<()> {
    debug!("Recreating push mirror {:?}", data.id());
    delete(client, data).await?;
    create(client, data).await
}

/// Delete the mirror; one that is already gone counts as deleted.
pub async fn delete(client: &GiteaClient, data: &mut ResourceData) -> Result<()> {
    let owner = data.require_str(OWNER)?.to_string();
    let repo = data.require_str(REPO)?.to_string();
    let remote_name = data.require_str(REMOTE_NAME)?.to_string();

    if client
        .delete_push_mirror(&owner, &repo, &remote_name)
        .await?
    {
        info!(
            "Deleted push mirror '{}' of {}/{}",
            remote_name, owner, repo
        );
    } else {
        debug!(
            "Push mirror '{}' of {}/{} was already gone",
            remote_name, owner, repo
        );
    }
    data.clear_id();
    Ok(())
}

/// Seed identity attributes from an `owner/repo/remote_name` import ID
pub fn import(id: &str, data: &mut ResourceData) -> Result<()> {
    let (owner, repo, remote_name) = parse_resource_id(id)?;
    data.set(OWNER, owner);
    data.set(REPO, repo);
    data.set(REMOTE_NAME, remote_name);
    data.set_id(id);
    Ok(())
}
