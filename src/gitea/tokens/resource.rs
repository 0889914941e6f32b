//! `gitea_token` resource: schema and lifecycle handlers

use log::{debug, info};
use std::collections::BTreeSet;

use crate::config::api;
use crate::error::{GiteaError, Result};
use crate::gitea::GiteaClient;
use crate::provider::{Attribute, AttributeType, ResourceData, ResourceSchema};

use super::models::{AccessToken, CreateAccessTokenOption};

pub const TYPE_NAME: &str = "gitea_token";

pub const USERNAME: &str = "username";
pub const NAME: &str = "name";
pub const SCOPES: &str = "scopes";
pub const TOKEN: &str = "token";
pub const LAST_EIGHT: &str = "last_eight";

pub fn schema() -> ResourceSchema {
    ResourceSchema::new(
        "`gitea_token` manages gitea Access Tokens.\n\n\
         The token endpoints only accept username/password provider configuration.\n\n\
         WARNING:\n\
         Tokens will be stored in the state file!",
    )
    .attribute(
        USERNAME,
        Attribute::required(AttributeType::String)
            .force_new()
            .describe("The owner of the Access Token"),
    )
    .attribute(
        NAME,
        Attribute::required(AttributeType::String)
            .force_new()
            .describe("The name of the Access Token"),
    )
    .attribute(
        SCOPES,
        Attribute::optional(AttributeType::StringList)
            .force_new()
            .describe("Scopes granted to the Access Token, e.g. 'write:repository'"),
    )
    .attribute(
        TOKEN,
        Attribute::computed(AttributeType::String)
            .sensitive()
            .describe("The actual Access Token"),
    )
    .attribute(LAST_EIGHT, Attribute::computed(AttributeType::String))
}

/// Find a token by ID by scanning the user's token list page by page.
///
/// Gitea has no lookup by ID. The scan stops at the first empty page.
pub async fn search_token_by_id(
    client: &GiteaClient,
    username: &str,
    id: i64,
) -> Result<AccessToken> {
    let mut page = 1;

    loop {
        let tokens = client
            .list_access_tokens(username, page, api::TOKEN_PAGE_SIZE)
            .await?;

        if tokens.is_empty() {
            return Err(GiteaError::NotFound(format!(
                "Token with ID {} could not be found",
                id
            )));
        }

        if let Some(token) = tokens.into_iter().find(|t| t.id == id) {
            debug!("Found token {} on page {}", id, page);
            return Ok(token);
        }

        page += 1;
    }
}

/// Scope set as Gitea stores it: deduplicated, with `read:X` dropped when
/// `write:X` is present
fn normalized_scopes(scopes: &[String]) -> BTreeSet<&str> {
    let all: BTreeSet<&str> = scopes.iter().map(|s| s.trim()).collect();
    all.iter()
        .copied()
        .filter(|scope| match scope.strip_prefix("read:") {
            Some(area) => !all.contains(format!("write:{}", area).as_str()),
            None => true,
        })
        .collect()
}

/// True if two scope lists grant the same access
pub fn scopes_equivalent(configured: &[String], reported: &[String]) -> bool {
    normalized_scopes(configured) == normalized_scopes(reported)
}

/// Copy server-reported fields into the resource data.
///
/// The secret is only present right after creation and is never blanked.
/// Configured scopes are kept unless the server grants something different;
/// unset scopes stay unset so the server default is accepted.
fn set_resource_data(token: &AccessToken, data: &mut ResourceData) {
    data.set_id(token.id.to_string());
    data.set(NAME, token.name.as_str());
    if !token.sha1.is_empty() {
        data.set(TOKEN, token.sha1.as_str());
    }
    data.set(LAST_EIGHT, token.token_last_eight.as_str());

    let configured = data.get_str_list(SCOPES);
    let reported = token.scopes.clone().unwrap_or_default();
    if !configured.is_empty() && !scopes_equivalent(&configured, &reported) {
        debug!(
            "Token '{}' scopes differ from configuration: {:?}",
            token.name, reported
        );
        data.set(SCOPES, reported);
    }
}

fn parse_token_id(id: &str) -> Result<i64> {
    id.parse::<i64>().map_err(|e| {
        GiteaError::State(format!("invalid access token ID '{}': {}", id, e))
    })
}

pub async fn create(client: &GiteaClient, data: &mut ResourceData) -> Result<()> {
    let username = data.require_str(USERNAME)?.to_string();
    let opt = CreateAccessTokenOption {
        name: data.require_str(NAME)?.to_string(),
        scopes: data.get_str_list(SCOPES),
    };

    let token = client.create_access_token(&username, &opt).await?;
    info!(
        "Created access token '{}' (ID {}) for user '{}'",
        token.name, token.id, username
    );
    set_resource_data(&token, data);
    Ok(())
}

pub async fn read(client: &GiteaClient, data: &mut ResourceData) -> Result<()> {
    let username = data.require_str(USERNAME)?.to_string();
    let id = parse_token_id(data.require_id("read")?)?;

    let token = search_token_by_id(client, &username, id).await?;
    set_resource_data(&token, data);
    Ok(())
}

/// Delete by name; a token that is already gone counts as deleted.
pub async fn delete(client: &GiteaClient, data: &mut ResourceData) -> Result<()> {
    let username = data.require_str(USERNAME)?.to_string();
    let name = data.require_str(NAME)?.to_string();

    if client.delete_access_token(&username, &name).await? {
        info!("Deleted access token '{}' of user '{}'", name, username);
    } else {
        debug!("Access token '{}' of user '{}' was already gone", name, username);
    }
    data.clear_id();
    Ok(())
}

/// Import by numeric token ID. The username comes from configuration.
pub fn import(id: &str, data: &mut ResourceData) -> Result<()> {
    parse_token_id(id)?;
    data.require_str(USERNAME)?;
    data.set_id(id);
    Ok(())
}
