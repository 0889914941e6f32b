//! Push mirror API operations

use crate::config::api;
use crate::error::Result;
use crate::gitea::client::segment;
use crate::gitea::GiteaClient;

use super::models::{CreatePushMirrorOption, PushMirror};

/// `/repos/{owner}/{repo}/push_mirrors`
fn push_mirrors_path(owner: &str, repo: &str) -> String {
    format!(
        "/{}/{}/{}/{}",
        api::REPOS,
        segment(owner),
        segment(repo),
        api::PUSH_MIRRORS
    )
}

impl GiteaClient {
    /// Get a push mirror by remote name, `None` if it does not exist
    pub async fn get_push_mirror(
        &self,
        owner: &str,
        repo: &str,
        remote_name: &str,
    ) -> Result<Option<PushMirror>> {
        let path = format!("{}/{}", push_mirrors_path(owner, repo), segment(remote_name));
        let label = format!("push mirror '{}' of {}/{}", remote_name, owner, repo);
        self.fetch_resource_by_path(&path, &label).await
    }

    /// Add a push mirror to a repository
    pub async fn add_push_mirror(
        &self,
        owner: &str,
        repo: &str,
        opt: &CreatePushMirrorOption,
    ) -> Result<PushMirror> {
        let path = push_mirrors_path(owner, repo);
        let label = format!("push mirror to '{}' for {}/{}", opt.remote_address, owner, repo);
        self.post_json(&path, opt, &label).await
    }

    /// Delete a push mirror; `false` if it was already gone
    pub async fn delete_push_mirror(
        &self,
        owner: &str,
        repo: &str,
        remote_name: &str,
    ) -> Result<bool> {
        let path = format!("{}/{}", push_mirrors_path(owner, repo), segment(remote_name));
        let label = format!("push mirror '{}' of {}/{}", remote_name, owner, repo);
        self.delete_by_path(&path, &label).await
    }
}
