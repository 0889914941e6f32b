//! Provider settings resolution from multiple sources

use log::debug;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::credentials;
use crate::error::{GiteaError, Result};

/// Credentials file structure
#[derive(Deserialize, Debug)]
struct GiteaCredentials {
    credentials: HashMap<String, GiteaCredential>,
}

/// Single credential entry
#[derive(Deserialize, Debug)]
struct GiteaCredential {
    token: String,
}

/// How requests authenticate against the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    /// `Authorization: token <t>`
    Token(String),
    /// HTTP Basic; the token endpoints only accept this
    Basic { username: String, password: String },
}

/// Partially specified provider settings, as given by one source
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderSettings {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub insecure: Option<bool>,
}

/// Fully resolved provider configuration
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub auth: Auth,
    pub insecure: bool,
}

/// Resolves provider settings with fallback logic
pub struct ProviderResolver {
    credentials_path: Option<PathBuf>,
}

impl Default for ProviderResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderResolver {
    /// Create a resolver that reads the default credentials file
    pub fn new() -> Self {
        Self {
            credentials_path: dirs::home_dir().map(|p| p.join(credentials::FILE_PATH)),
        }
    }

    /// Create a resolver with a custom credentials file (for testing)
    pub fn with_credentials_path(path: PathBuf) -> Self {
        Self {
            credentials_path: Some(path),
        }
    }

    /// Resolve settings from the process environment
    pub fn resolve(
        &self,
        cli: &ProviderSettings,
        manifest: Option<&ProviderSettings>,
    ) -> Result<ProviderConfig> {
        self.resolve_with_env(cli, manifest, |key| std::env::var(key).ok())
    }

    /// Resolve each setting with fallback:
    /// 1. CLI argument
    /// 2. Environment variable (GITEA_*)
    /// 3. Manifest `provider` block
    /// 4. Credentials file (token only)
    pub fn resolve_with_env<F>(
        &self,
        cli: &ProviderSettings,
        manifest: Option<&ProviderSettings>,
        env: F,
    ) -> Result<ProviderConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let empty = ProviderSettings::default();
        let manifest = manifest.unwrap_or(&empty);

        let pick = |cli_value: &Option<String>, env_var: &str, file_value: &Option<String>| {
            cli_value
                .clone()
                .or_else(|| env(env_var).filter(|v| !v.is_empty()))
                .or_else(|| file_value.clone())
        };

        let base_url = pick(&cli.base_url, credentials::BASE_URL_ENV, &manifest.base_url)
            .ok_or_else(|| {
                GiteaError::Config(format!(
                    "No Gitea base URL configured. Use --base-url, export {} or set \
                     provider.base_url in the manifest",
                    credentials::BASE_URL_ENV
                ))
            })?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let insecure = cli
            .insecure
            .or_else(|| env(credentials::INSECURE_ENV).map(|v| parse_bool_flag(&v)))
            .or(manifest.insecure)
            .unwrap_or(false);

        let username = pick(&cli.username, credentials::USERNAME_ENV, &manifest.username);
        let password = pick(&cli.password, credentials::PASSWORD_ENV, &manifest.password);

        if let (Some(username), Some(password)) = (username.clone(), password) {
            debug!("Using basic auth for user '{}'", username);
            return Ok(ProviderConfig {
                base_url,
                auth: Auth::Basic { username, password },
                insecure,
            });
        }
        if username.is_some() {
            return Err(GiteaError::Credentials(
                "A username was given without a password".to_string(),
            ));
        }

        let token = match pick(&cli.token, credentials::TOKEN_ENV, &manifest.token) {
            Some(token) => {
                debug!("Using API token from CLI, environment or manifest");
                token
            }
            None => self.read_from_credentials_file(&base_url)?,
        };

        Ok(ProviderConfig {
            base_url,
            auth: Auth::Token(token),
            insecure,
        })
    }

    /// Read a token for the base URL's host from the credentials file
    fn read_from_credentials_file(&self, base_url: &str) -> Result<String> {
        let host = host_of(base_url);
        let path = self
            .credentials_path
            .as_deref()
            .ok_or_else(|| GiteaError::Credentials(credentials_not_found_message(host, None)))?;

        debug!("Looking for credentials file at: {}", path.display());

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => {
                return Err(GiteaError::Credentials(credentials_not_found_message(
                    host,
                    Some(path),
                )));
            }
        };

        let creds: GiteaCredentials = serde_json::from_str(&content).map_err(|e| {
            GiteaError::Credentials(format!(
                "Could not parse credentials file {}: {}",
                path.display(),
                e
            ))
        })?;

        creds
            .credentials
            .get(host)
            .map(|cred| {
                debug!("Using token from credentials file for host: {}", host);
                cred.token.clone()
            })
            .ok_or_else(|| GiteaError::Credentials(credentials_not_found_message(host, Some(path))))
    }
}

/// Host part of a base URL (`https://git.example.com:3000/sub` -> `git.example.com:3000`)
pub fn host_of(base_url: &str) -> &str {
    let without_scheme = base_url
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(base_url);
    without_scheme.split('/').next().unwrap_or(without_scheme)
}

fn parse_bool_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Generate helpful error message when no credentials are found
fn credentials_not_found_message(host: &str, credentials_path: Option<&Path>) -> String {
    let creds_info = credentials_path
        .map(|p| format!(" or in credentials file {}", p.display()))
        .unwrap_or_default();

    format!(
        "No credentials found for host '{}'. Please provide one of:\n\
         \n\
         1. CLI arguments:     gitea-tf --token <TOKEN>  (or --username/--password)\n\
         2. Environment vars:  export {}=<TOKEN>  (or {}/{})\n\
         3. Manifest:          provider.token in the manifest file\n\
         \n\
         Checked: CLI, environment, manifest{}",
        host,
        credentials::TOKEN_ENV,
        credentials::USERNAME_ENV,
        credentials::PASSWORD_ENV,
        creds_info
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn resolver_without_file(dir: &TempDir) -> ProviderResolver {
        ProviderResolver::with_credentials_path(dir.path().join("missing.json"))
    }

    #[test]
    fn test_cli_token_takes_precedence() {
        let dir = TempDir::new().unwrap();
        let cli = ProviderSettings {
            base_url: Some("https://git.example.com/".to_string()),
            token: Some("cli-token".to_string()),
            ..Default::default()
        };
        let manifest = ProviderSettings {
            token: Some("manifest-token".to_string()),
            ..Default::default()
        };
        let env = |key: &str| (key == credentials::TOKEN_ENV).then(|| "env-token".to_string());

        let config = resolver_without_file(&dir)
            .resolve_with_env(&cli, Some(&manifest), env)
            .unwrap();

        assert_eq!(config.base_url, "https://git.example.com");
        assert_eq!(config.auth, Auth::Token("cli-token".to_string()));
        assert!(!config.insecure);
    }

    #[test]
    fn test_env_beats_manifest() {
        let dir = TempDir::new().unwrap();
        let manifest = ProviderSettings {
            base_url: Some("https://manifest.example.com".to_string()),
            token: Some("manifest-token".to_string()),
            ..Default::default()
        };
        let env = |key: &str| match key {
            credentials::TOKEN_ENV => Some("env-token".to_string()),
            credentials::INSECURE_ENV => Some("true".to_string()),
            _ => None,
        };

        let config = resolver_without_file(&dir)
            .resolve_with_env(&ProviderSettings::default(), Some(&manifest), env)
            .unwrap();

        assert_eq!(config.base_url, "https://manifest.example.com");
        assert_eq!(config.auth, Auth::Token("env-token".to_string()));
        assert!(config.insecure);
    }

    #[test]
    fn test_username_password_selects_basic_auth() {
        let dir = TempDir::new().unwrap();
        let cli = ProviderSettings {
            base_url: Some("https://git.example.com".to_string()),
            token: Some("ignored".to_string()),
            username: Some("alice".to_string()),
            password: Some("s3cret".to_string()),
            ..Default::default()
        };

        let config = resolver_without_file(&dir)
            .resolve_with_env(&cli, None, no_env)
            .unwrap();

        assert_eq!(
            config.auth,
            Auth::Basic {
                username: "alice".to_string(),
                password: "s3cret".to_string()
            }
        );
    }

    #[test]
    fn test_username_without_password_errors() {
        let dir = TempDir::new().unwrap();
        let cli = ProviderSettings {
            base_url: Some("https://git.example.com".to_string()),
            username: Some("alice".to_string()),
            ..Default::default()
        };

        let err = resolver_without_file(&dir)
            .resolve_with_env(&cli, None, no_env)
            .unwrap_err();
        assert!(err.to_string().contains("without a password"));
    }

    #[test]
    fn test_missing_base_url_errors() {
        let dir = TempDir::new().unwrap();
        let err = resolver_without_file(&dir)
            .resolve_with_env(&ProviderSettings::default(), None, no_env)
            .unwrap_err();
        assert!(err.to_string().contains(credentials::BASE_URL_ENV));
    }

    #[test]
    fn test_token_from_credentials_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(
            &path,
            r#"{"credentials": {"git.example.com": {"token": "file-token"}}}"#,
        )
        .unwrap();
        let cli = ProviderSettings {
            base_url: Some("https://git.example.com".to_string()),
            ..Default::default()
        };

        let config = ProviderResolver::with_credentials_path(path)
            .resolve_with_env(&cli, None, no_env)
            .unwrap();
        assert_eq!(config.auth, Auth::Token("file-token".to_string()));
    }

    #[test]
    fn test_no_credentials_message() {
        let dir = TempDir::new().unwrap();
        let cli = ProviderSettings {
            base_url: Some("https://git.example.com".to_string()),
            ..Default::default()
        };

        let err = resolver_without_file(&dir)
            .resolve_with_env(&cli, None, no_env)
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("git.example.com"));
        assert!(msg.contains("GITEA_TOKEN"));
        assert!(msg.contains("missing.json"));
    }

    #[test]
    fn test_host_of() {
        assert_eq!(host_of("https://git.example.com"), "git.example.com");
        assert_eq!(host_of("http://localhost:3000/gitea"), "localhost:3000");
        assert_eq!(host_of("git.example.com"), "git.example.com");
    }

    #[test]
    fn test_parse_bool_flag() {
        assert!(parse_bool_flag("1"));
        assert!(parse_bool_flag("TRUE"));
        assert!(!parse_bool_flag("0"));
        assert!(!parse_bool_flag("nope"));
    }
}
