/// Configuration constants for the Gitea API
pub mod api {
    /// Base path for Gitea API v1
    pub const BASE_PATH: &str = "/api/v1";

    /// Repositories endpoint
    pub const REPOS: &str = "repos";

    /// Push mirrors sub-resource of a repository
    pub const PUSH_MIRRORS: &str = "push_mirrors";

    /// Users endpoint
    pub const USERS: &str = "users";

    /// Access tokens sub-resource of a user
    pub const TOKENS: &str = "tokens";

    /// Page size used when scanning access tokens
    pub const TOKEN_PAGE_SIZE: u32 = 50;
}

/// Configuration constants for credentials
pub mod credentials {
    /// Credentials file path (relative to HOME)
    pub const FILE_PATH: &str = ".gitea-tf/credentials.json";

    /// Environment variable for the server base URL
    pub const BASE_URL_ENV: &str = "GITEA_BASE_URL";

    /// Environment variable for the API token
    pub const TOKEN_ENV: &str = "GITEA_TOKEN";

    /// Environment variable for the basic auth username
    pub const USERNAME_ENV: &str = "GITEA_USERNAME";

    /// Environment variable for the basic auth password
    pub const PASSWORD_ENV: &str = "GITEA_PASSWORD";

    /// Environment variable to skip TLS verification
    pub const INSECURE_ENV: &str = "GITEA_INSECURE";
}

/// Default values for CLI
pub mod defaults {
    /// Default desired-configuration file
    pub const MANIFEST: &str = "gitea.yaml";

    /// Environment variable overriding the manifest path
    pub const MANIFEST_ENV: &str = "GITEA_TF_MANIFEST";

    /// Default state file
    pub const STATE_FILE: &str = "gitea-tf.tfstate.json";

    /// Environment variable overriding the state file path
    pub const STATE_FILE_ENV: &str = "GITEA_TF_STATE";

    /// Default log level
    pub const LOG_LEVEL: &str = "warn";

    /// Default push mirror sync interval
    pub const PUSH_MIRROR_INTERVAL: &str = "8h0m0s";
}
