use std::fmt;

/// Custom error type for Gitea resource operations
#[derive(Debug)]
pub enum GiteaError {
    /// HTTP request failed
    Http(reqwest::Error),
    /// API returned an error response
    Api { status: u16, message: String },
    /// Remote object could not be located
    NotFound(String),
    /// No usable credentials, or the credentials file is broken
    Credentials(String),
    /// JSON parsing error
    Json(String),
    /// YAML parsing error
    Yaml(String),
    /// Configuration error
    Config(String),
    /// Resource configuration does not match its schema
    Validation(String),
    /// State file error
    State(String),
}

impl fmt::Display for GiteaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GiteaError::Http(e) => write!(f, "HTTP request failed: {}", e),
            GiteaError::Api { status, message } => {
                write!(f, "API error (status {}): {}", status, message)
            }
            GiteaError::NotFound(msg) => write!(f, "{}", msg),
            GiteaError::Credentials(msg) => write!(f, "{}", msg),
            GiteaError::Json(msg) => write!(f, "JSON error: {}", msg),
            GiteaError::Yaml(msg) => write!(f, "YAML error: {}", msg),
            GiteaError::Config(msg) => write!(f, "Configuration error: {}", msg),
            GiteaError::Validation(msg) => write!(f, "Invalid configuration: {}", msg),
            GiteaError::State(msg) => write!(f, "State error: {}", msg),
        }
    }
}

impl std::error::Error for GiteaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GiteaError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl GiteaError {
    /// HTTP status of an API error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            GiteaError::Api { status, .. } => Some(*status),
            GiteaError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True for a 404 from the API
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<reqwest::Error> for GiteaError {
    fn from(err: reqwest::Error) -> Self {
        GiteaError::Http(err)
    }
}

impl From<serde_json::Error> for GiteaError {
    fn from(err: serde_json::Error) -> Self {
        GiteaError::Json(err.to_string())
    }
}

impl From<serde_yml::Error> for GiteaError {
    fn from(err: serde_yml::Error) -> Self {
        GiteaError::Yaml(err.to_string())
    }
}

impl From<std::io::Error> for GiteaError {
    fn from(err: std::io::Error) -> Self {
        GiteaError::Config(err.to_string())
    }
}

/// Result type alias for Gitea operations
pub type Result<T> = std::result::Result<T, GiteaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = GiteaError::Api {
            status: 404,
            message: "Not found".to_string(),
        };
        assert!(err.to_string().contains("404"));
        assert!(err.to_string().contains("Not found"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GiteaError>();
    }

    #[test]
    fn test_is_not_found() {
        let err = GiteaError::Api {
            status: 404,
            message: "gone".to_string(),
        };
        assert!(err.is_not_found());

        let err = GiteaError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert!(!err.is_not_found());

        // A locally raised NotFound is not an HTTP 404
        assert!(!GiteaError::NotFound("Token with ID 1 could not be found".to_string()).is_not_found());
    }

    #[test]
    fn test_validation_error_display() {
        let err = GiteaError::Validation("missing required attribute 'owner'".to_string());
        assert!(err.to_string().contains("Invalid configuration"));
        assert!(err.to_string().contains("owner"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: GiteaError = json_err.into();
        match err {
            GiteaError::Json(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected GiteaError::Json"),
        }
    }

    #[test]
    fn test_from_serde_yml_error() {
        let yml_err = serde_yml::from_str::<serde_json::Value>("a: [unclosed").unwrap_err();
        let err: GiteaError = yml_err.into();
        assert!(err.to_string().contains("YAML error"));
    }

    #[test]
    fn test_error_source_non_http() {
        use std::error::Error;
        let err = GiteaError::State("corrupt".to_string());
        assert!(err.source().is_none());
    }
}
