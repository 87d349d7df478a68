use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API returned an error: status {status}, body {body}")]
    HttpStatus {
        status: StatusCode,
        body: String,
    },

    #[error("Failed to parse JSON response: {0}")]
    Decode(#[from] serde_path_to_error::Error<serde_json::Error>),

    #[error("Failed to serialize request body: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ApiClientError {
    /// Status code of the response that produced this error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiClientError::HttpStatus { status, .. } => Some(*status),
            ApiClientError::Network(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN)
        )
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error(code: u16) -> ApiClientError {
        ApiClientError::HttpStatus {
            status: StatusCode::from_u16(code).unwrap(),
            body: String::new(),
        }
    }

    #[test]
    fn test_status_is_exposed_for_http_errors() {
        assert_eq!(status_error(404).status(), Some(StatusCode::NOT_FOUND));
        assert!(status_error(404).is_not_found());
        assert!(!status_error(404).is_unauthorized());
    }

    #[test]
    fn test_auth_failures_are_classified() {
        assert!(status_error(401).is_unauthorized());
        assert!(status_error(403).is_unauthorized());
        assert!(!status_error(500).is_unauthorized());
    }

    #[test]
    fn test_config_error_has_no_status() {
        let err = ApiClientError::Config("empty base url".to_string());
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "Invalid configuration: empty base url");
    }
}
