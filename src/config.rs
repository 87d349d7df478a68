use dotenv::dotenv;
use std::env;
use std::fmt::Debug;
use std::str::FromStr;
use tracing::{debug, error};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_USER_AGENT: &str = concat!("cirro-client/", env!("CARGO_PKG_VERSION"));

/// Settings needed to construct an [`crate::ApiClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root, every endpoint path is appended to it
    pub base_url: String,
    /// Value of the `User-Agent` header
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig::new(DEFAULT_BASE_URL)
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        ClientConfig {
            base_url: base_url.into(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Loads `.env` if present, then reads `CIRRO_API_URL` and `CIRRO_USER_AGENT`.
    pub fn from_env() -> Self {
        match dotenv() {
            Ok(_) => debug!("Successfully loaded .env file"),
            Err(e) => debug!("Failed to load .env file: {e}"),
        }

        ClientConfig {
            base_url: get_env_or_default("CIRRO_API_URL", DEFAULT_BASE_URL.to_string()),
            user_agent: get_env_or_default("CIRRO_USER_AGENT", DEFAULT_USER_AGENT.to_string()),
        }
    }
}

/// Reads and parses an environment variable, falling back to `default` when
/// it is unset or does not parse.
pub fn get_env_or_default<T: FromStr>(env_var: &str, default: T) -> T
where
    <T as FromStr>::Err: Debug,
{
    match env::var(env_var) {
        Ok(val) => val.parse::<T>().unwrap_or_else(|_| {
            error!("Failed to parse {}: {}, using default", env_var, val);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_user_agent() {
        let config = ClientConfig::new("https://cirro.example.org/api");
        assert_eq!(config.base_url, "https://cirro.example.org/api");
        assert!(config.user_agent.starts_with("cirro-client/"));
    }

    #[test]
    fn test_get_env_or_default() {
        env::set_var("CIRRO_TEST_PORT", "8080");
        env::set_var("CIRRO_TEST_BAD_PORT", "eighty");

        assert_eq!(get_env_or_default("CIRRO_TEST_PORT", 1u16), 8080);
        assert_eq!(get_env_or_default("CIRRO_TEST_BAD_PORT", 1u16), 1);
        assert_eq!(get_env_or_default("CIRRO_TEST_UNSET_VAR", 7u16), 7);
    }
}
