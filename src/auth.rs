use reqwest::RequestBuilder;
use std::fmt::{self, Debug};
use std::sync::Arc;

pub trait AuthStrategy: Send + Sync {
    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder;
}

impl Debug for dyn AuthStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthStrategy")
    }
}

/// Source of the current bearer token.
///
/// Called once per outgoing request, so implementations that refresh
/// credentials are picked up without rebuilding the client.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> String;
}

impl<F> TokenProvider for F
where
    F: Fn() -> String + Send + Sync,
{
    fn token(&self) -> String {
        self()
    }
}

/// A fixed token, mostly useful for scripts and tests.
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        StaticToken {
            token: token.into(),
        }
    }
}

impl TokenProvider for StaticToken {
    fn token(&self) -> String {
        self.token.clone()
    }
}

impl Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticToken")
            .field("token", &"***") // Don't expose the actual token
            .finish()
    }
}

pub struct BearerAuth {
    provider: Arc<dyn TokenProvider>,
}

impl BearerAuth {
    pub fn new(provider: Arc<dyn TokenProvider>) -> Self {
        BearerAuth { provider }
    }

    pub fn from_token(token: impl Into<String>) -> Self {
        BearerAuth::new(Arc::new(StaticToken::new(token)))
    }
}

impl AuthStrategy for BearerAuth {
    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(self.provider.token())
    }
}

impl Debug for BearerAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerAuth")
            .field("provider", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_bearer_header_uses_provider_token() {
        let auth = BearerAuth::from_token("abc123");
        let request = auth
            .apply_auth(reqwest::Client::new().get("http://localhost/user"))
            .build()
            .unwrap();
        let header = request.headers().get("authorization").unwrap();
        assert_eq!(header.to_str().unwrap(), "Bearer abc123");
        assert!(header.is_sensitive());
    }

    #[test]
    fn test_provider_is_consulted_per_request() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let auth = BearerAuth::new(Arc::new(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            format!("token-{n}")
        }));
        let client = reqwest::Client::new();

        let first = auth.apply_auth(client.get("http://localhost/a")).build().unwrap();
        let second = auth.apply_auth(client.get("http://localhost/b")).build().unwrap();

        assert_eq!(first.headers()["authorization"], "Bearer token-0");
        assert_eq!(second.headers()["authorization"], "Bearer token-1");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_debug_hides_token() {
        let rendered = format!("{:?}", StaticToken::new("secret"));
        assert!(!rendered.contains("secret"));
    }
}
