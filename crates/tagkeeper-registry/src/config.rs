//! Configuration types for the registry client.

use std::time::Duration;

/// Default timeout applied to every registry request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Path prefix of the Nexus REST API.
const API_PREFIX: &str = "service/rest/v1";

/// Configuration for the registry client.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Registry base URL (e.g., "<http://localhost:8081>").
    pub url: String,

    /// Authentication configuration.
    pub auth: RegistryAuth,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string.
    pub user_agent: String,
}

impl RegistryConfig {
    /// Creates a new registry configuration with the given base URL.
    ///
    /// Trailing slashes are stripped.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagkeeper_registry::RegistryConfig;
    ///
    /// let config = RegistryConfig::new("http://nexus.example.com:8081/");
    /// assert_eq!(config.url, "http://nexus.example.com:8081");
    /// ```
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        let url: String = url.into();
        Self {
            url: url.trim_end_matches('/').to_string(),
            auth: RegistryAuth::None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("tagkeeper/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Sets the authentication method.
    #[must_use]
    pub fn with_auth(mut self, auth: RegistryAuth) -> Self {
        self.auth = auth;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the full URL of a REST API resource.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagkeeper_registry::RegistryConfig;
    ///
    /// let config = RegistryConfig::new("http://nexus:8081");
    /// assert_eq!(
    ///     config.api_url("components"),
    ///     "http://nexus:8081/service/rest/v1/components"
    /// );
    /// ```
    #[must_use]
    pub fn api_url(&self, resource: &str) -> String {
        format!("{}/{API_PREFIX}/{resource}", self.url)
    }
}

/// Authentication methods for registry access.
#[derive(Clone)]
pub enum RegistryAuth {
    /// No authentication.
    None,

    /// Basic authentication (username/password).
    Basic {
        /// Username.
        username: String,
        /// Password.
        password: String,
    },
}

impl RegistryAuth {
    /// Creates basic authentication.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagkeeper_registry::RegistryAuth;
    ///
    /// let auth = RegistryAuth::basic("admin", "secret");
    /// ```
    #[must_use]
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for RegistryAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new() {
        let config = RegistryConfig::new("http://localhost:8081");
        assert_eq!(config.url, "http://localhost:8081");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(matches!(config.auth, RegistryAuth::None));
        assert!(config.user_agent.starts_with("tagkeeper/"));
    }

    #[test]
    fn test_config_with_timeout() {
        let config =
            RegistryConfig::new("http://localhost:8081").with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_api_url_strips_trailing_slash() {
        let config = RegistryConfig::new("http://localhost:8081//");
        assert_eq!(
            config.api_url("tasks"),
            "http://localhost:8081/service/rest/v1/tasks"
        );
    }

    #[test]
    fn test_basic_auth() {
        let auth = RegistryAuth::basic("user", "pass");
        assert!(matches!(
            auth,
            RegistryAuth::Basic { username, password }
            if username == "user" && password == "pass"
        ));
    }

    #[test]
    fn test_debug_hides_password() {
        let auth = RegistryAuth::basic("user", "hunter2");
        let rendered = format!("{auth:?}");
        assert!(rendered.contains("user"));
        assert!(!rendered.contains("hunter2"));
    }
}
