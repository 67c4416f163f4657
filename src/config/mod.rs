//! Connection and session configuration.
//!
//! Connection state (base URLs, tenant, tokens) lives in an immutable
//! [`Session`] constructed once after authentication and handed to every
//! API call.

use crate::{Error, Result};
use secrecy::{ExposeSecret, SecretString};

/// Credentials gathered before authentication.
#[derive(Clone)]
pub struct Credentials {
    /// Username for the password-grant token request.
    pub username: String,
    /// Password for the password-grant token request.
    pub password: SecretString,
    /// API key for the identity API.
    pub api_key: SecretString,
}

impl Credentials {
    /// Creates credentials from plain strings.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
            api_key: SecretString::from(api_key.into()),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Where the two APIs live.
///
/// The tenant API is addressed as `{base}/{tenant}/...`; the identity API
/// has its own base URL and is not tenant-prefixed.
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    /// Scheme and host of the tenant API, without a trailing slash.
    pub base_url: String,
    /// Tenant path segment prefixed to every tenant API call.
    pub tenant: String,
    /// Base URL of the SCIM-style identity API, without a trailing slash.
    pub identity_url: String,
}

impl ConnectionSettings {
    /// Builds settings from a site URL such as `https://host.example.com/acme`.
    ///
    /// The tenant is the last path segment of the site URL unless an explicit
    /// override is given.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if no tenant can be derived.
    pub fn from_site_url(
        site_url: &str,
        tenant_override: Option<&str>,
        identity_url: &str,
    ) -> Result<Self> {
        let site_url = site_url.trim().trim_end_matches('/');
        let (scheme, rest) = site_url
            .split_once("://")
            .ok_or_else(|| Error::InvalidInput(format!("site URL '{site_url}' has no scheme")))?;

        let mut segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            return Err(Error::InvalidInput(format!(
                "site URL '{site_url}' has no host"
            )));
        }

        let tenant = match tenant_override {
            Some(t) => t.trim().trim_matches('/').to_string(),
            None if segments.len() > 1 => segments.pop().map(String::from).unwrap_or_default(),
            None => {
                return Err(Error::InvalidInput(format!(
                    "cannot derive a tenant from '{site_url}'; pass one explicitly"
                )));
            },
        };
        if tenant.is_empty() {
            return Err(Error::InvalidInput("tenant must not be empty".to_string()));
        }

        let base_url = format!("{scheme}://{}", segments.join("/"));
        Ok(Self {
            base_url,
            tenant,
            identity_url: identity_url.trim().trim_end_matches('/').to_string(),
        })
    }

    /// OAuth2 token endpoint for this tenant.
    #[must_use]
    pub fn token_endpoint(&self) -> String {
        format!("{}/{}/oauth2/token", self.base_url, self.tenant)
    }
}

/// Immutable session state shared by every API call.
///
/// Constructed once after authentication succeeds and never mutated; the
/// pipelines only read from it.
#[derive(Clone)]
pub struct Session {
    settings: ConnectionSettings,
    session_token: SecretString,
    api_key: SecretString,
}

impl Session {
    /// Creates a session from connection settings and the two bearers.
    #[must_use]
    pub fn new(settings: ConnectionSettings, session_token: SecretString, api_key: SecretString) -> Self {
        Self {
            settings,
            session_token,
            api_key,
        }
    }

    /// Full URL for a tenant API endpoint path.
    #[must_use]
    pub fn primary_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.settings.base_url,
            self.settings.tenant,
            path.trim_start_matches('/')
        )
    }

    /// Full URL for an identity API endpoint path.
    #[must_use]
    pub fn identity_api_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.settings.identity_url,
            path.trim_start_matches('/')
        )
    }

    /// Bearer token for the tenant API.
    #[must_use]
    pub fn session_token(&self) -> &str {
        self.session_token.expose_secret()
    }

    /// Bearer token (API key) for the identity API.
    #[must_use]
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("settings", &self.settings)
            .field("session_token", &"<redacted>")
            .field("api_key", &"<redacted>")
            .finish()
    }
}
