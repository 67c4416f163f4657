//! Identity resolution against the SCIM-style identity API.
//!
//! Numeric user ids and display identifiers (usernames/emails) live in two
//! different systems; this module maps between them. Lookups are cached for
//! the duration of one run and never persisted.

use crate::api::{ApiClient, ApiHost};
use crate::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;

/// Lookup operations of the identity API.
pub trait IdentityApi {
    /// Resolves a numeric user id to a username.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure; `Ok(None)` when the user
    /// exists but carries no username.
    fn username_by_id(&self, id: i64) -> Result<Option<String>>;

    /// Resolves a username to a numeric user id via an exact-match filter.
    ///
    /// Takes the first match when several are returned.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure; `Ok(None)` on no match.
    fn id_by_username(&self, username: &str) -> Result<Option<i64>>;
}

/// A user record from the identity API.
#[derive(Debug, Clone, Deserialize)]
pub struct ScimUser {
    /// Numeric user id.
    #[serde(default)]
    pub id: Option<i64>,
    /// Display identifier.
    #[serde(rename = "userName", default)]
    pub user_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ScimListResponse {
    #[serde(rename = "Resources", default)]
    resources: Vec<ScimUser>,
}

/// HTTP-backed implementation of [`IdentityApi`].
#[derive(Clone)]
pub struct ScimClient {
    client: ApiClient,
}

impl ScimClient {
    /// Wraps an authenticated client.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

impl IdentityApi for ScimClient {
    fn username_by_id(&self, id: i64) -> Result<Option<String>> {
        let endpoint = format!("api/scim/users/{id}");
        let user: ScimUser = self.client.get(ApiHost::Identity, &endpoint, &[])?;
        Ok(user.user_name.filter(|name| !name.is_empty()))
    }

    fn id_by_username(&self, username: &str) -> Result<Option<i64>> {
        let response: ScimListResponse = self.client.get(
            ApiHost::Identity,
            "api/scim/users",
            &[("filter", format!("userName eq \"{username}\""))],
        )?;
        Ok(response.resources.first().and_then(|user| user.id))
    }
}

/// Caching resolver on top of an [`IdentityApi`].
///
/// Both directions are cached per run, including misses, so a username that
/// appears in many rows is looked up once. Failed lookups are logged and
/// cached as unresolved; the caller decides whether unresolved is a skip or
/// a row failure.
pub struct IdentityResolver<I: IdentityApi> {
    api: I,
    username_by_id: HashMap<i64, Option<String>>,
    id_by_username: HashMap<String, Option<i64>>,
}

impl<I: IdentityApi> IdentityResolver<I> {
    /// Creates a resolver with empty caches.
    #[must_use]
    pub fn new(api: I) -> Self {
        Self {
            api,
            username_by_id: HashMap::new(),
            id_by_username: HashMap::new(),
        }
    }

    /// Resolves a numeric id to a username, consulting the cache first.
    pub fn username(&mut self, id: i64) -> Option<String> {
        if let Some(cached) = self.username_by_id.get(&id) {
            return cached.clone();
        }
        let resolved = self.api.username_by_id(id).unwrap_or_else(|e: Error| {
            tracing::warn!(user_id = id, error = %e, "identity lookup by id failed");
            None
        });
        self.username_by_id.insert(id, resolved.clone());
        resolved
    }

    /// Resolves a username to a numeric id, consulting the cache first.
    pub fn id(&mut self, username: &str) -> Option<i64> {
        if let Some(cached) = self.id_by_username.get(username) {
            return *cached;
        }
        let resolved = self.api.id_by_username(username).unwrap_or_else(|e: Error| {
            tracing::warn!(username, error = %e, "identity lookup by username failed");
            None
        });
        self.id_by_username.insert(username.to_string(), resolved);
        resolved
    }
}
