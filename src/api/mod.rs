//! HTTP access to the two remote APIs.
//!
//! [`ApiClient`] wraps a blocking `reqwest` client around the immutable
//! [`Session`]: every call picks its base URL and bearer by [`ApiHost`] and
//! deserializes into an explicit schema type from [`models`]. Calls are
//! strictly sequential; there is no retry and no concurrency.

pub mod auth;
pub mod models;
pub mod paging;
pub mod tenant;

use crate::config::Session;
use crate::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Which of the two APIs a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiHost {
    /// The tenant API (bearer = session token, tenant path prefix).
    Primary,
    /// The SCIM-style identity API (bearer = API key, fixed base).
    Identity,
}

/// Authenticated HTTP client for both APIs.
///
/// Cheap to clone; the underlying `reqwest` client is reference-counted.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::blocking::Client,
    session: Session,
}

impl ApiClient {
    /// Request timeout applied to every call.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a client for the given session.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(session: Session) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::OperationFailed {
                operation: "build_http_client".to_string(),
                cause: e.to_string(),
            })?;
        Ok(Self { http, session })
    }

    fn url(&self, host: ApiHost, path: &str) -> String {
        match host {
            ApiHost::Primary => self.session.primary_url(path),
            ApiHost::Identity => self.session.identity_api_url(path),
        }
    }

    fn bearer(&self, host: ApiHost) -> &str {
        match host {
            ApiHost::Primary => self.session.session_token(),
            ApiHost::Identity => self.session.api_key(),
        }
    }

    /// Issues a GET request and deserializes the JSON response.
    ///
    /// # Errors
    ///
    /// Returns `Error::ApiRequest` on transport failure, non-2xx status, or
    /// an undecodable body.
    pub fn get<T: DeserializeOwned>(
        &self,
        host: ApiHost,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .http
            .get(self.url(host, path))
            .query(query)
            .header("Authorization", format!("Bearer {}", self.bearer(host)))
            .send()
            .map_err(|e| Error::ApiRequest {
                endpoint: path.to_string(),
                cause: e.to_string(),
            })?;
        Self::decode(path, response)
    }

    /// Issues a POST request with a JSON body and deserializes the response.
    ///
    /// # Errors
    ///
    /// Returns `Error::ApiRequest` on transport failure, non-2xx status, or
    /// an undecodable body.
    pub fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        host: ApiHost,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .http
            .post(self.url(host, path))
            .header("Authorization", format!("Bearer {}", self.bearer(host)))
            .json(body)
            .send()
            .map_err(|e| Error::ApiRequest {
                endpoint: path.to_string(),
                cause: e.to_string(),
            })?;
        Self::decode(path, response)
    }

    fn decode<T: DeserializeOwned>(
        endpoint: &str,
        response: reqwest::blocking::Response,
    ) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::error!(endpoint, status = %status, body = %body, "API request failed");
            return Err(Error::ApiRequest {
                endpoint: endpoint.to_string(),
                cause: format!("status {status}: {body}"),
            });
        }
        response.json().map_err(|e| Error::ApiRequest {
            endpoint: endpoint.to_string(),
            cause: format!("undecodable response: {e}"),
        })
    }
}
