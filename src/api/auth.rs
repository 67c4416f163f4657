//! OAuth2 password-grant authentication.

use crate::config::{ConnectionSettings, Credentials, Session};
use crate::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Session duration requested from the token endpoint, in seconds.
const TOKEN_DURATION: &str = "60000";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

/// Authenticates against the tenant's token endpoint and builds the session.
///
/// Issues a form-encoded password-grant request; on success the returned
/// [`Session`] carries the access token and the identity API key and is
/// immutable for the rest of the run.
///
/// # Errors
///
/// Returns `Error::Auth` on transport failure, a non-2xx status, or a
/// response without an access token. Authentication failure is fatal to the
/// whole run.
pub fn authenticate(settings: &ConnectionSettings, credentials: &Credentials) -> Result<Session> {
    let endpoint = settings.token_endpoint();
    let client = reqwest::blocking::Client::builder()
        .timeout(super::ApiClient::REQUEST_TIMEOUT)
        .build()
        .map_err(|e| Error::Auth(e.to_string()))?;

    let params = [
        ("grant_type", "password"),
        ("username", credentials.username.as_str()),
        ("password", credentials.password.expose_secret()),
        ("duration", TOKEN_DURATION),
    ];

    let response = client
        .post(&endpoint)
        .form(&params)
        .send()
        .map_err(|e| Error::Auth(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Auth(format!("token endpoint returned status {status}")));
    }

    let token: TokenResponse = response
        .json()
        .map_err(|e| Error::Auth(format!("undecodable token response: {e}")))?;

    let access_token = token
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| Error::Auth("response carried no access token".to_string()))?;

    tracing::debug!(username = %credentials.username, "authenticated");
    Ok(Session::new(
        settings.clone(),
        SecretString::from(access_token),
        credentials.api_key.clone(),
    ))
}
