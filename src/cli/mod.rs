//! CLI command implementations.
//!
//! Each submodule implements one command. Connection settings and
//! credentials come from flags or environment variables; anything missing
//! is prompted for interactively, with the password and API key masked.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `export` | Flatten the training register into a dated CSV file |
//! | `import` | Create training units from a CSV file |
//!
//! # Example Usage
//!
//! ```bash
//! # Export, prompting for anything not set in the environment
//! trainsync export --output-dir ./out
//!
//! # Import a CSV
//! trainsync import TrainingUnits.csv
//!
//! # No subcommand: interactive action choice (1 = export, 2 = import)
//! trainsync
//! ```

// Allow print_stdout/stderr in CLI modules; the console is the interface.
#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]

pub mod export;
pub mod import;

use crate::api::auth::authenticate;
use crate::api::tenant::HttpTenantApi;
use crate::api::ApiClient;
use crate::config::{ConnectionSettings, Credentials};
use crate::identity::ScimClient;
use crate::{Error, Result};
use std::io::{self, Write};

/// Connection and credential inputs, possibly partial.
///
/// Filled from flags and environment by the binary; [`connect`] prompts for
/// whatever is missing.
#[derive(Debug, Clone, Default)]
pub struct ConnectionOptions {
    /// Site URL, e.g. `https://app.example.com/acme`.
    pub site_url: Option<String>,
    /// Tenant override when it cannot be derived from the site URL.
    pub tenant: Option<String>,
    /// Base URL of the identity API.
    pub identity_url: Option<String>,
    /// Username for authentication.
    pub username: Option<String>,
    /// Password for authentication.
    pub password: Option<String>,
    /// API key for the identity API.
    pub api_key: Option<String>,
}

/// Prompts for a line of input on the console.
///
/// # Errors
///
/// Returns an error if stdin or stdout is unavailable.
pub fn prompt_line(label: &str) -> Result<String> {
    print!("{label}: ");
    io::stdout().flush().map_err(|e| Error::OperationFailed {
        operation: "flush_stdout".to_string(),
        cause: e.to_string(),
    })?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| Error::OperationFailed {
            operation: "read_stdin".to_string(),
            cause: e.to_string(),
        })?;
    Ok(input.trim().to_string())
}

/// Prompts for a secret with masked input.
///
/// # Errors
///
/// Returns an error if the terminal cannot be read.
pub fn prompt_secret(label: &str) -> Result<String> {
    rpassword::prompt_password(format!("{label}: ")).map_err(|e| Error::OperationFailed {
        operation: "read_secret".to_string(),
        cause: e.to_string(),
    })
}

fn or_prompt(value: Option<String>, label: &str) -> Result<String> {
    match value.filter(|v| !v.trim().is_empty()) {
        Some(v) => Ok(v),
        None => prompt_line(label),
    }
}

fn or_prompt_secret(value: Option<String>, label: &str) -> Result<String> {
    match value.filter(|v| !v.is_empty()) {
        Some(v) => Ok(v),
        None => prompt_secret(label),
    }
}

/// Gathers missing inputs, authenticates, and builds both API clients.
///
/// # Errors
///
/// Returns an error when input cannot be gathered or authentication fails;
/// both are fatal to the run.
pub fn connect(options: ConnectionOptions) -> Result<(HttpTenantApi, ScimClient)> {
    let site_url = or_prompt(options.site_url, "Site URL")?;
    let identity_url = or_prompt(options.identity_url, "Identity API URL")?;
    let username = or_prompt(options.username, "Username")?;
    let password = or_prompt_secret(options.password, "Password")?;
    let api_key = or_prompt_secret(options.api_key, "API key")?;

    let settings =
        ConnectionSettings::from_site_url(&site_url, options.tenant.as_deref(), &identity_url)?;
    let credentials = Credentials::new(username, password, api_key);

    println!("[info] authenticating against {}", settings.token_endpoint());
    let session = authenticate(&settings, &credentials)?;
    println!("[ok] authenticated as {}", credentials.username);

    let client = ApiClient::new(session)?;
    Ok((HttpTenantApi::new(client.clone()), ScimClient::new(client)))
}
