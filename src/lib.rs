//! # Trainsync
//!
//! Synchronizes training unit records between a SaaS register and flat CSV
//! files.
//!
//! Trainsync talks to two REST-style APIs: the tenant API that owns the
//! training register, and a separate SCIM-style identity API used to resolve
//! numeric user ids to and from usernames. It supports two flows:
//!
//! - **Export**: paginate through every training unit, hydrate each with its
//!   details, linked processes, linked documents and trainees, resolve all
//!   identities, and flatten the result into a dated CSV file.
//! - **Import**: read a CSV, resolve references (linked processes, owner,
//!   trainees), create each unit through the tenant API, and optionally
//!   assign trainees through the scheduling endpoint.
//!
//! ## Example
//!
//! ```rust,ignore
//! use trainsync::export::ExportService;
//! use trainsync::identity::IdentityResolver;
//!
//! let mut service = ExportService::new(tenant_api, IdentityResolver::new(identity_api));
//! let result = service.run(Path::new("."))?;
//! println!("exported {} of {} units", result.exported, result.listed);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod api;
pub mod cli;
pub mod codec;
pub mod config;
pub mod export;
pub mod identity;
pub mod import;
pub mod model;
pub mod observability;

// Re-exports for convenience
pub use api::tenant::TenantApi;
pub use config::{ConnectionSettings, Credentials, Session};
pub use identity::{IdentityApi, IdentityResolver};
pub use model::{TrainingUnit, UnitRow};

/// Error type for trainsync operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `Auth` | Token endpoint rejects the credentials or returns no token |
/// | `ApiRequest` | Transport failure or non-2xx status from either API |
/// | `InvalidInput` | Missing required CSV columns, malformed CLI input |
/// | `OperationFailed` | File I/O or CSV read/write errors |
/// | `OwnerNotFound` | Import row whose owner username cannot be resolved |
/// | `UnitNotCreated` | Creation response carries no training unit id |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Authentication against the token endpoint failed.
    ///
    /// Fatal to the whole run; nothing is retried.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// A request to one of the two APIs failed.
    ///
    /// Covers transport errors, non-2xx statuses, and undecodable response
    /// bodies. The cause carries the status and body text where available;
    /// callers never branch on the cause, only on the skip/fail policy of
    /// the pipeline they run in.
    #[error("request to '{endpoint}' failed: {cause}")]
    ApiRequest {
        /// The endpoint path that was requested.
        endpoint: String,
        /// The underlying cause, including status where known.
        cause: String,
    },

    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - Required CSV columns are missing before import starts
    /// - An interactive prompt receives an unusable answer
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when filesystem I/O or CSV serialization fails.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// An import row names an owner that the identity API cannot resolve.
    ///
    /// Owner is mandatory; this fails the row before any creation call.
    #[error("owner not found: {0}")]
    OwnerNotFound(String),

    /// The creation endpoint answered without a training unit id.
    #[error("unit was not created: {0}")]
    UnitNotCreated(String),
}

/// Result type alias for trainsync operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Auth("invalid credentials".to_string());
        assert_eq!(
            err.to_string(),
            "authentication failed: invalid credentials"
        );

        let err = Error::ApiRequest {
            endpoint: "Training/Register/ListPage".to_string(),
            cause: "status 500".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "request to 'Training/Register/ListPage' failed: status 500"
        );

        let err = Error::OwnerNotFound("jane.doe".to_string());
        assert_eq!(err.to_string(), "owner not found: jane.doe");
    }
}
