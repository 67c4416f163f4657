//! Export CLI command.
//!
//! # Usage
//!
//! ```bash
//! trainsync export
//! trainsync export --output-dir ./exports
//! ```

#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]

use super::ConnectionOptions;
use crate::Result;
use crate::export::ExportService;
use crate::identity::IdentityResolver;
use std::path::Path;

/// Executes the export command.
///
/// # Errors
///
/// Returns an error when authentication fails or the output file cannot be
/// written. Remote failures during the run degrade to skipped units.
pub fn execute(options: ConnectionOptions, output_dir: &Path) -> Result<()> {
    let (tenant, identity) = super::connect(options)?;
    let mut service = ExportService::new(tenant, IdentityResolver::new(identity));

    println!("[info] exporting training units to {}", output_dir.display());
    let result = service.run(output_dir)?;

    if result.skipped > 0 {
        println!(
            "[warn] skipped {} of {} units (detail fetch failed)",
            result.skipped, result.listed
        );
    }
    if let Some(path) = &result.output_path {
        println!(
            "[ok] exported {} of {} units to {}",
            result.exported,
            result.listed,
            path.display()
        );
    }
    Ok(())
}
