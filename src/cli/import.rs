//! Import CLI command.
//!
//! # Usage
//!
//! ```bash
//! trainsync import TrainingUnits.csv
//! ```

#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]

use super::ConnectionOptions;
use crate::Result;
use crate::identity::IdentityResolver;
use crate::import::ImportService;
use std::path::Path;

/// Executes the import command.
///
/// # Errors
///
/// Returns an error when authentication fails or the CSV is missing,
/// unparseable, or lacks required columns. Row-level failures end up in the
/// summary instead.
pub fn execute(options: ConnectionOptions, file: &Path) -> Result<()> {
    let (tenant, identity) = super::connect(options)?;
    let mut service = ImportService::new(tenant, IdentityResolver::new(identity));

    println!("[info] importing training units from {}", file.display());
    let result = service.run(file)?;

    println!();
    println!("[info] import summary");
    println!("  total rows: {}", result.total);
    println!("  succeeded:  {}", result.succeeded);
    println!("  failed:     {}", result.failed());
    if result.trainees_assigned > 0 {
        println!("  trainees assigned: {}", result.trainees_assigned);
    }
    if !result.failures.is_empty() {
        println!();
        println!("[error] failed rows:");
        for failure in &result.failures {
            println!(
                "  row {} ('{}'): {}",
                failure.row_number, failure.title, failure.error
            );
        }
    }
    Ok(())
}
