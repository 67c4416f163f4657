//! Export pipeline: register → flattened CSV.
//!
//! Lists every training unit, hydrates each with its detail record, linked
//! processes, linked documents and trainees, resolves identities, and writes
//! one dated CSV file. A unit whose detail fetch fails is skipped with a
//! warning and produces no row; the batch always runs to completion.

use crate::api::models::{UnitDetail, UnitSummary};
use crate::api::tenant::TenantApi;
use crate::identity::{IdentityApi, IdentityResolver};
use crate::model::{EXPORT_HEADERS, LinkedProcess, TrainingUnit, UnitRow, extract_unique_id};
use crate::{Error, Result};
use chrono::NaiveDate;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Result of an export run.
#[derive(Debug, Clone, Default)]
pub struct ExportResult {
    /// Units returned by the register listing.
    pub listed: usize,
    /// Rows written to the CSV file.
    pub exported: usize,
    /// Units skipped because their detail fetch failed.
    pub skipped: usize,
    /// Path of the written file.
    pub output_path: Option<PathBuf>,
}

/// Service running the export pipeline.
pub struct ExportService<T: TenantApi, I: IdentityApi> {
    tenant: T,
    resolver: IdentityResolver<I>,
}

impl<T: TenantApi, I: IdentityApi> ExportService<T, I> {
    /// Creates the service.
    #[must_use]
    pub fn new(tenant: T, resolver: IdentityResolver<I>) -> Self {
        Self { tenant, resolver }
    }

    /// Runs the export, writing the dated CSV file into `output_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error only when the output file cannot be written; remote
    /// failures degrade to skipped units or partial listings.
    pub fn run(&mut self, output_dir: &Path) -> Result<ExportResult> {
        let summaries = self.tenant.list_units();
        let mut result = ExportResult {
            listed: summaries.len(),
            ..ExportResult::default()
        };
        tracing::info!(units = summaries.len(), "listed training register");

        let mut rows = Vec::new();
        for summary in &summaries {
            match self.tenant.unit_details(&summary.unique_id) {
                Ok(detail) => {
                    let unit = self.assemble(summary, detail);
                    rows.push(UnitRow::from_unit(&unit));
                    result.exported += 1;
                },
                Err(e) => {
                    tracing::warn!(
                        title = %summary.title,
                        unique_id = %summary.unique_id,
                        error = %e,
                        "detail fetch failed, skipping unit"
                    );
                    result.skipped += 1;
                },
            }
        }

        let path = output_dir.join(export_file_name(chrono::Local::now().date_naive()));
        write_rows(&path, &rows)?;
        tracing::info!(path = %path.display(), rows = rows.len(), "wrote export file");
        result.output_path = Some(path);
        Ok(result)
    }

    /// Builds the resolved unit graph for one register entry.
    fn assemble(&mut self, summary: &UnitSummary, detail: UnitDetail) -> TrainingUnit {
        let linked_processes = detail
            .linked_processes
            .iter()
            .map(|process| LinkedProcess {
                title: process.title.clone(),
                unique_id: extract_unique_id(&process.url),
            })
            .collect();

        let linked_documents = detail
            .linked_documents
            .iter()
            .map(|document| document.title.trim().to_string())
            .filter(|title| !title.is_empty())
            .collect();

        let mut trainee_usernames = Vec::new();
        for trainee in self.tenant.unit_trainees(&summary.unique_id) {
            match self.resolver.username(trainee.user_id) {
                Some(username) => trainee_usernames.push(username),
                None => tracing::warn!(
                    user_id = trainee.user_id,
                    full_name = %trainee.user_full_name,
                    "trainee did not resolve, omitting"
                ),
            }
        }

        let owner_username = detail.owner_id.and_then(|owner_id| {
            let resolved = self.resolver.username(owner_id);
            if resolved.is_none() {
                tracing::warn!(owner_id, "owner did not resolve, leaving column blank");
            }
            resolved
        });

        TrainingUnit {
            title: detail.title,
            description: detail.description,
            type_code: detail.type_code,
            assessment_code: detail.assessment_method,
            renew_cycle: detail.renew_cycle,
            provider: detail.provider,
            owner_id: detail.owner_id,
            owner_username,
            linked_processes,
            linked_documents,
            trainee_usernames,
        }
    }
}

/// File name of an export written on the given date.
#[must_use]
pub fn export_file_name(date: NaiveDate) -> String {
    format!("TrainingUnits_Export_{}.csv", date.format("%Y%m%d"))
}

fn write_rows(path: &Path, rows: &[UnitRow]) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::OperationFailed {
        operation: "create_export_file".to_string(),
        cause: e.to_string(),
    })?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::new(file));

    writer
        .write_record(EXPORT_HEADERS)
        .map_err(|e| Error::OperationFailed {
            operation: "write_csv_headers".to_string(),
            cause: e.to_string(),
        })?;
    for row in rows {
        writer
            .write_record(row.as_record())
            .map_err(|e| Error::OperationFailed {
                operation: "write_csv".to_string(),
                cause: e.to_string(),
            })?;
    }
    writer.flush().map_err(|e| Error::OperationFailed {
        operation: "flush_csv".to_string(),
        cause: e.to_string(),
    })
}
