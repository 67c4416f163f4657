//! Import pipeline: CSV → created training units.
//!
//! Reads a CSV, validates the required column set up front, and processes
//! rows one at a time inside a per-row error boundary: a failed row is
//! recorded and the batch continues. A unit's creation and its trainee
//! assignment are two separate remote calls; a failed assignment after a
//! successful creation is reported but does not fail the row and nothing is
//! rolled back.

use crate::api::models::{
    CreateUnitRequest, LinkedDocumentPayload, LinkedProcessPayload, OwnerBlock,
    SaveScheduleRequest, ScheduleOutcome, ScheduleTrainee,
};
use crate::api::tenant::TenantApi;
use crate::codec::{ASSESSMENT_METHOD, UNIT_TYPE};
use crate::identity::{IdentityApi, IdentityResolver};
use crate::model::{REQUIRED_IMPORT_COLUMNS, split_multi};
use crate::{Error, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// A row that failed, with enough context for the summary table.
#[derive(Debug, Clone)]
pub struct RowFailure {
    /// 1-based data row number (the header row does not count).
    pub row_number: usize,
    /// The row's `Title` value, possibly blank.
    pub title: String,
    /// The error that failed the row.
    pub error: String,
}

/// Result of an import run.
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    /// Rows processed.
    pub total: usize,
    /// Rows whose unit was created.
    pub succeeded: usize,
    /// Trainees assigned across all rows.
    pub trainees_assigned: usize,
    /// Rows that failed, in input order.
    pub failures: Vec<RowFailure>,
}

impl ImportResult {
    /// Number of failed rows.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Column indices of the canonical import schema.
#[derive(Debug)]
struct ColumnMap {
    title: usize,
    description: usize,
    type_label: usize,
    assessment_label: usize,
    renew_cycle: usize,
    provider: usize,
    owner_username: usize,
    process_unique_ids: usize,
    document_titles: usize,
    /// Optional; import without trainee assignment is valid.
    trainee_usernames: Option<usize>,
}

impl ColumnMap {
    /// Builds the map from the header record.
    ///
    /// Every missing required column is named in the error; nothing is
    /// processed when any is absent.
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);

        let missing: Vec<&str> = REQUIRED_IMPORT_COLUMNS
            .iter()
            .filter(|name| find(name).is_none())
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(Error::InvalidInput(format!(
                "missing required columns: {}",
                missing.join(", ")
            )));
        }

        // The filter above guarantees every required lookup succeeds.
        let required = |name: &str| find(name).unwrap_or_default();
        Ok(Self {
            title: required("Title"),
            description: required("Description"),
            type_label: required("Type"),
            assessment_label: required("Assessment Label"),
            renew_cycle: required("Renew Cycle"),
            provider: required("Provider"),
            owner_username: required("Owner Username"),
            process_unique_ids: required("Linked Processes: uniqueId"),
            document_titles: required("Linked Documents: Titles"),
            trainee_usernames: find("Trainees: Usernames"),
        })
    }

    fn get<'a>(record: &'a csv::StringRecord, index: usize) -> &'a str {
        record.get(index).unwrap_or_default().trim()
    }
}

/// Service running the import pipeline.
pub struct ImportService<T: TenantApi, I: IdentityApi> {
    tenant: T,
    resolver: IdentityResolver<I>,
}

impl<T: TenantApi, I: IdentityApi> ImportService<T, I> {
    /// Creates the service.
    #[must_use]
    pub fn new(tenant: T, resolver: IdentityResolver<I>) -> Self {
        Self { tenant, resolver }
    }

    /// Runs the import over the given CSV file.
    ///
    /// # Errors
    ///
    /// Fatal errors (file missing, unparseable CSV, missing required
    /// columns) abort the run before any row is processed. Row-level errors
    /// are recorded in the result and never abort the batch.
    pub fn run(&mut self, path: &Path) -> Result<ImportResult> {
        let file = File::open(path).map_err(|e| Error::OperationFailed {
            operation: "open_import_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(BufReader::new(file));

        let headers = reader
            .headers()
            .map_err(|e| Error::OperationFailed {
                operation: "read_csv_headers".to_string(),
                cause: e.to_string(),
            })?
            .clone();
        let columns = ColumnMap::from_headers(&headers)?;

        let mut result = ImportResult::default();
        for (index, record) in reader.records().enumerate() {
            let row_number = index + 1;
            let record = record.map_err(|e| Error::OperationFailed {
                operation: "read_csv".to_string(),
                cause: e.to_string(),
            })?;
            let title = ColumnMap::get(&record, columns.title).to_string();
            result.total += 1;

            match self.process_row(&columns, &record) {
                Ok(assigned) => {
                    result.succeeded += 1;
                    result.trainees_assigned += assigned;
                },
                Err(e) => {
                    tracing::error!(row = row_number, title = %title, error = %e, "row failed");
                    result.failures.push(RowFailure {
                        row_number,
                        title,
                        error: e.to_string(),
                    });
                },
            }
        }
        Ok(result)
    }

    /// Creates one unit from a row, returning the trainee count assigned.
    fn process_row(&mut self, columns: &ColumnMap, record: &csv::StringRecord) -> Result<usize> {
        let mut linked_processes = Vec::new();
        for unique_id in split_multi(ColumnMap::get(record, columns.process_unique_ids)) {
            match self.tenant.process_detail(&unique_id) {
                Ok(process) => linked_processes.push(LinkedProcessPayload {
                    id: process.id,
                    title: process.name,
                }),
                Err(e) => tracing::warn!(
                    process = %unique_id,
                    error = %e,
                    "linked process lookup failed, omitting"
                ),
            }
        }

        let linked_documents = split_multi(ColumnMap::get(record, columns.document_titles))
            .into_iter()
            .map(|title| LinkedDocumentPayload { title })
            .collect();

        // Owner is mandatory; a blank column or failed lookup fails the row
        // before any creation call.
        let owner_username = ColumnMap::get(record, columns.owner_username);
        if owner_username.is_empty() {
            return Err(Error::OwnerNotFound("Owner Username is blank".to_string()));
        }
        let owner_id = self
            .resolver
            .id(owner_username)
            .ok_or_else(|| Error::OwnerNotFound(owner_username.to_string()))?;

        let renew_cycle_raw = ColumnMap::get(record, columns.renew_cycle);
        let renew_cycle = renew_cycle_raw.parse::<i64>().unwrap_or_else(|_| {
            if !renew_cycle_raw.is_empty() {
                tracing::warn!(value = renew_cycle_raw, "unparseable renew cycle, using 0");
            }
            0
        });

        let request = CreateUnitRequest {
            title: ColumnMap::get(record, columns.title).to_string(),
            description: ColumnMap::get(record, columns.description).to_string(),
            type_code: UNIT_TYPE.code_of(ColumnMap::get(record, columns.type_label)),
            assessment_method: ASSESSMENT_METHOD
                .code_of(ColumnMap::get(record, columns.assessment_label)),
            renew_cycle,
            provider: ColumnMap::get(record, columns.provider).to_string(),
            owner: OwnerBlock { id: owner_id },
            linked_processes,
            linked_documents,
            linked_urls: vec![],
            trainees: vec![],
        };

        let unit_id = self.tenant.create_unit(&request)?;
        tracing::info!(unit_id, title = %request.title, "created training unit");

        Ok(self.assign_trainees(columns, record, unit_id, owner_id, &request.provider))
    }

    /// Assigns the row's trainees to the created unit.
    ///
    /// Unresolved trainees are warned and omitted; any assignment failure
    /// is reported but leaves the created unit in place and the row counted
    /// as a success.
    fn assign_trainees(
        &mut self,
        columns: &ColumnMap,
        record: &csv::StringRecord,
        unit_id: i64,
        owner_id: i64,
        provider: &str,
    ) -> usize {
        let Some(trainee_column) = columns.trainee_usernames else {
            return 0;
        };

        let mut trainees = Vec::new();
        for username in split_multi(ColumnMap::get(record, trainee_column)) {
            match self.resolver.id(&username) {
                Some(id) => trainees.push(ScheduleTrainee { user_id: id }),
                None => tracing::warn!(trainee = %username, "trainee did not resolve, omitting"),
            }
        }
        if trainees.is_empty() {
            return 0;
        }

        let count = trainees.len();
        let request = SaveScheduleRequest {
            training_unit_id: unit_id,
            supervisor_id: owner_id,
            due_date: chrono::Local::now().date_naive().format("%Y-%m-%d").to_string(),
            provider: provider.to_string(),
            location: String::new(),
            schedule_trainees: trainees,
        };

        match self.tenant.save_schedule(&request) {
            Ok(ScheduleOutcome::Confirmed) => count,
            Ok(ScheduleOutcome::AssumedOk) => {
                tracing::debug!(unit_id, "schedule response carried no success flag, assuming success");
                count
            },
            Ok(ScheduleOutcome::Refused) => {
                tracing::warn!(unit_id, "trainee assignment refused, unit remains created");
                0
            },
            Err(e) => {
                tracing::warn!(unit_id, error = %e, "trainee assignment failed, unit remains created");
                0
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_map_accepts_canonical_headers() {
        let headers = csv::StringRecord::from(vec![
            "Title",
            "Description",
            "Type",
            "Assessment Label",
            "Renew Cycle",
            "Provider",
            "Owner Username",
            "Linked Processes: Title",
            "Linked Processes: uniqueId",
            "Linked Documents: Titles",
            "Trainees: Usernames",
        ]);
        let map = ColumnMap::from_headers(&headers).unwrap();
        assert_eq!(map.title, 0);
        assert_eq!(map.process_unique_ids, 8);
        assert_eq!(map.trainee_usernames, Some(10));
    }

    #[test]
    fn test_column_map_names_every_missing_column() {
        let headers = csv::StringRecord::from(vec!["Title", "Type", "Provider"]);
        let err = ColumnMap::from_headers(&headers).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Description"));
        assert!(message.contains("Owner Username"));
        assert!(message.contains("Linked Processes: uniqueId"));
        assert!(!message.contains("Trainees: Usernames"));
    }

    #[test]
    fn test_trainee_column_is_optional() {
        let headers = csv::StringRecord::from(
            REQUIRED_IMPORT_COLUMNS.to_vec(),
        );
        let map = ColumnMap::from_headers(&headers).unwrap();
        assert_eq!(map.trainee_usernames, None);
    }
}
