//! Domain types and the flattened CSV representation.
//!
//! A training unit is a multi-entity graph on the wire (unit, linked
//! processes, linked documents, trainees, owner). The CSV side is a
//! denormalized single row per unit with multi-valued relations joined by a
//! semicolon. This module owns that mapping and the canonical column set.

use crate::codec::{ASSESSMENT_METHOD, UNIT_TYPE};
use once_cell::sync::Lazy;
use regex::Regex;

/// Separator for multi-valued CSV fields.
pub const MULTI_VALUE_SEPARATOR: char = ';';

/// Column headers of the exported CSV, in order.
pub const EXPORT_HEADERS: [&str; 11] = [
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
];

/// Columns that must be present for an import to start.
///
/// Absence of any of these aborts the whole import before the first row is
/// processed. `Trainees: Usernames` and `Linked Processes: Title` are
/// optional.
pub const REQUIRED_IMPORT_COLUMNS: [&str; 9] = [
    "Title",
    "Description",
    "Type",
    "Assessment Label",
    "Renew Cycle",
    "Provider",
    "Owner Username",
    "Linked Processes: uniqueId",
    "Linked Documents: Titles",
];

/// A linked process reference carried by a training unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedProcess {
    /// Title of the process.
    pub title: String,
    /// Stable unique identifier, when one could be extracted.
    pub unique_id: Option<String>,
}

/// A resolved user identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    /// Numeric id in the tenant system.
    pub id: i64,
    /// Display identifier (username or email) from the identity API.
    pub username: String,
}

/// A training unit with its relations resolved, ready to flatten.
///
/// Assembled by the export pipeline from the detail, trainee and identity
/// lookups; the CSV row is derived from this and nothing else.
#[derive(Debug, Clone, Default)]
pub struct TrainingUnit {
    /// Unit title.
    pub title: String,
    /// Unit description.
    pub description: String,
    /// Type enum code.
    pub type_code: i64,
    /// Assessment method enum code.
    pub assessment_code: i64,
    /// Renewal cycle in months.
    pub renew_cycle: i64,
    /// Training provider.
    pub provider: String,
    /// Owning user's numeric id, if any.
    pub owner_id: Option<i64>,
    /// Owning user's username, if the owner resolved.
    pub owner_username: Option<String>,
    /// Linked process references.
    pub linked_processes: Vec<LinkedProcess>,
    /// Linked document titles.
    pub linked_documents: Vec<String>,
    /// Usernames of the unit's trainees that resolved.
    pub trainee_usernames: Vec<String>,
}

/// One flattened CSV row, column for column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitRow {
    /// `Title` column.
    pub title: String,
    /// `Description` column.
    pub description: String,
    /// `Type` column, rendered as a label.
    pub type_label: String,
    /// `Assessment Label` column.
    pub assessment_label: String,
    /// `Renew Cycle` column.
    pub renew_cycle: String,
    /// `Provider` column.
    pub provider: String,
    /// `Owner Username` column.
    pub owner_username: String,
    /// `Linked Processes: Title` column, semicolon-joined.
    pub linked_process_titles: String,
    /// `Linked Processes: uniqueId` column, semicolon-joined.
    pub linked_process_ids: String,
    /// `Linked Documents: Titles` column, semicolon-joined.
    pub linked_document_titles: String,
    /// `Trainees: Usernames` column, semicolon-joined.
    pub trainee_usernames: String,
}

impl UnitRow {
    /// Flattens a resolved unit into a row.
    ///
    /// Process titles and unique ids are joined independently; a process
    /// without an extractable id contributes a title but no id, so the two
    /// columns can have different lengths.
    #[must_use]
    pub fn from_unit(unit: &TrainingUnit) -> Self {
        Self {
            title: unit.title.clone(),
            description: unit.description.clone(),
            type_label: UNIT_TYPE.label_of(unit.type_code),
            assessment_label: ASSESSMENT_METHOD.label_of(unit.assessment_code),
            renew_cycle: unit.renew_cycle.to_string(),
            provider: unit.provider.clone(),
            owner_username: unit.owner_username.clone().unwrap_or_default(),
            linked_process_titles: join_multi(unit.linked_processes.iter().map(|p| p.title.as_str())),
            linked_process_ids: join_multi(
                unit.linked_processes
                    .iter()
                    .filter_map(|p| p.unique_id.as_deref()),
            ),
            linked_document_titles: join_multi(unit.linked_documents.iter().map(String::as_str)),
            trainee_usernames: join_multi(unit.trainee_usernames.iter().map(String::as_str)),
        }
    }

    /// The row as an ordered record matching [`EXPORT_HEADERS`].
    #[must_use]
    pub fn as_record(&self) -> [&str; 11] {
        [
            &self.title,
            &self.description,
            &self.type_label,
            &self.assessment_label,
            &self.renew_cycle,
            &self.provider,
            &self.owner_username,
            &self.linked_process_titles,
            &self.linked_process_ids,
            &self.linked_document_titles,
            &self.trainee_usernames,
        ]
    }
}

/// Joins values with the multi-value separator.
pub fn join_multi<'a>(values: impl Iterator<Item = &'a str>) -> String {
    values.collect::<Vec<_>>().join(&MULTI_VALUE_SEPARATOR.to_string())
}

/// Splits a multi-valued field, trimming entries and dropping empties.
#[must_use]
pub fn split_multi(value: &str) -> Vec<String> {
    value
        .split(MULTI_VALUE_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

static UNIQUE_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[?&]uniqueId=([^&#\s]+)").expect("valid regex"));

/// Extracts the `uniqueId` query parameter from an embedded process URL.
///
/// Returns `None` when the URL carries no such parameter; the caller keeps
/// the process title and drops the id.
#[must_use]
pub fn extract_unique_id(url: &str) -> Option<String> {
    UNIQUE_ID_RE
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_and_split_round_trip() {
        let joined = join_multi(["a", "b", "c"].into_iter());
        assert_eq!(joined, "a;b;c");
        assert_eq!(split_multi(&joined), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_trims_and_drops_empties() {
        assert_eq!(split_multi(" a ; ;b; "), vec!["a", "b"]);
        assert!(split_multi("").is_empty());
        assert!(split_multi(" ; ; ").is_empty());
    }

    #[test]
    fn test_extract_unique_id() {
        assert_eq!(
            extract_unique_id("https://app.example.com/acme/Process/View?uniqueId=abc-123"),
            Some("abc-123".to_string())
        );
        assert_eq!(
            extract_unique_id("https://app.example.com/p?page=2&uniqueId=xyz&tab=1"),
            Some("xyz".to_string())
        );
        assert_eq!(extract_unique_id("https://app.example.com/p?id=9"), None);
        assert_eq!(extract_unique_id(""), None);
    }

    #[test]
    fn test_flatten_unit() {
        let unit = TrainingUnit {
            title: "Fire Safety".to_string(),
            description: "Annual fire safety training".to_string(),
            type_code: 6,
            assessment_code: 2,
            renew_cycle: 12,
            provider: "Internal".to_string(),
            owner_id: Some(4),
            owner_username: Some("safety.lead".to_string()),
            linked_processes: vec![
                LinkedProcess {
                    title: "Evacuation".to_string(),
                    unique_id: Some("ev-1".to_string()),
                },
                LinkedProcess {
                    title: "First Aid".to_string(),
                    unique_id: None,
                },
            ],
            linked_documents: vec!["Fire Plan".to_string()],
            trainee_usernames: vec!["a.one".to_string(), "b.two".to_string()],
        };

        let row = UnitRow::from_unit(&unit);
        assert_eq!(row.type_label, "Face to Face");
        assert_eq!(row.assessment_label, "Supervisor Sign Off");
        assert_eq!(row.renew_cycle, "12");
        assert_eq!(row.owner_username, "safety.lead");
        // Titles and ids join independently; lengths can differ.
        assert_eq!(row.linked_process_titles, "Evacuation;First Aid");
        assert_eq!(row.linked_process_ids, "ev-1");
        assert_eq!(row.trainee_usernames, "a.one;b.two");
    }

    #[test]
    fn test_row_record_matches_headers() {
        let row = UnitRow::from_unit(&TrainingUnit::default());
        assert_eq!(row.as_record().len(), EXPORT_HEADERS.len());
    }
}
