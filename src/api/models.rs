//! Schema types for every tenant API endpoint.
//!
//! The wire format mixes casing (`trainingUnits` next to `HasNextPage`), so
//! every field carries an explicit rename. Optional fields are modeled as
//! `Option` or defaulted collections and validated at the boundary, never
//! assumed present.

use super::paging::PageResponse;
use serde::{Deserialize, Serialize};

/// Paging block shared by list-style responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Paging {
    /// Server-supplied flag indicating more pages remain.
    #[serde(rename = "HasNextPage", default)]
    pub has_next_page: Option<bool>,
}

/// One entry of the training register list.
#[derive(Debug, Clone, Deserialize)]
pub struct UnitSummary {
    /// Server-assigned numeric id.
    #[serde(rename = "Id", default)]
    pub id: Option<i64>,
    /// Stable external identifier used in URLs.
    #[serde(rename = "UniqueId", default)]
    pub unique_id: String,
    /// Unit title.
    #[serde(rename = "Title", default)]
    pub title: String,
}

/// Response of `Training/Register/ListPage`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPageResponse {
    /// Endpoint-level success flag.
    #[serde(default)]
    pub success: Option<bool>,
    /// Units on this page.
    #[serde(rename = "trainingUnits", default)]
    pub training_units: Vec<UnitSummary>,
    /// Paging block.
    #[serde(default)]
    pub paging: Option<Paging>,
}

impl PageResponse for ListPageResponse {
    type Item = UnitSummary;

    fn succeeded(&self) -> bool {
        self.success.unwrap_or(true)
    }

    fn has_next_page(&self) -> bool {
        self.paging
            .as_ref()
            .and_then(|p| p.has_next_page)
            .unwrap_or(false)
    }

    fn into_items(self) -> Vec<Self::Item> {
        self.training_units
    }
}

/// A linked process as embedded in the unit detail response.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkedProcessRef {
    /// Process title.
    #[serde(rename = "Title", default)]
    pub title: String,
    /// Process URL carrying the `uniqueId` query parameter.
    #[serde(rename = "Url", default)]
    pub url: String,
}

/// A linked document as embedded in the unit detail response.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkedDocumentRef {
    /// Document title.
    #[serde(rename = "Title", default)]
    pub title: String,
}

/// The full unit record from `Training/Unit/GetTrainingUnitDetails`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnitDetail {
    /// Unit title.
    #[serde(rename = "Title", default)]
    pub title: String,
    /// Unit description.
    #[serde(rename = "Description", default)]
    pub description: String,
    /// Type enum code.
    #[serde(rename = "Type", default)]
    pub type_code: i64,
    /// Assessment method enum code.
    #[serde(rename = "AssessmentMethod", default)]
    pub assessment_method: i64,
    /// Renewal cycle in months.
    #[serde(rename = "RenewCycle", default)]
    pub renew_cycle: i64,
    /// Training provider.
    #[serde(rename = "Provider", default)]
    pub provider: String,
    /// Owning user's numeric id.
    #[serde(rename = "OwnerId", default)]
    pub owner_id: Option<i64>,
    /// Linked processes.
    #[serde(rename = "LinkedProcesses", default)]
    pub linked_processes: Vec<LinkedProcessRef>,
    /// Linked documents.
    #[serde(rename = "LinkedDocuments", default)]
    pub linked_documents: Vec<LinkedDocumentRef>,
}

/// Response of `Training/Unit/GetTrainingUnitDetails`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnitDetailsResponse {
    /// Endpoint-level success flag.
    #[serde(default)]
    pub success: Option<bool>,
    /// The unit record, absent on failure.
    #[serde(rename = "trainingUnit", default)]
    pub training_unit: Option<UnitDetail>,
}

/// One trainee of a unit.
#[derive(Debug, Clone, Deserialize)]
pub struct TraineeRef {
    /// Numeric user id, resolved against the identity API.
    #[serde(rename = "UserId")]
    pub user_id: i64,
    /// Display name as stored in the tenant system.
    #[serde(rename = "UserFullName", default)]
    pub user_full_name: String,
}

/// Response of `Training/Trainee`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TraineePageResponse {
    /// Endpoint-level success flag.
    #[serde(default)]
    pub success: Option<bool>,
    /// Trainees on this page.
    #[serde(default)]
    pub trainees: Vec<TraineeRef>,
    /// Paging block.
    #[serde(default)]
    pub paging: Option<Paging>,
}

impl PageResponse for TraineePageResponse {
    type Item = TraineeRef;

    fn succeeded(&self) -> bool {
        self.success.unwrap_or(true)
    }

    fn has_next_page(&self) -> bool {
        self.paging
            .as_ref()
            .and_then(|p| p.has_next_page)
            .unwrap_or(false)
    }

    fn into_items(self) -> Vec<Self::Item> {
        self.trainees
    }
}

/// The process record from `Api/v1/Processes/{uniqueId}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessRef {
    /// Numeric process id.
    #[serde(rename = "Id")]
    pub id: i64,
    /// Process name.
    #[serde(rename = "Name", default)]
    pub name: String,
}

/// Response of `Api/v1/Processes/{uniqueId}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessDetailResponse {
    /// The process record, absent when the lookup failed.
    #[serde(rename = "processJson", default)]
    pub process_json: Option<ProcessRef>,
}

/// Owner block of the creation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerBlock {
    /// Numeric user id of the owner.
    #[serde(rename = "Id")]
    pub id: i64,
}

/// A linked process entry of the creation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedProcessPayload {
    /// Numeric process id from the process-detail lookup.
    #[serde(rename = "Id")]
    pub id: i64,
    /// Process title.
    #[serde(rename = "Title")]
    pub title: String,
}

/// A linked document entry of the creation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedDocumentPayload {
    /// Document title.
    #[serde(rename = "Title")]
    pub title: String,
}

/// Creation payload for `Training/Unit/EditTrainingUnit`.
///
/// The endpoint also mutates existing units when re-invoked with the same
/// identity; this tool only ever creates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateUnitRequest {
    /// Unit title.
    #[serde(rename = "Title")]
    pub title: String,
    /// Unit description.
    #[serde(rename = "Description")]
    pub description: String,
    /// Type enum code.
    #[serde(rename = "Type")]
    pub type_code: i64,
    /// Assessment method enum code.
    #[serde(rename = "AssessmentMethod")]
    pub assessment_method: i64,
    /// Renewal cycle in months.
    #[serde(rename = "RenewCycle")]
    pub renew_cycle: i64,
    /// Training provider.
    #[serde(rename = "Provider")]
    pub provider: String,
    /// Owner block; owner is mandatory on import.
    #[serde(rename = "Owner")]
    pub owner: OwnerBlock,
    /// Linked processes from successful lookups.
    #[serde(rename = "LinkedProcesses")]
    pub linked_processes: Vec<LinkedProcessPayload>,
    /// Linked document titles.
    #[serde(rename = "LinkedDocuments")]
    pub linked_documents: Vec<LinkedDocumentPayload>,
    /// Unused relation; the endpoint expects the array to exist.
    #[serde(rename = "LinkedUrls")]
    pub linked_urls: Vec<serde_json::Value>,
    /// Unused relation; trainees are assigned through the schedule endpoint.
    #[serde(rename = "Trainees")]
    pub trainees: Vec<serde_json::Value>,
}

/// The created unit reference in the creation response.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedUnit {
    /// Server-assigned numeric id of the created unit.
    #[serde(rename = "Id")]
    pub id: i64,
}

/// Response of `Training/Unit/EditTrainingUnit`.
///
/// Absence of `trainingUnit` is treated as a failed creation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUnitResponse {
    /// The created unit, absent on failure.
    #[serde(rename = "trainingUnit", default)]
    pub training_unit: Option<CreatedUnit>,
}

/// One trainee of the schedule-assignment payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleTrainee {
    /// Numeric user id.
    #[serde(rename = "UserId")]
    pub user_id: i64,
}

/// Payload for `Training/Schedule/SaveSchedule`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveScheduleRequest {
    /// Id of the unit the schedule belongs to.
    #[serde(rename = "TrainingUnitId")]
    pub training_unit_id: i64,
    /// Supervising user, the unit's owner.
    #[serde(rename = "SupervisorId")]
    pub supervisor_id: i64,
    /// Due date in `YYYY-MM-DD`.
    #[serde(rename = "DueDate")]
    pub due_date: String,
    /// Training provider.
    #[serde(rename = "Provider")]
    pub provider: String,
    /// Training location; always empty for CSV imports.
    #[serde(rename = "Location")]
    pub location: String,
    /// The trainees to assign.
    #[serde(rename = "ScheduleTraineesModel")]
    pub schedule_trainees: Vec<ScheduleTrainee>,
}

/// Response of `Training/Schedule/SaveSchedule`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveScheduleResponse {
    /// Success flag; its absence is treated as implicit success.
    #[serde(default)]
    pub success: Option<bool>,
}

impl SaveScheduleResponse {
    /// Maps the response onto the tri-state outcome.
    #[must_use]
    pub const fn outcome(&self) -> ScheduleOutcome {
        match self.success {
            Some(true) => ScheduleOutcome::Confirmed,
            Some(false) => ScheduleOutcome::Refused,
            None => ScheduleOutcome::AssumedOk,
        }
    }
}

/// Outcome of a schedule-assignment call.
///
/// The endpoint's contract is implicit: a missing `success` field means the
/// call went through. That ambiguity is kept visible as [`Self::AssumedOk`]
/// instead of being collapsed into a plain boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
    /// The response carried `success: true`.
    Confirmed,
    /// The response carried `success: false`.
    Refused,
    /// The response carried no `success` field; treated as success.
    AssumedOk,
}

impl ScheduleOutcome {
    /// Whether the assignment counts as successful.
    #[must_use]
    pub const fn is_success(self) -> bool {
        !matches!(self, Self::Refused)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_page_deserializes_mixed_casing() {
        let json = r#"{
            "success": true,
            "trainingUnits": [{"Id": 3, "UniqueId": "u-3", "Title": "Fire Safety"}],
            "paging": {"HasNextPage": true}
        }"#;
        let page: ListPageResponse = serde_json::from_str(json).unwrap();
        assert!(page.succeeded());
        assert!(page.has_next_page());
        let items = page.into_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].unique_id, "u-3");
    }

    #[test]
    fn test_missing_paging_means_no_next_page() {
        let page: ListPageResponse = serde_json::from_str(r#"{"trainingUnits": []}"#).unwrap();
        assert!(page.succeeded());
        assert!(!page.has_next_page());
    }

    #[test]
    fn test_unit_detail_defaults_optional_fields() {
        let json = r#"{"success": true, "trainingUnit": {"Title": "Induction"}}"#;
        let response: UnitDetailsResponse = serde_json::from_str(json).unwrap();
        let detail = response.training_unit.unwrap();
        assert_eq!(detail.title, "Induction");
        assert_eq!(detail.owner_id, None);
        assert!(detail.linked_processes.is_empty());
    }

    #[test]
    fn test_create_unit_payload_shape() {
        let request = CreateUnitRequest {
            title: "T".to_string(),
            description: String::new(),
            type_code: 1,
            assessment_method: 0,
            renew_cycle: 0,
            provider: String::new(),
            owner: OwnerBlock { id: 9 },
            linked_processes: vec![],
            linked_documents: vec![],
            linked_urls: vec![],
            trainees: vec![],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["Owner"]["Id"], 9);
        assert!(json["LinkedUrls"].as_array().unwrap().is_empty());
        assert!(json["Trainees"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_schedule_outcome_tri_state() {
        let confirmed: SaveScheduleResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert_eq!(confirmed.outcome(), ScheduleOutcome::Confirmed);

        let refused: SaveScheduleResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert_eq!(refused.outcome(), ScheduleOutcome::Refused);
        assert!(!refused.outcome().is_success());

        let ambiguous: SaveScheduleResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(ambiguous.outcome(), ScheduleOutcome::AssumedOk);
        assert!(ambiguous.outcome().is_success());
    }
}
