//! The tenant API surface used by the pipelines.
//!
//! [`TenantApi`] is the seam between the pipelines and HTTP: the export and
//! import services are generic over it, which is also how they are tested
//! with in-memory fakes.

use super::models::{
    CreateUnitRequest, CreateUnitResponse, ListPageResponse, ProcessDetailResponse, ProcessRef,
    SaveScheduleRequest, SaveScheduleResponse, ScheduleOutcome, TraineePageResponse, TraineeRef,
    UnitDetail, UnitDetailsResponse, UnitSummary,
};
use super::paging::{self, PAGE_SIZE};
use super::{ApiClient, ApiHost};
use crate::{Error, Result};

/// Operations of the tenant API.
pub trait TenantApi {
    /// Lists every unit of the training register, across all pages.
    ///
    /// Never errors; a failed page ends the walk with partial results.
    fn list_units(&self) -> Vec<UnitSummary>;

    /// Fetches the full detail record of one unit.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the response carries no
    /// unit; the export pipeline skips the unit in that case.
    fn unit_details(&self, unit_unique_id: &str) -> Result<UnitDetail>;

    /// Lists every trainee of one unit, across all pages.
    fn unit_trainees(&self, unit_unique_id: &str) -> Vec<TraineeRef>;

    /// Looks up a process definition by its unique identifier.
    ///
    /// # Errors
    ///
    /// Returns an error when the lookup fails; the import pipeline omits
    /// the process from the payload in that case.
    fn process_detail(&self, process_unique_id: &str) -> Result<ProcessRef>;

    /// Creates a training unit, returning the server-assigned id.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnitNotCreated` when the response carries no unit id,
    /// or `Error::ApiRequest` when the call itself fails.
    fn create_unit(&self, request: &CreateUnitRequest) -> Result<i64>;

    /// Assigns trainees to a created unit through the schedule endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error when the call fails; a [`ScheduleOutcome::Refused`]
    /// answer is not an error, callers decide what it means.
    fn save_schedule(&self, request: &SaveScheduleRequest) -> Result<ScheduleOutcome>;
}

/// HTTP-backed implementation of [`TenantApi`].
#[derive(Clone)]
pub struct HttpTenantApi {
    client: ApiClient,
}

impl HttpTenantApi {
    /// Wraps an authenticated client.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

impl TenantApi for HttpTenantApi {
    fn list_units(&self) -> Vec<UnitSummary> {
        let endpoint = "Training/Register/ListPage";
        paging::fetch_all::<ListPageResponse, _>(endpoint, |page| {
            self.client.get(
                ApiHost::Primary,
                endpoint,
                &[
                    ("page", page.to_string()),
                    ("pageSize", PAGE_SIZE.to_string()),
                    ("SearchCriteria", String::new()),
                    ("ListFilter", "0".to_string()),
                    ("TrainingDue", "0".to_string()),
                    ("StatusFilter", "0".to_string()),
                ],
            )
        })
    }

    fn unit_details(&self, unit_unique_id: &str) -> Result<UnitDetail> {
        let endpoint = "Training/Unit/GetTrainingUnitDetails";
        let response: UnitDetailsResponse = self.client.get(
            ApiHost::Primary,
            endpoint,
            &[("unitUniqueId", unit_unique_id.to_string())],
        )?;
        if response.success == Some(false) {
            return Err(Error::ApiRequest {
                endpoint: endpoint.to_string(),
                cause: "response reported failure".to_string(),
            });
        }
        response.training_unit.ok_or_else(|| Error::ApiRequest {
            endpoint: endpoint.to_string(),
            cause: "response carried no training unit".to_string(),
        })
    }

    fn unit_trainees(&self, unit_unique_id: &str) -> Vec<TraineeRef> {
        let endpoint = "Training/Trainee";
        paging::fetch_all::<TraineePageResponse, _>(endpoint, |page| {
            self.client.get(
                ApiHost::Primary,
                endpoint,
                &[
                    ("unitUniqueId", unit_unique_id.to_string()),
                    ("page", page.to_string()),
                    ("pageSize", PAGE_SIZE.to_string()),
                ],
            )
        })
    }

    fn process_detail(&self, process_unique_id: &str) -> Result<ProcessRef> {
        let endpoint = format!("Api/v1/Processes/{process_unique_id}");
        let response: ProcessDetailResponse =
            self.client.get(ApiHost::Primary, &endpoint, &[])?;
        response.process_json.ok_or_else(|| Error::ApiRequest {
            endpoint,
            cause: "response carried no process".to_string(),
        })
    }

    fn create_unit(&self, request: &CreateUnitRequest) -> Result<i64> {
        let response: CreateUnitResponse =
            self.client
                .post(ApiHost::Primary, "Training/Unit/EditTrainingUnit", request)?;
        response
            .training_unit
            .map(|unit| unit.id)
            .ok_or_else(|| Error::UnitNotCreated("response carried no training unit id".to_string()))
    }

    fn save_schedule(&self, request: &SaveScheduleRequest) -> Result<ScheduleOutcome> {
        let response: SaveScheduleResponse =
            self.client
                .post(ApiHost::Primary, "Training/Schedule/SaveSchedule", request)?;
        Ok(response.outcome())
    }
}
