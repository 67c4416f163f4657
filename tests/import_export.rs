//! End-to-end pipeline tests through in-memory API fakes.
//!
//! The export and import services are generic over the `TenantApi` and
//! `IdentityApi` seams; these tests drive full runs against recording fakes
//! and assert the exact remote calls each scenario issues.

#![allow(clippy::panic, clippy::too_many_lines)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

use trainsync::api::models::{
    CreateUnitRequest, ProcessRef, SaveScheduleRequest, ScheduleOutcome, TraineeRef, UnitDetail,
    UnitSummary,
};
use trainsync::api::tenant::TenantApi;
use trainsync::export::ExportService;
use trainsync::identity::{IdentityApi, IdentityResolver};
use trainsync::import::ImportService;
use trainsync::{Error, Result};

/// Everything the fake tenant records and serves.
#[derive(Default)]
struct TenantState {
    units: Vec<UnitSummary>,
    details: HashMap<String, UnitDetail>,
    trainees: HashMap<String, Vec<TraineeRef>>,
    processes: HashMap<String, ProcessRef>,
    created: Vec<CreateUnitRequest>,
    schedules: Vec<SaveScheduleRequest>,
    /// Titles the creation endpoint refuses with an id-less response.
    refuse_creation_for: Vec<String>,
    next_unit_id: i64,
}

#[derive(Clone)]
struct FakeTenant {
    state: Rc<RefCell<TenantState>>,
}

impl FakeTenant {
    fn new(state: TenantState) -> Self {
        Self {
            state: Rc::new(RefCell::new(TenantState {
                next_unit_id: 100,
                ..state
            })),
        }
    }

    fn call_count(&self) -> usize {
        let state = self.state.borrow();
        state.created.len() + state.schedules.len()
    }
}

impl TenantApi for FakeTenant {
    fn list_units(&self) -> Vec<UnitSummary> {
        self.state.borrow().units.clone()
    }

    fn unit_details(&self, unit_unique_id: &str) -> Result<UnitDetail> {
        self.state
            .borrow()
            .details
            .get(unit_unique_id)
            .cloned()
            .ok_or_else(|| Error::ApiRequest {
                endpoint: "Training/Unit/GetTrainingUnitDetails".to_string(),
                cause: "status 500".to_string(),
            })
    }

    fn unit_trainees(&self, unit_unique_id: &str) -> Vec<TraineeRef> {
        self.state
            .borrow()
            .trainees
            .get(unit_unique_id)
            .cloned()
            .unwrap_or_default()
    }

    fn process_detail(&self, process_unique_id: &str) -> Result<ProcessRef> {
        self.state
            .borrow()
            .processes
            .get(process_unique_id)
            .cloned()
            .ok_or_else(|| Error::ApiRequest {
                endpoint: format!("Api/v1/Processes/{process_unique_id}"),
                cause: "status 404".to_string(),
            })
    }

    fn create_unit(&self, request: &CreateUnitRequest) -> Result<i64> {
        let mut state = self.state.borrow_mut();
        if state.refuse_creation_for.contains(&request.title) {
            return Err(Error::UnitNotCreated(
                "response carried no training unit id".to_string(),
            ));
        }
        state.created.push(request.clone());
        state.next_unit_id += 1;
        Ok(state.next_unit_id)
    }

    fn save_schedule(&self, request: &SaveScheduleRequest) -> Result<ScheduleOutcome> {
        self.state.borrow_mut().schedules.push(request.clone());
        Ok(ScheduleOutcome::Confirmed)
    }
}

#[derive(Clone, Default)]
struct FakeIdentity {
    users: HashMap<i64, String>,
}

impl FakeIdentity {
    fn with_users(users: &[(i64, &str)]) -> Self {
        Self {
            users: users
                .iter()
                .map(|(id, name)| (*id, (*name).to_string()))
                .collect(),
        }
    }
}

impl IdentityApi for FakeIdentity {
    fn username_by_id(&self, id: i64) -> Result<Option<String>> {
        Ok(self.users.get(&id).cloned())
    }

    fn id_by_username(&self, username: &str) -> Result<Option<i64>> {
        Ok(self
            .users
            .iter()
            .find(|(_, name)| name.as_str() == username)
            .map(|(id, _)| *id))
    }
}

fn write_csv(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const CSV_HEADER: &str = "Title,Description,Type,Assessment Label,Renew Cycle,Provider,\
Owner Username,Linked Processes: uniqueId,Linked Documents: Titles,Trainees: Usernames\n";

#[test]
fn import_end_to_end_counts_and_calls() {
    // Row 1: fully valid, two resolvable trainees -> 1 creation + 1 schedule
    // call with both user ids. Row 2: unresolvable owner -> no calls, failed.
    let csv = format!(
        "{CSV_HEADER}\
Fire Safety,Annual drill,Course,Self Sign Off,12,Internal,owner.user,proc-1,Fire Plan,alice;bob\n\
Broken Row,No owner,Course,None,0,Internal,ghost.user,,,\n"
    );
    let file = write_csv(&csv);

    let tenant = FakeTenant::new(TenantState {
        processes: [(
            "proc-1".to_string(),
            ProcessRef {
                id: 31,
                name: "Evacuation".to_string(),
            },
        )]
        .into_iter()
        .collect(),
        ..TenantState::default()
    });
    let identity = FakeIdentity::with_users(&[(4, "owner.user"), (7, "alice"), (8, "bob")]);

    let mut service = ImportService::new(tenant.clone(), IdentityResolver::new(identity));
    let result = service.run(file.path()).unwrap();

    assert_eq!(result.total, 2);
    assert_eq!(result.succeeded, 1);
    assert_eq!(result.failed(), 1);
    assert_eq!(result.trainees_assigned, 2);

    let state = tenant.state.borrow();
    assert_eq!(state.created.len(), 1);
    let created = &state.created[0];
    assert_eq!(created.title, "Fire Safety");
    assert_eq!(created.owner.id, 4);
    assert_eq!(created.type_code, 1);
    assert_eq!(created.linked_processes.len(), 1);
    assert_eq!(created.linked_processes[0].id, 31);
    assert_eq!(created.linked_documents.len(), 1);

    assert_eq!(state.schedules.len(), 1);
    let schedule = &state.schedules[0];
    assert_eq!(schedule.supervisor_id, 4);
    let user_ids: Vec<i64> = schedule.schedule_trainees.iter().map(|t| t.user_id).collect();
    assert_eq!(user_ids, vec![7, 8]);

    let failure = &result.failures[0];
    assert_eq!(failure.row_number, 2);
    assert_eq!(failure.title, "Broken Row");
    assert!(failure.error.contains("owner not found"));
    assert!(failure.error.contains("ghost.user"));
}

#[test]
fn import_aborts_on_missing_required_column_without_api_calls() {
    // "Owner Username" is absent.
    let csv = "Title,Description,Type,Assessment Label,Renew Cycle,Provider,\
Linked Processes: uniqueId,Linked Documents: Titles\n\
Fire Safety,Annual drill,Course,None,12,Internal,,\n";
    let file = write_csv(csv);

    let tenant = FakeTenant::new(TenantState::default());
    let mut service =
        ImportService::new(tenant.clone(), IdentityResolver::new(FakeIdentity::default()));

    let err = service.run(file.path()).unwrap_err();
    assert!(err.to_string().contains("Owner Username"));
    assert_eq!(tenant.call_count(), 0);
}

#[test]
fn import_missing_file_is_fatal() {
    let tenant = FakeTenant::new(TenantState::default());
    let mut service = ImportService::new(tenant, IdentityResolver::new(FakeIdentity::default()));
    let err = service
        .run(std::path::Path::new("/nonexistent/units.csv"))
        .unwrap_err();
    assert!(err.to_string().contains("open_import_file"));
}

#[test]
fn import_blank_owner_fails_row_before_creation() {
    let csv = format!("{CSV_HEADER}No Owner,desc,Course,None,0,Internal,,,,\n");
    let file = write_csv(&csv);

    let tenant = FakeTenant::new(TenantState::default());
    let identity = FakeIdentity::with_users(&[(4, "owner.user")]);
    let mut service = ImportService::new(tenant.clone(), IdentityResolver::new(identity));

    let result = service.run(file.path()).unwrap();
    assert_eq!(result.total, 1);
    assert_eq!(result.succeeded, 0);
    assert_eq!(result.failed(), 1);
    assert!(result.failures[0].error.contains("owner not found"));
    assert_eq!(tenant.call_count(), 0);
}

#[test]
fn import_failed_process_lookup_omits_process_but_creates_unit() {
    let csv = format!(
        "{CSV_HEADER}Induction,desc,Document,None,0,Internal,owner.user,proc-ok;proc-missing,,\n"
    );
    let file = write_csv(&csv);

    let tenant = FakeTenant::new(TenantState {
        processes: [(
            "proc-ok".to_string(),
            ProcessRef {
                id: 5,
                name: "Onboarding".to_string(),
            },
        )]
        .into_iter()
        .collect(),
        ..TenantState::default()
    });
    let identity = FakeIdentity::with_users(&[(4, "owner.user")]);
    let mut service = ImportService::new(tenant.clone(), IdentityResolver::new(identity));

    let result = service.run(file.path()).unwrap();
    assert_eq!(result.succeeded, 1);

    let state = tenant.state.borrow();
    assert_eq!(state.created.len(), 1);
    // Only the resolvable process made it into the payload.
    assert_eq!(state.created[0].linked_processes.len(), 1);
    assert_eq!(state.created[0].linked_processes[0].title, "Onboarding");
}

#[test]
fn import_creation_refusal_fails_row_and_skips_assignment() {
    let csv = format!(
        "{CSV_HEADER}Refused,desc,Course,None,0,Internal,owner.user,,,alice\n"
    );
    let file = write_csv(&csv);

    let tenant = FakeTenant::new(TenantState {
        refuse_creation_for: vec!["Refused".to_string()],
        ..TenantState::default()
    });
    let identity = FakeIdentity::with_users(&[(4, "owner.user"), (7, "alice")]);
    let mut service = ImportService::new(tenant.clone(), IdentityResolver::new(identity));

    let result = service.run(file.path()).unwrap();
    assert_eq!(result.succeeded, 0);
    assert_eq!(result.failed(), 1);
    assert!(result.failures[0].error.contains("not created"));
    assert!(tenant.state.borrow().schedules.is_empty());
}

#[test]
fn import_unresolved_trainee_is_omitted_from_schedule() {
    let csv = format!(
        "{CSV_HEADER}Mixed,desc,Course,None,0,Internal,owner.user,,,alice;ghost\n"
    );
    let file = write_csv(&csv);

    let tenant = FakeTenant::new(TenantState::default());
    let identity = FakeIdentity::with_users(&[(4, "owner.user"), (7, "alice")]);
    let mut service = ImportService::new(tenant.clone(), IdentityResolver::new(identity));

    let result = service.run(file.path()).unwrap();
    assert_eq!(result.succeeded, 1);
    assert_eq!(result.trainees_assigned, 1);

    let state = tenant.state.borrow();
    assert_eq!(state.schedules.len(), 1);
    assert_eq!(state.schedules[0].schedule_trainees.len(), 1);
    assert_eq!(state.schedules[0].schedule_trainees[0].user_id, 7);
}

#[test]
fn import_accepts_integer_enum_values() {
    let csv = format!(
        "{CSV_HEADER}Numeric,desc,6,2,24,External,owner.user,,,\n"
    );
    let file = write_csv(&csv);

    let tenant = FakeTenant::new(TenantState::default());
    let identity = FakeIdentity::with_users(&[(4, "owner.user")]);
    let mut service = ImportService::new(tenant.clone(), IdentityResolver::new(identity));

    let result = service.run(file.path()).unwrap();
    assert_eq!(result.succeeded, 1);

    let state = tenant.state.borrow();
    assert_eq!(state.created[0].type_code, 6);
    assert_eq!(state.created[0].assessment_method, 2);
    assert_eq!(state.created[0].renew_cycle, 24);
}

#[test]
fn export_then_reimport_round_trip() {
    // Export a populated register, then feed the produced file straight back
    // into the import pipeline.
    let detail = UnitDetail {
        title: "Fire Safety".to_string(),
        description: "Annual drill".to_string(),
        type_code: 1,
        assessment_method: 1,
        renew_cycle: 12,
        provider: "Internal".to_string(),
        owner_id: Some(4),
        ..UnitDetail::default()
    };
    let export_tenant = FakeTenant::new(TenantState {
        units: vec![UnitSummary {
            id: Some(1),
            unique_id: "u-1".to_string(),
            title: "Fire Safety".to_string(),
        }],
        details: [("u-1".to_string(), detail)].into_iter().collect(),
        trainees: [(
            "u-1".to_string(),
            vec![TraineeRef {
                user_id: 7,
                user_full_name: "Alice".to_string(),
            }],
        )]
        .into_iter()
        .collect(),
        ..TenantState::default()
    });
    let identity = FakeIdentity::with_users(&[(4, "owner.user"), (7, "alice")]);

    let dir = tempfile::TempDir::new().unwrap();
    let mut export = ExportService::new(export_tenant, IdentityResolver::new(identity.clone()));
    let exported = export.run(dir.path()).unwrap();
    assert_eq!(exported.exported, 1);

    let import_tenant = FakeTenant::new(TenantState::default());
    let mut import =
        ImportService::new(import_tenant.clone(), IdentityResolver::new(identity));
    let result = import.run(&exported.output_path.unwrap()).unwrap();

    assert_eq!(result.total, 1);
    assert_eq!(result.succeeded, 1);
    assert_eq!(result.trainees_assigned, 1);

    let state = import_tenant.state.borrow();
    assert_eq!(state.created[0].title, "Fire Safety");
    assert_eq!(state.created[0].assessment_method, 1);
    assert_eq!(state.created[0].owner.id, 4);
    assert_eq!(state.schedules[0].schedule_trainees[0].user_id, 7);
}
