// In-memory workflow API for board tests - records every call

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;

use crate::api::{
    ApiError, AssigneeUpdate, CreateWorkflowRequest, StatusUpdate, WorkflowApi, WorkflowFilter,
};
use crate::workflows::{CardId, CardStatus, Workflow, WorkflowId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    ListWorkflows(WorkflowFilter),
    GetWorkflow(WorkflowId),
    CreateWorkflow(CreateWorkflowRequest),
    UpdateCardStatus(CardId, StatusUpdate),
    UpdateCardAssignee(CardId, AssigneeUpdate),
}

impl ApiCall {
    pub fn is_reload(&self) -> bool {
        matches!(self, ApiCall::ListWorkflows(_) | ApiCall::GetWorkflow(_))
    }
}

/// Fake server holding workflows and applying updates the way the real
/// API does (including setting `completed_at`).
#[derive(Debug, Default)]
pub struct FakeWorkflowApi {
    workflows: Mutex<Vec<Workflow>>,
    calls: Mutex<Vec<ApiCall>>,
    fail_status: Mutex<Option<ApiError>>,
    fail_assignee: Mutex<Option<ApiError>>,
    fail_loads: Mutex<Option<ApiError>>,
}

impl FakeWorkflowApi {
    pub fn new(workflows: Vec<Workflow>) -> Self {
        Self {
            workflows: Mutex::new(workflows),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn fail_status_updates(&self, error: ApiError) {
        *self.fail_status.lock().unwrap() = Some(error);
    }

    pub fn fail_assignee_updates(&self, error: ApiError) {
        *self.fail_assignee.lock().unwrap() = Some(error);
    }

    pub fn fail_loads(&self, error: Option<ApiError>) {
        *self.fail_loads.lock().unwrap() = error;
    }

    /// Server-side mutation outside the board (another operator)
    pub fn set_card_status(&self, card_id: CardId, status: CardStatus) {
        let mut workflows = self.workflows.lock().unwrap();
        if let Some(card) = workflows
            .iter_mut()
            .flat_map(|w| w.cards.iter_mut())
            .find(|c| c.id == card_id)
        {
            card.status = status;
        }
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn load_error(&self) -> Option<ApiError> {
        self.fail_loads.lock().unwrap().clone()
    }
}

#[async_trait]
impl WorkflowApi for FakeWorkflowApi {
    async fn list_workflows(&self, filter: &WorkflowFilter) -> Result<Vec<Workflow>, ApiError> {
        self.record(ApiCall::ListWorkflows(filter.clone()));
        if let Some(err) = self.load_error() {
            return Err(err);
        }
        let workflows = self.workflows.lock().unwrap();
        Ok(workflows
            .iter()
            .filter(|w| filter.status.map_or(true, |s| w.workflow_status == s))
            .filter(|w| filter.priority.map_or(true, |p| w.priority == p))
            .cloned()
            .collect())
    }

    async fn get_workflow(&self, workflow_id: WorkflowId) -> Result<Workflow, ApiError> {
        self.record(ApiCall::GetWorkflow(workflow_id));
        if let Some(err) = self.load_error() {
            return Err(err);
        }
        self.workflows
            .lock()
            .unwrap()
            .iter()
            .find(|w| w.id == workflow_id)
            .cloned()
            .ok_or(ApiError::NotFound {
                resource: format!("workflow {workflow_id}"),
            })
    }

    async fn create_workflow(&self, request: &CreateWorkflowRequest) -> Result<Workflow, ApiError> {
        self.record(ApiCall::CreateWorkflow(request.clone()));
        let mut workflows = self.workflows.lock().unwrap();
        let id = workflows.iter().map(|w| w.id).max().unwrap_or(0) + 1;
        let mut workflow = fixtures::workflow(id, &[CardStatus::Pending; 5]);
        workflow.sample_request_id = request.sample_request_id;
        workflow.workflow_name = request.workflow_name.clone();
        workflow.priority = request.priority;
        workflows.push(workflow.clone());
        Ok(workflow)
    }

    async fn update_card_status(&self, card_id: CardId, update: &StatusUpdate) -> Result<(), ApiError> {
        self.record(ApiCall::UpdateCardStatus(card_id, update.clone()));
        if let Some(err) = self.fail_status.lock().unwrap().clone() {
            return Err(err);
        }
        let mut workflows = self.workflows.lock().unwrap();
        let card = workflows
            .iter_mut()
            .flat_map(|w| w.cards.iter_mut())
            .find(|c| c.id == card_id)
            .ok_or(ApiError::NotFound {
                resource: format!("card {card_id}"),
            })?;
        card.status = update.status;
        card.updated_at = Utc::now();
        card.completed_at = (update.status == CardStatus::Completed).then(Utc::now);
        card.blocked_reason = update.blocked_reason.clone();
        Ok(())
    }

    async fn update_card_assignee(&self, card_id: CardId, update: &AssigneeUpdate) -> Result<(), ApiError> {
        self.record(ApiCall::UpdateCardAssignee(card_id, update.clone()));
        if let Some(err) = self.fail_assignee.lock().unwrap().clone() {
            return Err(err);
        }
        let mut workflows = self.workflows.lock().unwrap();
        let card = workflows
            .iter_mut()
            .flat_map(|w| w.cards.iter_mut())
            .find(|c| c.id == card_id)
            .ok_or(ApiError::NotFound {
                resource: format!("card {card_id}"),
            })?;
        card.assigned_to = Some(update.assigned_to.clone());
        Ok(())
    }
}

pub mod fixtures {
    use chrono::{TimeZone, Utc};

    use crate::priority::Priority;
    use crate::workflows::{Card, CardStatus, Workflow, WorkflowId, WorkflowStatus};

    const STAGES: [&str; 5] = ["Design", "Knitting", "Linking", "Washing", "Finishing"];

    /// Workflow `id` with one card per status; card ids are `id * 100 + n`.
    pub fn workflow(id: WorkflowId, statuses: &[CardStatus]) -> Workflow {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let cards = statuses
            .iter()
            .enumerate()
            .map(|(index, status)| Card {
                id: id * 100 + index as i64 + 1,
                workflow_id: id,
                stage_name: STAGES[index % STAGES.len()].to_string(),
                stage_order: index as i32 + 1,
                title: format!("{} sample", STAGES[index % STAGES.len()]),
                description: None,
                assigned_to: None,
                status: *status,
                due_date: None,
                created_at: created,
                updated_at: created,
                completed_at: (*status == CardStatus::Completed).then_some(created),
                blocked_reason: None,
                comments: Vec::new(),
                attachments: Vec::new(),
            })
            .collect();

        Workflow {
            id,
            sample_request_id: id * 10,
            workflow_name: format!("SR-{} development", id * 10),
            workflow_status: WorkflowStatus::Active,
            priority: Priority::Medium,
            created_by: Some("merchandiser".to_string()),
            created_at: created,
            updated_at: created,
            completed_at: None,
            due_date: None,
            cards,
            sample_request: None,
        }
    }
}
