//! Workflow API abstraction
//!
//! The board talks to the merchandising backend only through
//! [`WorkflowApi`], so tests can swap in fakes or mocks.

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::errors::ApiError;
use super::requests::{AssigneeUpdate, CreateWorkflowRequest, StatusUpdate, WorkflowFilter};
use crate::config::ApiConfig;
use crate::http::RateLimitedHttpClient;
use crate::observability::{ApiStats, BoardCall};
use crate::workflows::{CardId, Workflow, WorkflowId};

/// Remote operations the workflow board depends on
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait WorkflowApi: Send + Sync {
    /// List workflows matching the filter
    async fn list_workflows(&self, filter: &WorkflowFilter) -> Result<Vec<Workflow>, ApiError>;

    /// Fetch one workflow with its cards, comments and attachments
    async fn get_workflow(&self, workflow_id: WorkflowId) -> Result<Workflow, ApiError>;

    async fn create_workflow(&self, request: &CreateWorkflowRequest) -> Result<Workflow, ApiError>;

    async fn update_card_status(&self, card_id: CardId, update: &StatusUpdate) -> Result<(), ApiError>;

    async fn update_card_assignee(&self, card_id: CardId, update: &AssigneeUpdate) -> Result<(), ApiError>;
}

/// List endpoints may or may not be paginated
#[derive(Deserialize)]
#[serde(untagged)]
enum WorkflowList {
    Paginated { results: Vec<Workflow> },
    Bare(Vec<Workflow>),
}

impl WorkflowList {
    fn into_vec(self) -> Vec<Workflow> {
        match self {
            WorkflowList::Paginated { results } => results,
            WorkflowList::Bare(workflows) => workflows,
        }
    }
}

/// REST implementation of [`WorkflowApi`]
#[derive(Debug)]
pub struct HttpWorkflowClient {
    http: RateLimitedHttpClient,
}

impl HttpWorkflowClient {
    pub fn new(settings: &ApiConfig) -> Result<Self, ApiError> {
        Ok(Self {
            http: RateLimitedHttpClient::new(settings)?,
        })
    }

    pub fn stats(&self) -> ApiStats {
        self.http.stats()
    }

    pub fn log_stats(&self) {
        self.http.log_stats();
    }
}

#[async_trait]
impl WorkflowApi for HttpWorkflowClient {
    #[instrument(skip(self), level = "debug")]
    async fn list_workflows(&self, filter: &WorkflowFilter) -> Result<Vec<Workflow>, ApiError> {
        self.http.metrics().record_call(BoardCall::Reload);
        let list: WorkflowList = self.http.get_json("workflows/", &filter.query_pairs()).await?;
        let workflows = list.into_vec();
        debug!(count = workflows.len(), "Fetched workflows");
        Ok(workflows)
    }

    #[instrument(skip(self), level = "debug")]
    async fn get_workflow(&self, workflow_id: WorkflowId) -> Result<Workflow, ApiError> {
        self.http.metrics().record_call(BoardCall::Reload);
        self.http
            .get_json(&format!("workflows/{workflow_id}/"), &[])
            .await
    }

    #[instrument(skip(self, request), fields(sample_request_id = request.sample_request_id), level = "debug")]
    async fn create_workflow(&self, request: &CreateWorkflowRequest) -> Result<Workflow, ApiError> {
        self.http.metrics().record_call(BoardCall::WorkflowCreate);
        let body = self.http.send_json(Method::POST, "workflows/", request).await?;
        Ok(serde_json::from_value(body)?)
    }

    #[instrument(skip(self), level = "debug")]
    async fn update_card_status(&self, card_id: CardId, update: &StatusUpdate) -> Result<(), ApiError> {
        self.http.metrics().record_call(BoardCall::StatusUpdate);
        self.http
            .send_json(Method::PATCH, &format!("workflow-cards/{card_id}/status/"), update)
            .await?;
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    async fn update_card_assignee(&self, card_id: CardId, update: &AssigneeUpdate) -> Result<(), ApiError> {
        self.http.metrics().record_call(BoardCall::AssigneeUpdate);
        self.http
            .send_json(Method::PATCH, &format!("workflow-cards/{card_id}/assignee/"), update)
            .await?;
        Ok(())
    }
}
