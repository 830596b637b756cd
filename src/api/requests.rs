use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::priority::Priority;
use crate::workflows::{CardStatus, SampleRequestId, WorkflowStatus};

/// Board filters, sent to the API as query parameters.
/// Text search is evaluated server-side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<WorkflowStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl WorkflowFilter {
    pub fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }

    /// Non-empty filters as `(name, value)` pairs
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(assignee) = non_blank(&self.assignee) {
            pairs.push(("assignee", assignee.to_string()));
        }
        if let Some(priority) = self.priority {
            pairs.push(("priority", priority.as_str().to_string()));
        }
        if let Some(search) = non_blank(&self.search) {
            pairs.push(("search", search.to_string()));
        }
        pairs
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Request body for creating a workflow.
/// Only `sample_request_id` and `workflow_name` are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateWorkflowRequest {
    pub sample_request_id: SampleRequestId,
    pub workflow_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_designer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_programmer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_supervisor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_machine_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
}

impl CreateWorkflowRequest {
    pub fn new(sample_request_id: SampleRequestId, workflow_name: impl Into<String>) -> Self {
        Self {
            sample_request_id,
            workflow_name: workflow_name.into(),
            assigned_designer: None,
            assigned_programmer: None,
            assigned_supervisor: None,
            required_machine_id: None,
            delivery_date: None,
            priority: Priority::default(),
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// Body of the card status endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: CardStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_reason: Option<String>,
}

impl StatusUpdate {
    pub fn new(status: CardStatus) -> Self {
        Self {
            status,
            blocked_reason: None,
        }
    }

    /// Reason is only meaningful when blocking; blank reasons are dropped.
    pub fn with_blocked_reason(mut self, reason: Option<String>) -> Self {
        let blocking = self.status == CardStatus::Blocked;
        self.blocked_reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| blocking && !r.is_empty());
        self
    }
}

/// Body of the card assignee endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssigneeUpdate {
    pub assigned_to: String,
}
