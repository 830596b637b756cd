//! Workflow REST API collaborator
//!
//! Typed requests, errors, and the [`WorkflowApi`] seam the board is
//! written against.

pub mod client;
pub mod errors;
pub mod requests;

pub use client::{HttpWorkflowClient, WorkflowApi};
#[cfg(any(test, feature = "testing"))]
pub use client::MockWorkflowApi;
pub use errors::ApiError;
pub use requests::{AssigneeUpdate, CreateWorkflowRequest, StatusUpdate, WorkflowFilter};
