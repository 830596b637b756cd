// Workflow domain model and the card status state machine

pub mod transitions;
pub mod types;

pub use transitions::{validate_transition, TransitionError};
pub use types::{
    Attachment, Card, CardId, CardStatus, Comment, SampleRequestId, SampleRequestSummary,
    UnknownStatus, Workflow, WorkflowId, WorkflowStatus,
};
