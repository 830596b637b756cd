// Sample Board Library - workflow kanban for garment sample development
// This exposes the core components for testing and integration

pub mod api;
pub mod board;
pub mod cli;
pub mod config;
pub mod http;
pub mod observability;
pub mod priority;
pub mod telemetry;
pub mod workflows;

// Re-export key types for easy access
pub use api::{ApiError, HttpWorkflowClient, WorkflowApi, WorkflowFilter};
pub use board::{BoardError, BoardEvent, BoardScope, BoardStore, CardUpdate, LaneView};
pub use config::{config, SampleBoardConfig};
pub use http::RateLimitedHttpClient;
pub use observability::{ApiMetrics, ApiStats, BoardCall};
pub use priority::Priority;
pub use telemetry::{create_board_span, generate_correlation_id, init_telemetry};
pub use workflows::{validate_transition, Card, CardStatus, TransitionError, Workflow, WorkflowStatus};
