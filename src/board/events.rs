use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::api::ApiError;
use crate::workflows::{CardId, TransitionError};

/// Interaction events bubbling up from cards and columns to the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    /// A card was picked up
    DragStarted { card_id: CardId },
    /// A card was released over a column. `target_label` is the column's
    /// status label as reported by the drop target.
    CardDropped {
        card_id: CardId,
        target_label: String,
        blocked_reason: Option<String>,
    },
    /// The drag ended outside any column
    DragCancelled,
}

/// One half of a combined card update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStep {
    Status,
    Assignee,
}

impl std::fmt::Display for UpdateStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateStep::Status => f.write_str("status"),
            UpdateStep::Assignee => f.write_str("assignee"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Card {card_id} is not on the board")]
    CardNotFound { card_id: CardId },
    #[error("Card {card_id} is still being updated, try again when it finishes")]
    CardBusy { card_id: CardId },
    #[error("Unknown drop target '{label}'")]
    UnknownTarget { label: String },
    #[error("Nothing to update for card {card_id}")]
    EmptyUpdate { card_id: CardId },
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
    #[error("Card {card_id}: {succeeded} was updated but {failed} failed: {error}")]
    PartialUpdate {
        card_id: CardId,
        succeeded: UpdateStep,
        failed: UpdateStep,
        error: Box<BoardError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Transient message shown to the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}
