// Card status transition table
//
// pending     -> ready, blocked
// ready       -> in_progress, blocked
// in_progress -> completed, blocked
// blocked     -> ready, in_progress
// completed   -> (terminal)

use thiserror::Error;

use super::types::CardStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Card is already {status}")]
    SameStatus { status: CardStatus },
    #[error("Card is {from} and cannot be moved to {to}: completed cards are final")]
    Terminal { from: CardStatus, to: CardStatus },
    #[error("Invalid status transition from {from} to {to}")]
    NotAllowed { from: CardStatus, to: CardStatus },
}

impl CardStatus {
    /// Targets reachable from this status in a single move
    pub fn allowed_targets(self) -> &'static [CardStatus] {
        match self {
            CardStatus::Pending => &[CardStatus::Ready, CardStatus::Blocked],
            CardStatus::Ready => &[CardStatus::InProgress, CardStatus::Blocked],
            CardStatus::InProgress => &[CardStatus::Completed, CardStatus::Blocked],
            CardStatus::Blocked => &[CardStatus::Ready, CardStatus::InProgress],
            CardStatus::Completed => &[],
        }
    }

    pub fn can_transition_to(self, target: CardStatus) -> bool {
        self.allowed_targets().contains(&target)
    }

    pub fn is_terminal(self) -> bool {
        self.allowed_targets().is_empty()
    }
}

/// Checks a requested move against the transition table.
pub fn validate_transition(from: CardStatus, to: CardStatus) -> Result<(), TransitionError> {
    if from == to {
        return Err(TransitionError::SameStatus { status: from });
    }
    if from.is_terminal() {
        return Err(TransitionError::Terminal { from, to });
    }
    if !from.can_transition_to(to) {
        return Err(TransitionError::NotAllowed { from, to });
    }
    Ok(())
}
