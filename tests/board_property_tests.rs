// Property-based tests for card transitions and lane progress
// Checks board invariants over arbitrary statuses and card mixes

use proptest::prelude::*;
use sample_board::board::{progress_percent, LaneView};
use sample_board::workflows::{
    validate_transition, Card, CardStatus, TransitionError, Workflow, WorkflowStatus,
};
use sample_board::Priority;

fn status_strategy() -> impl Strategy<Value = CardStatus> {
    prop::sample::select(CardStatus::ALL.to_vec())
}

fn workflow_with(statuses: &[CardStatus]) -> Workflow {
    let now = chrono::Utc::now();
    Workflow {
        id: 1,
        sample_request_id: 10,
        workflow_name: "SR-10 jacquard scarf".to_string(),
        workflow_status: WorkflowStatus::Active,
        priority: Priority::Medium,
        created_by: None,
        created_at: now,
        updated_at: now,
        completed_at: None,
        due_date: None,
        cards: statuses
            .iter()
            .enumerate()
            .map(|(index, status)| Card {
                id: index as i64 + 1,
                workflow_id: 1,
                stage_name: format!("Stage {}", index + 1),
                stage_order: index as i32 + 1,
                title: format!("Stage {} sample", index + 1),
                description: None,
                assigned_to: None,
                status: *status,
                due_date: None,
                created_at: now,
                updated_at: now,
                completed_at: None,
                blocked_reason: None,
                comments: Vec::new(),
                attachments: Vec::new(),
            })
            .collect(),
        sample_request: None,
    }
}

proptest! {
    #[test]
    fn progress_matches_rounded_percentage(total in 1usize..500, completed_share in 0.0f64..=1.0) {
        let completed = ((total as f64) * completed_share).floor() as usize;
        let expected = (100.0 * completed as f64 / total as f64).round() as u8;
        prop_assert_eq!(progress_percent(completed, total), expected);
    }

    #[test]
    fn progress_stays_in_bounds(total in 0usize..500, completed in 0usize..500) {
        let completed = completed.min(total);
        prop_assert!(progress_percent(completed, total) <= 100);
    }

    #[test]
    fn transitions_follow_table(from in status_strategy(), to in status_strategy()) {
        let result = validate_transition(from, to);
        if from == to {
            prop_assert_eq!(result, Err(TransitionError::SameStatus { status: from }), "same status must be rejected");
        } else if from == CardStatus::Completed {
            prop_assert!(result.is_err());
        } else {
            prop_assert_eq!(result.is_ok(), from.allowed_targets().contains(&to));
        }
    }

    #[test]
    fn blocked_is_reachable_from_every_active_status(from in status_strategy()) {
        let active = !matches!(from, CardStatus::Completed | CardStatus::Blocked);
        prop_assert_eq!(from.can_transition_to(CardStatus::Blocked), active);
    }

    #[test]
    fn columns_partition_every_card(statuses in prop::collection::vec(status_strategy(), 0..40)) {
        let workflow = workflow_with(&statuses);
        let lane = LaneView::new(&workflow);
        let columns = lane.columns();

        let placed: usize = columns.iter().map(|column| column.len()).sum();
        prop_assert_eq!(placed, statuses.len());
        for column in &columns {
            prop_assert!(column.cards.iter().all(|card| card.status == column.status));
        }
        prop_assert_eq!(lane.has_blocked(), statuses.contains(&CardStatus::Blocked));
    }
}
