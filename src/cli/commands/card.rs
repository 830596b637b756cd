use anyhow::Result;

use crate::api::WorkflowFilter;
use crate::board::{BoardEvent, BoardScope, BoardStore, CardUpdate, LaneView};
use crate::cli::commands::{print_notices, with_board_store, Command};
use crate::workflows::{CardId, WorkflowId};

fn scope_for(workflow: Option<WorkflowId>) -> BoardScope {
    workflow.map_or_else(|| BoardScope::All(WorkflowFilter::default()), BoardScope::Workflow)
}

async fn print_lane_progress(store: &BoardStore, card_id: CardId) {
    let Some(card) = store.card(card_id).await else {
        return;
    };
    if let Some(workflow) = store.workflow(card.workflow_id).await {
        let lane = LaneView::new(&workflow);
        println!(
            "   📈 {}: {}% complete ({}/{})",
            workflow.workflow_name,
            lane.progress(),
            lane.completed_count(),
            lane.total_count()
        );
    }
}

/// Drop a card onto a column, exactly as the board would
pub struct MoveCommand {
    pub card_id: CardId,
    pub target: String,
    pub reason: Option<String>,
    pub workflow: Option<WorkflowId>,
}

impl Command for MoveCommand {
    async fn execute(&self) -> Result<()> {
        with_board_store(scope_for(self.workflow), |store| async move {
            if let Err(err) = store.load().await {
                print_notices(&store).await;
                return Err(err.into());
            }

            store
                .handle(BoardEvent::DragStarted {
                    card_id: self.card_id,
                })
                .await?;
            let moved = store
                .handle(BoardEvent::CardDropped {
                    card_id: self.card_id,
                    target_label: self.target.clone(),
                    blocked_reason: self.reason.clone(),
                })
                .await;
            print_notices(&store).await;
            moved?;

            print_lane_progress(&store, self.card_id).await;
            Ok(())
        })
        .await
    }
}

pub struct AssignCommand {
    pub card_id: CardId,
    pub assignee: String,
    pub workflow: Option<WorkflowId>,
}

impl Command for AssignCommand {
    async fn execute(&self) -> Result<()> {
        with_board_store(scope_for(self.workflow), |store| async move {
            if let Err(err) = store.load().await {
                print_notices(&store).await;
                return Err(err.into());
            }

            let assigned = store
                .update_card(self.card_id, CardUpdate::assignee(self.assignee.as_str()))
                .await;
            print_notices(&store).await;
            assigned?;

            if let Some(card) = store.card(self.card_id).await {
                println!(
                    "✅ {} ({}) assigned to {}",
                    card.title,
                    card.stage_name,
                    card.assigned_to.as_deref().unwrap_or("nobody")
                );
            }
            Ok(())
        })
        .await
    }
}
