use anyhow::Result;

use crate::api::{CreateWorkflowRequest, WorkflowFilter};
use crate::board::BoardScope;
use crate::cli::commands::{print_notices, with_board_store, Command};

pub struct CreateCommand {
    pub request: CreateWorkflowRequest,
}

impl CreateCommand {
    pub fn new(request: CreateWorkflowRequest) -> Self {
        Self { request }
    }
}

impl Command for CreateCommand {
    async fn execute(&self) -> Result<()> {
        println!(
            "➕ Creating workflow '{}' for sample request {}",
            self.request.workflow_name, self.request.sample_request_id
        );

        with_board_store(BoardScope::All(WorkflowFilter::default()), |store| async move {
            let created = store.create_workflow(self.request.clone()).await;
            print_notices(&store).await;
            let workflow = created?;

            println!("   📋 Workflow #{} with {} card(s)", workflow.id, workflow.cards.len());
            for card in workflow.cards_sorted() {
                println!("      {}. {} [{}]", card.stage_order, card.stage_name, card.status.label());
            }
            println!("💡 Run 'sample-board show {}' to open the board", workflow.id);
            Ok(())
        })
        .await
    }
}
