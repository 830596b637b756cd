use anyhow::Result;

use crate::api::WorkflowFilter;
use crate::board::{BoardScope, LaneView};
use crate::cli::commands::{print_notices, with_board_store, Command};

pub struct ListCommand {
    pub filter: WorkflowFilter,
}

impl ListCommand {
    pub fn new(filter: WorkflowFilter) -> Self {
        Self { filter }
    }
}

impl Command for ListCommand {
    async fn execute(&self) -> Result<()> {
        with_board_store(BoardScope::All(self.filter.clone()), |store| async move {
            let loaded = store.load().await;
            print_notices(&store).await;
            loaded?;

            let workflows = store.snapshot().await;
            if workflows.is_empty() {
                println!("📋 No workflows found");
                if !self.filter.is_empty() {
                    println!("   💡 Try again without filters");
                }
                return Ok(());
            }

            println!("📋 {} workflow(s)", workflows.len());
            println!();
            for workflow in &workflows {
                let lane = LaneView::new(workflow);
                let counts: Vec<String> = lane
                    .columns()
                    .iter()
                    .map(|column| format!("{} {}", column.label(), column.len()))
                    .collect();
                println!(
                    "#{:<5} {:<40} {:>3}% [{}] {}{}",
                    workflow.id,
                    workflow.workflow_name,
                    lane.progress(),
                    workflow.priority,
                    counts.join(" | "),
                    if lane.has_blocked() { "  ⚠ BLOCKED" } else { "" }
                );
            }
            Ok(())
        })
        .await
    }
}
