use anyhow::Result;
use chrono::Utc;

use crate::board::{render_lane, BoardScope, LaneView};
use crate::cli::commands::{print_notices, with_board_store, Command};
use crate::config::config;
use crate::workflows::WorkflowId;

pub struct ShowCommand {
    pub workflow_id: WorkflowId,
}

impl ShowCommand {
    pub fn new(workflow_id: WorkflowId) -> Self {
        Self { workflow_id }
    }
}

impl Command for ShowCommand {
    async fn execute(&self) -> Result<()> {
        let preview_chars = config()?.board.description_preview_chars;

        with_board_store(BoardScope::Workflow(self.workflow_id), |store| async move {
            let loaded = store.load().await;
            print_notices(&store).await;
            loaded?;

            for workflow in store.snapshot().await {
                println!();
                print!("{}", render_lane(&LaneView::new(&workflow), Utc::now(), preview_chars));
            }
            if let Some(loaded_at) = store.last_loaded_at().await {
                println!();
                println!("🕒 Loaded {}", loaded_at.format("%Y-%m-%d %H:%M:%S UTC"));
            }
            Ok(())
        })
        .await
    }
}
