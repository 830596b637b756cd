use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::priority::Priority;
use crate::workflows::{CardId, SampleRequestId, WorkflowId, WorkflowStatus};

pub mod commands;

#[derive(Debug, Parser)]
#[command(name = "sample-board")]
#[command(about = "Kanban board for garment sample development workflows")]
#[command(long_about = "Sample Board shows each sample-development workflow as a lane of stage cards \
                       across Pending, Ready, In Progress, Blocked and Completed columns. Moves are \
                       checked against the card status rules before anything is sent to the server.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List workflows as lane summaries
    List {
        /// Workflow status: active, completed, cancelled
        #[arg(long, help = "Only show workflows with this workflow status")]
        status: Option<WorkflowStatus>,
        /// Card assignee to filter on
        #[arg(long, help = "Only show workflows with cards assigned to this person")]
        assignee: Option<String>,
        /// Workflow priority: low, medium, high
        #[arg(long, help = "Only show workflows with this priority")]
        priority: Option<Priority>,
        /// Free-text search
        #[arg(long, help = "Search workflow names and sample details")]
        search: Option<String>,
    },
    /// Show one workflow with all five status columns
    Show {
        /// Workflow to display
        workflow_id: WorkflowId,
    },
    /// Move a card to another column (same rules as drag-and-drop)
    Move {
        /// Card to move
        card_id: CardId,
        /// Target column: pending, ready, "in progress", blocked, completed
        target: String,
        /// Why the card is blocked
        #[arg(long, help = "Reason shown on the card when moving it to Blocked")]
        reason: Option<String>,
        /// Workflow the card belongs to
        #[arg(long, help = "Load only this workflow instead of every workflow")]
        workflow: Option<WorkflowId>,
    },
    /// Assign a card to someone
    Assign {
        /// Card to assign
        card_id: CardId,
        /// Person responsible for the stage
        assignee: String,
        /// Workflow the card belongs to
        #[arg(long, help = "Load only this workflow instead of every workflow")]
        workflow: Option<WorkflowId>,
    },
    /// Create a workflow for a sample request
    Create {
        /// Sample request the workflow tracks
        #[arg(long)]
        sample_request: SampleRequestId,
        /// Workflow name
        #[arg(long)]
        name: String,
        /// Workflow priority: low, medium, high
        #[arg(long, default_value = "medium")]
        priority: Priority,
        #[arg(long)]
        designer: Option<String>,
        #[arg(long)]
        programmer: Option<String>,
        #[arg(long)]
        supervisor: Option<String>,
        /// Knitting machine id
        #[arg(long)]
        machine: Option<i64>,
        /// Delivery date, YYYY-MM-DD
        #[arg(long)]
        delivery_date: Option<NaiveDate>,
    },
}
