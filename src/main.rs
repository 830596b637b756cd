use anyhow::Result;
use clap::Parser;

use sample_board::api::{CreateWorkflowRequest, WorkflowFilter};
use sample_board::cli::commands::card::{AssignCommand, MoveCommand};
use sample_board::cli::commands::create::CreateCommand;
use sample_board::cli::commands::list::ListCommand;
use sample_board::cli::commands::show::ShowCommand;
use sample_board::cli::commands::{show_how_to_use, Command};
use sample_board::cli::{Cli, Commands};
use sample_board::config::{config, SampleBoardConfig};
use sample_board::telemetry::init_telemetry;

fn main() -> Result<()> {
    let cli = Cli::parse();

    SampleBoardConfig::load_env_file()?;
    init_telemetry(&config()?.observability)?;

    let runtime = tokio::runtime::Runtime::new()?;
    match cli.command {
        // No subcommand - explain how to use the board
        None => runtime.block_on(show_how_to_use()),
        Some(Commands::List {
            status,
            assignee,
            priority,
            search,
        }) => {
            let filter = WorkflowFilter {
                status,
                assignee,
                priority,
                search,
            };
            runtime.block_on(ListCommand::new(filter).execute())
        }
        Some(Commands::Show { workflow_id }) => {
            runtime.block_on(ShowCommand::new(workflow_id).execute())
        }
        Some(Commands::Move {
            card_id,
            target,
            reason,
            workflow,
        }) => runtime.block_on(
            MoveCommand {
                card_id,
                target,
                reason,
                workflow,
            }
            .execute(),
        ),
        Some(Commands::Assign {
            card_id,
            assignee,
            workflow,
        }) => runtime.block_on(
            AssignCommand {
                card_id,
                assignee,
                workflow,
            }
            .execute(),
        ),
        Some(Commands::Create {
            sample_request,
            name,
            priority,
            designer,
            programmer,
            supervisor,
            machine,
            delivery_date,
        }) => {
            let mut request = CreateWorkflowRequest::new(sample_request, name).with_priority(priority);
            request.assigned_designer = designer;
            request.assigned_programmer = programmer;
            request.assigned_supervisor = supervisor;
            request.required_machine_id = machine;
            request.delivery_date = delivery_date;
            runtime.block_on(CreateCommand::new(request).execute())
        }
    }
}
