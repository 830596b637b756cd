use std::sync::Arc;

use anyhow::Result;

use crate::api::HttpWorkflowClient;
use crate::board::{BoardScope, BoardStore, Notice, NoticeLevel};
use crate::config::config;

pub mod card;
pub mod create;
pub mod list;
pub mod show;

#[allow(async_fn_in_trait)]
pub trait Command {
    async fn execute(&self) -> Result<()>;
}

/// Connect to the workflow API and hand a board store to `f`.
/// API usage is logged once `f` finishes.
pub async fn with_board_store<F, Fut, R>(scope: BoardScope, f: F) -> Result<R>
where
    F: FnOnce(BoardStore) -> Fut,
    Fut: std::future::Future<Output = Result<R>>,
{
    let settings = config()?;
    print!("🔄 Connecting to {}... ", settings.api.base_url);
    std::io::Write::flush(&mut std::io::stdout())?;

    match HttpWorkflowClient::new(&settings.api) {
        Ok(client) => {
            println!("✅");
            let client = Arc::new(client);
            let result = f(BoardStore::with_scope(client.clone(), scope)).await;
            client.log_stats();
            result
        }
        Err(e) => {
            println!("❌ {e}");
            Err(e.into())
        }
    }
}

/// Print and drain the store's pending notices
pub async fn print_notices(store: &BoardStore) {
    for notice in store.take_notices().await {
        print_notice(&notice);
    }
}

fn print_notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Info => println!("✅ {}", notice.message),
        NoticeLevel::Error => eprintln!("❌ {}", notice.message),
    }
}

pub async fn show_how_to_use() -> Result<()> {
    println!("🧶 Sample Board - garment sample development workflows");
    println!();
    println!("To get started:");
    println!("  📋 sample-board list                  # Lane summary of every workflow");
    println!("  👁️  sample-board show <workflow>       # Full board for one workflow");
    println!("  ➡️  sample-board move <card> <column>  # Move a card");
    println!("  👤 sample-board assign <card> <name>  # Assign a card");
    println!("  ➕ sample-board create --sample-request <id> --name <name>");
    println!();
    println!("💡 Set SAMPLE_BOARD_API_TOKEN and SAMPLE_BOARD_API__BASE_URL to point at your server");
    Ok(())
}
