//! Check command handler.

use anyhow::{Context, Result};
use serde_json::Map;

use crate::bootstrap::CliContext;

/// Run one decision cycle and print its outcome.
pub async fn execute(ctx: &CliContext, json: bool) -> Result<()> {
    let result = ctx.component.trigger_check(&Map::new()).await;

    if json {
        let report =
            serde_json::to_string_pretty(&result.report).context("Failed to serialize report")?;
        println!("{report}");
    } else {
        println!("{}: {}", result.label, result.text);
    }
    Ok(())
}
