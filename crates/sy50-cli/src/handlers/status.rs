//! Status command handler.

use anyhow::Result;

use crate::bootstrap::CliContext;

/// Print the installed version as `label: version`.
pub async fn execute(ctx: &CliContext) -> Result<()> {
    let status = ctx.component.get_status().await;
    println!("{}: {}", status.label, status.version);
    Ok(())
}
