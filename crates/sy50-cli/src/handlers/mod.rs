//! Command handlers.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<()>`
//! - Thin wrappers that call the component and format terminal output

pub mod check;
pub mod compare;
pub mod status;
pub mod watch;
