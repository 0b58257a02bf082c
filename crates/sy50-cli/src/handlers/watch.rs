//! Watch command handler.
//!
//! Triggers a check every interval until Ctrl+C. Ctrl+C closes the
//! component, which unblocks any consent wait in flight, and the loop exits
//! once that check has resolved.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::Map;
use sy50_core::UpdaterComponent;
use tracing::{info, warn};

use crate::bootstrap::CliContext;

/// Longest wait for the in-flight check after Ctrl+C.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

pub async fn execute(ctx: &CliContext, interval_secs: u64) -> Result<()> {
    let interval = Duration::from_secs(interval_secs.max(1));
    let component = Arc::clone(&ctx.component);
    let mut checks = tokio::spawn(run_checks(Arc::clone(&component), interval));

    tokio::select! {
        joined = &mut checks => {
            joined.context("Check loop panicked")?;
            return Ok(());
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl+C")?;
            info!("Ctrl+C received, shutting down");
        }
    }

    component.close();
    match tokio::time::timeout(SHUTDOWN_GRACE, checks).await {
        Ok(joined) => joined.context("Check loop panicked")?,
        Err(_) => warn!("In-flight check did not finish after shutdown"),
    }
    Ok(())
}

async fn run_checks(component: Arc<UpdaterComponent>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        if component.is_closed() {
            break;
        }
        let result = component.trigger_check(&Map::new()).await;
        println!("{}: {}", result.label, result.text);
        if component.is_closed() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::bootstrap;
    use sy50_core::UpdaterConfig;

    #[tokio::test]
    async fn test_check_loop_stops_after_close() {
        let ctx = bootstrap(UpdaterConfig {
            target_version: "1.0".to_string(),
            ..UpdaterConfig::default()
        });
        ctx.component.close();

        let finished = tokio::time::timeout(
            Duration::from_secs(5),
            run_checks(Arc::clone(&ctx.component), Duration::from_millis(10)),
        )
        .await;
        assert!(finished.is_ok());
    }
}
