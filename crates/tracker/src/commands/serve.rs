use std::sync::Arc;

use anyhow::{Context, Result};
use importer::{RefreshHandle, RefreshScheduler};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::App;

/// Run the `serve` command: refresh on a timer until interrupted.
///
/// On unix, `SIGHUP` requests an immediate refresh.
pub async fn run(app: &App) -> Result<()> {
    let shutdown = CancellationToken::new();
    let (handle, task) = RefreshScheduler::spawn(
        Arc::new(app.synchronizer()),
        app.config.scheduler_settings(),
        shutdown.clone(),
    );

    info!(
        group = app.config.group_code.as_deref().unwrap_or("public"),
        "Leaderboard refresher running, press Ctrl-C to stop"
    );

    wait_for_signals(&handle).await?;

    shutdown.cancel();
    task.await.context("Refresh scheduler panicked")?;

    let status = handle.status();
    info!(completed_runs = status.completed_runs, "Shut down gracefully");
    Ok(())
}

#[cfg(unix)]
async fn wait_for_signals(handle: &RefreshHandle) -> Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut hangup = signal(SignalKind::hangup()).context("Failed to install SIGHUP handler")?;

    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result.context("Failed to install Ctrl-C handler")?;
                info!("Received shutdown signal");
                return Ok(());
            }
            _ = hangup.recv() => {
                let outcome = handle.trigger();
                info!(?outcome, "Manual refresh requested");
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signals(_handle: &RefreshHandle) -> Result<()> {
    tokio::signal::ctrl_c()
        .await
        .context("Failed to install Ctrl-C handler")?;
    info!("Received shutdown signal");
    Ok(())
}
