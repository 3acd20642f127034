use anyhow::{Context, Result, bail};
use importer::SyncReport;

use super::App;

/// Run the `refresh` command: one full results synchronization, unless
/// another process is already running one.
pub async fn run(app: &App) -> Result<()> {
    let report = tokio::time::timeout(app.config.run_timeout, app.synchronizer().try_sync_all())
        .await
        .context("Refresh exceeded RUN_TIMEOUT_SECS")?
        .context("Refresh failed")?;

    let Some(report) = report else {
        bail!("Another refresh is already running against this database");
    };

    print_report(&report);
    Ok(())
}

pub fn print_report(report: &SyncReport) {
    println!("Refresh finished in {}s", report.elapsed().num_seconds());
    println!(
        "Contests: {} synced, {} skipped ({} tracked)",
        report.contests_synced, report.contests_skipped, report.contests_total
    );
    println!(
        "Results:  {} written, {} failed",
        report.results_written, report.results_failed
    );
}
