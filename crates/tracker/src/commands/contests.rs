use anyhow::{Context, Result, bail};
use chrono::DateTime;
use importer::{ContestCatalogSync, StandingsProvider};
use storage::ContestStore;
use tracing::info;

use super::App;

#[derive(Debug, clap::Subcommand)]
pub enum ContestsCommand {
    /// List tracked contests, most recent first
    List,
    /// Track every finished contest from the Codeforces catalog
    Fetch,
    /// Track one contest by its Codeforces id
    Add { external_id: i32 },
    /// Stop tracking one contest; its results are excluded from totals
    Remove { external_id: i32 },
    /// Stop tracking every contest
    Clear,
}

pub async fn run(app: &App, command: ContestsCommand) -> Result<()> {
    match command {
        ContestsCommand::List => list(app).await,
        ContestsCommand::Fetch => fetch(app).await,
        ContestsCommand::Add { external_id } => add(app, external_id).await,
        ContestsCommand::Remove { external_id } => remove(app, external_id).await,
        ContestsCommand::Clear => clear(app).await,
    }
}

async fn list(app: &App) -> Result<()> {
    let contests = app.db.list_contests().await?;
    if contests.is_empty() {
        println!("No contests tracked");
        return Ok(());
    }

    for contest in contests {
        let start = DateTime::from_timestamp(contest.start_time, 0)
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        println!(
            "{:>6}  {:<10}  {:<6}  {}",
            contest.external_id,
            start,
            contest.division(),
            contest.name
        );
    }
    Ok(())
}

async fn fetch(app: &App) -> Result<()> {
    let report = ContestCatalogSync::new(
        app.db.clone(),
        app.provider.clone(),
        app.config.group_code.clone(),
    )
    .with_retry(app.config.sync_settings().retry)
    .sync()
    .await
    .context("Failed to fetch contest catalog")?;

    println!(
        "{} contests listed, {} finished, {} newly tracked",
        report.listed, report.eligible, report.inserted
    );
    Ok(())
}

async fn add(app: &App, external_id: i32) -> Result<()> {
    let summary = app
        .provider
        .fetch_contest(external_id)
        .await
        .context("Could not fetch contest info from Codeforces")?;

    let contest = match app.db.create_contest(&summary.to_new_contest()).await {
        Ok(contest) => contest,
        Err(e) if e.is_unique_violation() => bail!("Contest {external_id} is already tracked"),
        Err(e) => return Err(e).context("Could not add contest"),
    };

    info!(external_id, name = %contest.name, "Contest added");
    println!("Tracking {} ({})", contest.name, contest.external_id);
    Ok(())
}

async fn remove(app: &App, external_id: i32) -> Result<()> {
    let contest = match app.db.find_contest_by_external_id(external_id).await {
        Ok(contest) => contest,
        Err(e) if e.is_not_found() => bail!("Contest {external_id} is not tracked"),
        Err(e) => return Err(e.into()),
    };
    app.db.delete_contest(contest.contest_id).await?;

    info!(external_id, "Contest removed");
    println!("Stopped tracking {}", contest.name);
    Ok(())
}

async fn clear(app: &App) -> Result<()> {
    let removed = app.db.delete_all_contests().await?;
    info!(removed, "All contests removed");
    println!("Stopped tracking {removed} contests");
    Ok(())
}
