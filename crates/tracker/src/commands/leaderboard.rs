use std::fmt::Write;

use anyhow::{Context, Result};
use storage::dto::leaderboard::Leaderboard;
use storage::services::leaderboard::compute_leaderboard;

use super::App;

/// Run the `leaderboard` command: print the aggregated standings.
pub async fn run(app: &App, json: bool) -> Result<()> {
    let leaderboard = compute_leaderboard(app.db.as_ref())
        .await
        .context("Failed to compute leaderboard")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&leaderboard)?);
    } else {
        print!("{}", render(&leaderboard));
    }
    Ok(())
}

fn render(leaderboard: &Leaderboard) -> String {
    let mut out = String::new();

    let refreshed = leaderboard
        .last_refreshed
        .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "never".to_string());
    let _ = writeln!(
        out,
        "{} contests tracked, last refreshed {}",
        leaderboard.contests.len(),
        refreshed
    );

    let width = leaderboard
        .entries
        .iter()
        .map(|entry| {
            entry
                .display_name
                .as_deref()
                .unwrap_or(&entry.handle)
                .chars()
                .count()
        })
        .max()
        .unwrap_or(0)
        .max("User".len());

    let _ = writeln!(out, "{:>4}  {:<width$}  {:>6}", "#", "User", "Points");
    for entry in &leaderboard.entries {
        let name = entry.display_name.as_deref().unwrap_or(&entry.handle);
        let _ = writeln!(
            out,
            "{:>4}  {:<width$}  {:>6}",
            entry.position, name, entry.total_points
        );
    }

    out
}
