use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::App;
use commands::contests::ContestsCommand;
use commands::users::UsersCommand;
use config::Config;

#[derive(Parser)]
#[command(name = "cf-tracker", about = "Codeforces group leaderboard", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Apply database migrations
    Migrate,
    /// Refresh results periodically until interrupted
    Serve,
    /// Refresh all results once
    Refresh,
    /// Print the leaderboard
    Leaderboard {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Manage tracked users
    Users {
        #[command(subcommand)]
        command: UsersCommand,
    },
    /// Manage tracked contests
    Contests {
        #[command(subcommand)]
        command: ContestsCommand,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!("cf_tracker={log_level},importer={log_level},storage={log_level}")
                .into()
        }))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    let app = App::connect(config).await?;

    match cli.command {
        Commands::Migrate => commands::migrate::run(&app),
        Commands::Serve => commands::serve::run(&app).await?,
        Commands::Refresh => commands::refresh::run(&app).await?,
        Commands::Leaderboard { json } => commands::leaderboard::run(&app, json).await?,
        Commands::Users { command } => commands::users::run(&app, command).await?,
        Commands::Contests { command } => commands::contests::run(&app, command).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_serve() {
        let cli = Cli::parse_from(["cf-tracker", "serve"]);
        assert!(matches!(cli.command, Commands::Serve));
        assert!(!cli.verbose);
    }

    #[test]
    fn cli_parse_verbose_after_subcommand() {
        let cli = Cli::parse_from(["cf-tracker", "refresh", "--verbose"]);
        assert!(matches!(cli.command, Commands::Refresh));
        assert!(cli.verbose);
    }

    #[test]
    fn cli_parse_leaderboard_json() {
        let cli = Cli::parse_from(["cf-tracker", "leaderboard", "--json"]);
        match cli.command {
            Commands::Leaderboard { json } => assert!(json),
            _ => panic!("expected Leaderboard command"),
        }
    }

    #[test]
    fn cli_parse_users_add() {
        let cli = Cli::parse_from([
            "cf-tracker",
            "users",
            "add",
            "tourist",
            "--display-name",
            "Gennady",
        ]);
        match cli.command {
            Commands::Users {
                command:
                    UsersCommand::Add {
                        handle,
                        display_name,
                    },
            } => {
                assert_eq!(handle, "tourist");
                assert_eq!(display_name.as_deref(), Some("Gennady"));
            }
            _ => panic!("expected users add command"),
        }
    }

    #[test]
    fn cli_parse_users_rename_without_name_clears_it() {
        let cli = Cli::parse_from(["cf-tracker", "users", "rename", "petr"]);
        match cli.command {
            Commands::Users {
                command:
                    UsersCommand::Rename {
                        handle,
                        display_name,
                    },
            } => {
                assert_eq!(handle, "petr");
                assert!(display_name.is_none());
            }
            _ => panic!("expected users rename command"),
        }
    }

    #[test]
    fn cli_parse_contests_add() {
        let cli = Cli::parse_from(["cf-tracker", "contests", "add", "1950"]);
        match cli.command {
            Commands::Contests {
                command: ContestsCommand::Add { external_id },
            } => assert_eq!(external_id, 1950),
            _ => panic!("expected contests add command"),
        }
    }

    #[test]
    fn cli_rejects_non_numeric_contest_id() {
        assert!(Cli::try_parse_from(["cf-tracker", "contests", "remove", "abc"]).is_err());
    }

    #[test]
    fn cli_parse_contests_clear() {
        let cli = Cli::parse_from(["cf-tracker", "contests", "clear"]);
        assert!(matches!(
            cli.command,
            Commands::Contests {
                command: ContestsCommand::Clear
            }
        ));
    }
}
