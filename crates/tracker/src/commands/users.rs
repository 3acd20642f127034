use anyhow::{Context, Result, bail};
use importer::{ImporterError, register_user};
use storage::UserStore;
use storage::dto::user::{CreateUserRequest, UpdateUserRequest};
use tracing::info;

use super::App;

#[derive(Debug, clap::Subcommand)]
pub enum UsersCommand {
    /// List tracked users
    List,
    /// Start tracking a Codeforces handle
    Add {
        handle: String,
        #[arg(long)]
        display_name: Option<String>,
    },
    /// Change or clear a user's display name
    Rename {
        handle: String,
        display_name: Option<String>,
    },
    /// Stop tracking a user; stored results are kept
    Remove { handle: String },
}

pub async fn run(app: &App, command: UsersCommand) -> Result<()> {
    match command {
        UsersCommand::List => list(app).await,
        UsersCommand::Add {
            handle,
            display_name,
        } => add(app, &handle, display_name).await,
        UsersCommand::Rename {
            handle,
            display_name,
        } => rename(app, &handle, display_name).await,
        UsersCommand::Remove { handle } => remove(app, &handle).await,
    }
}

async fn list(app: &App) -> Result<()> {
    let users = app.db.list_users().await?;
    if users.is_empty() {
        println!("No users tracked");
        return Ok(());
    }

    for user in users {
        match &user.display_name {
            Some(name) => println!("{:<24}  {}", user.handle, name),
            None => println!("{}", user.handle),
        }
    }
    Ok(())
}

async fn add(app: &App, handle: &str, display_name: Option<String>) -> Result<()> {
    let req = CreateUserRequest::new(handle, display_name);
    let retry = app.config.sync_settings().retry;

    let user = match register_user(app.db.as_ref(), app.provider.as_ref(), &req, retry).await {
        Ok(user) => user,
        Err(ImporterError::UnknownHandle(_)) => {
            bail!("Codeforces has no user with handle {handle:?}")
        }
        Err(ImporterError::StorageError(e)) if e.is_unique_violation() => {
            bail!("{handle} is already tracked")
        }
        Err(e) => return Err(e).context("Could not add user"),
    };

    println!("Tracking {}", user.label());
    Ok(())
}

async fn rename(app: &App, handle: &str, display_name: Option<String>) -> Result<()> {
    let user = find(app, handle).await?;

    let user = app
        .db
        .update_user(user.user_id, &UpdateUserRequest::new(display_name))
        .await
        .context("Could not rename user")?;
    println!("{} is now shown as {}", user.handle, user.label());
    Ok(())
}

async fn remove(app: &App, handle: &str) -> Result<()> {
    let user = find(app, handle).await?;
    app.db.delete_user(user.user_id).await?;

    info!(handle = %user.handle, "User removed");
    println!("Stopped tracking {}", user.handle);
    Ok(())
}

async fn find(app: &App, handle: &str) -> Result<storage::models::User> {
    match app.db.find_user_by_handle(handle).await {
        Ok(user) => Ok(user),
        Err(e) if e.is_not_found() => bail!("{handle} is not tracked"),
        Err(e) => Err(e.into()),
    }
}
