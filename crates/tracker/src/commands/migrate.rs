use super::App;

/// Run the `migrate` command. Connecting already applied pending migrations.
pub fn run(app: &App) {
    println!(
        "Database schema at {} is up to date",
        app.config.database_host()
    );
}
