use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "quotelog={level},telegram_bot={level},engine={level},migration={level}",
            level = settings.app.level
        ))
        .init();

    let db = parse_database(&settings.database).await?;

    let bot = telegram_bot::Bot::builder()
        .token(&settings.telegram.token)
        .debug(settings.telegram.debug)
        .access(settings.access)
        .responses(settings.responses)
        .database(db)
        .build()?;

    // An invalid token is the only fatal runtime error; everything after
    // startup is logged by the dispatcher and retried by the platform.
    if let Err(err) = bot.run().await {
        tracing::error!("bot startup failed: {err}");
        std::process::exit(1);
    }

    Ok(())
}

async fn parse_database(
    config: &Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
