//! Applies the expenses schema outside of the server.
//!
//! The database is taken from `EXPENSES__SERVER__DATABASE` (the same key the
//! server reads), then `DATABASE_URL`, then the default SQLite file.
use sea_orm::Database;
use sea_orm_migration::prelude::*;

const DEFAULT_DATABASE: &str = "sqlite:./expenses.db?mode=rwc";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Up,
    Down,
    Fresh,
    Status,
}

impl TryFrom<&str> for Command {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "up" => Ok(Command::Up),
            "down" => Ok(Command::Down),
            "fresh" => Ok(Command::Fresh),
            "status" => Ok(Command::Status),
            other => Err(format!(
                "unknown command `{other}`; usage: migration [up|down|fresh|status]"
            )),
        }
    }
}

fn database_url(server_setting: Option<String>, database_url: Option<String>) -> String {
    server_setting
        .filter(|url| !url.eq_ignore_ascii_case("memory"))
        .or(database_url)
        .unwrap_or_else(|| DEFAULT_DATABASE.to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let arg = std::env::args().nth(1).unwrap_or_else(|| "up".to_string());
    let command = Command::try_from(arg.as_str())?;

    let url = database_url(
        std::env::var("EXPENSES__SERVER__DATABASE").ok(),
        std::env::var("DATABASE_URL").ok(),
    );
    let db = Database::connect(&url).await?;

    match command {
        Command::Up => migration::Migrator::up(&db, None).await?,
        Command::Down => migration::Migrator::down(&db, None).await?,
        Command::Fresh => migration::Migrator::fresh(&db).await?,
        Command::Status => migration::Migrator::status(&db).await?,
    }

    Ok(())
}
