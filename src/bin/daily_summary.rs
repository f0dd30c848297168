//! Print a day's food log summary as JSON
//!
//! Usage: daily_summary [YYYY-MM-DD]

use nutrilog::config::Config;
use nutrilog::db::{migrations, Database};
use nutrilog::tools::food_logs;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let date = std::env::args()
        .nth(1)
        .unwrap_or_else(|| chrono::Utc::now().date_naive().to_string());

    let config = Config::from_env();
    eprintln!("Database path: {}", config.database_path.display());

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = Database::new(&config.database_path)?;
    database.with_conn(|conn| {
        migrations::run_migrations(conn)?;
        Ok(())
    })?;

    let summary = food_logs::daily_summary(&database, &date)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
