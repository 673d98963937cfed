use anyhow::Result;
use chrono::Utc;

use crate::config::AomigoConfig;
use crate::learning::topics::mastery_label;

/// Display learning statistics in the terminal.
pub fn stats(config: &AomigoConfig, user_id: Option<&str>) -> Result<()> {
    let db_path = config.resolved_db_path();
    let conn = crate::db::open_database(&db_path)?;

    let summary =
        crate::learning::summary::learning_summary(&conn, user_id, Utc::now(), Some(&db_path))?;

    println!("Learning Statistics");
    println!("{}", "=".repeat(40));
    println!("  Profiles:            {}", summary.profiles);
    println!("  Topics:              {}", summary.topics);
    println!("  Teaching sessions:   {}", summary.sessions);
    println!("  Community posts:     {}", summary.posts);
    println!();

    println!("Reviews:");
    println!("  Total:               {}", summary.reviews_total);
    println!("  Open:                {}", summary.reviews_open);
    println!("  Due now:             {}", summary.reviews_due);
    println!();

    println!("Mastery:");
    for level in 0..=5 {
        let count = summary.mastery_distribution.get(&level).copied().unwrap_or(0);
        println!("  {:<12} {}", mastery_label(level), count);
    }
    println!("  Average:             {:.2}", summary.avg_mastery);
    println!();

    println!("Database size:         {} bytes", summary.db_size_bytes);

    Ok(())
}
