use anyhow::Result;

use crate::config::ViewfinderConfig;

/// Display library statistics in the terminal.
pub fn stats(config: &ViewfinderConfig) -> Result<()> {
    let db_path = config.resolved_db_path();
    let conn = crate::db::open_database(&db_path)?;

    let response = crate::catalog::stats::library_stats(&conn, Some(&db_path))?;

    println!("Library Statistics");
    println!("{}", "=".repeat(40));
    println!("  Total photos:        {}", response.total_photos);
    println!();

    println!("By Category:");
    if response.by_category.is_empty() {
        println!("  (none)");
    }
    for cat in &response.by_category {
        println!("  {:<12} {}", cat.name, cat.count);
    }
    println!();

    println!("Activity:");
    println!("  Uploads:             {}", response.total_uploads);
    println!("  Searches:            {}", response.total_searches);
    println!("  Clicks:              {}", response.total_clicks);
    println!();

    println!("Database size:         {} bytes", response.db_size_bytes);

    if let Some(ref oldest) = response.oldest_photo {
        println!("Oldest photo:          {oldest}");
    }
    if let Some(ref newest) = response.newest_photo {
        println!("Newest photo:          {newest}");
    }

    Ok(())
}
