//! CLI `doctor` command: run database diagnostics and print a health report.

use anyhow::{Context, Result};

use crate::config::ViewfinderConfig;
use crate::db;

/// Run database diagnostics and print a health report.
pub fn doctor(config: &ViewfinderConfig) -> Result<()> {
    let db_path = config.resolved_db_path();

    if !db_path.exists() {
        println!("Database: not found at {}", db_path.display());
        println!("Run `viewfinder serve` or `viewfinder import <dir>` to initialize.");
        return Ok(());
    }

    let file_size = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);

    let conn = db::open_database(&db_path).context("failed to open database (may be corrupt)")?;

    let report = db::check_database_health(&conn).context("failed to run health check")?;

    println!("Viewfinder Health Report");
    println!("========================");
    println!();
    println!("Database:          {}", db_path.display());
    println!("File size:         {}", format_bytes(file_size));
    println!("Schema version:    {}", report.schema_version);
    println!("sqlite-vec:        v{}", report.sqlite_vec_version);
    println!();
    println!("Embedding model:");
    println!(
        "  Stored:          {}",
        report.embedding_model.as_deref().unwrap_or("(not set)")
    );
    println!("  Configured:      {}", config.embedding.model);
    if let Some(ref stored) = report.embedding_model {
        if stored != &config.embedding.model {
            println!("  WARNING: model mismatch! Existing vectors were built with the stored model.");
        } else {
            println!("  Status:          OK (match)");
        }
    }
    println!();
    println!("Row counts:");
    println!("  Photos:          {}", report.photo_count);
    println!("  Text vectors:    {}", report.text_vec_count);
    println!("  Image vectors:   {}", report.image_vec_count);
    println!("  Activity log:    {}", report.log_count);
    if report.text_vec_count != report.photo_count || report.image_vec_count != report.photo_count
    {
        println!("  WARNING: vector row counts should match the photo count.");
    }
    println!();
    if report.integrity_ok {
        println!("Integrity check:   PASSED");
    } else {
        println!("Integrity check:   FAILED ({})", report.integrity_details);
    }

    if !report.integrity_ok {
        println!();
        println!("Recovery steps:");
        println!("  1. Restore from a backup: cp backup.db ~/.viewfinder/photos.db");
        println!("  2. Or re-import your photo directory: viewfinder import <dir>");
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
    }
}
