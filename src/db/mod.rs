pub mod migrations;
pub mod schema;

use anyhow::{Context, Result};
use rusqlite::Connection;
use sqlite_vec::sqlite3_vec_init;
use std::path::Path;
use std::sync::Once;

static SQLITE_VEC_INIT: Once = Once::new();

/// Register the sqlite-vec extension globally. Safe to call multiple times.
pub fn load_sqlite_vec() {
    SQLITE_VEC_INIT.call_once(|| unsafe {
        rusqlite::ffi::sqlite3_auto_extension(Some(std::mem::transmute(
            sqlite3_vec_init as *const (),
        )));
    });
}

/// Open (or create) the Viewfinder database at the given path, with all
/// extensions loaded and schema initialized.
pub fn open_database(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    load_sqlite_vec();

    let conn = Connection::open(path)
        .with_context(|| format!("failed to open database at {}", path.display()))?;

    // Enable WAL mode for better concurrent read performance
    conn.pragma_update(None, "journal_mode", "WAL")?;
    // Enable foreign keys
    conn.pragma_update(None, "foreign_keys", "ON")?;

    schema::init_schema(&conn).context("failed to initialize schema")?;
    migrations::run_migrations(&conn).context("failed to run migrations")?;

    tracing::info!(path = %path.display(), "database initialized");
    Ok(conn)
}

/// Open an in-memory database for testing.
#[cfg(test)]
pub fn open_memory_database() -> Result<Connection> {
    load_sqlite_vec();
    let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    schema::init_schema(&conn).context("failed to initialize schema")?;
    migrations::run_migrations(&conn).context("failed to run migrations")?;
    Ok(conn)
}

/// Diagnostic summary produced by [`check_database_health`].
#[derive(Debug)]
pub struct HealthReport {
    pub schema_version: u32,
    pub sqlite_vec_version: String,
    pub embedding_model: Option<String>,
    pub photo_count: u64,
    pub text_vec_count: u64,
    pub image_vec_count: u64,
    pub log_count: u64,
    pub integrity_ok: bool,
    pub integrity_details: String,
}

/// Run read-only diagnostics: versions, row counts per table, and SQLite's
/// own integrity check.
pub fn check_database_health(conn: &Connection) -> Result<HealthReport> {
    let schema_version =
        migrations::get_schema_version(conn).context("failed to read schema version")?;
    let sqlite_vec_version: String = conn
        .query_row("SELECT vec_version()", [], |r| r.get(0))
        .context("sqlite-vec extension not loaded")?;
    let embedding_model = migrations::get_embedding_model(conn)?;

    let photo_count = count_rows(conn, "photos")?;
    let text_vec_count = count_rows(conn, "photos_text_vec")?;
    let image_vec_count = count_rows(conn, "photos_image_vec")?;
    let log_count = count_rows(conn, "activity_log")?;

    let integrity_details: String = conn
        .query_row("PRAGMA integrity_check", [], |r| r.get(0))
        .context("integrity check failed to run")?;
    let integrity_ok = integrity_details == "ok";

    Ok(HealthReport {
        schema_version,
        sqlite_vec_version,
        embedding_model,
        photo_count,
        text_vec_count,
        image_vec_count,
        log_count,
        integrity_ok,
        integrity_details,
    })
}

fn count_rows(conn: &Connection, table: &str) -> Result<u64> {
    // Table names are compile-time constants above, never user input.
    let count: i64 = conn
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
        .with_context(|| format!("failed to count rows in {table}"))?;
    Ok(count as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_report_on_fresh_db() {
        let conn = open_memory_database().unwrap();
        let report = check_database_health(&conn).unwrap();

        assert_eq!(report.schema_version, migrations::CURRENT_SCHEMA_VERSION);
        assert!(!report.sqlite_vec_version.is_empty());
        assert_eq!(report.photo_count, 0);
        assert_eq!(report.text_vec_count, 0);
        assert_eq!(report.image_vec_count, 0);
        assert!(report.integrity_ok);
    }
}
