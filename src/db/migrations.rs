//! Forward-only schema migrations.
//!
//! The catalog records its schema version in `schema_meta`; [`run_migrations`]
//! walks it up to [`CURRENT_SCHEMA_VERSION`] one step at a time. Every
//! migration must tolerate a database that already has the current layout,
//! because [`init_schema`](crate::db::schema::init_schema) always creates the
//! full current schema before migrations run.

use rusqlite::{Connection, OptionalExtension};

/// The schema version that the current binary expects.
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// Current schema version recorded in the database. A missing or garbled
/// value reads as 0 so pending migrations are re-run rather than skipped.
pub fn get_schema_version(conn: &Connection) -> rusqlite::Result<u32> {
    Ok(read_meta(conn, "schema_version")?
        .and_then(|v| v.parse().ok())
        .unwrap_or(0))
}

/// Model identifier recorded when the stored vectors were written, if any.
pub fn get_embedding_model(conn: &Connection) -> rusqlite::Result<Option<String>> {
    read_meta(conn, "embedding_model")
}

/// Record which embedding model the stored vectors came from.
pub fn set_embedding_model(conn: &Connection, model: &str) -> rusqlite::Result<()> {
    write_meta(conn, "embedding_model", model)
}

/// Run any pending migrations, stamping the version after each step.
pub fn run_migrations(conn: &Connection) -> rusqlite::Result<()> {
    let mut version = get_schema_version(conn)?;
    tracing::debug!(
        schema_version = version,
        target = CURRENT_SCHEMA_VERSION,
        "checking migrations"
    );

    while version < CURRENT_SCHEMA_VERSION {
        let next = version + 1;
        tracing::info!(from = version, to = next, "running migration");

        match next {
            2 => migrate_usage_metrics(conn)?,
            _ => {
                tracing::error!(version = next, "unknown migration target");
                break;
            }
        }

        write_meta(conn, "schema_version", &next.to_string())?;
        version = next;
    }

    Ok(())
}

/// v1 → v2: per-photo usage counters plus embedding provenance.
///
/// Early catalogs tracked no usage. Adds `search_count`, `click_count`, and
/// `last_seen_at` to `photos` when absent, and records which model and
/// dimensionality the stored vectors were built with.
fn migrate_usage_metrics(conn: &Connection) -> rusqlite::Result<()> {
    let columns = [
        (
            "search_count",
            "ALTER TABLE photos ADD COLUMN search_count INTEGER NOT NULL DEFAULT 0",
        ),
        (
            "click_count",
            "ALTER TABLE photos ADD COLUMN click_count INTEGER NOT NULL DEFAULT 0",
        ),
        ("last_seen_at", "ALTER TABLE photos ADD COLUMN last_seen_at TEXT"),
    ];
    for (column, ddl) in columns {
        if !column_exists(conn, "photos", column)? {
            tracing::debug!(column, "backfilling photos column");
            conn.execute(ddl, [])?;
        }
    }

    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES
             ('embedding_model', 'voyage-multimodal-3'),
             ('embedding_dim', '1024')",
        [],
    )?;
    Ok(())
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn read_meta(conn: &Connection, key: &str) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM schema_meta WHERE key = ?1",
        [key],
        |row| row.get(0),
    )
    .optional()
}

fn write_meta(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_meta (key, value) VALUES (?1, ?2)",
        [key, value],
    )?;
    Ok(())
}

fn column_exists(conn: &Connection, table: &str, column: &str) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
        [table, column],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}
