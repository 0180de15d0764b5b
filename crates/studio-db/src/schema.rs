//! Database schema definitions and migrations.

use rusqlite::Connection;

use crate::DbError;

pub fn run_migrations(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(SCHEMA)?;
    migrate_legacy_settings_table(conn)?;
    Ok(())
}

/// Early builds created the settings table without the `setting_type`
/// column; add it so secret-typed rows can be distinguished.
fn migrate_legacy_settings_table(conn: &Connection) -> Result<(), DbError> {
    if column_exists(conn, "settings", "setting_type")? {
        return Ok(());
    }
    tracing::info!("Adding setting_type column to settings");
    conn.execute_batch(
        "ALTER TABLE settings ADD COLUMN setting_type TEXT NOT NULL DEFAULT 'normal';",
    )?;
    Ok(())
}

fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool, DbError> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let exists = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .any(|name| name.as_deref() == Ok(column));
    Ok(exists)
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    setting_type TEXT NOT NULL DEFAULT 'normal',
    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);
"#;
