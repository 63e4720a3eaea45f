use super::*;

pub fn configure_connection(connection: &Connection) -> Result<()> {
    connection
        .pragma_update(None, "journal_mode", "WAL")
        .context("failed to set journal_mode=WAL")?;
    connection
        .pragma_update(None, "synchronous", "NORMAL")
        .context("failed to set synchronous=NORMAL")?;
    connection
        .pragma_update(None, "foreign_keys", "ON")
        .context("failed to enable foreign keys")?;
    Ok(())
}

pub fn ensure_schema(connection: &Connection) -> Result<()> {
    connection
        .execute_batch(
            "
            CREATE TABLE IF NOT EXISTS metadata (
              key TEXT PRIMARY KEY,
              value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS runs (
              run_id TEXT PRIMARY KEY,
              doc_title TEXT NOT NULL,
              source_path TEXT NOT NULL,
              source_sha256 TEXT NOT NULL,
              backend TEXT NOT NULL,
              page_count INTEGER NOT NULL,
              completed_at TEXT NOT NULL,
              total_ids INTEGER NOT NULL,
              matches INTEGER NOT NULL,
              mismatches INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS toc_entries (
              run_id TEXT NOT NULL,
              order_index INTEGER NOT NULL,
              section_id TEXT NOT NULL,
              title TEXT NOT NULL,
              page INTEGER NOT NULL,
              level INTEGER NOT NULL,
              parent_id TEXT,
              full_path TEXT NOT NULL,
              tags TEXT,
              PRIMARY KEY(run_id, section_id),
              FOREIGN KEY(run_id) REFERENCES runs(run_id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS sections (
              run_id TEXT NOT NULL,
              order_index INTEGER NOT NULL,
              section_id TEXT NOT NULL,
              title TEXT NOT NULL,
              page INTEGER NOT NULL,
              content TEXT NOT NULL,
              PRIMARY KEY(run_id, section_id),
              FOREIGN KEY(run_id) REFERENCES runs(run_id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS reconciliation (
              run_id TEXT NOT NULL,
              order_index INTEGER NOT NULL,
              section_id TEXT NOT NULL,
              in_toc INTEGER NOT NULL,
              in_sections INTEGER NOT NULL,
              status TEXT NOT NULL,
              PRIMARY KEY(run_id, section_id),
              FOREIGN KEY(run_id) REFERENCES runs(run_id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_runs_completed_at ON runs(completed_at);
            ",
        )
        .context("failed to create index schema")?;

    connection
        .execute(
            "INSERT INTO metadata(key, value) VALUES('schema_version', ?1)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![INDEX_SCHEMA_VERSION],
        )
        .context("failed to record index schema version")?;

    Ok(())
}
