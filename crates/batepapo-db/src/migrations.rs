use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS participants (
            name        TEXT PRIMARY KEY,
            last_status INTEGER NOT NULL
        );

        -- seq preserves insertion order; id is the public identifier
        CREATE TABLE IF NOT EXISTS messages (
            seq         INTEGER PRIMARY KEY AUTOINCREMENT,
            id          TEXT NOT NULL UNIQUE,
            from_name   TEXT NOT NULL,
            to_name     TEXT NOT NULL,
            text        TEXT NOT NULL,
            kind        TEXT NOT NULL,
            time        TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_messages_from ON messages(from_name);
        CREATE INDEX IF NOT EXISTS idx_messages_to ON messages(to_name);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
