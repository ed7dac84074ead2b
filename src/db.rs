use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;

// No declared key: rows are addressed by SQLite's implicit rowid, which is
// what callers see as the item number. `desc` is a keyword and stays quoted.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS transactions (
    amount TEXT,
    category TEXT,
    date TEXT,
    \"desc\" TEXT
);
";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}
