//! Schema versioning for the SQLite store.
//!
//! The applied version lives in SQLite's `user_version` header field, so no
//! bookkeeping table is needed. Migration `n` (1-based) moves the database
//! from version `n - 1` to `n`.

use rusqlite::Connection;

use crate::error::{Error, Result};

const MIGRATIONS: &[&str] = &[include_str!("migrations/001_initial.sql")];

pub fn schema_version(conn: &Connection) -> Result<i64> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Brings the schema up to the latest version, one transaction per step.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let current = schema_version(conn)?;

    for (version, sql) in (1_i64..).zip(MIGRATIONS).skip_while(|(v, _)| *v <= current) {
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql)
            .and_then(|_| tx.pragma_update(None, "user_version", version))
            .map_err(|e| Error::persistence(format!("schema upgrade to v{} failed: {}", version, e)))?;
        tx.commit()?;
        tracing::info!("Upgraded store schema to v{}", version);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn latest() -> i64 {
        MIGRATIONS.len() as i64
    }

    #[test]
    fn fresh_database_reaches_latest_version() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(schema_version(&conn).unwrap(), 0);

        run_migrations(&conn).unwrap();

        let tables: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='records'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 1);
        assert_eq!(schema_version(&conn).unwrap(), latest());
    }

    #[test]
    fn rerunning_is_a_no_op() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn.execute("INSERT INTO records (key, value, updated_at) VALUES ('k', 'v', 'now')", [])
            .unwrap();

        run_migrations(&conn).unwrap();

        let value: String = conn
            .query_row("SELECT value FROM records WHERE key = 'k'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(value, "v");
        assert_eq!(schema_version(&conn).unwrap(), latest());
    }
}
