// Table bootstrap
// Idempotent: safe to run on every connect

use rusqlite::Connection;

const CREATE_WORDS: &str = r"
CREATE TABLE IF NOT EXISTS words (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    word       TEXT    NOT NULL UNIQUE,
    frequency  INTEGER NOT NULL DEFAULT 0,
    createtime TEXT    NOT NULL
)";

const CREATE_WEEK: &str = r"
CREATE TABLE IF NOT EXISTS week (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    content   TEXT    NOT NULL,
    starttime TEXT    NOT NULL,
    endtime   TEXT,
    type      INTEGER NOT NULL,
    status    INTEGER NOT NULL
)";

pub fn init(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(CREATE_WORDS)?;
    conn.execute_batch(CREATE_WEEK)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init(&conn).unwrap();
        init(&conn).unwrap();

        conn.execute(
            "INSERT INTO words (word, createtime) VALUES ('cat', '2024-01-01 00:00:00')",
            [],
        )
        .unwrap();
        let duplicate = conn.execute(
            "INSERT INTO words (word, createtime) VALUES ('cat', '2024-01-01 00:00:00')",
            [],
        );
        assert!(duplicate.is_err());
    }
}
