//! Database schema definitions

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Articles harvested so far; one row per link, ever
CREATE TABLE IF NOT EXISTS articles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    link TEXT NOT NULL UNIQUE,
    tag TEXT NOT NULL,
    date TEXT NOT NULL,
    topic TEXT NOT NULL,
    photo TEXT NOT NULL,
    lead TEXT NOT NULL,
    author TEXT NOT NULL,
    harvested_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_articles_link ON articles(link);

-- Links that resolved to a redirect instead of an article
CREATE TABLE IF NOT EXISTS redirects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    link TEXT NOT NULL UNIQUE,
    observed_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_redirects_link ON redirects(link);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Checks whether both record tables exist
pub fn tables_exist(conn: &rusqlite::Connection) -> Result<bool, rusqlite::Error> {
    let mut stmt =
        conn.prepare("SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1")?;

    for table in ["articles", "redirects"] {
        let count: i64 = stmt.query_row([table], |row| row.get(0))?;
        if count == 0 {
            return Ok(false);
        }
    }

    Ok(true)
}
