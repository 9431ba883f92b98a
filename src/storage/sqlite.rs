//! SQLite storage implementation

use crate::storage::schema::{initialize_schema, tables_exist};
use crate::storage::traits::{StorageError, StorageResult, Store};
use crate::storage::{ArticleRecord, LinkKind};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashSet;
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database at the given path
    ///
    /// Missing tables are created on open, so a fresh database file is
    /// immediately usable.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path).map_err(|e| {
            StorageError::Unavailable(format!("cannot open {}: {}", path.display(), e))
        })?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        let mut store = Self { conn };
        if !store.tables_exist()? {
            store.create_tables()?;
            tracing::info!(path = %path.display(), "created record tables");
        }

        Ok(store)
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        let mut store = Self { conn };
        store.create_tables()?;
        Ok(store)
    }
}

impl Store for SqliteStore {
    fn insert_article(&mut self, record: &ArticleRecord) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO articles (link, tag, date, topic, photo, lead, author, harvested_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.link,
                record.tag,
                record.date,
                record.topic,
                record.photo,
                record.lead,
                record.author,
                now
            ],
        )?;

        if inserted == 0 {
            tracing::debug!(link = %record.link, "article already recorded");
        }
        Ok(())
    }

    fn insert_redirect(&mut self, link: &str) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO redirects (link, observed_at) VALUES (?1, ?2)",
            params![link, now],
        )?;

        if inserted == 0 {
            tracing::debug!(link, "redirect already recorded");
        }
        Ok(())
    }

    fn fetch_links(&self, kind: LinkKind) -> StorageResult<HashSet<String>> {
        let query = match kind {
            LinkKind::Article => "SELECT link FROM articles",
            LinkKind::Redirect => "SELECT link FROM redirects",
        };

        let mut stmt = self.conn.prepare(query)?;
        let links = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<HashSet<_>, _>>()?;

        Ok(links)
    }

    fn get_article(&self, link: &str) -> StorageResult<Option<ArticleRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT link, tag, date, topic, photo, lead, author FROM articles WHERE link = ?1",
        )?;

        let record = stmt
            .query_row(params![link], |row| {
                Ok(ArticleRecord {
                    link: row.get(0)?,
                    tag: row.get(1)?,
                    date: row.get(2)?,
                    topic: row.get(3)?,
                    photo: row.get(4)?,
                    lead: row.get(5)?,
                    author: row.get(6)?,
                })
            })
            .optional()?;

        Ok(record)
    }

    fn tables_exist(&self) -> StorageResult<bool> {
        Ok(tables_exist(&self.conn)?)
    }

    fn create_tables(&mut self) -> StorageResult<()> {
        initialize_schema(&self.conn)?;
        Ok(())
    }

    fn count_articles(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_redirects(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM redirects", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
