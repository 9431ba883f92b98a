//! Storage trait and error types

use crate::storage::{ArticleRecord, LinkKind};
use std::collections::HashSet;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Contract with the persistent link store
///
/// The store holds two record classes keyed by their unique `link`: articles
/// and redirects. Inserts are idempotent with respect to that key: writing
/// a link that is already present is a no-op, never an error. That property
/// is what makes interrupted runs safely resumable.
pub trait Store {
    /// Inserts an article record; a duplicate link is silently ignored
    fn insert_article(&mut self, record: &ArticleRecord) -> StorageResult<()>;

    /// Records a link that resolved to a redirect; duplicates ignored
    fn insert_redirect(&mut self, link: &str) -> StorageResult<()>;

    /// Fetches every persisted link of the given kind
    fn fetch_links(&self, kind: LinkKind) -> StorageResult<HashSet<String>>;

    /// Fetches the article persisted for a link, if any
    fn get_article(&self, link: &str) -> StorageResult<Option<ArticleRecord>>;

    /// Checks whether both record tables exist
    fn tables_exist(&self) -> StorageResult<bool>;

    /// Creates the record tables if they don't already exist
    fn create_tables(&mut self) -> StorageResult<()>;

    /// Total number of persisted articles
    fn count_articles(&self) -> StorageResult<u64>;

    /// Total number of persisted redirects
    fn count_redirects(&self) -> StorageResult<u64>;
}
