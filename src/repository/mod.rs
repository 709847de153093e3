mod embedded;

use embedded::migrations;

use chrono::{DateTime, SecondsFormat, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OptionalExtension, Row, params, types::Type};

use std::path::Path;

use crate::models::Note;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("failed to acquire database connection: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] refinery::Error),

    #[error("database task panicked or was cancelled: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Handle to the notes database.
///
/// Cloning is cheap: every clone shares the same connection pool. Each
/// operation checks a connection out of the pool for its own duration and
/// hands it back when the guard drops, whether the operation succeeded,
/// found nothing or failed.
#[derive(Clone)]
pub struct Repository {
    pool: Pool<SqliteConnectionManager>,
}

impl Repository {
    /// Opens (creating if needed) the SQLite file at `database_path`.
    ///
    /// The pool opens its initial connections eagerly, so that happens on
    /// the blocking thread pool.
    pub async fn new(database_path: &Path) -> Result<Self, RepositoryError> {
        let manager = SqliteConnectionManager::file(database_path);
        let pool = tokio::task::spawn_blocking(move || Pool::new(manager)).await??;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), RepositoryError> {
        let migrations_report = self
            .with_connection(|conn| Ok(migrations::runner().run(conn)?))
            .await?;

        for migration in migrations_report.applied_migrations() {
            tracing::info!(
                "Migration Applied -  Name: {}, Version: {}",
                migration.name(),
                migration.version()
            );
        }

        tracing::info!("DB migrations finished!");

        Ok(())
    }

    pub async fn create_note(&self, title: String, content: String) -> Result<Note, RepositoryError> {
        self.with_connection(move |conn| {
            let note = conn.query_row(
                "INSERT INTO note (title, content, created_at) VALUES (?1, ?2, ?3) \
                 RETURNING id, title, content, created_at",
                params![title, content, now_timestamp()],
                note_from_row,
            )?;

            Ok(note)
        })
        .await
    }

    pub async fn update_note(
        &self,
        id: i64,
        title: String,
        content: String,
    ) -> Result<Option<Note>, RepositoryError> {
        self.with_connection(move |conn| {
            let note = conn
                .query_row(
                    "UPDATE note SET title = ?1, content = ?2, created_at = ?3 WHERE id = ?4 \
                     RETURNING id, title, content, created_at",
                    params![title, content, now_timestamp(), id],
                    note_from_row,
                )
                .optional()?;

            Ok(note)
        })
        .await
    }

    pub async fn delete_note(&self, id: i64) -> Result<bool, RepositoryError> {
        self.with_connection(move |conn| {
            let rows = conn.execute("DELETE FROM note WHERE id = ?1", params![id])?;

            Ok(rows == 1)
        })
        .await
    }

    pub async fn get_one_note(&self, id: i64) -> Result<Option<Note>, RepositoryError> {
        self.with_connection(move |conn| {
            let note = conn
                .query_row(
                    "SELECT id, title, content, created_at FROM note WHERE id = ?1",
                    params![id],
                    note_from_row,
                )
                .optional()?;

            Ok(note)
        })
        .await
    }

    pub async fn get_all_notes(&self) -> Result<Vec<Note>, RepositoryError> {
        self.with_connection(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, title, content, created_at FROM note ORDER BY id")?;
            let notes = stmt
                .query_map([], note_from_row)?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(notes)
        })
        .await
    }

    /// Runs `op` on a pooled connection inside the blocking thread pool.
    async fn with_connection<T, F>(&self, op: F) -> Result<T, RepositoryError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, RepositoryError> + Send + 'static,
    {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            op(&mut conn)
        })
        .await?
    }
}

fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    let created_at: String = row.get("created_at")?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);

    Ok(Note {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    async fn setup() -> (Repository, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::new(&dir.path().join("notes.db")).await.unwrap();
        repo.migrate().await.unwrap();
        (repo, dir)
    }

    #[tokio::test]
    async fn test_create_assigns_fresh_ids() {
        let (repo, _dir) = setup().await;

        let first = repo.create_note("A".into(), "B".into()).await.unwrap();
        let second = repo.create_note("C".into(), "D".into()).await.unwrap();

        assert!(first.id >= 1);
        assert_eq!(first.title, "A");
        assert_eq!(first.content, "B");
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_get_all_notes_ordered_by_id() {
        let (repo, _dir) = setup().await;
        assert!(repo.get_all_notes().await.unwrap().is_empty());

        let first = repo.create_note("one".into(), "1".into()).await.unwrap();
        let second = repo.create_note("two".into(), "2".into()).await.unwrap();

        let notes = repo.get_all_notes().await.unwrap();
        assert_eq!(notes, vec![first, second]);
    }

    #[tokio::test]
    async fn test_update_keeps_id_and_restamps() {
        let (repo, _dir) = setup().await;
        let created = repo.create_note("title".into(), "old".into()).await.unwrap();

        let updated = repo
            .update_note(created.id, "title".into(), "new".into())
            .await
            .unwrap()
            .expect("note should exist");

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.content, "new");
        assert!(updated.created_at >= created.created_at);
        assert_eq!(repo.get_one_note(created.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn test_update_missing_note() {
        let (repo, _dir) = setup().await;

        let updated = repo.update_note(42, "t".into(), "c".into()).await.unwrap();
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let (repo, _dir) = setup().await;
        let note = repo.create_note("t".into(), "c".into()).await.unwrap();

        assert!(repo.delete_note(note.id).await.unwrap());
        assert!(!repo.delete_note(note.id).await.unwrap());
        assert!(repo.get_one_note(note.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let (repo, _dir) = setup().await;
        repo.create_note("t".into(), "c".into()).await.unwrap();

        repo.migrate().await.unwrap();

        assert_eq!(repo.get_all_notes().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let (repo, _dir) = setup().await;
        let first = repo.create_note("t".into(), "c".into()).await.unwrap();
        repo.delete_note(first.id).await.unwrap();

        let second = repo.create_note("t".into(), "c".into()).await.unwrap();
        assert!(second.id > first.id);
    }
}
