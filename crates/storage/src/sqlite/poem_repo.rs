use std::collections::HashMap;

use recite_core::model::{Poem, PoemId, Session, ValidatedPoem};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{lines_to_text, map_poem_row, map_session_row, ser};
use crate::repository::{PoemRepository, StorageError};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

impl SqliteRepository {
    async fn sessions_for(&self, id: &PoemId) -> Result<Vec<Session>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT practiced_on, correct, total
                FROM poem_sessions
                WHERE poem_id = ?1
                ORDER BY id ASC
            ",
        )
        .bind(id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_session_row).collect()
    }
}

#[async_trait::async_trait]
impl PoemRepository for SqliteRepository {
    async fn list_poems(&self) -> Result<Vec<Poem>, StorageError> {
        let poem_rows = sqlx::query(
            r"
                SELECT id, title, author, lines
                FROM poems
                ORDER BY seq ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let session_rows = sqlx::query(
            r"
                SELECT poem_id, practiced_on, correct, total
                FROM poem_sessions
                ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut sessions: HashMap<String, Vec<Session>> = HashMap::new();
        for row in &session_rows {
            let poem_id: String = row.try_get("poem_id").map_err(ser)?;
            sessions
                .entry(poem_id)
                .or_default()
                .push(map_session_row(row)?);
        }

        let mut poems = Vec::with_capacity(poem_rows.len());
        for row in &poem_rows {
            let id: String = row.try_get("id").map_err(ser)?;
            let history = sessions.remove(&id).unwrap_or_default();
            poems.push(map_poem_row(row, history)?);
        }
        Ok(poems)
    }

    async fn insert_poem(&self, poem: ValidatedPoem) -> Result<Poem, StorageError> {
        let poem = poem.assign_id(PoemId::generate());
        let lines = lines_to_text(poem.lines())?;

        sqlx::query(
            r"
                INSERT INTO poems (id, title, author, lines)
                VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(poem.id().as_str())
        .bind(poem.title())
        .bind(poem.author())
        .bind(lines)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let duplicate = e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation());
            if duplicate {
                StorageError::Conflict
            } else {
                conn(e)
            }
        })?;

        Ok(poem)
    }

    async fn get_poem(&self, id: &PoemId) -> Result<Option<Poem>, StorageError> {
        let row = sqlx::query(
            r"
                SELECT id, title, author, lines
                FROM poems
                WHERE id = ?1
            ",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        match row {
            Some(row) => {
                let sessions = self.sessions_for(id).await?;
                map_poem_row(&row, sessions).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn delete_poem(&self, id: &PoemId) -> Result<(), StorageError> {
        // Sessions go with the poem through ON DELETE CASCADE.
        sqlx::query("DELETE FROM poems WHERE id = ?1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }

    async fn append_session(&self, id: &PoemId, session: &Session) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        let exists = sqlx::query("SELECT 1 FROM poems WHERE id = ?1")
            .bind(id.as_str())
            .fetch_optional(&mut *tx)
            .await
            .map_err(conn)?
            .is_some();
        if !exists {
            return Err(StorageError::NotFound);
        }

        sqlx::query(
            r"
                INSERT INTO poem_sessions (poem_id, practiced_on, correct, total)
                VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(id.as_str())
        .bind(session.date())
        .bind(i64::from(session.correct()))
        .bind(i64::from(session.total()))
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        tx.commit().await.map_err(conn)?;
        Ok(())
    }
}
