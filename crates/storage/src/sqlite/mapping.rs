use recite_core::model::{Poem, PoemId, Session};
use sqlx::Row;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

/// Poem lines are stored as a JSON array so blank lines survive verbatim.
pub(crate) fn lines_to_text(lines: &[String]) -> Result<String, StorageError> {
    serde_json::to_string(lines).map_err(ser)
}

pub(crate) fn lines_from_text(raw: &str) -> Result<Vec<String>, StorageError> {
    serde_json::from_str(raw).map_err(ser)
}

pub(crate) fn map_session_row(row: &sqlx::sqlite::SqliteRow) -> Result<Session, StorageError> {
    let practiced_on = row.try_get("practiced_on").map_err(ser)?;
    let correct = u32_from_i64("correct", row.try_get::<i64, _>("correct").map_err(ser)?)?;
    let total = u32_from_i64("total", row.try_get::<i64, _>("total").map_err(ser)?)?;
    Session::new(practiced_on, correct, total).map_err(ser)
}

pub(crate) fn map_poem_row(
    row: &sqlx::sqlite::SqliteRow,
    sessions: Vec<Session>,
) -> Result<Poem, StorageError> {
    let id = PoemId::new(row.try_get::<String, _>("id").map_err(ser)?).map_err(ser)?;
    let lines = lines_from_text(&row.try_get::<String, _>("lines").map_err(ser)?)?;
    Poem::from_persisted(
        id,
        row.try_get("title").map_err(ser)?,
        row.try_get("author").map_err(ser)?,
        lines,
        sessions,
    )
    .map_err(ser)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_keep_blank_entries() {
        let lines = vec!["A".to_string(), String::new(), "  ".to_string(), "B".to_string()];
        let text = lines_to_text(&lines).unwrap();
        assert_eq!(lines_from_text(&text).unwrap(), lines);
    }

    #[test]
    fn corrupt_lines_are_a_serialization_error() {
        assert!(matches!(
            lines_from_text("not json"),
            Err(StorageError::Serialization(_))
        ));
    }
}
