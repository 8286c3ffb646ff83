use thiserror::Error;

use crate::model::ids::PoemId;
use crate::model::session::Session;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PoemError {
    #[error("poem title cannot be empty")]
    EmptyTitle,

    #[error("poem has no lines to memorise")]
    NoContentLines,
}

//
// ─── LINE HELPERS ──────────────────────────────────────────────────────────────
//

/// A line that is empty after trimming separates stanzas and is never scored.
#[must_use]
pub fn is_stanza_break(line: &str) -> bool {
    line.trim().is_empty()
}

/// Number of lines that carry text to memorise.
#[must_use]
pub fn content_line_count<S: AsRef<str>>(lines: &[S]) -> usize {
    lines
        .iter()
        .filter(|line| !is_stanza_break(line.as_ref()))
        .count()
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated poem text, as typed or as returned by acquisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoemDraft {
    pub title: String,
    pub author: String,
    pub lines: Vec<String>,
}

impl PoemDraft {
    #[must_use]
    pub fn new(title: impl Into<String>, author: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            lines,
        }
    }

    /// Validate the draft. Title and author are trimmed; lines are kept verbatim.
    ///
    /// # Errors
    ///
    /// Returns `PoemError::EmptyTitle` for a blank title and
    /// `PoemError::NoContentLines` when every line is a stanza break.
    pub fn validate(self) -> Result<ValidatedPoem, PoemError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(PoemError::EmptyTitle);
        }
        if content_line_count(&self.lines) == 0 {
            return Err(PoemError::NoContentLines);
        }
        Ok(ValidatedPoem {
            title,
            author: self.author.trim().to_string(),
            lines: self.lines,
        })
    }
}

/// A poem that passed validation but has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPoem {
    title: String,
    author: String,
    lines: Vec<String>,
}

impl ValidatedPoem {
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Attach the store-assigned id. A new poem starts with no sessions.
    #[must_use]
    pub fn assign_id(self, id: PoemId) -> Poem {
        Poem {
            id,
            title: self.title,
            author: self.author,
            lines: self.lines,
            sessions: Vec::new(),
        }
    }
}

//
// ─── POEM ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poem {
    id: PoemId,
    title: String,
    author: String,
    lines: Vec<String>,
    sessions: Vec<Session>,
}

impl Poem {
    /// Rehydrate a poem from storage.
    ///
    /// # Errors
    ///
    /// Returns `PoemError::EmptyTitle` if the stored title is blank.
    pub fn from_persisted(
        id: PoemId,
        title: String,
        author: String,
        lines: Vec<String>,
        sessions: Vec<Session>,
    ) -> Result<Self, PoemError> {
        if title.trim().is_empty() {
            return Err(PoemError::EmptyTitle);
        }
        Ok(Self {
            id,
            title,
            author,
            lines,
            sessions,
        })
    }

    #[must_use]
    pub fn id(&self) -> &PoemId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Sessions in completion order, oldest first.
    #[must_use]
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    #[must_use]
    pub fn latest_session(&self) -> Option<&Session> {
        self.sessions.last()
    }

    #[must_use]
    pub fn content_line_count(&self) -> usize {
        content_line_count(&self.lines)
    }

    /// Lines that carry text, in order.
    pub fn content_lines(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .map(String::as_str)
            .filter(|line| !is_stanza_break(line))
    }

    pub fn record_session(&mut self, session: Session) {
        self.sessions.push(session);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn counts_only_non_blank_lines() {
        assert_eq!(content_line_count(&["A", "", "  ", "B"]), 2);
        assert_eq!(content_line_count::<&str>(&[]), 0);
    }

    #[test]
    fn draft_rejects_blank_title() {
        let err = PoemDraft::new("  ", "Anon", lines(&["A"]))
            .validate()
            .unwrap_err();
        assert_eq!(err, PoemError::EmptyTitle);
    }

    #[test]
    fn draft_rejects_all_blank_poem() {
        let err = PoemDraft::new("Silence", "Anon", lines(&["", "   ", ""]))
            .validate()
            .unwrap_err();
        assert_eq!(err, PoemError::NoContentLines);
    }

    #[test]
    fn validated_poem_keeps_lines_and_trims_metadata() {
        let poem = PoemDraft::new(" Ozymandias ", " Shelley ", lines(&["I met", "", "a traveller "]))
            .validate()
            .unwrap()
            .assign_id(PoemId::new("p1").unwrap());

        assert_eq!(poem.title(), "Ozymandias");
        assert_eq!(poem.author(), "Shelley");
        assert_eq!(poem.lines(), lines(&["I met", "", "a traveller "]).as_slice());
        assert_eq!(poem.content_line_count(), 2);
        assert_eq!(poem.content_lines().collect::<Vec<_>>(), vec!["I met", "a traveller "]);
        assert!(poem.sessions().is_empty());
    }

    #[test]
    fn record_session_appends_in_order() {
        let mut poem = PoemDraft::new("T", "A", lines(&["x"]))
            .validate()
            .unwrap()
            .assign_id(PoemId::generate());
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        poem.record_session(Session::new(day, 0, 1).unwrap());
        poem.record_session(Session::new(day, 1, 1).unwrap());

        assert_eq!(poem.sessions().len(), 2);
        assert_eq!(poem.latest_session().unwrap().correct(), 1);
    }
}
