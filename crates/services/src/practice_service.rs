use std::sync::Arc;

use recite_core::model::{PoemId, Session};
use recite_core::practice::{JudgeOutcome, Judgment, PracticeSession};
use storage::repository::{PoemRepository, StorageError};

use crate::Clock;
use crate::error::PracticeServiceError;

/// Result of judging a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JudgeResult {
    pub outcome: JudgeOutcome,
    /// The session appended to the poem's history when this judgment completed it.
    pub recorded: Option<Session>,
}

impl JudgeResult {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.outcome, JudgeOutcome::Completed(_))
    }
}

/// Starts practice sessions and records them once complete.
#[derive(Clone)]
pub struct PracticeService {
    clock: Clock,
    poems: Arc<dyn PoemRepository>,
}

impl PracticeService {
    #[must_use]
    pub fn new(clock: Clock, poems: Arc<dyn PoemRepository>) -> Self {
        Self { clock, poems }
    }

    /// Start a fresh attempt on the given poem.
    ///
    /// # Errors
    ///
    /// Returns `PracticeServiceError::NotFound` for an unknown poem and
    /// `PracticeServiceError::Practice` for a poem without content lines.
    pub async fn start_practice(
        &self,
        poem_id: &PoemId,
    ) -> Result<PracticeSession, PracticeServiceError> {
        let poem = self
            .poems
            .get_poem(poem_id)
            .await?
            .ok_or(PracticeServiceError::NotFound)?;
        let session = PracticeSession::start(&poem)?;
        tracing::info!(
            poem_id = %poem_id,
            lines = session.content_line_count(),
            "practice started"
        );
        Ok(session)
    }

    /// Judge a revealed line and persist the session when this completes it.
    ///
    /// # Errors
    ///
    /// Returns `PracticeServiceError::Practice` for rejected transitions and
    /// `PracticeServiceError::NotFound` if the poem was deleted before the
    /// session could be recorded. When recording fails the session is left
    /// unchanged, so the same judgment can be retried.
    pub async fn judge(
        &self,
        session: &mut PracticeSession,
        index: usize,
        judgment: Judgment,
    ) -> Result<JudgeResult, PracticeServiceError> {
        // Judge a copy so a failed save leaves the caller's session open for a retry.
        let mut next = session.clone();
        let outcome = next.judge(index, judgment)?;
        let JudgeOutcome::Completed(score) = outcome else {
            *session = next;
            return Ok(JudgeResult {
                outcome,
                recorded: None,
            });
        };

        let record = score.to_session(self.clock.today())?;
        self.poems
            .append_session(next.poem_id(), &record)
            .await
            .map_err(|e| match e {
                StorageError::NotFound => PracticeServiceError::NotFound,
                other => PracticeServiceError::Storage(other),
            })?;
        tracing::info!(
            poem_id = %session.poem_id(),
            correct = record.correct(),
            total = record.total(),
            percentage = record.percentage(),
            "practice completed"
        );
        *session = next;

        Ok(JudgeResult {
            outcome,
            recorded: Some(record),
        })
    }
}
