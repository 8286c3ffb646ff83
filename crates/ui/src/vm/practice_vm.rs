use recite_core::model::{PoemId, ScoreBand};
use recite_core::practice::{Judgment, PracticeSession, RevealedLine};
use services::{PoemService, PracticeService};

use crate::views::ViewError;
use crate::vm::score_vm::{band_class, score_label};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PracticeIntent {
    Reveal,
    Judge { index: usize, judgment: Judgment },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PracticeOutcome {
    Continue,
    Completed,
}

/// One row on the practice screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PracticeRowVm {
    Break {
        key: usize,
    },
    Line {
        key: usize,
        index: usize,
        text: String,
        judgment: Option<Judgment>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PracticeResultVm {
    pub label: String,
    pub band_class: &'static str,
}

/// Practice screen state: the poem header plus the transient session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PracticeVm {
    title: String,
    author: String,
    session: PracticeSession,
}

impl PracticeVm {
    #[must_use]
    pub fn new(title: String, author: String, session: PracticeSession) -> Self {
        Self {
            title,
            author,
            session,
        }
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
    pub fn session(&self) -> &PracticeSession {
        &self.session
    }

    #[must_use]
    pub fn can_reveal(&self) -> bool {
        self.session.can_reveal()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.session.is_complete()
    }

    #[must_use]
    pub fn progress_percent(&self) -> u32 {
        self.session.progress().percent()
    }

    #[must_use]
    pub fn progress_label(&self) -> String {
        let progress = self.session.progress();
        format!("{} / {} lines", progress.revealed, progress.total)
    }

    #[must_use]
    pub fn rows(&self) -> Vec<PracticeRowVm> {
        self.session
            .revealed_lines()
            .iter()
            .map(|row| match row {
                RevealedLine::StanzaBreak { line } => PracticeRowVm::Break { key: *line },
                RevealedLine::Content { line, index, text } => PracticeRowVm::Line {
                    key: *line,
                    index: *index,
                    text: text.clone(),
                    judgment: self.session.judgment(*index),
                },
            })
            .collect()
    }

    #[must_use]
    pub fn result(&self) -> Option<PracticeResultVm> {
        let score = self.session.score()?;
        let pct = score.percentage();
        Some(PracticeResultVm {
            label: score_label(score.correct, score.total, pct),
            band_class: band_class(ScoreBand::from_percentage(pct)),
        })
    }

    /// Reveal the next line. Ignored once everything is revealed.
    pub fn reveal(&mut self) {
        if self.session.can_reveal() {
            let _ = self.session.reveal();
        }
    }

    /// # Errors
    ///
    /// Returns the mapped `ViewError` when the judgment is rejected or the
    /// finished session cannot be saved.
    pub async fn judge(
        &mut self,
        practice: &PracticeService,
        index: usize,
        judgment: Judgment,
    ) -> Result<PracticeOutcome, ViewError> {
        let result = practice
            .judge(&mut self.session, index, judgment)
            .await
            .map_err(|e| ViewError::from(&e))?;
        if result.is_complete() {
            Ok(PracticeOutcome::Completed)
        } else {
            Ok(PracticeOutcome::Continue)
        }
    }
}

/// Load the poem and start a fresh attempt.
///
/// # Errors
///
/// Returns `ViewError::NotFound` for an unknown poem and
/// `ViewError::NoContentLines` for a poem without content lines.
pub async fn start_practice(
    poems: &PoemService,
    practice: &PracticeService,
    poem_id: &str,
) -> Result<PracticeVm, ViewError> {
    let id = PoemId::new(poem_id).map_err(|_| ViewError::NotFound)?;
    let poem = poems.poem(&id).await.map_err(|e| ViewError::from(&e))?;
    let session = practice
        .start_practice(&id)
        .await
        .map_err(|e| ViewError::from(&e))?;
    Ok(PracticeVm::new(
        poem.title().to_string(),
        poem.author().to_string(),
        session,
    ))
}
