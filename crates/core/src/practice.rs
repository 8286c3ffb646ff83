//! Line-by-line practice of a single poem.
//!
//! A `PracticeSession` exists only while the practice screen is open. Before
//! it is started there is nothing to track (the idle state); once every
//! content line has been revealed and judged it becomes `Complete` and
//! rejects further actions.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

use crate::model::{Poem, PoemId, Session, SessionError, is_stanza_break, score_percentage};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PracticeError {
    #[error("poem has no lines to practise")]
    NoContentLines,

    #[error("practice session already completed")]
    Completed,

    #[error("every line has already been revealed")]
    FullyRevealed,

    #[error("line {index} has not been revealed yet")]
    NotRevealed { index: usize },
}

//
// ─── TYPES ─────────────────────────────────────────────────────────────────────
//

/// Self-assessment for one revealed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Judgment {
    Remembered,
    Missed,
}

impl Judgment {
    #[must_use]
    pub fn is_remembered(self) -> bool {
        matches!(self, Judgment::Remembered)
    }

    fn from_remembered(remembered: bool) -> Self {
        if remembered {
            Judgment::Remembered
        } else {
            Judgment::Missed
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticePhase {
    Revealing,
    Complete,
}

/// A row shown to the user after a reveal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealedLine {
    /// A blank line, shown without judgment controls.
    StanzaBreak { line: usize },
    /// A content line. `index` counts content lines only and keys the score.
    Content {
        line: usize,
        index: usize,
        text: String,
    },
}

impl RevealedLine {
    /// Position in the poem's raw `lines`.
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            RevealedLine::StanzaBreak { line } | RevealedLine::Content { line, .. } => *line,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PracticeProgress {
    pub revealed: usize,
    pub total: usize,
}

impl PracticeProgress {
    /// Revealed share as a whole percentage, clamped to 100.
    #[must_use]
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let pct = self.revealed.min(self.total) * 100 / self.total;
        u32::try_from(pct).unwrap_or(100)
    }
}

/// Final tally of a completed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PracticeScore {
    pub correct: u32,
    pub total: u32,
}

impl PracticeScore {
    #[must_use]
    pub fn percentage(&self) -> u32 {
        score_percentage(self.correct, self.total)
    }

    /// Stamp the score with the completion date.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the tally is inconsistent.
    pub fn to_session(self, date: NaiveDate) -> Result<Session, SessionError> {
        Session::new(date, self.correct, self.total)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JudgeOutcome {
    /// More lines to reveal or judge.
    Pending,
    /// This judgment finished the session.
    Completed(PracticeScore),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Transient reveal/score state for one practice attempt.
#[derive(Clone, PartialEq, Eq)]
pub struct PracticeSession {
    poem_id: PoemId,
    lines: Vec<String>,
    content_total: usize,
    revealed_count: usize,
    cursor: usize,
    scores: BTreeMap<usize, bool>,
    revealed: Vec<RevealedLine>,
    phase: PracticePhase,
}

impl PracticeSession {
    /// Start practising `poem` with nothing revealed.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::NoContentLines` for a poem made only of blank lines.
    pub fn start(poem: &Poem) -> Result<Self, PracticeError> {
        let content_total = poem.content_line_count();
        if content_total == 0 {
            return Err(PracticeError::NoContentLines);
        }
        Ok(Self {
            poem_id: poem.id().clone(),
            lines: poem.lines().to_vec(),
            content_total,
            revealed_count: 0,
            cursor: 0,
            scores: BTreeMap::new(),
            revealed: Vec::new(),
            phase: PracticePhase::Revealing,
        })
    }

    #[must_use]
    pub fn poem_id(&self) -> &PoemId {
        &self.poem_id
    }

    #[must_use]
    pub fn phase(&self) -> PracticePhase {
        self.phase
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == PracticePhase::Complete
    }

    #[must_use]
    pub fn content_line_count(&self) -> usize {
        self.content_total
    }

    #[must_use]
    pub fn revealed_count(&self) -> usize {
        self.revealed_count
    }

    /// Every row revealed so far, in poem order.
    #[must_use]
    pub fn revealed_lines(&self) -> &[RevealedLine] {
        &self.revealed
    }

    #[must_use]
    pub fn can_reveal(&self) -> bool {
        !self.is_complete() && self.revealed_count < self.content_total
    }

    #[must_use]
    pub fn judgment(&self, index: usize) -> Option<Judgment> {
        self.scores.get(&index).copied().map(Judgment::from_remembered)
    }

    #[must_use]
    pub fn judged_count(&self) -> usize {
        self.scores.len()
    }

    #[must_use]
    pub fn progress(&self) -> PracticeProgress {
        PracticeProgress {
            revealed: self.revealed_count,
            total: self.content_total,
        }
    }

    /// The final tally, once the session is complete.
    #[must_use]
    pub fn score(&self) -> Option<PracticeScore> {
        self.is_complete().then(|| self.tally())
    }

    /// Reveal the next content line together with the blank lines around it.
    ///
    /// Blank lines before the first content line and every blank line directly
    /// after the revealed one are included, so trailing stanza breaks at the end
    /// of the poem arrive with its last line. Returns the rows added by this call.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::Completed` after completion and
    /// `PracticeError::FullyRevealed` when no content line is left.
    pub fn reveal(&mut self) -> Result<&[RevealedLine], PracticeError> {
        if self.is_complete() {
            return Err(PracticeError::Completed);
        }
        if self.revealed_count >= self.content_total {
            return Err(PracticeError::FullyRevealed);
        }

        let first_new = self.revealed.len();

        while self.cursor < self.lines.len() && is_stanza_break(&self.lines[self.cursor]) {
            self.revealed.push(RevealedLine::StanzaBreak { line: self.cursor });
            self.cursor += 1;
        }

        // `revealed_count < content_total` guarantees a content line remains.
        if let Some(text) = self.lines.get(self.cursor) {
            self.revealed.push(RevealedLine::Content {
                line: self.cursor,
                index: self.revealed_count,
                text: text.clone(),
            });
            self.cursor += 1;
            self.revealed_count += 1;
        }

        while self.cursor < self.lines.len() && is_stanza_break(&self.lines[self.cursor]) {
            self.revealed.push(RevealedLine::StanzaBreak { line: self.cursor });
            self.cursor += 1;
        }

        Ok(&self.revealed[first_new..])
    }

    /// Record (or change) the judgment for a revealed content line.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::Completed` after completion and
    /// `PracticeError::NotRevealed` for an index that has not been revealed.
    pub fn judge(&mut self, index: usize, judgment: Judgment) -> Result<JudgeOutcome, PracticeError> {
        if self.is_complete() {
            return Err(PracticeError::Completed);
        }
        if index >= self.revealed_count {
            return Err(PracticeError::NotRevealed { index });
        }

        self.scores.insert(index, judgment.is_remembered());

        if self.revealed_count == self.content_total && self.scores.len() == self.content_total {
            self.phase = PracticePhase::Complete;
            return Ok(JudgeOutcome::Completed(self.tally()));
        }
        Ok(JudgeOutcome::Pending)
    }

    fn tally(&self) -> PracticeScore {
        let correct = self.scores.values().filter(|remembered| **remembered).count();
        PracticeScore {
            correct: u32::try_from(correct).unwrap_or(u32::MAX),
            total: u32::try_from(self.content_total).unwrap_or(u32::MAX),
        }
    }
}

impl fmt::Debug for PracticeSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PracticeSession")
            .field("poem_id", &self.poem_id)
            .field("phase", &self.phase)
            .field("revealed_count", &self.revealed_count)
            .field("content_total", &self.content_total)
            .field("judged", &self.scores.len())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
