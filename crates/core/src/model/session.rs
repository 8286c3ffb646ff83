use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("correct lines ({correct}) exceed total lines ({total})")]
    CorrectExceedsTotal { correct: u32, total: u32 },
}

/// Rounded percentage of `correct` out of `total`, or 0 when `total` is 0.
#[must_use]
pub fn score_percentage(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    // round(100 * c / t) with halves rounded up, in integer arithmetic.
    let c = u64::from(correct);
    let t = u64::from(total);
    u32::try_from((200 * c + t) / (2 * t)).unwrap_or(u32::MAX)
}

/// Coarse grading of a percentage, used for colouring scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    /// 80% and above.
    High,
    /// 50% to 79%.
    Mid,
    /// Below 50%.
    Low,
}

impl ScoreBand {
    #[must_use]
    pub fn from_percentage(pct: u32) -> Self {
        if pct >= 80 {
            Self::High
        } else if pct >= 50 {
            Self::Mid
        } else {
            Self::Low
        }
    }
}

/// One completed practice attempt, appended to a poem's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    date: NaiveDate,
    correct: u32,
    total: u32,
}

impl Session {
    /// # Errors
    ///
    /// Returns `SessionError::CorrectExceedsTotal` if `correct > total`.
    pub fn new(date: NaiveDate, correct: u32, total: u32) -> Result<Self, SessionError> {
        if correct > total {
            return Err(SessionError::CorrectExceedsTotal { correct, total });
        }
        Ok(Self {
            date,
            correct,
            total,
        })
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn percentage(&self) -> u32 {
        score_percentage(self.correct, self.total)
    }

    #[must_use]
    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_percentage(self.percentage())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn session_rejects_more_correct_than_total() {
        let err = Session::new(date(), 3, 2).unwrap_err();
        assert_eq!(err, SessionError::CorrectExceedsTotal { correct: 3, total: 2 });
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(score_percentage(1, 2), 50);
        assert_eq!(score_percentage(2, 3), 67);
        assert_eq!(score_percentage(1, 3), 33);
        assert_eq!(score_percentage(1, 8), 13);
        assert_eq!(score_percentage(0, 0), 0);
    }

    #[test]
    fn bands_follow_thresholds() {
        assert_eq!(ScoreBand::from_percentage(80), ScoreBand::High);
        assert_eq!(ScoreBand::from_percentage(79), ScoreBand::Mid);
        assert_eq!(ScoreBand::from_percentage(50), ScoreBand::Mid);
        assert_eq!(ScoreBand::from_percentage(49), ScoreBand::Low);
        let session = Session::new(date(), 9, 10).unwrap();
        assert_eq!(session.band(), ScoreBand::High);
    }
}
