use recite_core::model::Poem;

use crate::vm::score_vm::{band_class, score_label};
use crate::vm::time_fmt::format_date;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionRowVm {
    pub date_label: String,
    pub score_label: String,
    pub band_class: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoemHistoryVm {
    pub title: String,
    pub author: String,
    /// Most recent first.
    pub rows: Vec<SessionRowVm>,
}

#[must_use]
pub fn map_poem_history(poem: &Poem) -> PoemHistoryVm {
    let rows = poem
        .sessions()
        .iter()
        .rev()
        .map(|session| SessionRowVm {
            date_label: format_date(session.date()),
            score_label: score_label(session.correct(), session.total(), session.percentage()),
            band_class: band_class(session.band()),
        })
        .collect();
    PoemHistoryVm {
        title: poem.title().to_string(),
        author: poem.author().to_string(),
        rows,
    }
}
