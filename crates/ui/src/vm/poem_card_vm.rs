use recite_core::model::Poem;

use crate::vm::score_vm::band_class;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoemCardVm {
    pub id: String,
    pub title: String,
    pub author: String,
    pub line_count_label: String,
    /// Latest score, e.g. `("86%", "score-high")`.
    pub latest: Option<(String, &'static str)>,
    pub sessions_label: String,
}

impl From<&Poem> for PoemCardVm {
    fn from(poem: &Poem) -> Self {
        let count = poem.sessions().len();
        let sessions_label = match count {
            0 => "Not practised".to_string(),
            1 => "1 session".to_string(),
            n => format!("{n} sessions"),
        };
        let lines = poem.content_line_count();
        let line_count_label = if lines == 1 {
            "1 line".to_string()
        } else {
            format!("{lines} lines")
        };
        Self {
            id: poem.id().to_string(),
            title: poem.title().to_string(),
            author: poem.author().to_string(),
            line_count_label,
            latest: poem
                .latest_session()
                .map(|s| (format!("{}%", s.percentage()), band_class(s.band()))),
            sessions_label,
        }
    }
}

#[must_use]
pub fn map_poem_cards(poems: &[Poem]) -> Vec<PoemCardVm> {
    poems.iter().map(PoemCardVm::from).collect()
}
