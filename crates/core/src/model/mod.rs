mod ids;
mod poem;
mod query;
mod session;

pub use ids::{ParseIdError, PoemId};

pub use poem::{Poem, PoemDraft, PoemError, ValidatedPoem, content_line_count, is_stanza_break};
pub use query::{PoemLookup, PoemQuery, QueryError};
pub use session::{ScoreBand, Session, SessionError, score_percentage};
