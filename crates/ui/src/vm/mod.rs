mod history_vm;
mod poem_card_vm;
mod practice_vm;
mod score_vm;
mod time_fmt;

pub use history_vm::{PoemHistoryVm, SessionRowVm, map_poem_history};
pub use poem_card_vm::{PoemCardVm, map_poem_cards};
pub use practice_vm::{
    PracticeIntent, PracticeOutcome, PracticeResultVm, PracticeRowVm, PracticeVm, start_practice,
};
pub use score_vm::{band_class, score_label};
pub use time_fmt::format_date;
