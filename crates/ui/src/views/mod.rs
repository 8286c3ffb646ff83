mod history;
mod home;
mod practice;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use history::HistoryView;
pub use home::HomeView;
pub use practice::PracticeView;
pub use state::{ViewError, ViewState, view_state_from_resource};
