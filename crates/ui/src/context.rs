use std::sync::Arc;

use services::{PoemFetchService, PoemService, PracticeService};

pub trait UiApp: Send + Sync {
    fn poem_service(&self) -> Arc<PoemService>;
    fn practice_service(&self) -> Arc<PracticeService>;
    fn fetch_service(&self) -> Arc<PoemFetchService>;
}

#[derive(Clone)]
pub struct AppContext {
    poems: Arc<PoemService>,
    practice: Arc<PracticeService>,
    fetch: Arc<PoemFetchService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            poems: app.poem_service(),
            practice: app.practice_service(),
            fetch: app.fetch_service(),
        }
    }

    #[must_use]
    pub fn poems(&self) -> Arc<PoemService> {
        Arc::clone(&self.poems)
    }

    #[must_use]
    pub fn practice(&self) -> Arc<PracticeService> {
        Arc::clone(&self.practice)
    }

    #[must_use]
    pub fn fetch(&self) -> Arc<PoemFetchService> {
        Arc::clone(&self.fetch)
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
