use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use recite_core::time::fixed_clock;
use services::{PoemFetchService, PoemService, PracticeService};
use storage::repository::{PoemRepository, Storage};

use crate::context::{UiApp, build_app_context};
use crate::views::{HistoryView, HomeView, PracticeView};

#[derive(Clone)]
struct TestApp {
    poems: Arc<PoemService>,
    practice: Arc<PracticeService>,
    fetch: Arc<PoemFetchService>,
}

impl UiApp for TestApp {
    fn poem_service(&self) -> Arc<PoemService> {
        Arc::clone(&self.poems)
    }

    fn practice_service(&self) -> Arc<PracticeService> {
        Arc::clone(&self.practice)
    }

    fn fetch_service(&self) -> Arc<PoemFetchService> {
        Arc::clone(&self.fetch)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    Practice(String),
    History(String),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Practice(poem_id) => rsx! { PracticeView { poem_id } },
        ViewKind::History(poem_id) => rsx! { HistoryView { poem_id } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
}

impl ViewHarness {
    pub async fn settle(&mut self) {
        self.dom.rebuild_in_place();
        for _ in 0..4 {
            let _ = tokio::time::timeout(
                std::time::Duration::from_millis(50),
                self.dom.wait_for_work(),
            )
            .await;
            self.dom.render_immediate(&mut NoOpMutations);
            self.dom.process_events();
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn setup_view_harness(view: ViewKind, storage: &Storage) -> ViewHarness {
    setup_view_harness_with_repo(view, Arc::clone(&storage.poems))
}

pub fn setup_view_harness_with_repo(view: ViewKind, poems: Arc<dyn PoemRepository>) -> ViewHarness {
    let app = Arc::new(TestApp {
        poems: Arc::new(PoemService::new(Arc::clone(&poems))),
        practice: Arc::new(PracticeService::new(fixed_clock(), poems)),
        fetch: Arc::new(PoemFetchService::new(None)),
    });
    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });
    ViewHarness { dom }
}
