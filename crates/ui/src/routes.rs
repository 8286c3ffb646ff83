use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{HistoryView, HomeView, PracticeView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/practice/:poem_id", PracticeView)] Practice { poem_id: String },
        #[route("/history/:poem_id", HistoryView)] History { poem_id: String },
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            header { class: "topbar",
                Link { class: "brand", to: Route::Home {}, "Poem Memoriser" }
            }
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
