use dioxus::prelude::*;
use dioxus_router::Link;
use recite_core::model::PoemId;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{PoemHistoryVm, SessionRowVm, map_poem_history};

#[component]
pub fn HistoryView(poem_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let poems = ctx.poems();

    let poem_id_for_resource = poem_id.clone();
    let resource = use_resource(move || {
        let poems = poems.clone();
        let poem_id = poem_id_for_resource.clone();
        async move {
            let id = PoemId::new(poem_id).map_err(|_| ViewError::NotFound)?;
            let poem = poems.poem(&id).await.map_err(|e| ViewError::from(&e))?;
            Ok::<PoemHistoryVm, ViewError>(map_poem_history(&poem))
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page history-page",
            Link { class: "btn btn-link back-btn", to: Route::Home {}, "← Back" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    header { class: "view-header",
                        h2 { class: "view-title", "{data.title}" }
                        p { class: "view-subtitle", "{data.author}" }
                    }
                    if data.rows.is_empty() {
                        p { class: "empty-state", "Not practised yet." }
                    } else {
                        ul { class: "history-list",
                            for row in data.rows {
                                HistoryRow { row }
                            }
                        }
                    }
                    Link {
                        class: "btn btn-primary",
                        to: Route::Practice { poem_id: poem_id.clone() },
                        "Practise now"
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "view-error", "{err.message()}" }
                },
            }
        }
    }
}

#[component]
fn HistoryRow(row: SessionRowVm) -> Element {
    rsx! {
        li { class: "history-row",
            span { class: "history-date", "{row.date_label}" }
            span { class: "history-score {row.band_class}", "{row.score_label}" }
        }
    }
}
