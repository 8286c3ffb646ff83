use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};
use recite_core::model::PoemId;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{PoemCardVm, map_poem_cards};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FetchState {
    Idle,
    Fetching,
    Error(ViewError),
}

impl FetchState {
    /// Moves to `Fetching` unless a fetch is already running.
    fn begin(&mut self) -> bool {
        if *self == FetchState::Fetching {
            return false;
        }
        *self = FetchState::Fetching;
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DeleteState {
    Idle,
    Deleting,
    Error(ViewError),
}

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let poems = ctx.poems();
    let fetch = ctx.fetch();
    let lookup_enabled = fetch.enabled();

    let mut show_form = use_signal(|| false);
    let mut title = use_signal(String::new);
    let mut author = use_signal(String::new);
    let mut url = use_signal(String::new);
    let mut fetch_state = use_signal(|| FetchState::Idle);
    let mut delete_target = use_signal(|| None::<PoemCardVm>);
    let mut delete_state = use_signal(|| DeleteState::Idle);

    let poems_for_resource = poems.clone();
    let resource = use_resource(move || {
        let poems = poems_for_resource.clone();
        async move {
            let items = poems
                .list_poems()
                .await
                .map_err(|e| ViewError::from(&e))?;
            Ok::<_, ViewError>(map_poem_cards(&items))
        }
    });
    let state = view_state_from_resource(&resource);

    let on_submit = {
        let poems = poems.clone();
        let fetch = fetch.clone();
        use_callback(move |()| {
            // Claimed before spawning so a second submit sees the running fetch.
            if !fetch_state.write().begin() {
                return;
            }
            let poems = poems.clone();
            let fetch = fetch.clone();
            let mut resource = resource;
            let (raw_title, raw_author, raw_url) = (title(), author(), url());
            spawn(async move {
                let fetched = fetch
                    .fetch_from_input(&raw_title, &raw_author, &raw_url)
                    .await
                    .map_err(|e| ViewError::from(&e));
                let added = match fetched {
                    Ok(draft) => poems.add_poem(draft).await.map_err(|e| ViewError::from(&e)),
                    Err(err) => Err(err),
                };
                match added {
                    Ok(_) => {
                        title.set(String::new());
                        author.set(String::new());
                        url.set(String::new());
                        show_form.set(false);
                        fetch_state.set(FetchState::Idle);
                        resource.restart();
                    }
                    Err(err) => fetch_state.set(FetchState::Error(err)),
                }
            });
        })
    };

    let on_confirm_delete = {
        let poems = poems.clone();
        use_callback(move |id: String| {
            let poems = poems.clone();
            let mut resource = resource;
            if *delete_state.peek() == DeleteState::Deleting {
                return;
            }
            delete_state.set(DeleteState::Deleting);
            spawn(async move {
                let removed = match PoemId::new(id) {
                    Ok(id) => poems.remove_poem(&id).await.map_err(|e| ViewError::from(&e)),
                    Err(_) => Err(ViewError::NotFound),
                };
                match removed {
                    Ok(()) => {
                        delete_state.set(DeleteState::Idle);
                        delete_target.set(None);
                        resource.restart();
                    }
                    Err(err) => delete_state.set(DeleteState::Error(err)),
                }
            });
        })
    };

    let fetching = fetch_state() == FetchState::Fetching;

    rsx! {
        div { class: "page home-page",
            header { class: "view-header",
                h2 { class: "view-title", "My Poems" }
                if !show_form() {
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        onclick: move |_| show_form.set(true),
                        "Add poem"
                    }
                }
            }

            if show_form() {
                form {
                    class: "add-poem-form",
                    onsubmit: move |evt| {
                        evt.prevent_default();
                        on_submit.call(());
                    },
                    input {
                        class: "input",
                        r#type: "text",
                        placeholder: "Poem title",
                        value: "{title()}",
                        oninput: move |evt| title.set(evt.value()),
                    }
                    input {
                        class: "input",
                        r#type: "text",
                        placeholder: "Author (optional)",
                        value: "{author()}",
                        oninput: move |evt| author.set(evt.value()),
                    }
                    input {
                        class: "input",
                        r#type: "url",
                        placeholder: "Or paste a URL to the poem",
                        value: "{url()}",
                        oninput: move |evt| url.set(evt.value()),
                    }
                    if !lookup_enabled {
                        p { class: "view-hint", "{ViewError::FetchDisabled.message()}" }
                    }
                    div { class: "form-actions",
                        button {
                            class: "btn btn-primary",
                            r#type: "submit",
                            disabled: fetching,
                            "Fetch poem"
                        }
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| {
                                show_form.set(false);
                                fetch_state.set(FetchState::Idle);
                                title.set(String::new());
                                author.set(String::new());
                                url.set(String::new());
                            },
                            "Cancel"
                        }
                    }
                    match fetch_state() {
                        FetchState::Idle => rsx! {},
                        FetchState::Fetching => rsx! {
                            p { class: "fetch-status loading", "Fetching poem..." }
                        },
                        FetchState::Error(err) => rsx! {
                            p { class: "fetch-status error", "{err.message()}" }
                        },
                    }
                }
            }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
                ViewState::Ready(cards) => rsx! {
                    if cards.is_empty() {
                        p { class: "empty-state", "No poems yet. Add one to start memorising." }
                    } else {
                        div { class: "poem-list",
                            for card in cards {
                                PoemCard {
                                    key: "{card.id}",
                                    card: card.clone(),
                                    on_delete: move |card: PoemCardVm| {
                                        delete_state.set(DeleteState::Idle);
                                        delete_target.set(Some(card));
                                    },
                                }
                            }
                        }
                    }
                },
            }

            if let Some(target) = delete_target() {
                div {
                    class: "modal-overlay",
                    onclick: move |_| {
                        delete_target.set(None);
                        delete_state.set(DeleteState::Idle);
                    },
                    div {
                        class: "modal",
                        onclick: move |evt| evt.stop_propagation(),
                        h3 { class: "modal-title", "Delete \"{target.title}\"?" }
                        p { class: "modal-body", "Its practice history is removed too." }
                        if let DeleteState::Error(err) = delete_state() {
                            p { class: "modal-error", "{err.message()}" }
                        }
                        div { class: "modal-actions",
                            button {
                                class: "btn btn-secondary",
                                r#type: "button",
                                onclick: move |_| {
                                    delete_target.set(None);
                                    delete_state.set(DeleteState::Idle);
                                },
                                "Cancel"
                            }
                            button {
                                class: "btn btn-danger",
                                r#type: "button",
                                disabled: delete_state() == DeleteState::Deleting,
                                onclick: move |_| {
                                    let id = delete_target.peek().as_ref().map(|t| t.id.clone());
                                    if let Some(id) = id {
                                        on_confirm_delete.call(id);
                                    }
                                },
                                "Delete"
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn PoemCard(card: PoemCardVm, on_delete: EventHandler<PoemCardVm>) -> Element {
    let navigator = use_navigator();
    let poem_id = card.id.clone();
    let for_delete = card.clone();

    rsx! {
        div {
            class: "poem-card",
            onclick: move |_| {
                let _ = navigator.push(Route::Practice { poem_id: poem_id.clone() });
            },
            div { class: "poem-card-info",
                h3 { "{card.title}" }
                p { "{card.author}" }
                span { class: "poem-card-lines", "{card.line_count_label}" }
            }
            div { class: "poem-card-score",
                if let Some((pct, class)) = card.latest.as_ref() {
                    span { class: "score-pct {class}", "{pct}" }
                }
                span { class: "poem-card-sessions", "{card.sessions_label}" }
            }
            div {
                class: "poem-card-actions",
                onclick: move |evt| evt.stop_propagation(),
                Link {
                    class: "poem-card-history",
                    to: Route::History { poem_id: card.id.clone() },
                    "History"
                }
                button {
                    class: "poem-card-delete",
                    r#type: "button",
                    title: "Delete poem",
                    onclick: move |_| on_delete.call(for_delete.clone()),
                    "×"
                }
            }
        }
    }
}
