use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};
use recite_core::practice::Judgment;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{PracticeIntent, PracticeRowVm, PracticeVm, start_practice};

#[component]
pub fn PracticeView(poem_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let poems = ctx.poems();
    let practice = ctx.practice();

    let vm = use_signal(|| None::<PracticeVm>);
    let error = use_signal(|| None::<ViewError>);
    let saving = use_signal(|| false);

    let practice_for_resource = practice.clone();
    let poem_id_for_resource = poem_id.clone();
    let resource = use_resource(move || {
        let poems = poems.clone();
        let practice = practice_for_resource.clone();
        let poem_id = poem_id_for_resource.clone();
        let mut vm = vm;
        let mut error = error;
        async move {
            let started = start_practice(&poems, &practice, &poem_id).await?;
            vm.set(Some(started));
            error.set(None);
            Ok::<_, ViewError>(())
        }
    });
    let state = view_state_from_resource(&resource);

    let dispatch_intent = use_callback(move |intent: PracticeIntent| {
        let mut vm = vm;
        let mut error = error;
        let mut saving = saving;
        if *saving.peek() {
            return;
        }
        match intent {
            PracticeIntent::Reveal => {
                if let Some(vm) = vm.write().as_mut() {
                    vm.reveal();
                }
            }
            PracticeIntent::Judge { index, judgment } => {
                // The screen keeps showing the current rows while the judgment is saved.
                let Some(mut local) = vm.peek().clone() else {
                    return;
                };
                let practice = practice.clone();
                saving.set(true);
                spawn(async move {
                    let result = local.judge(&practice, index, judgment).await;
                    vm.set(Some(local));
                    saving.set(false);
                    match result {
                        Ok(_) => error.set(None),
                        Err(err) => error.set(Some(err)),
                    }
                });
            }
        }
    });

    rsx! {
        div { class: "page practice-page",
            button {
                class: "btn btn-link back-btn",
                r#type: "button",
                onclick: move |_| {
                    let _ = navigator.push(Route::Home {});
                },
                "← Back"
            }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "view-error", "{err.message()}" }
                },
                ViewState::Ready(()) => rsx! {
                    if let Some(current) = vm.read().as_ref() {
                        PracticeBody {
                            vm: current.clone(),
                            poem_id: poem_id.clone(),
                            error: error(),
                            busy: saving(),
                            on_intent: move |intent| dispatch_intent.call(intent),
                        }
                    }
                },
            }
        }
    }
}

fn judgment_class(base: &str, selected: bool) -> String {
    if selected {
        format!("{base} selected")
    } else {
        base.to_string()
    }
}

#[component]
fn PracticeBody(
    vm: PracticeVm,
    poem_id: String,
    error: Option<ViewError>,
    busy: bool,
    on_intent: EventHandler<PracticeIntent>,
) -> Element {
    let navigator = use_navigator();
    let progress = vm.progress_percent();
    let progress_label = vm.progress_label();
    let rows = vm.rows();
    let result = vm.result();
    let can_reveal = vm.can_reveal();

    rsx! {
        header { class: "practice-header",
            h2 { class: "view-title", "{vm.title()}" }
            p { class: "view-subtitle", "{vm.author()}" }
        }
        div { class: "progress",
            div { class: "progress-bar", style: "width: {progress}%" }
        }
        p { class: "progress-label", "{progress_label}" }

        div { class: "lines",
            for row in rows {
                match row {
                    PracticeRowVm::Break { key } => rsx! {
                        div { key: "{key}", class: "line-row",
                            span { class: "line-text blank-line" }
                        }
                    },
                    PracticeRowVm::Line { key, index, text, judgment } => rsx! {
                        div { key: "{key}", class: "line-row",
                            span { class: "line-text", "{text}" }
                            if result.is_none() {
                                span { class: "line-buttons",
                                    button {
                                        class: judgment_class("btn-yes", judgment == Some(Judgment::Remembered)),
                                        r#type: "button",
                                        disabled: busy,
                                        onclick: move |_| on_intent.call(PracticeIntent::Judge {
                                            index,
                                            judgment: Judgment::Remembered,
                                        }),
                                        "Yes"
                                    }
                                    button {
                                        class: judgment_class("btn-no", judgment == Some(Judgment::Missed)),
                                        r#type: "button",
                                        disabled: busy,
                                        onclick: move |_| on_intent.call(PracticeIntent::Judge {
                                            index,
                                            judgment: Judgment::Missed,
                                        }),
                                        "No"
                                    }
                                }
                            }
                        }
                    },
                }
            }
        }

        if let Some(err) = error {
            p { class: "view-error", "{err.message()}" }
        }

        if can_reveal {
            div { class: "practice-controls",
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: busy,
                    onclick: move |_| on_intent.call(PracticeIntent::Reveal),
                    "Reveal next line"
                }
            }
        }

        if let Some(result) = result {
            div { class: "session-result",
                h3 { "Session complete" }
                p {
                    "You got "
                    span { class: "{result.band_class}", "{result.label}" }
                }
                div { class: "form-actions",
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        onclick: move |_| {
                            let _ = navigator.push(Route::Home {});
                        },
                        "Back to poems"
                    }
                    Link { class: "btn btn-secondary", to: Route::History { poem_id: poem_id.clone() },
                        "History"
                    }
                }
            }
        }
    }
}
