/// Popup UI for Tab Title Keeper

use crate::chrome::{Chrome, ChromeStorage};
use crate::error::TitleError;
use crate::manager::TitleManager;
use crate::title_data::{MatchType, Override};
use crate::ui::saved_list::{EditForm, SavedTitlesList};
use patternfly_yew::prelude::*;
use std::future::Future;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

pub type PopupManager = TitleManager<Chrome, ChromeStorage>;

#[derive(Clone, PartialEq)]
enum AppState {
    Loading,
    Idle,
    Busy(String),
    Error(String),
}

/// Run one manager command on a copy of the state, then publish the result.
///
/// Commands never overlap: the buttons are disabled while one is in flight.
fn run_command<F, Fut>(
    manager: UseStateHandle<PopupManager>,
    state: UseStateHandle<AppState>,
    message: &str,
    command: F,
) where
    F: FnOnce(PopupManager) -> Fut + 'static,
    Fut: Future<Output = (PopupManager, Result<(), TitleError>)> + 'static,
{
    state.set(AppState::Busy(message.to_string()));
    let current = (*manager).clone();

    spawn_local(async move {
        let (updated, result) = command(current).await;
        manager.set(updated);
        match result {
            Ok(()) => state.set(AppState::Idle),
            Err(e) => state.set(AppState::Error(e.to_string())),
        }
    });
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| AppState::Loading);
    let manager = use_state(|| PopupManager::new(Chrome, ChromeStorage));
    let title_input = use_state(String::new);
    let match_type = use_state(|| MatchType::Exact);
    let search_query = use_state(String::new);
    let editing = use_state(|| None::<String>);
    let edit_form = use_state(EditForm::default);

    // Load saved titles and the active tab on mount
    {
        let state = state.clone();
        let manager = manager.clone();
        let title_input = title_input.clone();

        use_effect_with((), move |_| {
            let mut current = (*manager).clone();
            spawn_local(async move {
                current.load().await;
                let prefill = current
                    .active_override()
                    .map(|o| o.title.clone())
                    .or_else(|| current.current_tab().map(|t| t.title.clone()))
                    .unwrap_or_default();
                title_input.set(prefill);
                manager.set(current);
                state.set(AppState::Idle);
            });
            || ()
        });
    }

    let on_title_input = {
        let title_input = title_input.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                title_input.set(input.value());
            }
        })
    };

    let on_match_change = {
        let match_type = match_type.clone();
        Callback::from(move |e: Event| {
            if let Some(select) = e.target_dyn_into::<HtmlSelectElement>() {
                if let Some(selected) = MatchType::from_value(&select.value()) {
                    match_type.set(selected);
                }
            }
        })
    };

    let on_save = {
        let manager = manager.clone();
        let state = state.clone();
        let title_input = title_input.clone();
        let match_type = match_type.clone();

        Callback::from(move |_| {
            let title = (*title_input).clone();
            let match_type = *match_type;
            let now = js_sys::Date::now();
            run_command(manager.clone(), state.clone(), "Saving title...", move |mut m| async move {
                let result = m.save_title(&title, match_type, now).await.map(|_| ());
                (m, result)
            });
        })
    };

    let on_reset = {
        let manager = manager.clone();
        let state = state.clone();

        Callback::from(move |_| {
            run_command(manager.clone(), state.clone(), "Restoring title...", |mut m| async move {
                let result = m.reset_title().await;
                (m, result)
            });
        })
    };

    let on_clear = {
        let manager = manager.clone();
        let state = state.clone();
        let title_input = title_input.clone();

        Callback::from(move |_| {
            let title_input = title_input.clone();
            run_command(manager.clone(), state.clone(), "Clearing saved titles...", |mut m| async move {
                let result = m.clear_current_tab().await.map(|_| ());
                if let Some(tab) = m.current_tab() {
                    title_input.set(tab.title.clone());
                }
                (m, result)
            });
        })
    };

    let on_search = {
        let search_query = search_query.clone();
        Callback::from(move |query: String| search_query.set(query))
    };

    let on_delete = {
        let manager = manager.clone();
        let state = state.clone();

        Callback::from(move |id: String| {
            run_command(manager.clone(), state.clone(), "Deleting...", move |mut m| async move {
                let result = m.delete(&id).await.map(|_| ());
                (m, result)
            });
        })
    };

    let on_start_edit = {
        let editing = editing.clone();
        let edit_form = edit_form.clone();
        Callback::from(move |entry: Override| {
            edit_form.set(EditForm::from_entry(&entry));
            editing.set(Some(entry.id));
        })
    };

    let on_edit_change = {
        let edit_form = edit_form.clone();
        Callback::from(move |form: EditForm| edit_form.set(form))
    };

    let on_save_edit = {
        let manager = manager.clone();
        let state = state.clone();
        let editing = editing.clone();
        let edit_form = edit_form.clone();

        Callback::from(move |_: ()| {
            let Some(id) = (*editing).clone() else {
                return;
            };
            let form = (*edit_form).clone();
            editing.set(None);
            run_command(manager.clone(), state.clone(), "Saving changes...", move |mut m| async move {
                let result = m
                    .update_saved(&id, &form.url_key, &form.title, form.match_type)
                    .await
                    .map(|_| ());
                (m, result)
            });
        })
    };

    let on_cancel_edit = {
        let editing = editing.clone();
        Callback::from(move |_: ()| editing.set(None))
    };

    let is_busy = !matches!(*state, AppState::Idle | AppState::Error(_));
    let entries: Vec<Override> = manager.search(&search_query).into_iter().cloned().collect();

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Tab Title Keeper"}</h1>

            // Status display
            {match &*state {
                AppState::Loading => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{"Loading..."}</p>
                    </div>
                },
                AppState::Busy(msg) => html! {
                    <div class="message-top-margin">
                        <p class="message-text">{msg}</p>
                    </div>
                },
                AppState::Error(err) => html! {
                    <div class="message-top-margin">
                        <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                            {err.clone()}
                        </Alert>
                    </div>
                },
                AppState::Idle => html! {}
            }}

            // Current tab
            {match manager.current_tab() {
                Some(tab) => html! {
                    <div class="current-tab flex-column-gap">
                        <div class="tab-url">{&tab.url}</div>
                        if tab.is_enforced {
                            <div class="tab-original">
                                {format!("Original: {}", tab.best_original_title())}
                            </div>
                        }
                        <input
                            type="text"
                            placeholder="New tab title"
                            value={(*title_input).clone()}
                            oninput={on_title_input}
                            class="title-input"
                        />
                        <select class="match-select" onchange={on_match_change}>
                            {for MatchType::ALL.iter().map(|mt| html! {
                                <option value={mt.value()} selected={*mt == *match_type}>
                                    {format!("Match {}", mt.label())}
                                </option>
                            })}
                        </select>
                        <Button onclick={on_save} disabled={is_busy} variant={ButtonVariant::Primary} block={true}>
                            {"Save Title"}
                        </Button>
                        <Button onclick={on_reset} disabled={is_busy || !tab.is_enforced} variant={ButtonVariant::Secondary} block={true}>
                            {"Reset Title"}
                        </Button>
                        <Button onclick={on_clear} disabled={is_busy} variant={ButtonVariant::Danger} block={true}>
                            {"Forget This Page"}
                        </Button>
                    </div>
                },
                None => html! {
                    if !matches!(*state, AppState::Loading) {
                        <p class="empty-state-hint">{"This tab's title cannot be changed."}</p>
                    }
                },
            }}

            <SavedTitlesList
                entries={entries}
                total={manager.catalog().len()}
                query={(*search_query).clone()}
                editing={(*editing).clone()}
                edit_form={(*edit_form).clone()}
                busy={is_busy}
                on_search={on_search}
                on_delete={on_delete}
                on_start_edit={on_start_edit}
                on_edit_change={on_edit_change}
                on_save_edit={on_save_edit}
                on_cancel_edit={on_cancel_edit}
            />

            <p class="footer-popup">
                {"Tab Title Keeper v0.1.0"}
            </p>
        </div>
    }
}
