/// Saved titles list with search and inline editing

use crate::config::URL_DISPLAY_WIDTH;
use crate::matching::format_url;
use crate::title_data::{MatchType, Override};
use patternfly_yew::prelude::*;
use wasm_bindgen::JsValue;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

/// Values of the edit form for one saved title
#[derive(Clone, PartialEq, Debug)]
pub struct EditForm {
    pub url_key: String,
    pub title: String,
    pub match_type: MatchType,
}

impl EditForm {
    pub fn from_entry(entry: &Override) -> EditForm {
        EditForm {
            url_key: entry.url_key.clone(),
            title: entry.title.clone(),
            match_type: entry.match_type,
        }
    }
}

impl Default for EditForm {
    fn default() -> Self {
        EditForm {
            url_key: String::new(),
            title: String::new(),
            match_type: MatchType::Exact,
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct SavedTitlesListProps {
    pub entries: Vec<Override>,
    pub total: usize,
    pub query: String,
    pub editing: Option<String>,
    pub edit_form: EditForm,
    pub busy: bool,
    pub on_search: Callback<String>,
    pub on_delete: Callback<String>,
    pub on_start_edit: Callback<Override>,
    pub on_edit_change: Callback<EditForm>,
    pub on_save_edit: Callback<()>,
    pub on_cancel_edit: Callback<()>,
}

#[function_component(SavedTitlesList)]
pub fn saved_titles_list(props: &SavedTitlesListProps) -> Html {
    let on_search_input = {
        let on_search = props.on_search.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                on_search.emit(input.value());
            }
        })
    };

    html! {
        <div class="saved-titles">
            <h2 class="section-title">{"Saved Titles"}</h2>

            <div class="search-container">
                <input
                    type="text"
                    placeholder="Search saved titles..."
                    value={props.query.clone()}
                    oninput={on_search_input}
                    class="search-input"
                />
            </div>

            if props.entries.is_empty() {
                <div class="empty-state">
                    if props.query.is_empty() {
                        <p>{"No saved titles yet."}</p>
                    } else {
                        <p>{"No saved titles match your search."}</p>
                    }
                </div>
            } else {
                <div class="saved-list">
                    {for props.entries.iter().map(|entry| {
                        let is_editing = props.editing.as_ref() == Some(&entry.id);
                        html! {
                            <SavedTitleCard
                                key={entry.id.clone()}
                                entry={entry.clone()}
                                is_editing={is_editing}
                                edit_form={props.edit_form.clone()}
                                busy={props.busy}
                                on_delete={props.on_delete.clone()}
                                on_start_edit={props.on_start_edit.clone()}
                                on_edit_change={props.on_edit_change.clone()}
                                on_save_edit={props.on_save_edit.clone()}
                                on_cancel_edit={props.on_cancel_edit.clone()}
                            />
                        }
                    })}
                </div>
            }

            <div class="footer">
                {format!("{} of {} saved titles", props.entries.len(), props.total)}
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct SavedTitleCardProps {
    entry: Override,
    is_editing: bool,
    edit_form: EditForm,
    busy: bool,
    on_delete: Callback<String>,
    on_start_edit: Callback<Override>,
    on_edit_change: Callback<EditForm>,
    on_save_edit: Callback<()>,
    on_cancel_edit: Callback<()>,
}

#[function_component(SavedTitleCard)]
fn saved_title_card(props: &SavedTitleCardProps) -> Html {
    let entry = &props.entry;

    let date = js_sys::Date::new(&JsValue::from_f64(entry.created_at));
    let formatted_date = format!(
        "{:04}-{:02}-{:02} {:02}:{:02}",
        date.get_full_year(),
        date.get_month() + 1,
        date.get_date(),
        date.get_hours(),
        date.get_minutes()
    );

    if props.is_editing {
        let form = props.edit_form.clone();

        let on_title_input = {
            let form = form.clone();
            let on_change = props.on_edit_change.clone();
            Callback::from(move |e: InputEvent| {
                if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                    on_change.emit(EditForm { title: input.value(), ..form.clone() });
                }
            })
        };

        let on_key_input = {
            let form = form.clone();
            let on_change = props.on_edit_change.clone();
            Callback::from(move |e: InputEvent| {
                if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                    on_change.emit(EditForm { url_key: input.value(), ..form.clone() });
                }
            })
        };

        let on_match_change = {
            let form = form.clone();
            let on_change = props.on_edit_change.clone();
            Callback::from(move |e: Event| {
                if let Some(select) = e.target_dyn_into::<HtmlSelectElement>() {
                    if let Some(match_type) = MatchType::from_value(&select.value()) {
                        on_change.emit(EditForm { match_type, ..form.clone() });
                    }
                }
            })
        };

        return html! {
            <div class="saved-card editing">
                <input
                    type="text"
                    value={form.title.clone()}
                    oninput={on_title_input}
                    class="edit-input"
                />
                <input
                    type="text"
                    value={form.url_key.clone()}
                    oninput={on_key_input}
                    class="edit-input"
                />
                <select class="match-select" onchange={on_match_change}>
                    {for MatchType::ALL.iter().map(|mt| html! {
                        <option value={mt.value()} selected={*mt == form.match_type}>{mt.label()}</option>
                    })}
                </select>
                <div class="card-actions">
                    <Button onclick={props.on_save_edit.reform(|_| ())} disabled={props.busy}>
                        {"✓ Save"}
                    </Button>
                    <Button onclick={props.on_cancel_edit.reform(|_| ())} variant={ButtonVariant::Secondary}>
                        {"✗ Cancel"}
                    </Button>
                </div>
            </div>
        };
    }

    html! {
        <div class="saved-card">
            <div class="saved-card-content">
                <div class="saved-title">{&entry.title}</div>
                <div class="saved-url" title={entry.url_key.clone()}>
                    {format_url(&entry.url_key, URL_DISPLAY_WIDTH)}
                </div>
                <div class="saved-meta">
                    {format!("{} • {} • was \"{}\"", entry.match_type.label(), formatted_date, entry.original_title)}
                </div>
            </div>
            <div class="card-actions">
                <Button
                    onclick={props.on_start_edit.reform({
                        let entry = entry.clone();
                        move |_| entry.clone()
                    })}
                    variant={ButtonVariant::Secondary}
                    disabled={props.busy}
                >
                    {"✏️"}
                </Button>
                <Button
                    onclick={props.on_delete.reform({
                        let id = entry.id.clone();
                        move |_| id.clone()
                    })}
                    variant={ButtonVariant::Danger}
                    disabled={props.busy}
                >
                    {"🗑️"}
                </Button>
            </div>
        </div>
    }
}
