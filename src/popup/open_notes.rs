use crate::components::ui::{
    Card, CardContent, CardHeader, CardItem, CardList, CardTitle, Tooltip, TooltipContent,
    TooltipPosition,
};
use crate::models::SortMode;
use crate::notes::{NoteRow, EMPTY_LIST_TEXT};
use crate::state::{label_key, LabelKey, PopupContext, PopupState};
use crate::util::format_saved_at_local;
use leptos::html;
use leptos::prelude::*;

const ROW_CLASS: &str = "open-notes-row grid grid-cols-[1fr_auto_auto] items-center gap-2";

/// Glyph and tooltip of a row's label control.
pub(crate) fn label_control(row: &NoteRow) -> (&'static str, &'static str) {
    if row.labeled {
        ("\u{21BA}", "undo label")
    } else {
        ("\u{1F4DD}", "add label")
    }
}

#[component]
fn SortToggle(state: PopupState, sort: SortMode, text: &'static str) -> impl IntoView {
    view! {
        <button
            type="button"
            id=format!("sortBy{}", if sort == SortMode::Url { "Url" } else { "Date" })
            class="sort-btn rounded px-2 py-0.5 text-xs text-muted-foreground hover:bg-accent [&.active]:bg-accent [&.active]:text-foreground"
            class:active=move || state.sort.get() == sort
            on:click=move |_| state.set_sort(sort)
        >
            {text}
        </button>
    }
}

#[component]
fn LabelInput(state: PopupState, note_key: String) -> impl IntoView {
    let input_ref: NodeRef<html::Input> = NodeRef::new();

    Effect::new(move |_| {
        if let Some(el) = input_ref.get() {
            let _ = el.focus();
        }
    });

    let key_enter = note_key.clone();
    let on_keydown = move |ev: web_sys::KeyboardEvent| match label_key(&ev.key()) {
        Some(LabelKey::Commit) => {
            ev.prevent_default();
            state.commit_label(key_enter.clone());
        }
        Some(LabelKey::Cancel) => {
            ev.prevent_default();
            state.cancel_label();
        }
        None => {}
    };

    view! {
        <input
            type="text"
            class="label-inline-input ml-1.5 w-[90px] rounded border border-input px-1.5 py-0.5 text-[13px] outline-none"
            placeholder="enter label..."
            node_ref=input_ref
            prop:value=move || state.label_draft.get()
            on:input=move |ev| state.label_draft.set(event_target_value(&ev))
            on:keydown=on_keydown
            on:blur=move |_| state.commit_label(note_key.clone())
        />
    }
}

#[component]
fn OpenNoteRow(state: PopupState, row: NoteRow) -> impl IntoView {
    let date = row.saved_ms.map(format_saved_at_local).unwrap_or_default();
    let (glyph, hint) = label_control(&row);

    let key_for_input = row.key.clone();
    let is_labeling = move || state.labeling.get().as_deref() == Some(key_for_input.as_str());
    let key_for_view = row.key.clone();
    let key_for_delete = row.key.clone();
    let row_for_label = row.clone();

    view! {
        <CardItem class=ROW_CLASS>
            <span class="open-notes-col open-notes-col-url min-w-0 truncate text-sm">
                <a href=row.href.clone() target="_blank" class="text-primary underline-offset-4 hover:underline">
                    {row.text.clone()}
                </a>
                <Show when=is_labeling fallback=|| ().into_view()>
                    <LabelInput state=state note_key=key_for_view.clone() />
                </Show>
            </span>
            <span class="open-notes-col open-notes-col-date text-[11px] text-muted-foreground">
                {date}
            </span>
            <span class="open-notes-col open-notes-col-action inline-flex items-center gap-1">
                {row.can_label.then(move || {
                    view! {
                        <Tooltip>
                            <button
                                type="button"
                                class="label-note-btn mr-1"
                                aria-label="Label"
                                title=hint
                                on:click=move |ev: web_sys::MouseEvent| {
                                    ev.stop_propagation();
                                    ev.prevent_default();
                                    state.toggle_label(&row_for_label);
                                }
                            >
                                {glyph}
                            </button>
                            <TooltipContent position=TooltipPosition::Left>{hint}</TooltipContent>
                        </Tooltip>
                    }
                })}
                <Tooltip>
                    <button
                        type="button"
                        class="delete-note-btn"
                        title="Delete note"
                        on:click=move |ev: web_sys::MouseEvent| {
                            ev.stop_propagation();
                            ev.prevent_default();
                            state.delete(key_for_delete.clone());
                        }
                    >
                        "\u{1F5D1}"
                    </button>
                    <TooltipContent position=TooltipPosition::Left>"delete"</TooltipContent>
                </Tooltip>
            </span>
        </CardItem>
    }
}

/// The "open notes" panel: sort toggle plus one row per stored site note.
#[component]
pub(crate) fn OpenNotes() -> impl IntoView {
    let PopupContext(state) = expect_context::<PopupContext>();

    view! {
        <Card class="gap-2 py-3">
            <CardHeader class="flex-row items-center justify-between px-3">
                <CardTitle class="text-sm">"Open notes"</CardTitle>
                <div class="inline-flex gap-1">
                    <SortToggle state=state sort=SortMode::Url text="URL" />
                    <SortToggle state=state sort=SortMode::Date text="Date" />
                </div>
            </CardHeader>
            <CardContent class="px-3">
                <CardList attr:id="openNotesList" class="gap-1">
                    {move || {
                        let rows = state.rows.get();
                        if rows.is_empty() {
                            view! {
                                <CardItem class=ROW_CLASS>
                                    <span class="open-notes-col open-notes-col-url text-xs text-muted-foreground">
                                        {EMPTY_LIST_TEXT}
                                    </span>
                                    <span class="open-notes-col open-notes-col-date"></span>
                                    <span class="open-notes-col open-notes-col-action"></span>
                                </CardItem>
                            }
                            .into_any()
                        } else {
                            rows.into_iter()
                                .map(|row| view! { <OpenNoteRow state=state row=row /> })
                                .collect_view()
                                .into_any()
                        }
                    }}
                </CardList>
            </CardContent>
        </Card>
    }
}
