pub(crate) mod open_notes;
pub(crate) mod theme;

use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use crate::models::{NoteMode, SaveTarget};
use crate::state::PopupContext;
use icons::Check;
use leptos::ev;
use leptos::prelude::*;
use leptos_dom::helpers::window_event_listener;
use open_notes::OpenNotes;
use theme::ThemePicker;

/// Save shortcut for a keydown: Cmd/Ctrl+S saves by domain,
/// Cmd/Ctrl+Shift+S by full URL.
pub(crate) fn shortcut_for(key: &str, ctrl_or_meta: bool, shift: bool) -> Option<SaveTarget> {
    if !ctrl_or_meta || !key.eq_ignore_ascii_case("s") {
        return None;
    }
    Some(if shift {
        SaveTarget::FullUrl
    } else {
        SaveTarget::Domain
    })
}

#[component]
pub fn Popup() -> impl IntoView {
    let PopupContext(state) = expect_context::<PopupContext>();
    let extended = state.config.extended_notes;

    state.init();

    // The browser's own "save page" must never fire, even when full-URL
    // saves are off.
    let _key_handle = window_event_listener(ev::keydown, move |ev: web_sys::KeyboardEvent| {
        let Some(target) = shortcut_for(&ev.key(), ev.ctrl_key() || ev.meta_key(), ev.shift_key())
        else {
            return;
        };
        ev.prevent_default();
        if target == SaveTarget::FullUrl && !extended {
            return;
        }
        state.save(target);
    });

    let on_mode_change = move |ev: web_sys::Event| {
        let mode = if event_target_checked(&ev) {
            NoteMode::Persistent
        } else {
            NoteMode::Website
        };
        state.switch_mode(mode);
    };

    view! {
        <div class="popup flex w-[340px] flex-col gap-3 p-3">
            <div class="flex items-center justify-between">
                <label class="inline-flex cursor-pointer items-center gap-2 text-xs">
                    <input
                        id="modeToggle"
                        type="checkbox"
                        prop:checked=move || state.mode.get() == NoteMode::Persistent
                        on:change=on_mode_change
                    />
                    "Persistent note"
                </label>
                <ThemePicker />
            </div>

            <textarea
                id="note"
                class="h-32 w-full resize-y rounded-md border border-input bg-transparent p-2 text-sm outline-none focus-visible:ring-2 focus-visible:ring-ring/50"
                placeholder=move || state.mode.get().placeholder()
                prop:value=move || state.editor_text.get()
                on:input=move |ev| state.editor_text.set(event_target_value(&ev))
            ></textarea>

            <div class="flex items-center gap-2">
                <Button attr:id="save" size=ButtonSize::Sm on:click=move |_| state.save(SaveTarget::Domain)>
                    "Save"
                </Button>
                {extended.then(|| view! {
                    <Button
                        attr:id="save-url"
                        variant=ButtonVariant::Outline
                        size=ButtonSize::Sm
                        on:click=move |_| state.save(SaveTarget::FullUrl)
                    >
                        "Save with URL"
                    </Button>
                })}
                <span id="status" class="inline-flex items-center gap-1 text-xs text-muted-foreground">
                    <Show when=move || state.status.get().is_some() fallback=|| ().into_view()>
                        <Check class="size-3" />
                    </Show>
                    {move || state.status.get().unwrap_or_default()}
                </span>
            </div>

            <OpenNotes />
        </div>
    }
}
