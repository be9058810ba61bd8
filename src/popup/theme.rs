use crate::models::Theme;
use crate::state::PopupContext;
use icons::ChevronDown;
use leptos::html;
use leptos::prelude::*;
use strum::IntoEnumIterator;
use wasm_bindgen::JsCast;

/// Swap the `theme-*` class on `<body>`; `Default` leaves none.
pub(crate) fn apply_theme(theme: Theme) {
    let Some(body) = document().body() else {
        return;
    };
    let classes = body.class_list();
    for t in Theme::iter() {
        if let Some(class) = t.body_class() {
            let _ = classes.remove_1(&class);
        }
    }
    if let Some(class) = theme.body_class() {
        let _ = classes.add_1(&class);
    }
}

pub(crate) fn theme_title(theme: Theme) -> String {
    let name = theme.to_string();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => name,
    }
}

/// Theme selector. Hidden until the label is clicked; hides again on blur
/// or once a theme is picked.
#[component]
pub(crate) fn ThemePicker() -> impl IntoView {
    let PopupContext(state) = expect_context::<PopupContext>();
    let select_ref: NodeRef<html::Select> = NodeRef::new();

    let on_reveal = move |_: web_sys::MouseEvent| {
        state.theme_picker_open.set(true);

        // Defer to next tick so the select is visible before focusing.
        let _ = window().set_timeout_with_callback_and_timeout_and_arguments_0(
            wasm_bindgen::closure::Closure::once_into_js(move || {
                if let Some(el) = select_ref.get_untracked() {
                    let _ = el.focus();
                }
            })
            .as_ref()
            .unchecked_ref(),
            0,
        );
    };

    let on_change = move |ev: web_sys::Event| match event_target_value(&ev).parse::<Theme>() {
        Ok(theme) => state.set_theme(theme),
        Err(_) => state.theme_picker_open.set(false),
    };

    view! {
        <div class="theme-picker flex items-center gap-2 text-xs">
            <label
                id="themeLabel"
                for="texturePack"
                class="inline-flex cursor-pointer select-none items-center gap-1 text-muted-foreground"
                on:click=on_reveal
            >
                "theme"
                <ChevronDown class="size-3" />
            </label>
            <select
                id="texturePack"
                class="rounded-md border border-input bg-transparent px-2 py-1 text-xs"
                node_ref=select_ref
                style:display=move || if state.theme_picker_open.get() { "inline-block" } else { "none" }
                prop:value=move || state.theme.get().to_string()
                on:change=on_change
                on:blur=move |_| state.theme_picker_open.set(false)
            >
                {Theme::iter()
                    .map(|t| view! { <option value=t.to_string()>{theme_title(t)}</option> })
                    .collect_view()}
            </select>
        </div>
    }
}
