use crate::config::EnvConfig;
use crate::models::{NoteMode, SaveTarget, SortMode, Theme};
use crate::notes::{NoteManager, NoteRow};
use crate::popup::theme::apply_theme;
use crate::storage::chrome::ChromeStorage;
use crate::tabs::ChromeTabs;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

pub(crate) type PopupNotes = NoteManager<ChromeStorage, ChromeTabs>;

pub(crate) const SAVED_TEXT: &str = "Saved!";

/// What a click on a row's label control does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LabelClick {
    Clear,
    Open,
    /// The input is already open on this row.
    Keep,
}

pub(crate) fn label_click(row: &NoteRow, editing: Option<&str>) -> LabelClick {
    if row.labeled {
        LabelClick::Clear
    } else if editing == Some(row.key.as_str()) {
        LabelClick::Keep
    } else {
        LabelClick::Open
    }
}

/// Keys handled by the inline label input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LabelKey {
    Commit,
    Cancel,
}

pub(crate) fn label_key(key: &str) -> Option<LabelKey> {
    match key {
        "Enter" => Some(LabelKey::Commit),
        "Escape" => Some(LabelKey::Cancel),
        _ => None,
    }
}

/// Label to store for a committed draft; blank drafts only close the input.
pub(crate) fn label_commit(draft: &str) -> Option<String> {
    let label = draft.trim();
    (!label.is_empty()).then(|| label.to_string())
}

/// View-model of the popup. Everything the components render comes from
/// here; the open-notes rows are a pure function of storage and `sort`.
#[derive(Clone, Copy)]
pub(crate) struct PopupState {
    pub config: EnvConfig,
    pub notes: PopupNotes,

    pub mode: RwSignal<NoteMode>,
    pub editor_text: RwSignal<String>,

    /// Transient status line ("Saved!").
    pub status: RwSignal<Option<String>>,
    /// Bumped per flash so an older timer never clears a newer message.
    pub status_seq: RwSignal<u64>,

    pub sort: RwSignal<SortMode>,
    pub rows: RwSignal<Vec<NoteRow>>,
    /// Open-notes load guard (ignore stale responses).
    pub rows_request_id: RwSignal<u64>,

    /// Key of the row whose inline label input is open.
    pub labeling: RwSignal<Option<String>>,
    pub label_draft: RwSignal<String>,

    pub theme: RwSignal<Theme>,
    pub theme_picker_open: RwSignal<bool>,
}

impl PopupState {
    pub fn new(config: EnvConfig) -> Self {
        Self {
            config,
            notes: NoteManager::new(ChromeStorage, ChromeTabs, config.extended_notes),
            mode: RwSignal::new(NoteMode::default()),
            editor_text: RwSignal::new(String::new()),
            status: RwSignal::new(None),
            status_seq: RwSignal::new(0),
            sort: RwSignal::new(SortMode::default()),
            rows: RwSignal::new(vec![]),
            rows_request_id: RwSignal::new(0),
            labeling: RwSignal::new(None),
            label_draft: RwSignal::new(String::new()),
            theme: RwSignal::new(Theme::default()),
            theme_picker_open: RwSignal::new(false),
        }
    }

    /// One-time load when the popup opens.
    pub fn init(self) {
        let notes = self.notes;
        spawn_local(async move {
            let mode = notes.load_mode().await;
            self.mode.set(mode);
            let text = notes.load_editor(mode).await;
            self.editor_text.set(text);
        });

        self.refresh_open_notes();

        spawn_local(async move {
            let theme = notes.load_theme().await;
            apply_theme(theme);
            self.theme.set(theme);
        });
    }

    pub fn refresh_open_notes(self) {
        let notes = self.notes;
        let sort = self.sort.get_untracked();
        let req_id = self.rows_request_id.get_untracked().wrapping_add(1);
        self.rows_request_id.set(req_id);

        spawn_local(async move {
            let rows = notes.open_notes(sort).await;
            if self.rows_request_id.get_untracked() != req_id {
                return;
            }
            self.rows.set(rows);
        });
    }

    /// Unsaved editor text is discarded on purpose.
    pub fn switch_mode(self, mode: NoteMode) {
        self.mode.set(mode);
        let notes = self.notes;
        spawn_local(async move {
            let text = notes.switch_mode(mode).await;
            if self.mode.get_untracked() == mode {
                self.editor_text.set(text);
            }
        });
    }

    pub fn save(self, target: SaveTarget) {
        let notes = self.notes;
        let text = self.editor_text.get_untracked();
        spawn_local(async move {
            let outcome = notes.save(target, &text).await;
            log::debug!("save {target:?}: {outcome:?}");
            if outcome.wrote() {
                self.flash_saved();
            }
            if outcome.lists_new_note() {
                self.refresh_open_notes();
            }
        });
    }

    fn flash_saved(self) {
        let seq = self.status_seq.get_untracked().wrapping_add(1);
        self.status_seq.set(seq);
        self.status.set(Some(SAVED_TEXT.to_string()));

        let _ = window().set_timeout_with_callback_and_timeout_and_arguments_0(
            wasm_bindgen::closure::Closure::once_into_js(move || {
                if self.status_seq.get_untracked() == seq {
                    self.status.set(None);
                }
            })
            .as_ref()
            .unchecked_ref(),
            i32::try_from(self.config.saved_flash_ms).unwrap_or(i32::MAX),
        );
    }

    pub fn set_sort(self, sort: SortMode) {
        self.sort.set(sort);
        self.refresh_open_notes();
    }

    pub fn delete(self, key: String) {
        let notes = self.notes;
        spawn_local(async move {
            notes.delete(&key).await;
            self.refresh_open_notes();
        });
    }

    /// Label control: clears an existing label, otherwise opens the inline input.
    pub fn toggle_label(self, row: &NoteRow) {
        match label_click(row, self.labeling.get_untracked().as_deref()) {
            LabelClick::Clear => {
                let notes = self.notes;
                let key = row.key.clone();
                spawn_local(async move {
                    notes.clear_label(&key).await;
                    self.refresh_open_notes();
                });
            }
            LabelClick::Open => {
                self.label_draft.set(String::new());
                self.labeling.set(Some(row.key.clone()));
            }
            LabelClick::Keep => {}
        }
    }

    /// Commit the inline label, or just close the input if it is blank.
    pub fn commit_label(self, key: String) {
        let draft = self.label_draft.get_untracked();
        self.cancel_label();

        let Some(label) = label_commit(&draft) else {
            return;
        };

        let notes = self.notes;
        spawn_local(async move {
            notes.set_label(&key, &label).await;
            self.refresh_open_notes();
        });
    }

    pub fn cancel_label(self) {
        self.label_draft.set(String::new());
        self.labeling.set(None);
    }

    pub fn set_theme(self, theme: Theme) {
        apply_theme(theme);
        self.theme.set(theme);
        self.theme_picker_open.set(false);
        let notes = self.notes;
        spawn_local(async move {
            notes.set_theme(theme).await;
        });
    }
}

#[derive(Clone, Copy)]
pub(crate) struct PopupContext(pub PopupState);
