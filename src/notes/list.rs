use crate::models::{SiteKey, SortMode, StorageValue, DISPLAY_NAMES_KEY, META_KEY};
use crate::storage::Items;
use std::collections::BTreeSet;

pub(crate) const EMPTY_LIST_TEXT: &str = "No open notes yet.";

/// One row of the open-notes list. Carries its own key, so row commands
/// (label, delete) need nothing else from the view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct NoteRow {
    pub key: String,
    pub href: String,
    pub text: String,
    /// First-save stamp; `None` renders a blank date column.
    pub saved_ms: Option<i64>,
    pub labeled: bool,
    pub can_label: bool,
}

/// Build the open-notes rows from a full storage snapshot.
///
/// Only non-reserved keys holding non-blank text count as notes. Labels are
/// applied only when `labels_enabled`.
pub(crate) fn open_note_rows(items: &Items, sort: SortMode, labels_enabled: bool) -> Vec<NoteRow> {
    let meta = StorageValue::decode(META_KEY, items.get(META_KEY)).into_meta();
    let names = if labels_enabled {
        StorageValue::decode(DISPLAY_NAMES_KEY, items.get(DISPLAY_NAMES_KEY)).into_display_names()
    } else {
        Default::default()
    };

    // BTreeSet: de-duplicated and already in URL order. Whitespace-only keys
    // are dropped even when they hold text; saves never produce them.
    let keys: BTreeSet<SiteKey> = items
        .iter()
        .filter(|(_, v)| v.as_str().is_some_and(|s| !s.trim().is_empty()))
        .filter_map(|(k, _)| SiteKey::new(k.as_str()))
        .collect();

    let stamp = |k: &SiteKey| meta.get(k.as_str()).copied().unwrap_or(0);

    let mut keys: Vec<SiteKey> = keys.into_iter().collect();
    if sort == SortMode::Date {
        // Stable: equal stamps keep URL order.
        keys.sort_by(|a, b| stamp(b).cmp(&stamp(a)));
    }

    keys.into_iter()
        .map(|k| {
            let label = names.get(k.as_str()).filter(|l| !l.is_empty());
            NoteRow {
                href: k.href(),
                text: label
                    .cloned()
                    .unwrap_or_else(|| k.display_text().to_string()),
                saved_ms: Some(stamp(&k)).filter(|ms| *ms != 0),
                labeled: label.is_some(),
                can_label: labels_enabled,
                key: k.as_str().to_string(),
            }
        })
        .collect()
}
