pub(crate) mod list;

use crate::models::{NoteMode, SaveTarget, SiteKey, SortMode, Theme, PERSISTENT_KEY};
use crate::storage::{self, KeyValueStore};
use crate::tabs::{site_key_for, TabLocator};
use crate::util::now_ms;
pub(crate) use list::{open_note_rows, NoteRow, EMPTY_LIST_TEXT};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum SaveOutcome {
    /// Written to the persistent note.
    Persistent,
    /// Written under this site key.
    Site(SiteKey),
    /// The active tab has no usable site key (e.g. `about:blank`).
    NoSite,
    /// Full-URL saves are switched off.
    Disabled,
}

impl SaveOutcome {
    pub fn wrote(&self) -> bool {
        matches!(self, SaveOutcome::Persistent | SaveOutcome::Site(_))
    }

    /// Only site notes appear in the open-notes list.
    pub fn lists_new_note(&self) -> bool {
        matches!(self, SaveOutcome::Site(_))
    }
}

fn or_default<V: Default, E: std::fmt::Display>(what: &str, r: Result<V, E>) -> V {
    r.unwrap_or_else(|e| {
        log::warn!("{what}: {e}");
        V::default()
    })
}

fn log_failure<E: std::fmt::Display>(what: &str, r: Result<(), E>) {
    if let Err(e) = r {
        log::warn!("{what}: {e}");
    }
}

/// All note logic of the popup.
///
/// Storage failures never surface: reads fall back to defaults and writes
/// are fire-and-forget (logged). Calls are issued strictly one after
/// another; read-modify-write of `noteMeta` / `noteDisplayNames` is NOT
/// atomic, two popups writing at once can lose an update.
#[derive(Clone, Copy)]
pub(crate) struct NoteManager<S, T> {
    store: S,
    tabs: T,
    extended: bool,
    clock: fn() -> i64,
}

impl<S: KeyValueStore, T: TabLocator> NoteManager<S, T> {
    pub fn new(store: S, tabs: T, extended: bool) -> Self {
        Self {
            store,
            tabs,
            extended,
            clock: now_ms,
        }
    }

    #[cfg(test)]
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub async fn load_mode(&self) -> NoteMode {
        or_default("load note mode", storage::load_mode(&self.store).await)
    }

    /// Persist `mode`, then return the text the editor should show for it.
    /// Unsaved editor text is dropped by the caller.
    pub async fn switch_mode(&self, mode: NoteMode) -> String {
        log_failure("save note mode", storage::save_mode(&self.store, mode).await);
        self.load_editor(mode).await
    }

    pub async fn load_editor(&self, mode: NoteMode) -> String {
        let key = match mode {
            NoteMode::Persistent => PERSISTENT_KEY.to_string(),
            NoteMode::Website => match self.active_site_key(SaveTarget::Domain).await {
                Some(k) => k.as_str().to_string(),
                None => return String::new(),
            },
        };
        or_default("load note", storage::read(&self.store, &key).await).into_note()
    }

    async fn active_site_key(&self, target: SaveTarget) -> Option<SiteKey> {
        let url = self.tabs.active_tab_url().await;
        match url.and_then(|u| site_key_for(&u, target)) {
            Ok(k) => Some(k),
            Err(e) => {
                log::warn!("resolve active tab: {e}");
                None
            }
        }
    }

    pub async fn save(&self, target: SaveTarget, text: &str) -> SaveOutcome {
        if target == SaveTarget::FullUrl && !self.extended {
            return SaveOutcome::Disabled;
        }

        if self.load_mode().await == NoteMode::Persistent {
            log_failure(
                "save persistent note",
                storage::write_text(&self.store, PERSISTENT_KEY, text).await,
            );
            return SaveOutcome::Persistent;
        }

        let Some(key) = self.active_site_key(target).await else {
            return SaveOutcome::NoSite;
        };

        log_failure(
            "save site note",
            storage::write_text(&self.store, key.as_str(), text).await,
        );
        self.stamp_first_save(&key).await;

        SaveOutcome::Site(key)
    }

    // Read, then conditionally write back: two separate calls.
    async fn stamp_first_save(&self, key: &SiteKey) {
        let mut meta = match storage::load_meta(&self.store).await {
            Ok(m) => m,
            Err(e) => {
                // Writing a fresh map here would wipe every other stamp.
                log::warn!("load note meta: {e}");
                return;
            }
        };

        if meta.get(key.as_str()).copied().unwrap_or(0) != 0 {
            return;
        }

        meta.insert(key.as_str().to_string(), (self.clock)());
        log_failure("save note meta", storage::save_meta(&self.store, &meta).await);
    }

    pub async fn open_notes(&self, sort: SortMode) -> Vec<NoteRow> {
        let items = or_default("load open notes", self.store.get_all().await);
        open_note_rows(&items, sort, self.extended)
    }

    /// Attach a display label to `key`. Blank labels are ignored.
    pub async fn set_label(&self, key: &str, label: &str) {
        let label = label.trim();
        if !self.extended || label.is_empty() {
            return;
        }

        let mut names = match storage::load_display_names(&self.store).await {
            Ok(n) => n,
            Err(e) => {
                log::warn!("load display names: {e}");
                return;
            }
        };
        names.insert(key.to_string(), label.to_string());
        log_failure(
            "save display names",
            storage::save_display_names(&self.store, &names).await,
        );
    }

    pub async fn clear_label(&self, key: &str) {
        let mut names = match storage::load_display_names(&self.store).await {
            Ok(n) => n,
            Err(e) => {
                log::warn!("load display names: {e}");
                return;
            }
        };
        if names.remove(key).is_some() {
            log_failure(
                "save display names",
                storage::save_display_names(&self.store, &names).await,
            );
        }
    }

    /// Remove the note and its first-save stamp. Its label, if any, stays.
    pub async fn delete(&self, key: &str) {
        log_failure("remove note", self.store.remove(&[key]).await);

        let mut meta = match storage::load_meta(&self.store).await {
            Ok(m) => m,
            Err(e) => {
                log::warn!("load note meta: {e}");
                return;
            }
        };
        if meta.remove(key).is_some() {
            log_failure("save note meta", storage::save_meta(&self.store, &meta).await);
        }
    }

    pub async fn load_theme(&self) -> Theme {
        or_default("load theme", storage::load_theme(&self.store).await)
    }

    pub async fn set_theme(&self, theme: Theme) {
        log_failure("save theme", storage::save_theme(&self.store, theme).await);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DISPLAY_NAMES_KEY, META_KEY};
    use crate::storage::memory::InMemoryStore;
    use crate::tabs::TabError;
    use futures::executor::block_on;
    use serde_json::json;
    use std::cell::{Cell, RefCell};

    struct FixedTab(RefCell<String>);

    impl FixedTab {
        fn new(url: &str) -> Self {
            Self(RefCell::new(url.to_string()))
        }

        fn go(&self, url: &str) {
            *self.0.borrow_mut() = url.to_string();
        }
    }

    impl TabLocator for FixedTab {
        async fn active_tab_url(&self) -> Result<String, TabError> {
            Ok(self.0.borrow().clone())
        }
    }

    thread_local! {
        static NOW: Cell<i64> = const { Cell::new(1_000) };
    }

    fn fake_now() -> i64 {
        NOW.with(|n| n.get())
    }

    fn set_now(ms: i64) {
        NOW.with(|n| n.set(ms));
    }

    fn manager(url: &str) -> NoteManager<InMemoryStore, FixedTab> {
        NoteManager::new(InMemoryStore::new(), FixedTab::new(url), true).with_clock(fake_now)
    }

    #[test]
    fn test_site_note_roundtrip_by_hostname() {
        let m = manager("https://example.com/a/b?c=d");
        let out = block_on(m.save(SaveTarget::Domain, "hello"));
        assert_eq!(out, SaveOutcome::Site(SiteKey::new("example.com").unwrap()));

        m.tabs.go("https://example.com/other");
        assert_eq!(block_on(m.load_editor(NoteMode::Website)), "hello");

        m.tabs.go("https://elsewhere.org/");
        assert_eq!(block_on(m.load_editor(NoteMode::Website)), "");
    }

    #[test]
    fn test_persistent_note_is_independent_of_site() {
        let m = manager("https://a.com/");
        assert_eq!(block_on(m.switch_mode(NoteMode::Persistent)), "");
        assert_eq!(
            block_on(m.save(SaveTarget::Domain, "global")),
            SaveOutcome::Persistent
        );
        assert!(!m.store.contains("a.com"));

        m.tabs.go("https://b.com/");
        assert_eq!(block_on(m.load_editor(NoteMode::Persistent)), "global");

        assert_eq!(block_on(m.switch_mode(NoteMode::Website)), "");
        assert_eq!(block_on(m.load_mode()), NoteMode::Website);
    }

    #[test]
    fn test_full_url_save_in_persistent_mode_writes_persistent_note() {
        let m = manager("https://a.com/page");
        block_on(m.switch_mode(NoteMode::Persistent));
        assert_eq!(
            block_on(m.save(SaveTarget::FullUrl, "x")),
            SaveOutcome::Persistent
        );
        assert!(!m.store.contains("https://a.com/page"));
        assert_eq!(m.store.raw(PERSISTENT_KEY), Some(json!("x")));
    }

    #[test]
    fn test_persistent_save_confirms_without_listing() {
        let m = manager("https://a.com/");
        block_on(m.switch_mode(NoteMode::Persistent));
        let persistent = block_on(m.save(SaveTarget::Domain, "global"));
        assert!(persistent.wrote());
        assert!(!persistent.lists_new_note());
        assert!(block_on(m.open_notes(SortMode::Url)).is_empty());

        block_on(m.switch_mode(NoteMode::Website));
        let site = block_on(m.save(SaveTarget::Domain, "local"));
        assert!(site.wrote() && site.lists_new_note());
    }

    #[test]
    fn test_first_save_stamp_is_kept() {
        let m = manager("https://a.com/");
        set_now(100);
        block_on(m.save(SaveTarget::Domain, "one"));
        set_now(900);
        block_on(m.save(SaveTarget::Domain, "two"));

        assert_eq!(m.store.raw("a.com"), Some(json!("two")));
        assert_eq!(m.store.raw(META_KEY), Some(json!({"a.com": 100})));
    }

    #[test]
    fn test_domain_and_full_url_notes_coexist() {
        let m = manager("https://a.com/page");
        block_on(m.save(SaveTarget::Domain, "site"));
        block_on(m.save(SaveTarget::FullUrl, "page"));

        let rows = block_on(m.open_notes(SortMode::Url));
        let keys: Vec<_> = rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["a.com", "https://a.com/page"]);
    }

    #[test]
    fn test_full_url_save_disabled_without_extended_notes() {
        let m = NoteManager::new(InMemoryStore::new(), FixedTab::new("https://a.com/p"), false);
        assert_eq!(
            block_on(m.save(SaveTarget::FullUrl, "x")),
            SaveOutcome::Disabled
        );
        assert!(!m.store.contains("https://a.com/p"));
    }

    #[test]
    fn test_hostless_tab_writes_nothing() {
        let m = manager("about:blank");
        assert_eq!(
            block_on(m.save(SaveTarget::Domain, "x")),
            SaveOutcome::NoSite
        );
        assert!(!m.store.contains(""));
        assert!(!m.store.contains(META_KEY));
    }

    #[test]
    fn test_delete_removes_value_and_stamp() {
        let m = manager("https://a.com/");
        block_on(m.save(SaveTarget::Domain, "x"));
        block_on(m.set_label("a.com", "Work"));
        block_on(m.delete("a.com"));

        assert!(!m.store.contains("a.com"));
        assert_eq!(m.store.raw(META_KEY), Some(json!({})));
        // Residual label is harmless.
        assert_eq!(m.store.raw(DISPLAY_NAMES_KEY), Some(json!({"a.com": "Work"})));
        assert!(block_on(m.open_notes(SortMode::Url)).is_empty());
    }

    #[test]
    fn test_label_set_and_clear() {
        let m = manager("https://a.com/");
        block_on(m.save(SaveTarget::Domain, "x"));

        block_on(m.set_label("a.com", "  Work "));
        let rows = block_on(m.open_notes(SortMode::Url));
        assert_eq!(rows[0].text, "Work");
        assert!(rows[0].labeled);

        block_on(m.clear_label("a.com"));
        let rows = block_on(m.open_notes(SortMode::Url));
        assert_eq!(rows[0].text, "a.com");
        assert!(!rows[0].labeled);
    }

    #[test]
    fn test_blank_label_is_ignored() {
        let m = manager("https://a.com/");
        block_on(m.set_label("a.com", "   "));
        assert!(!m.store.contains(DISPLAY_NAMES_KEY));
    }

    #[test]
    fn test_blank_note_is_not_listed() {
        let m = manager("https://a.com/");
        block_on(m.save(SaveTarget::Domain, "  \t "));
        assert!(m.store.contains("a.com"));
        assert!(block_on(m.open_notes(SortMode::Url)).is_empty());
    }

    #[test]
    fn test_theme_persists() {
        let m = manager("https://a.com/");
        assert_eq!(block_on(m.load_theme()), Theme::Default);
        block_on(m.set_theme(Theme::Dainty));
        assert_eq!(block_on(m.load_theme()), Theme::Dainty);
    }
}
