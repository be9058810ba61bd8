use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use strum::{AsRefStr, Display, EnumIter, EnumString};

pub(crate) const MODE_KEY: &str = "noteMode";
pub(crate) const PERSISTENT_KEY: &str = "persistentNote";
pub(crate) const META_KEY: &str = "noteMeta";
pub(crate) const DISPLAY_NAMES_KEY: &str = "noteDisplayNames";
pub(crate) const THEME_KEY: &str = "sosanote_theme";

/// Keys that never hold a site note.
pub(crate) const RESERVED_KEYS: [&str; 5] = [
    MODE_KEY,
    PERSISTENT_KEY,
    META_KEY,
    DISPLAY_NAMES_KEY,
    THEME_KEY,
];

pub(crate) fn is_reserved_key(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// Which note the editor is bound to.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Display, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub(crate) enum NoteMode {
    #[default]
    Website,
    Persistent,
}

impl NoteMode {
    pub fn placeholder(self) -> &'static str {
        match self {
            NoteMode::Website => "Write your note for this site...",
            NoteMode::Persistent => "Write your universal note...",
        }
    }
}

#[derive(
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub(crate) enum Theme {
    #[default]
    Default,
    Futuristic,
    Dainty,
    Dark,
    Gopher,
    Rainbow,
}

impl Theme {
    /// Body class for this theme; `Default` applies none.
    pub fn body_class(self) -> Option<String> {
        match self {
            Theme::Default => None,
            other => Some(format!("theme-{other}")),
        }
    }
}

/// Ordering of the open-notes list. Lives in popup state, never in storage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum SortMode {
    #[default]
    Url,
    Date,
}

/// How a site note is keyed: per hostname or per page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SaveTarget {
    Domain,
    FullUrl,
}

/// site-key -> epoch ms of the first save.
pub(crate) type NoteMeta = BTreeMap<String, i64>;

/// site-key -> user label.
pub(crate) type DisplayNames = BTreeMap<String, String>;

/// Storage key of a site-scoped note: a bare hostname or an absolute URL.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct SiteKey(String);

impl SiteKey {
    /// Reserved and blank keys are not site keys.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.trim().is_empty() || is_reserved_key(&key) {
            None
        } else {
            Some(Self(key))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn has_scheme(&self) -> bool {
        self.0.starts_with("http://") || self.0.starts_with("https://")
    }

    /// Link target: full URLs as-is, hostnames behind `https://`.
    pub fn href(&self) -> String {
        if self.has_scheme() {
            self.0.clone()
        } else {
            format!("https://{}", self.0)
        }
    }

    /// Shown text when no label is set.
    pub fn display_text(&self) -> &str {
        self.0
            .strip_prefix("https://")
            .or_else(|| self.0.strip_prefix("http://"))
            .unwrap_or(&self.0)
    }
}

impl std::fmt::Display for SiteKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A decoded storage slot. Which variant comes back is decided by the key
/// that was read, so a mapping is never mistaken for note text.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) enum StorageValue {
    Mode(NoteMode),
    Note(String),
    Meta(NoteMeta),
    DisplayNames(DisplayNames),
    Theme(Theme),
    #[default]
    Absent,
}

impl StorageValue {
    pub fn decode(key: &str, raw: Option<&Value>) -> Self {
        let Some(raw) = raw else {
            return StorageValue::Absent;
        };

        match key {
            MODE_KEY => raw
                .as_str()
                .and_then(|s| s.parse().ok())
                .map(StorageValue::Mode)
                .unwrap_or(StorageValue::Absent),
            THEME_KEY => raw
                .as_str()
                .and_then(|s| s.parse().ok())
                .map(StorageValue::Theme)
                .unwrap_or(StorageValue::Absent),
            META_KEY => match raw.as_object() {
                Some(obj) => StorageValue::Meta(
                    obj.iter()
                        .filter_map(|(k, v)| timestamp_of(v).map(|ms| (k.clone(), ms)))
                        .collect(),
                ),
                None => StorageValue::Absent,
            },
            DISPLAY_NAMES_KEY => match raw.as_object() {
                Some(obj) => StorageValue::DisplayNames(
                    obj.iter()
                        .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                        .collect(),
                ),
                None => StorageValue::Absent,
            },
            _ => raw
                .as_str()
                .map(|s| StorageValue::Note(s.to_string()))
                .unwrap_or(StorageValue::Absent),
        }
    }

    pub fn into_mode(self) -> NoteMode {
        match self {
            StorageValue::Mode(m) => m,
            _ => NoteMode::default(),
        }
    }

    pub fn into_theme(self) -> Theme {
        match self {
            StorageValue::Theme(t) => t,
            _ => Theme::default(),
        }
    }

    pub fn into_note(self) -> String {
        match self {
            StorageValue::Note(s) => s,
            _ => String::new(),
        }
    }

    pub fn into_meta(self) -> NoteMeta {
        match self {
            StorageValue::Meta(m) => m,
            _ => NoteMeta::new(),
        }
    }

    pub fn into_display_names(self) -> DisplayNames {
        match self {
            StorageValue::DisplayNames(d) => d,
            _ => DisplayNames::new(),
        }
    }
}

// JS numbers may arrive as floats.
fn timestamp_of(v: &Value) -> Option<i64> {
    v.as_i64().or_else(|| v.as_f64().map(|f| f.round() as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mode_decodes_and_defaults_to_website() {
        let v = json!("persistent");
        assert_eq!(
            StorageValue::decode(MODE_KEY, Some(&v)).into_mode(),
            NoteMode::Persistent
        );
        assert_eq!(
            StorageValue::decode(MODE_KEY, None).into_mode(),
            NoteMode::Website
        );
        let bogus = json!("sideways");
        assert_eq!(
            StorageValue::decode(MODE_KEY, Some(&bogus)),
            StorageValue::Absent
        );
    }

    #[test]
    fn test_meta_is_never_read_as_note_text() {
        let v = json!({"a.com": 100, "b.com": 200.0});
        let decoded = StorageValue::decode(META_KEY, Some(&v));
        let StorageValue::Meta(meta) = decoded.clone() else {
            panic!("expected meta, got {decoded:?}");
        };
        assert_eq!(meta.get("a.com"), Some(&100));
        assert_eq!(meta.get("b.com"), Some(&200));
        assert_eq!(decoded.into_note(), "");
    }

    #[test]
    fn test_site_value_that_is_not_text_is_absent() {
        let v = json!({"nested": true});
        assert_eq!(
            StorageValue::decode("example.com", Some(&v)),
            StorageValue::Absent
        );
    }

    #[test]
    fn test_failed_read_defaults_to_absent() {
        let value = StorageValue::default();
        assert_eq!(value, StorageValue::Absent);
        assert_eq!(value.clone().into_note(), "");
        assert_eq!(value.into_mode(), NoteMode::Website);
    }

    #[test]
    fn test_theme_body_class() {
        assert_eq!(Theme::Default.body_class(), None);
        assert_eq!(Theme::Gopher.body_class().as_deref(), Some("theme-gopher"));
        assert_eq!("rainbow".parse::<Theme>().ok(), Some(Theme::Rainbow));
    }

    #[test]
    fn test_site_key_href_and_text() {
        let host = SiteKey::new("a.com").expect("site key");
        assert_eq!(host.href(), "https://a.com");
        assert_eq!(host.display_text(), "a.com");

        let page = SiteKey::new("http://a.com/path?q=1").expect("site key");
        assert_eq!(page.href(), "http://a.com/path?q=1");
        assert_eq!(page.display_text(), "a.com/path?q=1");
    }

    #[test]
    fn test_reserved_keys_are_not_site_keys() {
        for k in RESERVED_KEYS {
            assert!(SiteKey::new(k).is_none());
        }
        assert!(SiteKey::new("   ").is_none());
    }
}
