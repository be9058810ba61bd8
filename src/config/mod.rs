use serde_json::Value;

const DEFAULT_SAVED_FLASH_MS: u32 = 2000;

/// Popup settings, optionally overridden through `window.ENV` in the popup
/// page (set before the wasm module loads).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct EnvConfig {
    /// Full-URL saves and note labels.
    pub extended_notes: bool,
    /// How long "Saved!" stays visible.
    pub saved_flash_ms: u32,
    pub log_level: log::Level,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            extended_notes: true,
            saved_flash_ms: DEFAULT_SAVED_FLASH_MS,
            log_level: log::Level::Info,
        }
    }
}

impl EnvConfig {
    pub fn new() -> Self {
        if let Some(window) = web_sys::window() {
            if let Some(env) = window.get("ENV") {
                if !env.is_undefined() && env.is_object() {
                    if let Ok(env) = serde_wasm_bindgen::from_value::<Value>(env.into()) {
                        return Self::from_json(&env);
                    }
                }
            }
        }
        Self::default()
    }

    /// Both `SCREAMING_CASE` (documented) and `snake_case` keys are accepted.
    pub fn from_json(env: &Value) -> Self {
        let lookup = |upper: &str, lower: &str| env.get(upper).or_else(|| env.get(lower));
        let mut cfg = Self::default();

        if let Some(v) = lookup("EXTENDED_NOTES", "extended_notes").and_then(as_bool) {
            cfg.extended_notes = v;
        }
        if let Some(v) = lookup("SAVED_FLASH_MS", "saved_flash_ms")
            .and_then(Value::as_f64)
            .filter(|v| *v >= 0.0)
        {
            cfg.saved_flash_ms = v.min(u32::MAX as f64) as u32;
        }
        if let Some(v) = lookup("LOG_LEVEL", "log_level")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
        {
            cfg.log_level = v;
        }

        cfg
    }
}

// Accept "false"/"0" as well, since page scripts often stringify flags.
fn as_bool(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "on" => Some(true),
            "false" | "0" | "off" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_without_env() {
        let cfg = EnvConfig::from_json(&json!({}));
        assert_eq!(cfg, EnvConfig::default());
        assert!(cfg.extended_notes);
        assert_eq!(cfg.saved_flash_ms, 2000);
    }

    #[test]
    fn test_upper_case_keys_win_over_lower() {
        let cfg = EnvConfig::from_json(&json!({
            "EXTENDED_NOTES": false,
            "extended_notes": true,
            "saved_flash_ms": 500,
            "LOG_LEVEL": "debug",
        }));
        assert!(!cfg.extended_notes);
        assert_eq!(cfg.saved_flash_ms, 500);
        assert_eq!(cfg.log_level, log::Level::Debug);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let cfg = EnvConfig::from_json(&json!({
            "EXTENDED_NOTES": "maybe",
            "SAVED_FLASH_MS": -5,
            "LOG_LEVEL": "loud",
        }));
        assert_eq!(cfg, EnvConfig::default());

        let cfg = EnvConfig::from_json(&json!({"EXTENDED_NOTES": "0"}));
        assert!(!cfg.extended_notes);
    }
}
