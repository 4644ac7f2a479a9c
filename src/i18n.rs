// ==========================================
// Internationalisation (i18n)
// ==========================================
// rust-i18n backed; Spanish (default) and English
// Note: rust_i18n::i18n! is invoked in lib.rs
// ==========================================

use std::sync::{Mutex, Once};

/// Locale used for every message until a host switches it
pub const DEFAULT_LOCALE: &str = "es";

// the rust-i18n locale is process-global
static LOCALE_LOCK: Mutex<()> = Mutex::new(());

/// Apply `DEFAULT_LOCALE` once per process.
///
/// Later calls are no-ops, so a host's `set_locale` choice is never undone.
pub fn ensure_default_locale() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _guard = LOCALE_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        rust_i18n::set_locale(DEFAULT_LOCALE);
    });
}

/// Current locale code
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// Switch locale ("es" or "en")
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// Translate a key without arguments
///
/// # Example
/// ```no_run
/// use agro_asociados::i18n::t;
/// let msg = t("member.deleted");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// Translate a key and substitute `%{name}` placeholders
///
/// # Example
/// ```no_run
/// use agro_asociados::i18n::t_with_args;
/// let msg = t_with_args("import.record_failed", &[("row", "3"), ("reason", "timeout")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_locale() {
        let _guard = LOCALE_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        set_locale("en");
        assert_eq!(current_locale(), "en");

        set_locale("es");
        assert_eq!(current_locale(), "es");
    }

    #[test]
    fn test_translate_with_args() {
        let _guard = LOCALE_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        set_locale("es");
        let msg = t_with_args("import.record_failed", &[("row", "7"), ("reason", "sin red")]);
        assert_eq!(msg, "Error en registro 7: sin red");

        set_locale("en");
        let msg = t_with_args("import.record_failed", &[("row", "7"), ("reason", "offline")]);
        assert_eq!(msg, "Error in record 7: offline");

        set_locale("es");
    }

    #[test]
    fn test_default_locale_is_spanish() {
        ensure_default_locale();
        let _guard = LOCALE_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        assert_eq!(current_locale(), DEFAULT_LOCALE);
        assert_eq!(
            t_with_args("import.record_failed", &[("row", "2"), ("reason", "x")]),
            "Error en registro 2: x"
        );
    }
}
