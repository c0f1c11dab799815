/// A locale the site ships a dictionary for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportedLocale {
    /// Locale code, also the name of the `messages/<code>.json` file.
    pub code: &'static str,
    /// Name of the language written in that language, shown on its button.
    pub display_name: &'static str,
}

/// Every supported locale, in language-selector order.
pub const SUPPORTED_LOCALES: &[SupportedLocale] = &[
    SupportedLocale { code: "en", display_name: "English" },
    SupportedLocale { code: "pt", display_name: "Português" },
    SupportedLocale { code: "es", display_name: "Español" },
    SupportedLocale { code: "ru", display_name: "Русский" },
    SupportedLocale { code: "uk", display_name: "Українська" },
    SupportedLocale { code: "zh", display_name: "中文" },
    SupportedLocale { code: "ja", display_name: "日本語" },
    SupportedLocale { code: "de", display_name: "Deutsch" },
];

/// Locale used when nothing better is known, and as the lookup fallback.
pub const DEFAULT_LOCALE: &str = "en";

/// Key under which the chosen locale is persisted.
pub const PREFERENCE_KEY: &str = "preferred-locale";

/// Codes of [`SUPPORTED_LOCALES`], in order.
pub fn supported_codes() -> Vec<String> {
    SUPPORTED_LOCALES.iter().map(|l| l.code.to_string()).collect()
}

/// Native display name of a supported locale.
pub fn display_name(code: &str) -> Option<&'static str> {
    SUPPORTED_LOCALES
        .iter()
        .find(|l| l.code == code)
        .map(|l| l.display_name)
}
