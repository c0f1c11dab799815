//! Per-locale dictionaries with fallback lookup and `{name}` substitution.
//!
//! Dictionaries are flat: nested message files are flattened at load time so
//! `philosophy.p1.title` is a single key.
//!
//! # Failure modes
//!
//! | Failure | Behavior |
//! |---------|----------|
//! | Locale lacks reference keys | `register` rejects the dictionary |
//! | Key missing in active locale | Fallback locale's value |
//! | Key missing everywhere | Key path returned by `format` |
//! | `{token}` with no param | Token left as-is |

use std::collections::HashMap;

use bevy::log::{ debug, warn };
use once_cell::sync::Lazy;
use regex::{ Captures, Regex };

use crate::error::I18nError;

/// Flattened `key path -> template` map for one locale.
pub type Dictionary = HashMap<String, String>;

static ARG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{(\w+)\}").expect("placeholder pattern compiles")
});

/// All registered locale dictionaries.
///
/// The reference locale doubles as the lookup fallback and as the key set
/// every other locale has to cover.
#[derive(Debug, Clone)]
pub struct Catalog {
    locales: HashMap<String, Dictionary>,
    reference: String,
}

impl Catalog {
    /// Creates an empty catalog whose fallback and parity reference is
    /// `reference_locale`.
    pub fn new(reference_locale: impl Into<String>) -> Self {
        Self {
            locales: HashMap::new(),
            reference: reference_locale.into(),
        }
    }

    /// Inserts or replaces the full dictionary of `locale`.
    ///
    /// Re-registering a locale overwrites its previous dictionary. A
    /// non-reference locale that lacks any key of the (already registered)
    /// reference locale is rejected and left out of the catalog.
    /// Registering the reference locale re-checks every other locale and
    /// reports the first one out of parity; the reference itself is kept.
    pub fn register(
        &mut self,
        locale: impl Into<String>,
        dictionary: Dictionary
    ) -> Result<(), I18nError> {
        let locale = locale.into();

        if locale == self.reference {
            debug!("Registered reference locale '{}' ({} keys)", locale, dictionary.len());
            self.locales.insert(locale, dictionary);

            let mut others: Vec<&String> = self.locales
                .keys()
                .filter(|l| **l != self.reference)
                .collect();
            others.sort();
            for other in others {
                let missing = self.missing_keys(other);
                if !missing.is_empty() {
                    return Err(I18nError::MissingKeys { locale: other.clone(), keys: missing });
                }
            }
            return Ok(());
        }

        if let Some(reference) = self.locales.get(&self.reference) {
            let mut missing: Vec<String> = reference
                .keys()
                .filter(|k| !dictionary.contains_key(*k))
                .cloned()
                .collect();
            if !missing.is_empty() {
                missing.sort();
                return Err(I18nError::MissingKeys { locale, keys: missing });
            }

            let extra = dictionary
                .keys()
                .filter(|k| !reference.contains_key(*k))
                .count();
            if extra > 0 {
                warn!("Locale '{}' has {} key(s) unknown to '{}'", locale, extra, self.reference);
            }
        }

        debug!("Registered locale '{}' ({} keys)", locale, dictionary.len());
        self.locales.insert(locale, dictionary);
        Ok(())
    }

    /// Raw template for `key`, trying `locale` and then the fallback locale.
    pub fn get(&self, locale: &str, key: &str) -> Option<&str> {
        if let Some(template) = self.locales.get(locale).and_then(|d| d.get(key)) {
            return Some(template.as_str());
        }
        if locale == self.reference {
            return None;
        }
        self.locales
            .get(&self.reference)
            .and_then(|d| d.get(key))
            .map(String::as_str)
    }

    /// Localized string for `key` with `{token}` placeholders replaced from
    /// `params`.
    ///
    /// When neither `locale` nor the fallback has the key, the key path itself
    /// is returned so the page still renders something recognisable.
    pub fn format(&self, locale: &str, key: &str, params: &[(&str, &str)]) -> String {
        match self.get(locale, key) {
            Some(template) => interpolate(template, params),
            None => {
                warn!("Missing translation for '{}' (locale '{}')", key, locale);
                key.to_string()
            }
        }
    }

    /// Locale used for fallback lookups and parity checks.
    pub fn reference_locale(&self) -> &str {
        &self.reference
    }

    /// Whether `locale` has a registered dictionary.
    pub fn contains(&self, locale: &str) -> bool {
        self.locales.contains_key(locale)
    }

    /// Registered locale codes, sorted.
    pub fn locales(&self) -> Vec<&str> {
        let mut locales: Vec<&str> = self.locales.keys().map(String::as_str).collect();
        locales.sort_unstable();
        locales
    }

    /// Keys of `locale`'s own dictionary, sorted. Empty for unknown locales.
    pub fn keys(&self, locale: &str) -> Vec<&str> {
        let mut keys: Vec<&str> = self.locales
            .get(locale)
            .map(|d| d.keys().map(String::as_str).collect())
            .unwrap_or_default();
        keys.sort_unstable();
        keys
    }

    /// Reference keys that `locale` does not define itself, sorted.
    pub fn missing_keys(&self, locale: &str) -> Vec<String> {
        let Some(reference) = self.locales.get(&self.reference) else {
            return Vec::new();
        };
        let dictionary = self.locales.get(locale);
        let mut missing: Vec<String> = reference
            .keys()
            .filter(|k| !dictionary.is_some_and(|d| d.contains_key(*k)))
            .cloned()
            .collect();
        missing.sort();
        missing
    }
}

/// Single-pass `{name}` substitution. Unknown tokens are kept verbatim.
pub fn interpolate(template: &str, params: &[(&str, &str)]) -> String {
    ARG_RE.replace_all(template, |caps: &Captures| {
        let name = &caps[1];
        match params.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => (*value).to_string(),
            None => caps[0].to_string(),
        }
    }).into_owned()
}
