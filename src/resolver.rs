//! Initial locale selection.
//!
//! [`resolve_locale`] is a pure function over explicit inputs; [`Environment`]
//! and [`detect_initial_locale`] gather those inputs from the running
//! platform.

use bevy::log::{ debug, info };
use bevy::prelude::Resource;

use crate::preference::PreferenceStorage;
use crate::I18nConfig;

/// What the runtime reports about the visitor.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    /// `false` when rendering without a browser/window (pre-rendering).
    pub browser_context: bool,
    /// Language tags in the user's own order of preference.
    pub languages: Vec<String>,
}

impl Environment {
    /// Probes the current platform.
    ///
    /// On wasm the browser context is the presence of `window`; on desktop it
    /// is the inverse of `config.prerender`. Languages come from
    /// `navigator.languages` or the OS locale list, cleaned up with
    /// [`normalize_tag`].
    pub fn detect(config: &I18nConfig) -> Self {
        let browser_context = !config.prerender && has_window();
        let languages = if browser_context {
            Self::clean_languages(sys_locale::get_locales())
        } else {
            Vec::new()
        };
        Self { browser_context, languages }
    }

    fn clean_languages(reported: impl IntoIterator<Item = String>) -> Vec<String> {
        reported
            .into_iter()
            .filter_map(|tag| normalize_tag(&tag))
            .collect()
    }
}

/// Turns an OS locale name into a BCP 47 style tag.
///
/// `" de_DE.UTF-8 "` becomes `de-DE`. Returns `None` when nothing is left.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let tag = tag.trim();
    let tag = tag.split(['.', '@']).next().unwrap_or(tag);
    if tag.is_empty() {
        return None;
    }
    Some(tag.replace('_', "-"))
}

#[cfg(target_arch = "wasm32")]
fn has_window() -> bool {
    web_sys::window().is_some()
}

#[cfg(not(target_arch = "wasm32"))]
fn has_window() -> bool {
    true
}

/// Chooses the initial locale.
///
/// 1. Outside a browser context, `default` without looking at anything else.
/// 2. A stored preference that is in `supported`.
/// 3. The first reported language that matches exactly, or by its primary
///    subtag (`pt-BR` -> `pt`). List order wins over match specificity.
/// 4. `default`.
pub fn resolve_locale(
    supported: &[String],
    default: &str,
    browser_context: bool,
    stored: Option<&str>,
    reported: &[String]
) -> String {
    if !browser_context {
        return default.to_string();
    }

    let is_supported = |code: &str| supported.iter().any(|s| s == code);

    if let Some(stored) = stored {
        if is_supported(stored) {
            return stored.to_string();
        }
        debug!("Ignoring unsupported stored locale '{}'", stored);
    }

    for lang in reported {
        if lang.is_empty() {
            continue;
        }
        if is_supported(lang) {
            return lang.to_string();
        }
        let primary = primary_subtag(lang);
        if is_supported(primary) {
            return primary.to_string();
        }
    }

    default.to_string()
}

/// Part of a tag before the first `-`.
pub fn primary_subtag(tag: &str) -> &str {
    tag.split('-').next().unwrap_or(tag)
}

/// Resolves the initial locale from the real environment and the stored
/// preference. Storage failures count as "no preference".
pub fn detect_initial_locale(
    config: &I18nConfig,
    environment: &Environment,
    preferences: &dyn PreferenceStorage
) -> String {
    let stored = if environment.browser_context {
        match preferences.read(&config.preference_key) {
            Ok(value) => value,
            Err(e) => {
                debug!("Stored locale unreadable, ignoring: {}", e);
                None
            }
        }
    } else {
        None
    };

    let locale = resolve_locale(
        &config.supported_locales,
        &config.default_lang,
        environment.browser_context,
        stored.as_deref(),
        &environment.languages
    );
    info!(
        "Initial locale '{}' (stored: {:?}, reported: {:?})",
        locale,
        stored,
        environment.languages
    );
    locale
}
