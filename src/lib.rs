#![doc = include_str!("../README.md")]

//! # nexus-intl
//!
//! Internationalization for the Nexus Quant front-end, as a [Bevy](https://bevyengine.org/) plugin:
//!
//! - **Eight locales**: `en`, `pt`, `es`, `ru`, `uk`, `zh`, `ja`, `de`, all loaded eagerly
//! - **Key parity**: every locale is checked against `en` at build and registration time
//! - **Locale detection**: stored preference, then browser/OS languages, then `en`
//! - **Persistence**: the chosen locale survives reloads (`localStorage` or a JSON file)
//! - **Placeholders**: `{name}`-style substitution
//! - **Reactive UI**: localized text, language buttons and their accessible names
//!   follow the active locale in the same frame
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bevy::prelude::*;
//! use nexus_intl::{ I18n, I18nPlugin, LocalizedText };
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(I18nPlugin::default())
//!         .add_systems(Startup, setup_ui)
//!         .run();
//! }
//!
//! fn setup_ui(mut commands: Commands, i18n: Res<I18n>) {
//!     commands.spawn((Text::new(""), LocalizedText::new("hero.subtitle")));
//!     nexus_intl::spawn_language_selector(&mut commands, &i18n);
//! }
//! ```

use bevy::prelude::*;

mod catalog;
mod error;
mod loader;
mod locales;
mod preference;
mod resolver;
mod store;
mod ui;

pub use catalog::{ interpolate, Catalog, Dictionary };
pub use error::I18nError;
pub use loader::{ load_bundled_translations, load_translations, LangMap };
pub use locales::{ display_name, supported_codes, SupportedLocale, DEFAULT_LOCALE, PREFERENCE_KEY, SUPPORTED_LOCALES };
#[cfg(target_arch = "wasm32")]
pub use preference::LocalStoragePreferences;
#[cfg(not(target_arch = "wasm32"))]
pub use preference::FilePreferences;
pub use preference::{ MemoryPreferences, PreferenceStorage, Preferences };
pub use resolver::{ detect_initial_locale, normalize_tag, primary_subtag, resolve_locale, Environment };
pub use store::{ LocaleChange, LocaleStore, SubscriptionId };
pub use ui::{
    handle_language_buttons,
    language_button_label,
    refresh_language_buttons,
    refresh_localized_text,
    spawn_language_selector,
    switch_language,
    ActiveLanguage,
    ACTIVE_BUTTON_COLOR,
    BUTTON_COLOR,
    LanguageButton,
    LocalizedText,
};

/// Configuration for the I18n plugin.
///
/// # Example
///
/// ```rust
/// use nexus_intl::I18nConfig;
///
/// let config = I18nConfig {
///     prerender: true,
///     ..Default::default()
/// };
/// assert_eq!(config.fallback_lang, "en");
/// ```
#[derive(Debug, Clone, Resource)]
pub struct I18nConfig {
    /// Locales offered to the visitor, in selector order.
    pub supported_locales: Vec<String>,
    /// Locale used when detection finds nothing.
    /// Default: "en"
    pub default_lang: String,
    /// Locale used when a key is missing from the active one.
    /// Default: "en"
    pub fallback_lang: String,
    /// Storage key of the persisted choice.
    /// Default: "preferred-locale"
    pub preference_key: String,
    /// Whether to use bundled translations (true) or filesystem loading (false).
    /// Automatically set to `true` for WASM targets or when `bundle-only` feature is enabled.
    pub use_bundled_translations: bool,
    /// Folder with one `<locale>.json` per locale, for filesystem loading.
    /// Default: "messages"
    pub messages_folder: String,
    /// Render without a browser context: detection always yields `default_lang`.
    pub prerender: bool,
    /// Directory name under the user config dir for the desktop preference file.
    pub app_name: String,
    /// Explicit preference file, overriding the config-dir default.
    pub preferences_path: Option<std::path::PathBuf>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            supported_locales: supported_codes(),
            default_lang: DEFAULT_LOCALE.to_string(),
            fallback_lang: DEFAULT_LOCALE.to_string(),
            preference_key: PREFERENCE_KEY.to_string(),
            use_bundled_translations: cfg!(target_arch = "wasm32") || cfg!(feature = "bundle-only"),
            messages_folder: "messages".to_string(),
            prerender: false,
            app_name: "nexus-quant".to_string(),
            preferences_path: None,
        }
    }
}

// ---------- Bevy Plugin ----------

/// Main plugin.
///
/// Loads every dictionary, resolves the initial locale and registers the
/// systems that keep localized UI in sync with the active locale.
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use nexus_intl::{ Environment, I18nPlugin, MemoryPreferences, Preferences };
///
/// let mut app = App::new();
/// app.add_plugins(MinimalPlugins).add_plugins(
///     I18nPlugin::default()
///         .with_environment(Environment { browser_context: true, languages: vec!["pt-BR".into()] })
///         .with_preferences(Preferences::new(MemoryPreferences::new()))
/// );
/// assert_eq!(app.world().resource::<nexus_intl::I18n>().get_lang(), "pt");
/// ```
#[derive(Default)]
pub struct I18nPlugin {
    /// Configuration for the plugin
    pub config: I18nConfig,
    /// Overrides platform detection when set.
    pub environment: Option<Environment>,
    /// Overrides the platform storage backend when set.
    pub preferences: Option<Preferences>,
}

impl I18nPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: I18nConfig) -> Self {
        Self { config, ..Default::default() }
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = Some(preferences);
        self
    }
}

impl Plugin for I18nPlugin {
    fn build(&self, app: &mut App) {
        let environment = self.environment
            .clone()
            .unwrap_or_else(|| Environment::detect(&self.config));
        let preferences = self.preferences
            .clone()
            .unwrap_or_else(||
                Preferences::platform_default(
                    &self.config.app_name,
                    self.config.preferences_path.as_deref()
                )
            );

        app.insert_resource(self.config.clone())
            .insert_resource(environment)
            .insert_resource(preferences)
            .init_resource::<I18n>()
            .add_message::<LocaleChanged>()
            .add_systems(
                Update,
                (handle_language_buttons, refresh_localized_text, refresh_language_buttons).chain()
            );
    }
}

/// Written whenever the active locale effectively changes.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct LocaleChanged {
    pub previous: String,
    pub current: String,
}

impl From<LocaleChange> for LocaleChanged {
    fn from(change: LocaleChange) -> Self {
        Self { previous: change.previous, current: change.current }
    }
}

/// Main resource for accessing translations in Bevy systems.
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use nexus_intl::I18n;
///
/// fn footer(i18n: Res<I18n>) {
///     let rights = i18n.t_with("footer.rights", &[("year", "2025")]);
///     info!("{}", rights);
/// }
/// ```
#[derive(Resource, Debug)]
pub struct I18n {
    /// All registered dictionaries
    catalog: Catalog,
    /// Active and fallback locale
    store: LocaleStore,
    /// Locales offered to the visitor
    supported: Vec<String>,
}

impl FromWorld for I18n {
    fn from_world(world: &mut World) -> Self {
        let config = world.get_resource::<I18nConfig>().cloned().unwrap_or_default();
        let environment = world
            .get_resource::<Environment>()
            .cloned()
            .unwrap_or_else(|| Environment::detect(&config));

        let initial = match world.get_resource::<Preferences>() {
            Some(preferences) => detect_initial_locale(&config, &environment, &**preferences),
            None => detect_initial_locale(&config, &environment, &MemoryPreferences::new()),
        };

        let catalog = build_catalog(&config);
        Self::new(
            catalog,
            LocaleStore::create(config.fallback_lang.clone(), initial),
            config.supported_locales
        )
    }
}

// Registers the fallback first so every other locale is parity checked
fn build_catalog(config: &I18nConfig) -> Catalog {
    let mut langs = load_translations(config.use_bundled_translations, &config.messages_folder);
    let mut catalog = Catalog::new(config.fallback_lang.clone());

    match langs.remove(&config.fallback_lang) {
        Some(dictionary) => {
            if let Err(e) = catalog.register(config.fallback_lang.clone(), dictionary) {
                error!("{}", e);
            }
        }
        None => warn!("No dictionary for fallback locale '{}'", config.fallback_lang),
    }

    let mut rest: Vec<(String, Dictionary)> = langs.into_iter().collect();
    rest.sort_by(|a, b| a.0.cmp(&b.0));
    for (lang_code, dictionary) in rest {
        if let Err(e) = catalog.register(lang_code, dictionary) {
            error!("Locale skipped: {}", e);
        }
    }

    for code in &config.supported_locales {
        if !catalog.contains(code) {
            warn!("Supported locale '{}' has no dictionary, it will render '{}'", code, config.fallback_lang);
        }
    }
    catalog
}

impl I18n {
    pub fn new(catalog: Catalog, store: LocaleStore, supported: Vec<String>) -> Self {
        Self { catalog, store, supported }
    }

    /// Localized string for `key` in the active locale.
    ///
    /// Falls back to the fallback locale, then to the key path itself.
    pub fn t(&self, key: &str) -> String {
        self.t_with(key, &[])
    }

    /// Like [`I18n::t`], replacing `{name}` placeholders from `params`.
    ///
    /// ```rust,ignore
    /// // "ago": "{n}s ago"
    /// i18n.t_with("metrics.ago", &[("n", "3")]); // "3s ago"
    /// ```
    pub fn t_with(&self, key: &str, params: &[(&str, &str)]) -> String {
        self.catalog.format(self.store.active(), key, params)
    }

    /// Switches the active locale.
    ///
    /// Unsupported codes are accepted; every lookup then shows the fallback
    /// locale's strings.
    pub fn set_lang(&mut self, locale: &str) -> Option<LocaleChange> {
        if !self.supported.iter().any(|s| s == locale) {
            warn!("Locale '{}' not supported, lookups will use '{}'", locale, self.store.fallback());
        }
        let change = self.store.set_locale(locale);
        if let Some(change) = &change {
            info!("Locale changed from '{}' to '{}'", change.previous, change.current);
        }
        change
    }

    /// Gets the current language code.
    pub fn get_lang(&self) -> &str {
        self.store.active()
    }

    pub fn fallback_lang(&self) -> &str {
        self.store.fallback()
    }

    /// Locales offered to the visitor, in selector order.
    pub fn available_languages(&self) -> &[String] {
        &self.supported
    }

    /// Native name of a supported locale ("Português" for `pt`).
    pub fn display_name(&self, locale: &str) -> Option<&'static str> {
        display_name(locale)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &LocaleStore {
        &self.store
    }

    /// Mutable access to the store, e.g. to subscribe to changes.
    pub fn store_mut(&mut self) -> &mut LocaleStore {
        &mut self.store
    }
}

// ---------- App extension ----------

/// Extension trait for `App` to switch language outside of systems.
///
/// Behaves like pressing a language button: persists the choice, updates
/// the active locale and writes [`LocaleChanged`].
pub trait LanguageAppExt {
    fn set_lang_i18n(&mut self, locale: &str) -> Option<LocaleChange>;
}

impl LanguageAppExt for App {
    fn set_lang_i18n(&mut self, locale: &str) -> Option<LocaleChange> {
        let world = self.world_mut();
        let key = world.get_resource::<I18nConfig>()?.preference_key.clone();
        let preferences = world.get_resource::<Preferences>()?.clone();
        let change = {
            let mut i18n = world.get_resource_mut::<I18n>()?;
            switch_language(&mut i18n, &*preferences, &key, locale)?
        };
        world.write_message(LocaleChanged::from(change.clone()));
        Some(change)
    }
}
