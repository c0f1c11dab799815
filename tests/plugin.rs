use std::sync::{ Arc, Mutex };

use accesskit::Role;
use bevy::a11y::AccessibilityNode;
use bevy::prelude::*;
use nexus_intl::{
    spawn_language_selector,
    ActiveLanguage,
    Environment,
    I18n,
    I18nConfig,
    I18nPlugin,
    LanguageAppExt,
    LanguageButton,
    LocalizedText,
    MemoryPreferences,
    PreferenceStorage,
    Preferences,
    ACTIVE_BUTTON_COLOR,
    BUTTON_COLOR,
    PREFERENCE_KEY,
};

fn app_with(languages: &[&str], preferences: &Preferences) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins).add_plugins(
        I18nPlugin::with_config(I18nConfig {
            use_bundled_translations: true,
            ..Default::default()
        })
            .with_environment(Environment {
                browser_context: true,
                languages: languages.iter().map(|l| l.to_string()).collect(),
            })
            .with_preferences(preferences.clone())
    );
    app
}

fn setup_page(mut commands: Commands, i18n: Res<I18n>) {
    commands.spawn((Text::new(""), LocalizedText::new("hero.subtitle")));
    commands.spawn((Text::new(""), LocalizedText::new("metrics.ago").with_param("n", 7)));
    spawn_language_selector(&mut commands, &i18n);
}

fn page_app(languages: &[&str], preferences: &Preferences) -> App {
    let mut app = app_with(languages, preferences);
    app.add_systems(Startup, setup_page);
    app.update();
    app
}

fn button(app: &mut App, locale: &str) -> Entity {
    let mut query = app.world_mut().query::<(Entity, &LanguageButton)>();
    query
        .iter(app.world())
        .find(|(_, b)| b.locale == locale)
        .map(|(e, _)| e)
        .unwrap()
}

fn press(app: &mut App, locale: &str) {
    let entity = button(app, locale);
    *app.world_mut().get_mut::<Interaction>(entity).unwrap() = Interaction::Pressed;
    app.update();
    *app.world_mut().get_mut::<Interaction>(entity).unwrap() = Interaction::None;
}

fn rendered(app: &mut App, key: &str) -> String {
    let mut query = app.world_mut().query::<(&LocalizedText, &Text)>();
    query
        .iter(app.world())
        .find(|(l, _)| l.key == key)
        .map(|(_, t)| t.0.clone())
        .unwrap()
}

fn active_buttons(app: &mut App) -> Vec<String> {
    let mut query = app.world_mut().query_filtered::<&LanguageButton, With<ActiveLanguage>>();
    query.iter(app.world()).map(|b| b.locale.clone()).collect()
}

fn highlighted_buttons(app: &mut App) -> Vec<String> {
    let mut query = app.world_mut().query::<(&LanguageButton, &BackgroundColor)>();
    query
        .iter(app.world())
        .filter(|(_, color)| color.0 == ACTIVE_BUTTON_COLOR)
        .map(|(b, _)| b.locale.clone())
        .collect()
}

fn accessible_label(app: &mut App, locale: &str) -> String {
    let mut query = app.world_mut().query::<(&LanguageButton, &AccessibilityNode)>();
    query
        .iter(app.world())
        .find(|(b, _)| b.locale == locale)
        .and_then(|(_, node)| node.0.label().map(str::to_string))
        .unwrap()
}

fn memory() -> Preferences {
    Preferences::new(MemoryPreferences::new())
}

#[test]
fn initial_locale_comes_from_environment() {
    let app = app_with(&["pt-BR"], &memory());
    assert_eq!(app.world().resource::<I18n>().get_lang(), "pt");

    let app = app_with(&["fr-FR"], &memory());
    assert_eq!(app.world().resource::<I18n>().get_lang(), "en");
}

#[test]
fn stored_preference_beats_environment() {
    let preferences = memory();
    preferences.write(PREFERENCE_KEY, "de").unwrap();
    let app = app_with(&["pt-BR"], &preferences);
    assert_eq!(app.world().resource::<I18n>().get_lang(), "de");
}

#[test]
fn prerender_always_starts_in_english() {
    let preferences = memory();
    preferences.write(PREFERENCE_KEY, "ja").unwrap();
    let mut app = App::new();
    app.add_plugins(MinimalPlugins).add_plugins(
        I18nPlugin::with_config(I18nConfig { prerender: true, ..Default::default() })
            .with_environment(Environment { browser_context: false, languages: vec!["ru".into()] })
            .with_preferences(preferences)
    );
    assert_eq!(app.world().resource::<I18n>().get_lang(), "en");
}

#[test]
fn first_frame_renders_active_locale() {
    let mut app = page_app(&["en"], &memory());
    assert_eq!(
        rendered(&mut app, "hero.subtitle"),
        "Proprietary Quantitative Research & Automated Decision Systems."
    );
    assert_eq!(rendered(&mut app, "metrics.ago"), "7s ago");
    assert_eq!(active_buttons(&mut app), vec!["en"]);
    assert_eq!(highlighted_buttons(&mut app), vec!["en"]);
}

#[test]
fn selecting_portuguese_updates_text_marker_and_storage() {
    let preferences = memory();
    let mut app = page_app(&["en"], &preferences);
    let english = rendered(&mut app, "hero.subtitle");

    press(&mut app, "pt");

    let portuguese = rendered(&mut app, "hero.subtitle");
    assert_eq!(portuguese, "Pesquisa Quantitativa Proprietária e Sistemas de Decisão Automatizados.");
    assert_ne!(portuguese, english);
    assert_ne!(
        portuguese,
        "Investigación Cuantitativa Propietaria y Sistemas de Decisión Automatizados."
    );
    assert_eq!(rendered(&mut app, "metrics.ago"), "7s atrás");
    assert_eq!(active_buttons(&mut app), vec!["pt"]);
    assert_eq!(preferences.read(PREFERENCE_KEY).unwrap().as_deref(), Some("pt"));
}

#[test]
fn switching_twice_leaves_only_the_last_locale() {
    let mut app = page_app(&["en"], &memory());
    press(&mut app, "pt");
    press(&mut app, "es");

    let i18n = app.world().resource::<I18n>();
    assert_eq!(i18n.get_lang(), "es");
    for key in ["hero.subtitle", "common.loading", "hero.status", "common.toggle_theme"] {
        let shown = i18n.t(key);
        assert_eq!(shown, i18n.catalog().format("es", key, &[]));
        assert_ne!(shown, i18n.catalog().format("pt", key, &[]), "{key}");
        assert_ne!(shown, i18n.catalog().format("en", key, &[]), "{key}");
    }
    assert_eq!(active_buttons(&mut app), vec!["es"]);
}

#[test]
fn choice_survives_reload() {
    let preferences = memory();
    let mut app = page_app(&["en"], &preferences);
    press(&mut app, "pt");
    let before = rendered(&mut app, "hero.subtitle");

    let mut reloaded = page_app(&["en"], &preferences);
    assert_eq!(reloaded.world().resource::<I18n>().get_lang(), "pt");
    assert_eq!(rendered(&mut reloaded, "hero.subtitle"), before);
}

#[test]
fn button_labels_name_their_language() {
    let mut app = page_app(&["en"], &memory());
    let mut query = app.world_mut().query::<(Entity, &LanguageButton, &AccessibilityNode, &Text)>();
    let mut buttons: Vec<_> = query.iter(app.world()).collect();
    // spawn order is selector order
    buttons.sort_by_key(|(entity, ..)| *entity);
    let labels: Vec<(String, String, String)> = buttons
        .into_iter()
        .map(|(_, b, node, t)| {
            assert_eq!(node.0.role(), Role::Button);
            (b.locale.clone(), node.0.label().unwrap_or_default().to_string(), t.0.clone())
        })
        .collect();

    assert_eq!(labels.len(), 8);
    let order: Vec<&str> = labels.iter().map(|(l, _, _)| l.as_str()).collect();
    assert_eq!(order, vec!["en", "pt", "es", "ru", "uk", "zh", "ja", "de"]);
    for (locale, label, text) in &labels {
        let name = nexus_intl::display_name(locale).unwrap();
        assert_eq!(text, name);
        assert!(label.contains(name), "{label}");
    }
    assert!(labels.iter().any(|(_, label, _)| label == "Change language to Português"));

    press(&mut app, "pt");
    assert_eq!(accessible_label(&mut app, "es"), "Alterar idioma para Español");
}

#[test]
fn overwritten_accessible_label_is_restored() {
    let mut app = page_app(&["en"], &memory());
    let entity = button(&mut app, "de");
    app.world_mut().get_mut::<AccessibilityNode>(entity).unwrap().0.clear_label();

    app.update();

    assert_eq!(accessible_label(&mut app, "de"), "Change language to Deutsch");
}

#[test]
fn only_active_button_is_highlighted() {
    let mut app = page_app(&["en"], &memory());
    assert_eq!(highlighted_buttons(&mut app), vec!["en"]);

    press(&mut app, "ru");
    assert_eq!(highlighted_buttons(&mut app), vec!["ru"]);
    let en = button(&mut app, "en");
    assert_eq!(app.world().get::<BackgroundColor>(en).unwrap().0, BUTTON_COLOR);
}

#[test]
fn pressing_active_language_changes_nothing() {
    let mut app = page_app(&["en"], &memory());
    let seen = Arc::new(Mutex::new(0));
    let sink = Arc::clone(&seen);
    app.world_mut()
        .resource_mut::<I18n>()
        .store_mut()
        .subscribe(move |_| *sink.lock().unwrap() += 1);

    press(&mut app, "en");

    assert_eq!(*seen.lock().unwrap(), 0);
    assert_eq!(active_buttons(&mut app), vec!["en"]);
    assert!(app.set_lang_i18n("en").is_none());
}

#[test]
fn app_extension_switches_and_notifies() {
    let preferences = memory();
    let mut app = page_app(&["en"], &preferences);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    app.world_mut()
        .resource_mut::<I18n>()
        .store_mut()
        .subscribe(move |change| sink.lock().unwrap().push(change.current.clone()));

    let change = app.set_lang_i18n("ja").unwrap();
    assert_eq!(change.previous, "en");
    app.update();

    assert_eq!(rendered(&mut app, "metrics.ago"), "7秒前");
    assert_eq!(active_buttons(&mut app), vec!["ja"]);
    assert_eq!(*seen.lock().unwrap(), vec!["ja".to_string()]);
    assert_eq!(preferences.read(PREFERENCE_KEY).unwrap().as_deref(), Some("ja"));
}

#[test]
fn unsupported_locale_degrades_to_english() {
    let mut app = page_app(&["en"], &memory());
    app.set_lang_i18n("fr");
    app.update();

    assert_eq!(app.world().resource::<I18n>().get_lang(), "fr");
    assert_eq!(
        rendered(&mut app, "hero.subtitle"),
        "Proprietary Quantitative Research & Automated Decision Systems."
    );
    assert!(active_buttons(&mut app).is_empty());
    assert!(highlighted_buttons(&mut app).is_empty());
}

#[test]
fn disabled_storage_does_not_block_switching() {
    let preferences = Preferences::new(MemoryPreferences::disabled());
    let mut app = page_app(&["zh", "en"], &preferences);
    assert_eq!(app.world().resource::<I18n>().get_lang(), "zh");

    press(&mut app, "uk");
    assert_eq!(app.world().resource::<I18n>().get_lang(), "uk");
    assert_eq!(
        rendered(&mut app, "hero.subtitle"),
        "Власні кількісні дослідження та автоматизовані системи прийняття рішень."
    );
}
