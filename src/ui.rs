//! Components and systems that keep rendered UI in step with the active
//! locale.
//!
//! - [`LocalizedText`] drives the `Text` of its entity.
//! - Each [`LanguageButton`] carries an [`AccessibilityNode`] with role
//!   `Button`, labelled from `common.change_language`. The one for the
//!   active locale carries [`ActiveLanguage`] and [`ACTIVE_BUTTON_COLOR`].
//!
//! All of it is refreshed in the frame a [`LocaleChanged`] is written.

use accesskit::{ Node as AccessKitNode, Role };
use bevy::a11y::AccessibilityNode;
use bevy::input_focus::tab_navigation::{ TabGroup, TabIndex };
use bevy::prelude::*;

use crate::preference::{ PreferenceStorage, Preferences };
use crate::store::LocaleChange;
use crate::{ I18n, I18nConfig, LocaleChanged };

/// Text rendered from a message key.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct LocalizedText {
    pub key: String,
    pub params: Vec<(String, String)>,
}

impl LocalizedText {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into(), params: Vec::new() }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }

    pub fn render(&self, i18n: &I18n) -> String {
        let params: Vec<(&str, &str)> = self.params
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();
        i18n.t_with(&self.key, &params)
    }
}

/// Button that switches to `locale` when pressed.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct LanguageButton {
    pub locale: String,
}

/// Marks the button of the active locale.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ActiveLanguage;

pub const BUTTON_COLOR: Color = Color::srgb(0.10, 0.10, 0.12);
pub const ACTIVE_BUTTON_COLOR: Color = Color::srgb(0.0, 0.45, 0.35);

fn button_color(is_active: bool) -> Color {
    if is_active { ACTIVE_BUTTON_COLOR } else { BUTTON_COLOR }
}

fn button_accessibility(label: String) -> AccessibilityNode {
    let mut node = AccessKitNode::new(Role::Button);
    node.set_label(label);
    AccessibilityNode(node)
}

/// "Change language to Português", in the active locale.
pub fn language_button_label(i18n: &I18n, locale: &str) -> String {
    let name = i18n.display_name(locale).unwrap_or(locale);
    i18n.t_with("common.change_language", &[("name", name)])
}

/// Persists `locale` under `key`, then makes it the active locale.
///
/// A failed write is logged and does not prevent the switch.
pub fn switch_language(
    i18n: &mut I18n,
    preferences: &dyn PreferenceStorage,
    key: &str,
    locale: &str
) -> Option<LocaleChange> {
    if let Err(e) = preferences.write(key, locale) {
        warn!("Could not persist locale '{}': {}", locale, e);
    }
    i18n.set_lang(locale)
}

/// Spawns one button per available locale, in selector order, which is also
/// their tab order. Returns the container entity.
pub fn spawn_language_selector(commands: &mut Commands, i18n: &I18n) -> Entity {
    let active = i18n.get_lang().to_string();
    let buttons: Vec<(String, String, String)> = i18n
        .available_languages()
        .iter()
        .map(|locale| {
            let name = i18n.display_name(locale).unwrap_or(locale).to_string();
            (locale.clone(), name, language_button_label(i18n, locale))
        })
        .collect();

    commands
        .spawn((Node::default(), TabGroup::new(0)))
        .with_children(|parent| {
            for (locale, name, label) in buttons {
                let is_active = locale == active;
                let mut button = parent.spawn((
                    Button,
                    TabIndex(0),
                    Text::new(name),
                    button_accessibility(label),
                    BackgroundColor(button_color(is_active)),
                    LanguageButton { locale },
                ));
                if is_active {
                    button.insert(ActiveLanguage);
                }
            }
        })
        .id()
}

pub fn handle_language_buttons(
    buttons: Query<(&Interaction, &LanguageButton), Changed<Interaction>>,
    mut i18n: ResMut<I18n>,
    preferences: Res<Preferences>,
    config: Res<I18nConfig>,
    mut changed: MessageWriter<LocaleChanged>
) {
    for (interaction, button) in &buttons {
        if *interaction != Interaction::Pressed {
            continue;
        }
        let change = switch_language(
            &mut i18n,
            &**preferences,
            &config.preference_key,
            &button.locale
        );
        if let Some(change) = change {
            changed.write(change.into());
        }
    }
}

pub fn refresh_localized_text(
    i18n: Res<I18n>,
    mut changes: MessageReader<LocaleChanged>,
    mut texts: Query<(Ref<LocalizedText>, &mut Text)>
) {
    let switched = changes.read().count() > 0 || i18n.is_changed();
    for (localized, mut text) in &mut texts {
        if switched || localized.is_changed() {
            text.0 = localized.render(&i18n);
        }
    }
}

/// Keeps labels, the active marker and the active color in step with the
/// active locale.
///
/// The label is also restored when something else rewrites the node, as
/// Bevy's UI accessibility systems do for newly spawned buttons.
pub fn refresh_language_buttons(
    mut commands: Commands,
    i18n: Res<I18n>,
    mut changes: MessageReader<LocaleChanged>,
    mut buttons: Query<
        (
            Entity,
            Ref<LanguageButton>,
            &mut AccessibilityNode,
            &mut BackgroundColor,
            Has<ActiveLanguage>,
        )
    >
) {
    let switched = changes.read().count() > 0 || i18n.is_changed();
    for (entity, button, mut accessibility, mut background, is_marked) in &mut buttons {
        if !switched && !button.is_changed() && !accessibility.is_changed() {
            continue;
        }

        let label = language_button_label(&i18n, &button.locale);
        if accessibility.0.label() != Some(label.as_str()) {
            accessibility.0.set_label(label);
        }

        let is_active = button.locale == i18n.get_lang();
        if is_active && !is_marked {
            commands.entity(entity).insert(ActiveLanguage);
        } else if !is_active && is_marked {
            commands.entity(entity).remove::<ActiveLanguage>();
        }
        let color = button_color(is_active);
        if background.0 != color {
            background.0 = color;
        }
    }
}
