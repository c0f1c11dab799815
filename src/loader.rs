// Loading of locale dictionaries, either bundled at build time or read from
// a `messages/` folder (one `<locale>.json` file per locale).

use std::collections::{ BTreeMap, HashMap };

use bevy::log::{ debug, warn };
use serde::Deserialize;

use crate::catalog::Dictionary;
use crate::error::I18nError;

/// `locale -> flattened dictionary`.
pub type LangMap = HashMap<String, Dictionary>;

/// A node of a message file: a template, a nested group of messages, or
/// something that cannot be a message.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MessageNode {
    Text(String),
    Group(BTreeMap<String, MessageNode>),
    Invalid(serde_json::Value),
}

/// Parsed (still nested) content of one message file.
type MessageFile = BTreeMap<String, MessageNode>;

const BUNDLED_TRANSLATIONS: &str = include_str!(concat!(env!("OUT_DIR"), "/all_translations.json"));

/// Translations bundled by `build.rs`.
pub fn load_bundled_translations() -> Result<LangMap, I18nError> {
    let files: BTreeMap<String, MessageFile> = serde_json::from_str(BUNDLED_TRANSLATIONS)?;
    Ok(
        files
            .into_iter()
            .map(|(lang_code, file)| {
                let dictionary = flatten_file(&lang_code, file);
                (lang_code, dictionary)
            })
            .collect()
    )
}

// Filesystem version
#[cfg(not(target_arch = "wasm32"))]
pub fn load_translations_from_fs(messages_folder: &str) -> Result<LangMap, I18nError> {
    use std::fs;
    use std::path::Path;

    let message_dir = Path::new(messages_folder);

    if !message_dir.exists() {
        return Err(
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} folder not found", messages_folder)
            ).into()
        );
    }

    let mut lang_map = HashMap::new();

    for entry in fs::read_dir(message_dir)? {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(lang_code) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        let content = fs::read_to_string(&path)?;
        let file: MessageFile = serde_json
            ::from_str(&content)
            .map_err(|e| I18nError::Parse(format!("{}: {}", path.display(), e)))?;

        debug!("Loaded {}", path.display());
        lang_map.insert(lang_code.to_string(), flatten_file(lang_code, file));
    }

    Ok(lang_map)
}

#[cfg(target_arch = "wasm32")]
pub fn load_translations_from_fs(_messages_folder: &str) -> Result<LangMap, I18nError> {
    Err(I18nError::StorageUnavailable("filesystem loading is not available on wasm".to_string()))
}

/// Loads every dictionary the way `use_bundled_translations` asks for.
///
/// Filesystem failures fall back to the bundle; a broken bundle leaves the
/// catalog empty, so every lookup renders its key path.
pub fn load_translations(use_bundled: bool, messages_folder: &str) -> LangMap {
    if !use_bundled {
        match load_translations_from_fs(messages_folder) {
            Ok(langs) if !langs.is_empty() => {
                return langs;
            }
            Ok(_) => {
                warn!("No message files in '{}', using bundled translations", messages_folder);
            }
            Err(e) => {
                warn!("Failed to load translations from '{}': {}", messages_folder, e);
            }
        }
    }

    match load_bundled_translations() {
        Ok(langs) => langs,
        Err(e) => {
            warn!("Failed to load bundled translations: {}", e);
            LangMap::new()
        }
    }
}

fn flatten_file(lang_code: &str, file: MessageFile) -> Dictionary {
    let mut dictionary = Dictionary::new();
    for (key, node) in file {
        flatten_node(lang_code, key, node, &mut dictionary);
    }
    dictionary
}

fn flatten_node(lang_code: &str, path: String, node: MessageNode, out: &mut Dictionary) {
    match node {
        MessageNode::Text(text) => {
            out.insert(path, text);
        }
        MessageNode::Group(children) => {
            for (key, child) in children {
                flatten_node(lang_code, format!("{path}.{key}"), child, out);
            }
        }
        MessageNode::Invalid(value) => {
            warn!("Skipping non-string message '{}' in '{}': {}", path, lang_code, value);
        }
    }
}
