//! Persistence of the visitor's chosen locale across reloads.
//!
//! Only the language-switch handler writes; the resolver only reads.

use std::collections::HashMap;
use std::sync::{ Arc, RwLock };

use bevy::prelude::Resource;

use crate::error::I18nError;

/// Key/value storage that survives a reload.
pub trait PreferenceStorage: Send + Sync {
    /// Value stored under `key`, `Ok(None)` when nothing was stored.
    fn read(&self, key: &str) -> Result<Option<String>, I18nError>;
    /// Stores `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str) -> Result<(), I18nError>;
}

/// The storage backend used by the plugin. Clones share the same backend.
#[derive(Resource, Clone)]
pub struct Preferences(pub Arc<dyn PreferenceStorage>);

impl Preferences {
    pub fn new(storage: impl PreferenceStorage + 'static) -> Self {
        Self(Arc::new(storage))
    }

    /// Storage backend native to the current platform: `localStorage` in
    /// the browser.
    #[cfg(target_arch = "wasm32")]
    pub fn platform_default(_app_name: &str, _path: Option<&std::path::Path>) -> Self {
        Self::new(LocalStoragePreferences)
    }

    /// Storage backend native to the current platform: a JSON file in the
    /// user's config directory, memory when there is none.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn platform_default(app_name: &str, path: Option<&std::path::Path>) -> Self {
        let path = path
            .map(std::path::Path::to_path_buf)
            .or_else(|| dirs::config_dir().map(|d| d.join(app_name).join("preferences.json")));
        match path {
            Some(path) => Self::new(FilePreferences::new(path)),
            None => {
                bevy::log::warn!("No config directory, locale preference will not persist");
                Self::new(MemoryPreferences::new())
            }
        }
    }
}

impl std::ops::Deref for Preferences {
    type Target = dyn PreferenceStorage;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

/// In-process storage. The `disabled` variant fails every call, the way a
/// browser in privacy mode does.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: RwLock<HashMap<String, String>>,
    disabled: bool,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disabled() -> Self {
        Self { values: RwLock::default(), disabled: true }
    }
}

impl PreferenceStorage for MemoryPreferences {
    fn read(&self, key: &str) -> Result<Option<String>, I18nError> {
        if self.disabled {
            return Err(I18nError::StorageUnavailable("storage disabled".to_string()));
        }
        let values = self.values
            .read()
            .map_err(|e| I18nError::Storage(e.to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), I18nError> {
        if self.disabled {
            return Err(I18nError::StorageUnavailable("storage disabled".to_string()));
        }
        let mut values = self.values
            .write()
            .map_err(|e| I18nError::Storage(e.to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON object in a file, e.g. `{"preferred-locale": "pt"}`.
///
/// A missing file reads as "nothing stored"; other keys in the file are kept
/// on write.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FilePreferences {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn load(&self) -> Result<serde_json::Map<String, serde_json::Value>, I18nError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(serde_json::Map::new());
            }
            Err(e) => {
                return Err(e.into());
            }
        };
        match serde_json::from_str::<serde_json::Value>(&content)? {
            serde_json::Value::Object(map) => Ok(map),
            _ => Err(I18nError::Parse(format!("{} is not a JSON object", self.path.display()))),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl PreferenceStorage for FilePreferences {
    fn read(&self, key: &str) -> Result<Option<String>, I18nError> {
        Ok(
            self
                .load()?
                .get(key)
                .and_then(|v| v.as_str())
                .map(str::to_string)
        )
    }

    fn write(&self, key: &str, value: &str) -> Result<(), I18nError> {
        // A corrupt file is replaced rather than blocking the write.
        let mut map = self.load().unwrap_or_default();
        map.insert(key.to_string(), serde_json::Value::String(value.to_string()));

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&serde_json::Value::Object(map))?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

/// `window.localStorage`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStoragePreferences;

#[cfg(target_arch = "wasm32")]
impl LocalStoragePreferences {
    fn storage() -> Result<web_sys::Storage, I18nError> {
        let window = web_sys
            ::window()
            .ok_or_else(|| I18nError::StorageUnavailable("no window".to_string()))?;
        window
            .local_storage()
            .map_err(|e| I18nError::StorageUnavailable(format!("{e:?}")))?
            .ok_or_else(|| I18nError::StorageUnavailable("localStorage disabled".to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
impl PreferenceStorage for LocalStoragePreferences {
    fn read(&self, key: &str) -> Result<Option<String>, I18nError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| I18nError::Storage(format!("{e:?}")))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), I18nError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| I18nError::Storage(format!("{e:?}")))
    }
}
