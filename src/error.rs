use thiserror::Error;

/// Errors produced by catalog registration, message loading and
/// preference storage.
///
/// None of these are fatal to rendering: the plugin logs them and keeps
/// going with whatever translations and preferences it could get.
#[derive(Debug, Error)]
pub enum I18nError {
    /// The storage backend cannot be used at all (disabled, privacy mode).
    #[error("preference storage unavailable: {0}")]
    StorageUnavailable(String),
    /// The storage backend rejected a read or a write.
    #[error("preference storage error: {0}")]
    Storage(String),
    /// A locale dictionary lacks keys the reference locale defines.
    #[error("locale '{locale}' is missing {} key(s): {}", .keys.len(), .keys.join(", "))]
    MissingKeys {
        /// Locale whose dictionary was rejected.
        locale: String,
        /// Missing key paths, sorted.
        keys: Vec<String>,
    },
    /// A message file or stored document was not valid.
    #[error("parse error: {0}")]
    Parse(String),
    /// Filesystem failure while loading messages or preferences.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for I18nError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
