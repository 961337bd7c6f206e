use crate::domain::{KeyValueStore, StorageKeys};
use std::sync::Arc;
use tracing::{info, warn};

pub const DEFAULT_THEME: &str = "dark";

/// The saved color theme, stored as a bare UTF-8 identifier. Reads fall back
/// to the legacy key, then to [`DEFAULT_THEME`]; writes always go to the
/// current key.
pub struct ThemePreference {
    kv: Arc<dyn KeyValueStore>,
}

impl ThemePreference {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.kv.get(key) {
            Ok(Some(bytes)) => String::from_utf8(bytes)
                .map_err(|e| warn!("Ignoring unreadable theme under '{}': {}", key, e))
                .ok()
                .filter(|theme| !theme.is_empty()),
            Ok(None) => None,
            Err(e) => {
                warn!("Could not read theme: {}", e);
                None
            }
        }
    }

    pub fn current(&self) -> String {
        self.read(StorageKeys::COLOR_THEME)
            .or_else(|| self.read(StorageKeys::LEGACY_THEME))
            .unwrap_or_else(|| DEFAULT_THEME.to_string())
    }

    pub fn set(&self, theme: &str) {
        match self.kv.set(StorageKeys::COLOR_THEME, theme.as_bytes()) {
            Ok(()) => info!("Color theme switched to: {}", theme),
            Err(e) => warn!("Could not persist theme: {}", e),
        }
    }
}
