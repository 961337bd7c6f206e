use crate::error::Result;

/// Byte-oriented key/value storage for the small amount of state the wall
/// keeps between runs.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;
}

pub struct StorageKeys;

impl StorageKeys {
    pub const APPRECIATION: &'static str = "appreciation";
    pub const COLOR_THEME: &'static str = "colorTheme";
    pub const LEGACY_THEME: &'static str = "theme";
    pub const SPOTLIGHT: &'static str = "spotlight";
}
