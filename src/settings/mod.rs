//! Settings bridge
//!
//! The interception core reads configuration exactly once at startup through
//! the [`SettingsStore`] trait; the options surface writes through
//! [`SettingsWriter`] at the user's pace. Missing keys resolve to documented
//! defaults, and so do values of the wrong stored type.

pub mod store;
pub mod writer;

// Re-export commonly used types
pub use store::{MemoryStore, SettingsError, SettingsStore};
pub use writer::SettingsWriter;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_COMPRESS_ON_DRAG, DEFAULT_COMPRESS_ON_UPLOAD, DEFAULT_ENABLED, DEFAULT_QUALITY,
    MAX_QUALITY, MIN_QUALITY,
};

/// Storage keys the bridge reads and writes
pub const KEY_ENABLED: &str = "enabled";
pub const KEY_COMPRESS_ON_DRAG: &str = "compressOnDrag";
pub const KEY_COMPRESS_ON_UPLOAD: &str = "compressOnUpload";
pub const KEY_QUALITY: &str = "quality";

/// All keys, in the order the loader requests them
pub const SETTING_KEYS: [&str; 4] = [
    KEY_ENABLED,
    KEY_COMPRESS_ON_DRAG,
    KEY_COMPRESS_ON_UPLOAD,
    KEY_QUALITY,
];

/// User-facing configuration, loaded once per page load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub enabled: bool,
    pub compress_on_drag: bool,
    pub compress_on_upload: bool,
    pub quality: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: DEFAULT_ENABLED,
            compress_on_drag: DEFAULT_COMPRESS_ON_DRAG,
            compress_on_upload: DEFAULT_COMPRESS_ON_UPLOAD,
            quality: DEFAULT_QUALITY,
        }
    }
}

impl Settings {
    /// Load settings from the bridge, applying defaults for missing or
    /// wrongly-typed values and clamping quality to its slider range
    pub async fn load(store: &dyn SettingsStore) -> Result<Self, SettingsError> {
        let values = store.get_many(&SETTING_KEYS).await?;
        let defaults = Settings::default();

        let bool_or = |key: &str, fallback: bool| {
            values.get(key).and_then(|v| v.as_bool()).unwrap_or(fallback)
        };

        let quality = values
            .get(KEY_QUALITY)
            .and_then(|v| v.as_u64())
            .and_then(|q| u8::try_from(q).ok())
            .unwrap_or(defaults.quality);

        Ok(Self {
            enabled: bool_or(KEY_ENABLED, defaults.enabled),
            compress_on_drag: bool_or(KEY_COMPRESS_ON_DRAG, defaults.compress_on_drag),
            compress_on_upload: bool_or(KEY_COMPRESS_ON_UPLOAD, defaults.compress_on_upload),
            quality,
        }
        .normalized())
    }

    /// Clamp quality into the [`MIN_QUALITY`], [`MAX_QUALITY`] range
    pub fn normalized(mut self) -> Self {
        self.quality = self.quality.clamp(MIN_QUALITY, MAX_QUALITY);
        self
    }
}
