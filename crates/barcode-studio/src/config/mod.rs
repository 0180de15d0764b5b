//! Configuration management: defaults, validation, loading from the DB.

pub mod defaults;
pub mod manager;
pub mod studio_config;
pub mod validation;

pub use manager::SettingsManager;
pub use studio_config::{ImportMode, StudioConfig};

use serde::{Deserialize, Serialize};

/// Setting type: normal or secret (masked in UI responses).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    Normal,
    Secret,
}

impl SettingType {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Secret => "secret",
        }
    }
}

/// The settings key holding the user's own API key.
pub const API_KEY_SETTING: &str = "zebra.api-key";

/// Bundled key used whenever the user has not stored their own.
pub const FALLBACK_API_KEY: &str = "9177ead490msha2000b73cf6ac13p1545c0jsn8e9e83d0fed7";
