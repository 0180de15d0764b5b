//! SettingsManager: DB-backed settings with defaults and validation.

use studio_db::Database;

use super::defaults::DEFAULT_SETTINGS;
use super::validation::validate_setting;
use super::SettingType;

/// Wraps [`Database`] to provide high-level settings operations.
pub struct SettingsManager {
    db: Database,
}

impl SettingsManager {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Get a setting value. Falls back to default if not in DB.
    pub fn get_setting(&self, key: &str) -> Result<String, anyhow::Error> {
        if let Some(val) = self.db.get_setting(key)? {
            return Ok(val);
        }
        if let Some(def) = DEFAULT_SETTINGS.get(key) {
            return Ok(def.default.to_string());
        }
        anyhow::bail!("setting not found: {key}");
    }

    /// Set a setting value with validation.
    pub fn set_setting(&self, key: &str, value: &str) -> Result<(), anyhow::Error> {
        let def = DEFAULT_SETTINGS
            .get(key)
            .ok_or_else(|| anyhow::anyhow!("unknown setting key: {key}"))?;

        validate_setting(key, value)
            .map_err(|e| anyhow::anyhow!("validation error for {key}: {e}"))?;

        let setting_type = if def.secret {
            SettingType::Secret
        } else {
            SettingType::Normal
        };
        self.db.set_setting(key, value, setting_type.as_db_str())?;
        Ok(())
    }

    /// Initialize default settings in DB (skip existing).
    pub fn initialize_defaults(&self) -> Result<(), anyhow::Error> {
        for (key, def) in DEFAULT_SETTINGS.iter() {
            if self.db.get_setting(key)?.is_some() {
                continue;
            }
            let setting_type = if def.secret { "secret" } else { "normal" };
            self.db.set_setting(key, def.default, setting_type)?;
        }
        Ok(())
    }

    pub fn db(&self) -> &Database {
        &self.db
    }
}
