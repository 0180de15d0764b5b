//! Runtime configuration snapshot loaded from the settings DB.

use super::manager::SettingsManager;

/// How returned markup becomes a drawable node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    /// Create a vector node directly from the markup.
    #[default]
    Vector,
    /// Rasterize the markup and paint a rectangle with the bitmap.
    Raster,
}

impl ImportMode {
    pub fn from_str_setting(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "raster" => Self::Raster,
            _ => Self::Vector,
        }
    }
}

/// Runtime configuration populated from the settings DB.
///
/// The API key is deliberately not part of the snapshot: it is read
/// from the DB on every generate call so a freshly saved key takes
/// effect without a reload.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub endpoint: String,
    pub import_mode: ImportMode,
    pub notice_duration_ms: u64,
    pub container_gap: f32,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://zebra-code.p.rapidapi.com/".into(),
            import_mode: ImportMode::Vector,
            notice_duration_ms: 3000,
            container_gap: 20.0,
        }
    }
}

impl StudioConfig {
    /// Load configuration from the settings manager.
    pub fn load(sm: &SettingsManager) -> Result<Self, anyhow::Error> {
        let g = |key: &str| -> String { sm.get_setting(key).unwrap_or_default() };

        let defaults = Self::default();
        Ok(Self {
            endpoint: {
                let e = g("zebra.endpoint");
                if e.is_empty() { defaults.endpoint } else { e }
            },
            import_mode: ImportMode::from_str_setting(&g("graphic.import-mode")),
            notice_duration_ms: parse_u64(&g("notice.duration-ms"), defaults.notice_duration_ms),
            container_gap: parse_f32(&g("canvas.container-gap"), defaults.container_gap),
        })
    }

    /// Reload config from the settings manager.
    pub fn reload(&mut self, sm: &SettingsManager) -> Result<(), anyhow::Error> {
        *self = Self::load(sm)?;
        Ok(())
    }
}

fn parse_u64(s: &str, default: u64) -> u64 {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}

fn parse_f32(s: &str, default: f32) -> f32 {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use studio_db::Database;

    #[test]
    fn load_uses_defaults_for_empty_db() {
        let sm = SettingsManager::new(Database::open_in_memory().unwrap());
        let config = StudioConfig::load(&sm).unwrap();
        assert_eq!(config.import_mode, ImportMode::Vector);
        assert_eq!(config.notice_duration_ms, 3000);
        assert_eq!(config.container_gap, 20.0);
        assert!(config.endpoint.contains("zebra-code"));
    }

    #[test]
    fn load_picks_up_stored_values() {
        let sm = SettingsManager::new(Database::open_in_memory().unwrap());
        sm.set_setting("graphic.import-mode", "raster").unwrap();
        sm.set_setting("canvas.container-gap", "32").unwrap();
        let config = StudioConfig::load(&sm).unwrap();
        assert_eq!(config.import_mode, ImportMode::Raster);
        assert_eq!(config.container_gap, 32.0);
    }

    #[test]
    fn unknown_mode_string_falls_back_to_vector() {
        assert_eq!(ImportMode::from_str_setting("weird"), ImportMode::Vector);
        assert_eq!(ImportMode::from_str_setting("RASTER"), ImportMode::Raster);
    }
}
