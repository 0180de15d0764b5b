//! Foundation init: tracing, data directory, database, config.

use std::path::PathBuf;

use studio_canvas::CanvasDocument;
use studio_db::Database;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use crate::config::{SettingsManager, StudioConfig};
use crate::messages::UiEvent;
use crate::session::Session;

/// Install the tracing subscriber. Call once, from the host shell.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}

/// Determine the data directory for the plugin.
/// Priority: BARCODE_STUDIO_DATA_DIR env var > ~/.barcode-studio
fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("BARCODE_STUDIO_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".barcode-studio")
}

/// Open the database, seed defaults, load config (fatal on error).
pub fn init_foundation() -> Result<(Database, StudioConfig, PathBuf), anyhow::Error> {
    let dir = data_dir();
    std::fs::create_dir_all(&dir)?;

    let db_path = dir.join("studio.db");
    tracing::info!("Opening database at {}", db_path.display());
    let db = Database::open(&db_path)?;

    let sm = SettingsManager::new(db.clone());
    sm.initialize_defaults()?;

    let config = StudioConfig::load(&sm)?;
    tracing::info!("Settings loaded (endpoint={})", config.endpoint);
    Ok((db, config, dir))
}

/// Full session bootstrap over the given canvas document.
pub fn session<C: CanvasDocument>(
    canvas: C,
) -> Result<(Session<C>, mpsc::UnboundedReceiver<UiEvent>), anyhow::Error> {
    let (db, config, _dir) = init_foundation()?;
    Session::new(canvas, db, config)
}
