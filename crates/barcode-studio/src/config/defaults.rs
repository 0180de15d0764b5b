//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub secret: bool,
    pub required: bool,
    pub description: &'static str,
}

type DefTuple = (&'static str, &'static str, bool, bool, &'static str);

const DEFS: &[DefTuple] = &[
    (
        "zebra.api-key",
        "",
        true,
        false,
        "User-supplied rendering-service API key; empty means use the bundled key",
    ),
    (
        "zebra.endpoint",
        "https://zebra-code.p.rapidapi.com/",
        false,
        true,
        "Base URL of the barcode rendering service",
    ),
    (
        "graphic.import-mode",
        "vector",
        false,
        false,
        "How returned markup becomes a node: 'vector' or 'raster'",
    ),
    (
        "notice.duration-ms",
        "3000",
        false,
        false,
        "How long a toast notice stays on screen",
    ),
    (
        "canvas.container-gap",
        "20",
        false,
        false,
        "Horizontal gap between placed containers, in canvas units",
    ),
];

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, secret, required, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    secret,
                    required,
                    description,
                },
            )
        })
        .collect()
});

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}
